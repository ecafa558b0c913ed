pub mod bars;
pub mod grid;
pub mod signature;
pub mod signature_map;
pub mod tempo;
pub mod tempo_map;
pub mod ticks;

pub use self::bars::BarsTime;
pub use self::grid::GridLine;
pub use self::signature::{Signature, TimeSignature};
pub use self::signature_map::{MeterSegment, MeterStatus, TimeSignatureMap};
pub use self::tempo::Tempo;
pub use self::tempo_map::TempoMap;
pub use self::ticks::{Seconds, Ticks, TICKS_PER_QUARTER_NOTE};

/// Index of the segment governing `value`: the last start `<= value`, or the
/// first segment when `value` precedes every start.
pub(crate) fn segment_index<T: PartialOrd>(starts: &[T], value: &T) -> usize {
  starts
    .partition_point(|start| start <= value)
    .saturating_sub(1)
}
