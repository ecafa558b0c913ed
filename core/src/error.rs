use failure::Fail;

#[derive(Debug, Fail, PartialEq)]
pub enum TimelineError {
  #[fail(display = "Invalid tempo: {} BPM, it must be a positive number", bpm)]
  InvalidTempo { bpm: f64 },

  #[fail(
    display = "Invalid time signature: {}/{}, the numerator must be positive and the denominator a power of two",
    numerator, denominator
  )]
  InvalidSignature { numerator: u32, denominator: u32 },

  #[fail(display = "Invalid position: {}", pos)]
  InvalidPosition { pos: f64 },

  #[fail(display = "Invalid part bounds: [{}, {}]", start, end)]
  InvalidPartBounds { start: f64, end: f64 },

  #[fail(display = "Invalid {}: {}", name, value)]
  InvalidValue { name: &'static str, value: f64 },
}

pub type TimelineResult<T> = Result<T, TimelineError>;
