use crate::error::{TimelineError, TimelineResult};

pub type Ticks = f64;
pub type Seconds = f64;

pub const TICKS_PER_QUARTER_NOTE: Ticks = 480.0;

pub const SECONDS_PER_MINUTE: f64 = 60.0;

pub fn ticks_to_seconds(ticks: Ticks, bpm: f64) -> Seconds {
  ticks * SECONDS_PER_MINUTE / (bpm * TICKS_PER_QUARTER_NOTE)
}

pub fn seconds_to_ticks(seconds: Seconds, bpm: f64) -> Ticks {
  seconds * bpm * TICKS_PER_QUARTER_NOTE / SECONDS_PER_MINUTE
}

pub fn validate_position(pos: Ticks) -> TimelineResult<Ticks> {
  if pos.is_finite() {
    Ok(pos)
  } else {
    Err(TimelineError::InvalidPosition { pos })
  }
}
