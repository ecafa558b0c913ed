use std::fmt;

use crate::error::{TimelineError, TimelineResult};
use crate::info::TempoInfo;
use crate::property::{Callback, Observable, Property};
use crate::time::ticks::{validate_position, Ticks};

pub const DEFAULT_BPM: f64 = 120.0;

fn validate_bpm(bpm: f64) -> TimelineResult<f64> {
  if bpm.is_finite() && bpm > 0.0 {
    Ok(bpm)
  } else {
    Err(TimelineError::InvalidTempo { bpm })
  }
}

///! A tempo change: from `pos` on, the song runs at `bpm` quarter notes per
///! minute until the next tempo change.
pub struct Tempo {
  pos: Property<Ticks>,
  bpm: Property<f64>,
}

impl Tempo {
  pub fn new(pos: Ticks, bpm: f64) -> TimelineResult<Tempo> {
    Ok(Tempo {
      pos: Property::new(validate_position(pos)?),
      bpm: Property::new(validate_bpm(bpm)?),
    })
  }

  pub fn from_info(info: &TempoInfo) -> TimelineResult<Tempo> {
    Tempo::new(info.pos, info.bpm)
  }

  pub fn get_info(&self) -> TempoInfo {
    TempoInfo {
      pos: self.pos(),
      bpm: self.bpm(),
    }
  }

  pub fn pos(&self) -> Ticks {
    self.pos.get()
  }

  pub fn set_pos(&self, pos: Ticks) -> TimelineResult<()> {
    self.pos.set(validate_position(pos)?);
    Ok(())
  }

  pub fn pos_property(&self) -> &Property<Ticks> {
    &self.pos
  }

  pub fn bpm(&self) -> f64 {
    self.bpm.get()
  }

  pub fn set_bpm(&self, bpm: f64) -> TimelineResult<()> {
    self.bpm.set(validate_bpm(bpm)?);
    Ok(())
  }

  pub fn bpm_property(&self) -> &Property<f64> {
    &self.bpm
  }

  pub fn is_in_order(prev: &Tempo, next: &Tempo) -> bool {
    prev.pos() <= next.pos()
  }
}

impl Observable for Tempo {
  fn subscribe(&self, callback: &Callback) {
    self.pos.subscribe_derived(callback);
    self.bpm.subscribe_derived(callback);
  }

  fn unsubscribe(&self, callback: &Callback) {
    self.pos.unsubscribe_derived(callback);
    self.bpm.unsubscribe_derived(callback);
  }
}

impl fmt::Debug for Tempo {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "Tempo({} @ {:.2})", self.pos(), self.bpm())
  }
}
