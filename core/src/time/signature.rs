use std::fmt;

use crate::error::{TimelineError, TimelineResult};
use crate::info::TimeSignatureInfo;
use crate::property::{Callback, Observable, Property};
use crate::time::ticks::{Ticks, TICKS_PER_QUARTER_NOTE};

pub const DEFAULT_NUMERATOR: u32 = 4;
pub const DEFAULT_DENOMINATOR: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
  numerator: u32,   // beats per bar
  denominator: u32, // note value of a beat
}

impl Signature {
  pub fn new(numerator: u32, denominator: u32) -> TimelineResult<Signature> {
    if numerator == 0 || !denominator.is_power_of_two() {
      return Err(TimelineError::InvalidSignature {
        numerator,
        denominator,
      });
    }
    Ok(Signature {
      numerator,
      denominator,
    })
  }

  pub fn get_numerator(&self) -> u32 {
    self.numerator
  }

  pub fn get_denominator(&self) -> u32 {
    self.denominator
  }

  pub fn ticks_per_beat(&self) -> Ticks {
    TICKS_PER_QUARTER_NOTE * 4.0 / f64::from(self.denominator)
  }

  pub fn ticks_per_bar(&self) -> Ticks {
    f64::from(self.numerator) * self.ticks_per_beat()
  }
}

impl Default for Signature {
  fn default() -> Signature {
    Signature {
      numerator: DEFAULT_NUMERATOR,
      denominator: DEFAULT_DENOMINATOR,
    }
  }
}

impl fmt::Display for Signature {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}/{}", self.numerator, self.denominator)
  }
}

///! A time signature change that applies from `bar_index` until the next one.
pub struct TimeSignature {
  bar_index: Property<u32>,
  signature: Property<Signature>,
}

impl TimeSignature {
  pub fn new(bar_index: u32, numerator: u32, denominator: u32) -> TimelineResult<TimeSignature> {
    Ok(TimeSignature {
      bar_index: Property::new(bar_index),
      signature: Property::new(Signature::new(numerator, denominator)?),
    })
  }

  pub fn from_info(info: &TimeSignatureInfo) -> TimelineResult<TimeSignature> {
    TimeSignature::new(info.bar_index, info.numerator, info.denominator)
  }

  pub fn get_info(&self) -> TimeSignatureInfo {
    let signature = self.signature();
    TimeSignatureInfo {
      bar_index: self.bar_index(),
      numerator: signature.get_numerator(),
      denominator: signature.get_denominator(),
    }
  }

  pub fn bar_index(&self) -> u32 {
    self.bar_index.get()
  }

  pub fn set_bar_index(&self, bar_index: u32) {
    self.bar_index.set(bar_index);
  }

  pub fn bar_index_property(&self) -> &Property<u32> {
    &self.bar_index
  }

  pub fn signature(&self) -> Signature {
    self.signature.get()
  }

  pub fn set_signature(&self, numerator: u32, denominator: u32) -> TimelineResult<()> {
    self.signature.set(Signature::new(numerator, denominator)?);
    Ok(())
  }

  pub fn signature_property(&self) -> &Property<Signature> {
    &self.signature
  }

  pub fn numerator(&self) -> u32 {
    self.signature().get_numerator()
  }

  pub fn denominator(&self) -> u32 {
    self.signature().get_denominator()
  }

  pub fn ticks_per_beat(&self) -> Ticks {
    self.signature().ticks_per_beat()
  }

  pub fn ticks_per_bar(&self) -> Ticks {
    self.signature().ticks_per_bar()
  }

  pub fn is_in_order(prev: &TimeSignature, next: &TimeSignature) -> bool {
    prev.bar_index() <= next.bar_index()
  }
}

impl Observable for TimeSignature {
  fn subscribe(&self, callback: &Callback) {
    self.bar_index.subscribe_derived(callback);
    self.signature.subscribe_derived(callback);
  }

  fn unsubscribe(&self, callback: &Callback) {
    self.bar_index.unsubscribe_derived(callback);
    self.signature.unsubscribe_derived(callback);
  }
}

impl fmt::Debug for TimeSignature {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "TimeSignature({} @ bar {})", self.signature(), self.bar_index())
  }
}

#[cfg(test)]
mod test {

  use super::{Signature, TimeSignature};
  use crate::error::TimelineError;

  #[test]
  pub fn signature_new() {
    let signature = Signature::new(3, 4).unwrap();
    assert_eq!(signature.get_numerator(), 3);
    assert_eq!(signature.get_denominator(), 4);
    assert_eq!(signature.to_string(), "3/4");
  }

  #[test]
  pub fn signature_invalid() {
    assert_eq!(
      Signature::new(0, 4),
      Err(TimelineError::InvalidSignature {
        numerator: 0,
        denominator: 4
      })
    );
    assert!(Signature::new(4, 0).is_err());
    assert!(Signature::new(4, 6).is_err());
  }

  #[test]
  pub fn ticks_per_beat_and_bar() {
    let four_four = Signature::new(4, 4).unwrap();
    assert_eq!(four_four.ticks_per_beat(), 480.0);
    assert_eq!(four_four.ticks_per_bar(), 1920.0);

    let six_eight = Signature::new(6, 8).unwrap();
    assert_eq!(six_eight.ticks_per_beat(), 240.0);
    assert_eq!(six_eight.ticks_per_bar(), 1440.0);

    let two_two = Signature::new(2, 2).unwrap();
    assert_eq!(two_two.ticks_per_beat(), 960.0);
  }

  #[test]
  pub fn time_signature_set_signature() {
    let time_signature = TimeSignature::new(4, 3, 4).unwrap();
    assert!(time_signature.set_signature(5, 3).is_err());
    assert_eq!(time_signature.numerator(), 3);
    time_signature.set_signature(7, 8).unwrap();
    assert_eq!(time_signature.numerator(), 7);
    assert_eq!(time_signature.denominator(), 8);
  }

  #[test]
  pub fn info() {
    let time_signature = TimeSignature::new(8, 6, 8).unwrap();
    let info = time_signature.get_info();
    assert_eq!(info.bar_index, 8);
    assert_eq!(info.numerator, 6);
    assert_eq!(info.denominator, 8);
    let restored = TimeSignature::from_info(&info).unwrap();
    assert_eq!(restored.signature(), time_signature.signature());
  }
}
