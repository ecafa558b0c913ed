use std::fmt;

use crate::time::{signature_map::TimeSignatureMap, ticks::Ticks};

// absorbs the rounding of the fractional bar index right on a bar line
const BAR_EPSILON: f64 = 1e-9;

#[derive(PartialEq, Clone, Copy)]
pub struct BarsTime {
  bars: i64,
  beats: u32,
  ticks: Ticks,
}

impl BarsTime {
  pub fn new(bars: i64, beats: u32, ticks: Ticks) -> BarsTime {
    BarsTime { bars, beats, ticks }
  }

  pub fn from_ticks(tick: Ticks, signature_map: &TimeSignatureMap) -> BarsTime {
    let status = signature_map.get_meter_status(tick);
    let bars = (status.bar_index + BAR_EPSILON).floor() as i64;
    let offset = (tick - signature_map.get_tick_by_bar_index(bars)).max(0.0);
    let ticks_per_beat = signature_map.signature_at_bar(bars).ticks_per_beat();
    let beats = (offset / ticks_per_beat).floor();
    BarsTime {
      bars,
      beats: beats as u32,
      ticks: offset - beats * ticks_per_beat,
    }
  }

  pub fn get_bars(&self) -> i64 {
    self.bars
  }

  pub fn get_beats(&self) -> u32 {
    self.beats
  }

  pub fn get_ticks(&self) -> Ticks {
    self.ticks
  }

  pub fn to_ticks(&self, signature_map: &TimeSignatureMap) -> Ticks {
    signature_map.get_tick_by_bar_and_beat(self.bars, i64::from(self.beats)) + self.ticks
  }
}

impl fmt::Debug for BarsTime {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(
      f,
      "{:03}:{:02}:{:03}",
      self.bars + 1,
      self.beats + 1,
      // truncated, rounding up would print a full beat of ticks
      self.ticks.max(0.0).floor() as i64
    )
  }
}

impl fmt::Display for BarsTime {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    fmt::Debug::fmt(self, f)
  }
}

#[cfg(test)]
mod test {

  use super::BarsTime;
  use crate::time::signature_map::TimeSignatureMap;

  fn three_four_from_bar_two() -> TimeSignatureMap {
    let mut signature_map = TimeSignatureMap::new();
    signature_map.add_time_signature(0, 4, 4).unwrap();
    signature_map.add_time_signature(2, 3, 4).unwrap();
    signature_map
  }

  #[test]
  pub fn new() {
    let time = BarsTime::new(10, 1, 100.0);
    assert_eq!(time.get_bars(), 10);
    assert_eq!(time.get_beats(), 1);
    assert_eq!(time.get_ticks(), 100.0);
  }

  #[test]
  pub fn from_ticks() {
    let signature_map = three_four_from_bar_two();
    let ticks = 3840.0 + 1440.0 * 10.0 + 480.0 * 2.0 + 30.0;
    let time = BarsTime::from_ticks(ticks, &signature_map);
    assert_eq!(time.get_bars(), 12);
    assert_eq!(time.get_beats(), 2);
    assert_eq!(time.get_ticks(), 30.0);
  }

  #[test]
  pub fn from_ticks_on_bar_line() {
    let signature_map = three_four_from_bar_two();
    let time = BarsTime::from_ticks(3840.0, &signature_map);
    assert_eq!(time, BarsTime::new(2, 0, 0.0));
  }

  #[test]
  pub fn to_ticks() {
    let signature_map = three_four_from_bar_two();
    let ticks = 123_456.5;
    let time = BarsTime::from_ticks(ticks, &signature_map);
    assert!((time.to_ticks(&signature_map) - ticks).abs() < 1e-6);
  }

  #[test]
  pub fn format() {
    let time = BarsTime::new(0, 2, 59.6);
    assert_eq!(format!("{:?}", time), "001:03:059");
    assert_eq!(time.to_string(), "001:03:059");
  }

  #[test]
  pub fn format_just_before_a_beat() {
    let signature_map = TimeSignatureMap::with_signature(7, 8).unwrap();
    let time = BarsTime::from_ticks(5039.999, &signature_map);
    assert_eq!(time.get_bars(), 2);
    assert_eq!(time.get_beats(), 6);
    assert_eq!(time.to_string(), "003:07:239");
  }
}
