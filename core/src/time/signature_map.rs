use std::cell::{Ref, RefCell};
use std::rc::Rc;

use log::{debug, trace, warn};

use crate::error::TimelineResult;
use crate::info::TimeSignatureInfo;
use crate::list::OrderedList;
use crate::time::segment_index;
use crate::time::signature::{Signature, TimeSignature};
use crate::time::ticks::Ticks;

///! Where a tick falls in the bar grid.
///!
///! `bar_index` is fractional, its integer part is the bar and the remainder
///! the progress through that bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterStatus {
  pub time_signature_index: usize,
  pub bar_index: f64,
}

impl MeterStatus {
  pub fn bar(&self) -> i64 {
    self.bar_index.floor() as i64
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterSegment {
  pub bar_index: i64,
  pub start_tick: Ticks,
  pub signature: Signature,
}

#[derive(Debug, Default)]
struct SignatureCache {
  revision: Option<u64>,
  segments: Vec<MeterSegment>,
  bar_indexes: Vec<i64>,
  start_ticks: Vec<Ticks>,
  duplicates: Vec<i64>,
  rebuilds: usize,
}

///! Converts between ticks and bars under step-wise time signatures.
///!
///! A time signature applies to the bars `[bar_index, next.bar_index)`; the
///! last one is open ended and the first one also covers the bars before it.
///! Segment starts are cached in ticks and rebuilt lazily like `TempoMap`.
pub struct TimeSignatureMap {
  time_signatures: OrderedList<TimeSignature>,
  cache: RefCell<SignatureCache>,
}

impl Default for TimeSignatureMap {
  fn default() -> Self {
    TimeSignatureMap::new()
  }
}

impl TimeSignatureMap {
  pub fn new() -> TimeSignatureMap {
    TimeSignatureMap {
      time_signatures: OrderedList::new(TimeSignature::is_in_order),
      cache: RefCell::new(SignatureCache::default()),
    }
  }

  pub fn with_signature(numerator: u32, denominator: u32) -> TimelineResult<TimeSignatureMap> {
    let mut signature_map = TimeSignatureMap::new();
    signature_map.add_time_signature(0, numerator, denominator)?;
    Ok(signature_map)
  }

  pub fn from_info(infos: &[TimeSignatureInfo]) -> TimelineResult<TimeSignatureMap> {
    let mut signature_map = TimeSignatureMap::new();
    for info in infos {
      signature_map.insert(Rc::new(TimeSignature::from_info(info)?));
    }
    Ok(signature_map)
  }

  pub fn get_info(&self) -> Vec<TimeSignatureInfo> {
    self
      .time_signatures
      .iter()
      .map(|time_signature| time_signature.get_info())
      .collect()
  }

  pub fn time_signatures(&self) -> &OrderedList<TimeSignature> {
    &self.time_signatures
  }

  pub fn insert(&mut self, time_signature: Rc<TimeSignature>) -> usize {
    let bar_index = time_signature.bar_index();
    let index = self.time_signatures.insert(time_signature);
    debug!("Inserted a time signature at bar {} [{}]", bar_index, index);
    index
  }

  pub fn remove(&mut self, time_signature: &Rc<TimeSignature>) -> bool {
    let removed = self.time_signatures.remove(time_signature);
    if removed {
      debug!(
        "Removed the time signature at bar {}",
        time_signature.bar_index()
      );
    }
    removed
  }

  pub fn add_time_signature(
    &mut self,
    bar_index: u32,
    numerator: u32,
    denominator: u32,
  ) -> TimelineResult<Rc<TimeSignature>> {
    let time_signature = Rc::new(TimeSignature::new(bar_index, numerator, denominator)?);
    self.insert(time_signature.clone());
    Ok(time_signature)
  }

  pub fn is_dirty(&self) -> bool {
    self.cache.borrow().revision != Some(self.time_signatures.revision())
  }

  pub fn rebuild_count(&self) -> usize {
    self.cache.borrow().rebuilds
  }

  pub fn rebuild(&self) {
    let mut cache = self.cache.borrow_mut();
    let revision = self.time_signatures.revision();
    trace!("Rebuilding the time signature map [revision={}]", revision);

    cache.segments.clear();
    cache.duplicates.clear();

    let mut prev: Option<MeterSegment> = None;
    for time_signature in self.time_signatures.iter() {
      let bar_index = i64::from(time_signature.bar_index());
      let signature = time_signature.signature();
      let start_tick = match prev {
        Some(prev) => {
          if prev.bar_index == bar_index {
            warn!("There is more than one time signature at bar {}", bar_index);
            cache.duplicates.push(bar_index);
          }
          prev.start_tick + (bar_index - prev.bar_index) as f64 * prev.signature.ticks_per_bar()
        }
        None => bar_index as f64 * signature.ticks_per_bar(),
      };
      let segment = MeterSegment {
        bar_index,
        start_tick,
        signature,
      };
      cache.segments.push(segment);
      prev = Some(segment);
    }

    if cache.segments.is_empty() {
      cache.segments.push(MeterSegment {
        bar_index: 0,
        start_tick: 0.0,
        signature: Signature::default(),
      });
    }

    let bar_indexes = cache.segments.iter().map(|s| s.bar_index).collect();
    let start_ticks = cache.segments.iter().map(|s| s.start_tick).collect();
    cache.bar_indexes = bar_indexes;
    cache.start_ticks = start_ticks;
    cache.revision = Some(revision);
    cache.rebuilds += 1;
  }

  ///! Bars holding more than one time signature, the later one wins.
  pub fn duplicate_bars(&self) -> Vec<i64> {
    self.refresh().duplicates.clone()
  }

  fn refresh(&self) -> Ref<'_, SignatureCache> {
    if self.is_dirty() {
      self.rebuild();
    }
    let cache = self.cache.borrow();
    debug_assert_eq!(cache.revision, Some(self.time_signatures.revision()));
    cache
  }

  ///! The cached segments, one per time signature (or a default 4/4 one).
  pub fn segments(&self) -> Vec<MeterSegment> {
    self.refresh().segments.clone()
  }

  fn segment_for_bar(&self, bar_index: i64) -> MeterSegment {
    let cache = self.refresh();
    cache.segments[segment_index(&cache.bar_indexes, &bar_index)]
  }

  pub fn signature_at_bar(&self, bar_index: i64) -> Signature {
    self.segment_for_bar(bar_index).signature
  }

  pub fn get_meter_status(&self, tick: Ticks) -> MeterStatus {
    let cache = self.refresh();
    let index = segment_index(&cache.start_ticks, &tick);
    let segment = &cache.segments[index];
    let bars = (tick - segment.start_tick) / segment.signature.ticks_per_bar();
    MeterStatus {
      time_signature_index: index,
      bar_index: segment.bar_index as f64 + bars,
    }
  }

  pub fn get_tick_by_bar_index(&self, bar_index: i64) -> Ticks {
    let segment = self.segment_for_bar(bar_index);
    segment.start_tick + (bar_index - segment.bar_index) as f64 * segment.signature.ticks_per_bar()
  }

  pub fn get_tick_by_bar_and_beat(&self, bar_index: i64, beat_index: i64) -> Ticks {
    let segment = self.segment_for_bar(bar_index);
    segment.start_tick
      + (bar_index - segment.bar_index) as f64 * segment.signature.ticks_per_bar()
      + beat_index as f64 * segment.signature.ticks_per_beat()
  }
}

#[cfg(test)]
mod test {

  use std::rc::Rc;

  use super::{MeterStatus, TimeSignatureMap};
  use crate::info::TimeSignatureInfo;
  use crate::time::signature::{Signature, TimeSignature};

  fn mixed() -> TimeSignatureMap {
    // 4/4 for bars 0..2, 3/4 for bars 2..5, 6/8 from bar 5 on
    let mut signature_map = TimeSignatureMap::new();
    signature_map.add_time_signature(0, 4, 4).unwrap();
    signature_map.add_time_signature(5, 6, 8).unwrap();
    signature_map.add_time_signature(2, 3, 4).unwrap();
    signature_map
  }

  #[test]
  pub fn scenario_b() {
    let signature_map = TimeSignatureMap::with_signature(4, 4).unwrap();
    assert_eq!(signature_map.get_tick_by_bar_index(2), 3840.0);
    assert_eq!(signature_map.get_tick_by_bar_and_beat(1, 2), 2880.0);
  }

  #[test]
  pub fn empty_map_is_four_four() {
    let signature_map = TimeSignatureMap::new();
    assert_eq!(signature_map.get_tick_by_bar_index(3), 5760.0);
    assert_eq!(
      signature_map.get_meter_status(2880.0),
      MeterStatus {
        time_signature_index: 0,
        bar_index: 1.5
      }
    );
  }

  #[test]
  pub fn segments() {
    let signature_map = mixed();
    let starts: Vec<(i64, f64)> = signature_map
      .segments()
      .iter()
      .map(|s| (s.bar_index, s.start_tick))
      .collect();
    assert_eq!(starts, vec![(0, 0.0), (2, 3840.0), (5, 3840.0 + 3.0 * 1440.0)]);
  }

  #[test]
  pub fn get_tick_by_bar_index() {
    let signature_map = mixed();
    assert_eq!(signature_map.get_tick_by_bar_index(0), 0.0);
    assert_eq!(signature_map.get_tick_by_bar_index(1), 1920.0);
    assert_eq!(signature_map.get_tick_by_bar_index(2), 3840.0);
    assert_eq!(signature_map.get_tick_by_bar_index(3), 5280.0);
    assert_eq!(signature_map.get_tick_by_bar_index(5), 8160.0);
    assert_eq!(signature_map.get_tick_by_bar_index(6), 9600.0);
  }

  #[test]
  pub fn get_tick_by_bar_and_beat() {
    let signature_map = mixed();
    assert_eq!(signature_map.get_tick_by_bar_and_beat(2, 2), 3840.0 + 960.0);
    assert_eq!(signature_map.get_tick_by_bar_and_beat(5, 5), 8160.0 + 1200.0);
  }

  #[test]
  pub fn get_meter_status() {
    let signature_map = mixed();
    let status = signature_map.get_meter_status(960.0);
    assert_eq!(status.time_signature_index, 0);
    assert_eq!(status.bar_index, 0.5);

    let status = signature_map.get_meter_status(5280.0 + 720.0);
    assert_eq!(status.time_signature_index, 1);
    assert_eq!(status.bar_index, 3.5);
    assert_eq!(status.bar(), 3);

    let status = signature_map.get_meter_status(9600.0 + 1440.0 * 10.0);
    assert_eq!(status.time_signature_index, 2);
    assert_eq!(status.bar_index, 16.0);
  }

  #[test]
  pub fn segment_boundary_is_half_open() {
    let signature_map = mixed();
    let status = signature_map.get_meter_status(3840.0);
    assert_eq!(status.time_signature_index, 1);
    assert_eq!(status.bar_index, 2.0);

    let status = signature_map.get_meter_status(3839.0);
    assert_eq!(status.time_signature_index, 0);
    assert!(status.bar_index < 2.0);
  }

  #[test]
  pub fn first_signature_extends_backwards() {
    let mut signature_map = TimeSignatureMap::new();
    signature_map.add_time_signature(2, 3, 4).unwrap();
    assert_eq!(signature_map.get_tick_by_bar_index(2), 2880.0);
    assert_eq!(signature_map.get_tick_by_bar_index(0), 0.0);
    assert_eq!(signature_map.get_tick_by_bar_index(1), 1440.0);
    assert_eq!(signature_map.get_meter_status(720.0).bar_index, 0.5);
    assert_eq!(signature_map.signature_at_bar(0), Signature::new(3, 4).unwrap());
  }

  #[test]
  pub fn negative_ticks_are_clamped_to_first_segment() {
    let signature_map = mixed();
    let status = signature_map.get_meter_status(-960.0);
    assert_eq!(status.time_signature_index, 0);
    assert_eq!(status.bar_index, -0.5);
    assert_eq!(signature_map.get_tick_by_bar_index(-1), -1920.0);
  }

  #[test]
  pub fn round_trip_bars() {
    let signature_map = mixed();
    for bar in 0..20 {
      let tick = signature_map.get_tick_by_bar_index(bar);
      assert_eq!(signature_map.get_meter_status(tick).bar_index, bar as f64);
    }
  }

  #[test]
  pub fn signature_at_bar() {
    let signature_map = mixed();
    assert_eq!(signature_map.signature_at_bar(1).to_string(), "4/4");
    assert_eq!(signature_map.signature_at_bar(2).to_string(), "3/4");
    assert_eq!(signature_map.signature_at_bar(4).to_string(), "3/4");
    assert_eq!(signature_map.signature_at_bar(100).to_string(), "6/8");
  }

  #[test]
  pub fn changes_invalidate_cache() {
    let mut signature_map = TimeSignatureMap::new();
    let first = signature_map.add_time_signature(0, 4, 4).unwrap();
    let second = signature_map.add_time_signature(2, 3, 4).unwrap();
    assert_eq!(signature_map.get_tick_by_bar_index(3), 5280.0);
    assert!(!signature_map.is_dirty());

    first.set_signature(2, 4).unwrap();
    assert!(signature_map.is_dirty());
    assert_eq!(signature_map.get_tick_by_bar_index(3), 1920.0 + 1440.0);

    second.set_bar_index(1);
    assert_eq!(signature_map.get_tick_by_bar_index(3), 960.0 + 2.0 * 1440.0);
    assert_eq!(signature_map.rebuild_count(), 3);
  }

  #[test]
  pub fn bar_index_change_reorders() {
    let mut signature_map = mixed();
    let last = signature_map.time_signatures().last().unwrap();
    last.set_bar_index(1);
    let bars: Vec<u32> = signature_map
      .time_signatures()
      .iter()
      .map(|ts| ts.bar_index())
      .collect();
    assert_eq!(bars, vec![0, 1, 2]);
    assert_eq!(signature_map.signature_at_bar(1).to_string(), "6/8");
    assert!(signature_map.remove(&last));
    assert_eq!(signature_map.signature_at_bar(1).to_string(), "4/4");
  }

  #[test]
  pub fn duplicate_bars() {
    let mut signature_map = mixed();
    assert!(signature_map.duplicate_bars().is_empty());

    signature_map.add_time_signature(2, 5, 4).unwrap();
    assert_eq!(signature_map.duplicate_bars(), vec![2]);
    assert_eq!(signature_map.signature_at_bar(2).to_string(), "5/4");

    let last = signature_map.time_signatures().last().unwrap();
    last.set_bar_index(0);
    assert_eq!(signature_map.duplicate_bars(), vec![0, 2]);
  }

  #[test]
  pub fn remove_non_member() {
    let mut signature_map = mixed();
    let stranger = Rc::new(TimeSignature::new(0, 4, 4).unwrap());
    assert!(!signature_map.remove(&stranger));
    assert_eq!(signature_map.time_signatures().len(), 3);
  }

  #[test]
  pub fn info() {
    let infos = vec![
      TimeSignatureInfo {
        bar_index: 0,
        numerator: 4,
        denominator: 4,
      },
      TimeSignatureInfo {
        bar_index: 4,
        numerator: 7,
        denominator: 8,
      },
    ];
    let signature_map = TimeSignatureMap::from_info(&infos).unwrap();
    assert_eq!(signature_map.get_info(), infos);
    assert_eq!(signature_map.get_tick_by_bar_index(5), 7680.0 + 1680.0);

    let invalid = vec![TimeSignatureInfo {
      bar_index: 0,
      numerator: 4,
      denominator: 3,
    }];
    assert!(TimeSignatureMap::from_info(&invalid).is_err());
  }
}
