use std::fmt;

use crate::error::{TimelineError, TimelineResult};
use crate::info::PartInfo;
use crate::property::{Callback, Observable, Property};
use crate::time::ticks::{validate_position, Seconds, Ticks};
use crate::time::TempoMap;

fn validate_bounds(start: Ticks, end: Ticks) -> TimelineResult<(Ticks, Ticks)> {
  let start = validate_position(start)?;
  let end = validate_position(end)?;
  if start <= end {
    Ok((start, end))
  } else {
    Err(TimelineError::InvalidPartBounds { start, end })
  }
}

///! An editable region of a track, spanning `[start_pos, end_pos]`.
pub struct Part {
  name: Property<String>,
  start_pos: Property<Ticks>,
  end_pos: Property<Ticks>,
}

impl Part {
  pub fn new<T>(name: T, start_pos: Ticks, end_pos: Ticks) -> TimelineResult<Part>
  where
    T: Into<String>,
  {
    let (start_pos, end_pos) = validate_bounds(start_pos, end_pos)?;
    Ok(Part {
      name: Property::new(name.into()),
      start_pos: Property::new(start_pos),
      end_pos: Property::new(end_pos),
    })
  }

  pub fn from_info(info: &PartInfo) -> TimelineResult<Part> {
    Part::new(info.name.as_str(), info.start_pos, info.end_pos)
  }

  pub fn get_info(&self) -> PartInfo {
    PartInfo {
      name: self.name(),
      start_pos: self.start_pos(),
      end_pos: self.end_pos(),
    }
  }

  pub fn name(&self) -> String {
    self.name.get()
  }

  pub fn set_name<T>(&self, name: T)
  where
    T: Into<String>,
  {
    self.name.set(name.into());
  }

  pub fn start_pos(&self) -> Ticks {
    self.start_pos.get()
  }

  pub fn end_pos(&self) -> Ticks {
    self.end_pos.get()
  }

  pub fn start_pos_property(&self) -> &Property<Ticks> {
    &self.start_pos
  }

  pub fn end_pos_property(&self) -> &Property<Ticks> {
    &self.end_pos
  }

  pub fn set_bounds(&self, start_pos: Ticks, end_pos: Ticks) -> TimelineResult<()> {
    let (start_pos, end_pos) = validate_bounds(start_pos, end_pos)?;
    // both bounds are stored before anyone is notified, so nobody sees start > end
    let mut changed = Vec::with_capacity(2);
    if self.start_pos.store(start_pos) {
      changed.push(&self.start_pos);
    }
    if self.end_pos.store(end_pos) {
      changed.push(&self.end_pos);
    }
    Property::notify_all(&changed);
    Ok(())
  }

  pub fn move_by(&self, offset: Ticks) -> TimelineResult<()> {
    self.set_bounds(self.start_pos() + offset, self.end_pos() + offset)
  }

  pub fn length(&self) -> Ticks {
    self.end_pos() - self.start_pos()
  }

  pub fn duration(&self, tempo_map: &TempoMap) -> Seconds {
    tempo_map.get_time(self.end_pos()) - tempo_map.get_time(self.start_pos())
  }

  pub fn overlaps(&self, start: Ticks, end: Ticks) -> bool {
    self.start_pos() <= end && self.end_pos() >= start
  }

  ///! Sorts by start, then the longest part first, then by insertion order.
  pub fn is_in_order(prev: &Part, next: &Part) -> bool {
    let (prev_start, next_start) = (prev.start_pos(), next.start_pos());
    if prev_start != next_start {
      return prev_start < next_start;
    }
    prev.end_pos() >= next.end_pos()
  }
}

impl Observable for Part {
  fn subscribe(&self, callback: &Callback) {
    self.start_pos.subscribe_derived(callback);
    self.end_pos.subscribe_derived(callback);
  }

  fn unsubscribe(&self, callback: &Callback) {
    self.start_pos.unsubscribe_derived(callback);
    self.end_pos.unsubscribe_derived(callback);
  }
}

impl fmt::Debug for Part {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(
      f,
      "Part({:?} [{}, {}])",
      self.name(),
      self.start_pos(),
      self.end_pos()
    )
  }
}
