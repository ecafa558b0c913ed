use std::rc::Rc;

use log::debug;
use uuid::Uuid;

use crate::error::{TimelineError, TimelineResult};
use crate::info::{PartInfo, TrackInfo};
use crate::list::OrderedList;
use crate::property::Property;
use crate::song::part::Part;
use crate::time::ticks::{Seconds, Ticks};
use crate::time::TempoMap;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct TrackId(Uuid);

impl TrackId {
  pub fn new() -> TrackId {
    TrackId(Uuid::new_v4())
  }
}

impl Default for TrackId {
  fn default() -> TrackId {
    TrackId::new()
  }
}

pub struct Track {
  id: TrackId,
  name: Property<String>,
  mute: Property<bool>,
  solo: Property<bool>,
  gain: Property<f64>,
  pan: Property<f64>,
  parts: OrderedList<Part>,
}

impl Track {
  pub fn new<T>(name: T) -> Track
  where
    T: Into<String>,
  {
    Track {
      id: TrackId::new(),
      name: Property::new(name.into()),
      mute: Property::new(false),
      solo: Property::new(false),
      gain: Property::new(0.0),
      pan: Property::new(0.0),
      parts: OrderedList::new(Part::is_in_order),
    }
  }

  pub fn from_info(info: &TrackInfo) -> TimelineResult<Track> {
    let mut track = Track::new(info.name.as_str());
    track.set_mute(info.mute);
    track.set_solo(info.solo);
    track.set_gain(info.gain)?;
    track.set_pan(info.pan)?;
    for part_info in info.parts.iter() {
      track.add_part(part_info)?;
    }
    Ok(track)
  }

  pub fn get_info(&self) -> TrackInfo {
    TrackInfo {
      name: self.name(),
      mute: self.is_mute(),
      solo: self.is_solo(),
      gain: self.gain(),
      pan: self.pan(),
      parts: self.parts.iter().map(|part| part.get_info()).collect(),
    }
  }

  pub fn id(&self) -> TrackId {
    self.id
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

  pub fn is_mute(&self) -> bool {
    self.mute.get()
  }

  pub fn set_mute(&self, mute: bool) {
    self.mute.set(mute);
  }

  pub fn mute_property(&self) -> &Property<bool> {
    &self.mute
  }

  pub fn is_solo(&self) -> bool {
    self.solo.get()
  }

  pub fn set_solo(&self, solo: bool) {
    self.solo.set(solo);
  }

  pub fn solo_property(&self) -> &Property<bool> {
    &self.solo
  }

  ///! Gain in decibels.
  pub fn gain(&self) -> f64 {
    self.gain.get()
  }

  pub fn set_gain(&self, gain: f64) -> TimelineResult<()> {
    if !gain.is_finite() {
      return Err(TimelineError::InvalidValue {
        name: "gain",
        value: gain,
      });
    }
    self.gain.set(gain);
    Ok(())
  }

  ///! Stereo balance, from -1 (left) to 1 (right).
  pub fn pan(&self) -> f64 {
    self.pan.get()
  }

  pub fn set_pan(&self, pan: f64) -> TimelineResult<()> {
    if !(-1.0..=1.0).contains(&pan) {
      return Err(TimelineError::InvalidValue {
        name: "pan",
        value: pan,
      });
    }
    self.pan.set(pan);
    Ok(())
  }

  pub fn parts(&self) -> &OrderedList<Part> {
    &self.parts
  }

  pub fn create_part(&self, info: &PartInfo) -> TimelineResult<Rc<Part>> {
    Part::from_info(info).map(Rc::new)
  }

  pub fn insert_part(&mut self, part: Rc<Part>) -> usize {
    let index = self.parts.insert(part);
    debug!("Inserted a part into track {:?} [{}]", self.name(), index);
    index
  }

  pub fn remove_part(&mut self, part: &Rc<Part>) -> bool {
    let removed = self.parts.remove(part);
    if removed {
      debug!("Removed {:?} from track {:?}", part, self.name());
    }
    removed
  }

  pub fn add_part(&mut self, info: &PartInfo) -> TimelineResult<Rc<Part>> {
    let part = self.create_part(info)?;
    self.insert_part(part.clone());
    Ok(part)
  }

  ///! Parts overlapping `[start, end]`, in part order.
  pub fn parts_in_range(&self, start: Ticks, end: Ticks) -> Vec<Rc<Part>> {
    self
      .parts
      .iter()
      .take_while(|part| part.start_pos() <= end)
      .filter(|part| part.end_pos() >= start)
      .collect()
  }

  pub fn end_pos(&self) -> Ticks {
    self
      .parts
      .iter()
      .map(|part| part.end_pos())
      .fold(0.0, f64::max)
  }

  pub fn end_time(&self, tempo_map: &TempoMap) -> Seconds {
    tempo_map.get_time(self.end_pos())
  }
}
