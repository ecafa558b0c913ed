use std::cell::{Ref, RefCell};
use std::rc::Rc;

use log::{debug, trace, warn};

use crate::error::TimelineResult;
use crate::info::TempoInfo;
use crate::list::OrderedList;
use crate::time::segment_index;
use crate::time::tempo::{Tempo, DEFAULT_BPM};
use crate::time::ticks::{seconds_to_ticks, ticks_to_seconds, Seconds, Ticks};

#[derive(Debug, Default)]
struct TempoCache {
  revision: Option<u64>,
  positions: Vec<Ticks>,
  bpms: Vec<f64>,
  times: Vec<Seconds>,
  duplicates: Vec<Ticks>,
  rebuilds: usize,
}

///! Converts between ticks and seconds under a step-wise tempo.
///!
///! Each tempo holds from its position until the next one, the last tempo is
///! open ended and the first one also covers everything before it. The
///! elapsed time at every tempo change is cached, and the cache is rebuilt
///! before the first query that follows any change to the tempos.
pub struct TempoMap {
  tempos: OrderedList<Tempo>,
  cache: RefCell<TempoCache>,
}

impl Default for TempoMap {
  fn default() -> Self {
    TempoMap::new()
  }
}

impl TempoMap {
  pub fn new() -> TempoMap {
    TempoMap {
      tempos: OrderedList::new(Tempo::is_in_order),
      cache: RefCell::new(TempoCache::default()),
    }
  }

  pub fn with_bpm(bpm: f64) -> TimelineResult<TempoMap> {
    let mut tempo_map = TempoMap::new();
    tempo_map.add_tempo(0.0, bpm)?;
    Ok(tempo_map)
  }

  pub fn from_info(infos: &[TempoInfo]) -> TimelineResult<TempoMap> {
    let mut tempo_map = TempoMap::new();
    for info in infos {
      tempo_map.insert(Rc::new(Tempo::from_info(info)?));
    }
    Ok(tempo_map)
  }

  pub fn get_info(&self) -> Vec<TempoInfo> {
    self.tempos.iter().map(|tempo| tempo.get_info()).collect()
  }

  pub fn tempos(&self) -> &OrderedList<Tempo> {
    &self.tempos
  }

  pub fn insert(&mut self, tempo: Rc<Tempo>) -> usize {
    let pos = tempo.pos();
    let index = self.tempos.insert(tempo);
    debug!("Inserted a tempo at {} [{}]", pos, index);
    index
  }

  pub fn remove(&mut self, tempo: &Rc<Tempo>) -> bool {
    let removed = self.tempos.remove(tempo);
    if removed {
      debug!("Removed the tempo at {}", tempo.pos());
    }
    removed
  }

  pub fn add_tempo(&mut self, pos: Ticks, bpm: f64) -> TimelineResult<Rc<Tempo>> {
    let tempo = Rc::new(Tempo::new(pos, bpm)?);
    self.insert(tempo.clone());
    Ok(tempo)
  }

  pub fn is_dirty(&self) -> bool {
    self.cache.borrow().revision != Some(self.tempos.revision())
  }

  pub fn rebuild_count(&self) -> usize {
    self.cache.borrow().rebuilds
  }

  pub fn rebuild(&self) {
    let mut cache = self.cache.borrow_mut();
    let revision = self.tempos.revision();
    trace!("Rebuilding the tempo map [revision={}]", revision);

    cache.positions.clear();
    cache.bpms.clear();
    cache.times.clear();
    cache.duplicates.clear();

    for tempo in self.tempos.iter() {
      let pos = tempo.pos();
      if cache.positions.last() == Some(&pos) {
        warn!("There is more than one tempo at {}", pos);
        cache.duplicates.push(pos);
      }
      cache.positions.push(pos);
      cache.bpms.push(tempo.bpm());
    }

    if cache.positions.is_empty() {
      cache.positions.push(0.0);
      cache.bpms.push(DEFAULT_BPM);
    }

    let mut time = ticks_to_seconds(cache.positions[0], cache.bpms[0]);
    cache.times.push(time);
    for index in 1..cache.positions.len() {
      let segment_ticks = cache.positions[index] - cache.positions[index - 1];
      time += ticks_to_seconds(segment_ticks, cache.bpms[index - 1]);
      cache.times.push(time);
    }

    cache.revision = Some(revision);
    cache.rebuilds += 1;
  }

  ///! Positions holding more than one tempo, the later one wins.
  pub fn duplicate_positions(&self) -> Vec<Ticks> {
    self.refresh().duplicates.clone()
  }

  fn refresh(&self) -> Ref<'_, TempoCache> {
    if self.is_dirty() {
      self.rebuild();
    }
    let cache = self.cache.borrow();
    debug_assert_eq!(cache.revision, Some(self.tempos.revision()));
    cache
  }

  pub fn get_time(&self, tick: Ticks) -> Seconds {
    let cache = self.refresh();
    let index = segment_index(&cache.positions, &tick);
    cache.times[index] + ticks_to_seconds(tick - cache.positions[index], cache.bpms[index])
  }

  pub fn get_tick(&self, seconds: Seconds) -> Ticks {
    let cache = self.refresh();
    let index = segment_index(&cache.times, &seconds);
    cache.positions[index] + seconds_to_ticks(seconds - cache.times[index], cache.bpms[index])
  }

  pub fn get_bpm(&self, tick: Ticks) -> f64 {
    let cache = self.refresh();
    cache.bpms[segment_index(&cache.positions, &tick)]
  }

  ///! Tempos positioned within `[start, end]`.
  pub fn tempos_in_range(&self, start: Ticks, end: Ticks) -> Vec<Rc<Tempo>> {
    self
      .tempos
      .iter()
      .skip_while(|tempo| tempo.pos() < start)
      .take_while(|tempo| tempo.pos() <= end)
      .collect()
  }
}
