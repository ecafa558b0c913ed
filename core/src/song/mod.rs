pub mod part;
pub mod track;

use log::{debug, info};

use crate::config::Config;
use crate::error::TimelineResult;
use crate::info::SongInfo;
use crate::time::{Seconds, Ticks, TempoMap, TimeSignatureMap};

pub use self::part::Part;
pub use self::track::{Track, TrackId};

///! The project: it owns the tempo and time signature maps that every track
///! reads, and the tracks themselves.
pub struct Song {
  name: String,

  tempo_map: TempoMap,
  signature_map: TimeSignatureMap,

  tracks: Vec<Track>,
}

impl Song {
  pub fn new<T>(name: T, config: &Config) -> TimelineResult<Song>
  where
    T: Into<String>,
  {
    let timeline = &config.timeline;
    Ok(Song {
      name: name.into(),

      tempo_map: TempoMap::with_bpm(timeline.bpm)?,
      signature_map: TimeSignatureMap::with_signature(timeline.numerator, timeline.denominator)?,

      tracks: Vec::new(),
    })
  }

  pub fn from_info(info: &SongInfo) -> TimelineResult<Song> {
    info!("Loading song {:?} ...", info.name);

    let tracks = info
      .tracks
      .iter()
      .map(Track::from_info)
      .collect::<TimelineResult<Vec<Track>>>()?;

    let song = Song {
      name: info.name.clone(),
      tempo_map: TempoMap::from_info(&info.tempos)?,
      signature_map: TimeSignatureMap::from_info(&info.time_signatures)?,
      tracks,
    };

    debug!(
      "Loaded {} tempos, {} time signatures and {} tracks",
      song.tempo_map.tempos().len(),
      song.signature_map.time_signatures().len(),
      song.tracks.len()
    );

    Ok(song)
  }

  pub fn get_info(&self) -> SongInfo {
    SongInfo {
      name: self.name.clone(),
      tempos: self.tempo_map.get_info(),
      time_signatures: self.signature_map.get_info(),
      tracks: self.tracks.iter().map(Track::get_info).collect(),
    }
  }

  pub fn set_name<T>(&mut self, name: T)
  where
    T: Into<String>,
  {
    self.name = name.into();
  }

  pub fn get_name(&self) -> &str {
    self.name.as_str()
  }

  pub fn tempo_map(&self) -> &TempoMap {
    &self.tempo_map
  }

  pub fn tempo_map_mut(&mut self) -> &mut TempoMap {
    &mut self.tempo_map
  }

  pub fn signature_map(&self) -> &TimeSignatureMap {
    &self.signature_map
  }

  pub fn signature_map_mut(&mut self) -> &mut TimeSignatureMap {
    &mut self.signature_map
  }

  pub fn add_track(&mut self, track: Track) -> TrackId {
    let id = track.id();
    debug!("Adding track {:?} [{:?}]", track.name(), id);
    self.tracks.push(track);
    id
  }

  pub fn remove_track(&mut self, id: TrackId) -> Option<Track> {
    let index = self.tracks.iter().position(|track| track.id() == id)?;
    debug!("Removing track {:?}", id);
    Some(self.tracks.remove(index))
  }

  pub fn track(&self, id: TrackId) -> Option<&Track> {
    self.tracks.iter().find(|track| track.id() == id)
  }

  pub fn track_mut(&mut self, id: TrackId) -> Option<&mut Track> {
    self.tracks.iter_mut().find(|track| track.id() == id)
  }

  pub fn tracks(&self) -> &[Track] {
    self.tracks.as_slice()
  }

  pub fn end_pos(&self) -> Ticks {
    self.tracks.iter().map(Track::end_pos).fold(0.0, f64::max)
  }

  pub fn end_time(&self) -> Seconds {
    self.tempo_map.get_time(self.end_pos())
  }
}
