//! Plain value records used to persist a song and to restore it.

use serde_derive::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TempoInfo {
  pub pos: f64,
  pub bpm: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimeSignatureInfo {
  pub bar_index: u32,
  pub numerator: u32,
  pub denominator: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PartInfo {
  #[serde(default)]
  pub name: String,
  pub start_pos: f64,
  pub end_pos: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct TrackInfo {
  pub name: String,
  pub mute: bool,
  pub solo: bool,
  pub gain: f64,
  pub pan: f64,
  pub parts: Vec<PartInfo>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SongInfo {
  pub name: String,
  pub tempos: Vec<TempoInfo>,
  pub time_signatures: Vec<TimeSignatureInfo>,
  pub tracks: Vec<TrackInfo>,
}

#[cfg(test)]
mod test {

  use super::{PartInfo, SongInfo, TempoInfo, TimeSignatureInfo};

  const SONG: &str = r#"
name = "demo"

[[tempos]]
pos = 0.0
bpm = 120.0

[[tempos]]
pos = 1920.0
bpm = 60.0

[[time_signatures]]
bar_index = 0
numerator = 4
denominator = 4

[[tracks]]
name = "lead"
solo = true

[[tracks.parts]]
name = "intro"
start_pos = 0.0
end_pos = 1920.0

[[tracks]]
name = "bass"
"#;

  #[test]
  pub fn from_toml() {
    let info: SongInfo = toml::from_str(SONG).unwrap();
    assert_eq!(info.name, "demo");
    assert_eq!(
      info.tempos,
      vec![
        TempoInfo { pos: 0.0, bpm: 120.0 },
        TempoInfo {
          pos: 1920.0,
          bpm: 60.0
        },
      ]
    );
    assert_eq!(
      info.time_signatures,
      vec![TimeSignatureInfo {
        bar_index: 0,
        numerator: 4,
        denominator: 4
      }]
    );
    assert_eq!(info.tracks.len(), 2);
    assert!(info.tracks[0].solo);
    assert!(!info.tracks[0].mute);
    assert_eq!(
      info.tracks[0].parts,
      vec![PartInfo {
        name: "intro".to_string(),
        start_pos: 0.0,
        end_pos: 1920.0
      }]
    );
    assert!(info.tracks[1].parts.is_empty());
  }
}
