use failure::Error;

use serde_derive::Deserialize;

use std::fs::File;
use std::io::Read;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Timeline {
  pub bpm: f64,
  pub numerator: u32,
  pub denominator: u32,
}

impl Default for Timeline {
  fn default() -> Timeline {
    Timeline {
      bpm: 120.0,
      numerator: 4,
      denominator: 4,
    }
  }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
  pub timeline: Timeline,
}

impl Config {
  pub fn from_file<'a, T>(path: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let mut content = String::new();
    let path_str = path.into();
    let mut file = File::open(path_str)?;
    file.read_to_string(&mut content)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
  }

  #[allow(clippy::should_implement_trait)]
  pub fn from_str<'a, T>(content: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let config: Config = toml::from_str(content.into())?;
    Ok(config)
  }
}
