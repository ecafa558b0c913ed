use failure::Error;

use serde_derive::Deserialize;

use std::fs::File;
use std::io::Read;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Report {
  pub bars: u32,
}

impl Default for Report {
  fn default() -> Report {
    Report { bars: 8 }
  }
}

///! Settings of the command line front end, read from the same file as the
///! core timeline configuration.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
  pub report: Report,
}

impl AppConfig {
  pub fn from_file<'a, T>(path: T) -> Result<AppConfig, Error>
  where
    T: Into<&'a str>,
  {
    let mut content = String::new();
    let path_str = path.into();
    let mut file = File::open(path_str)?;
    file.read_to_string(&mut content)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
  }
}
