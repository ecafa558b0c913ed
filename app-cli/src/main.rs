use log::{debug, info};

use failure::{Error, Fail};

use timeline_core::config::Config;
use timeline_core::info::SongInfo;
use timeline_core::song::Song;

mod config;
use crate::config::AppConfig;

mod report;

const APP_NAME: &str = "Timeline";

const TIMELINE_CONFIG: &str = "TIMELINE_CONFIG";
const DEFAULT_TIMELINE_CONFIG: &str = "timeline.toml";

const TIMELINE_LOG_CONFIG: &str = "TIMELINE_LOG_CONFIG";
const DEFAULT_TIMELINE_LOG_CONFIG: &str = "log4rs.yaml";

#[derive(Debug, Fail)]
enum MainError {
  #[fail(display = "Failed to init logging: {}", cause)]
  LoggingInit { cause: String },

  #[fail(display = "Failed to load the song from {}: {}", path, cause)]
  SongLoad { path: String, cause: String },
}

fn main() -> Result<(), Error> {
  init_logging()?;

  info!("Starting {} ...", APP_NAME);

  let (config, app_config) = init_config()?;

  let song = init_song(std::env::args().nth(1), &config)?;

  report::print(&song, app_config.report.bars);

  Ok(())
}

fn init_logging() -> Result<(), Error> {
  let log_config_path = std::env::var(TIMELINE_LOG_CONFIG)
    .unwrap_or_else(|_| DEFAULT_TIMELINE_LOG_CONFIG.to_string());

  log4rs::init_file(log_config_path.as_str(), Default::default()).map_err(|err| {
    MainError::LoggingInit {
      cause: err.to_string(),
    }
  })?;

  Ok(())
}

fn init_config() -> Result<(Config, AppConfig), Error> {
  let config_path =
    std::env::var(TIMELINE_CONFIG).unwrap_or_else(|_| DEFAULT_TIMELINE_CONFIG.to_string());

  info!("Loading timeline configuration from {} ...", config_path);
  let config = Config::from_file(config_path.as_str())?;
  let app_config = AppConfig::from_file(config_path.as_str())?;
  debug!("{:#?}", config);
  debug!("{:#?}", app_config);

  Ok((config, app_config))
}

fn init_song(path: Option<String>, config: &Config) -> Result<Song, Error> {
  match path {
    Some(path) => {
      info!("Loading the song from {} ...", path);
      let content = std::fs::read_to_string(path.as_str())?;
      let song_info: SongInfo = toml::from_str(&content)?;
      let song = Song::from_info(&song_info).map_err(|err| MainError::SongLoad {
        path,
        cause: err.to_string(),
      })?;
      Ok(song)
    }
    None => {
      info!("Creating an empty song ...");
      let song = Song::new("untitled", config)?;
      Ok(song)
    }
  }
}
