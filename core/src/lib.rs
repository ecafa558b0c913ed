pub mod config;
pub mod error;
pub mod info;
pub mod list;
pub mod property;
pub mod song;
pub mod time;

pub use self::error::{TimelineError, TimelineResult};
