// src/config/mod.rs

//! Configuration: an optional TOML file merged with CLI overrides.

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use duration::parse_duration;
pub use loader::{DEFAULT_CONFIG_FILE, load_and_validate, load_from_path, load_settings};
pub use model::{EventsSection, ProcessSection, RawConfigFile, Settings, WatchSection};
