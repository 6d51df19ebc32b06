//! Shared support for the incident dial: the event store and config persistence.

pub mod config;
pub mod events;

pub use config::{
    config_dir, config_path, dataset_path, load_config, save_config, ConfigError,
};
pub use events::{
    builtin_seeds, derive_records, load_seeds, parse_seeds, EventRecord, EventSeed,
};
