//! # SleepNumber buttons
//!
//! Calibrate and Stop Pump buttons for Sleep Number beds, with a Stream Deck
//! surface built on streamdeck-oxide.
//!
//! ## Features
//!
//! - Static table of button types, one button per bed and type
//! - Presses forwarded to a pluggable SleepIQ bed client
//! - In-memory entity registry with unique id checks
//! - Stream Deck menu showing the registered buttons

pub mod bed;
pub mod button;
pub mod config;
pub mod entity;
pub mod error;
pub mod plugins;

// Re-export main types for convenience
pub use bed::{BedCollection, SleepIqBed};
pub use button::{async_setup_entry, ButtonAction, ButtonDescription, SleepNumberButton, ENTITY_DESCRIPTIONS};
pub use config::SleepNumberConfig;
pub use entity::{AddEntities, ButtonEntity, EntityRegistry};
pub use error::{BedError, ConfigError, RegistryError};
pub use plugins::SleepNumberPlugin;
