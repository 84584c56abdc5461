//! Travel journal core: trips with attached photos, durable persistence into
//! a key-value store, and statistics over the collection.

pub mod config;
pub mod db;
pub mod error;
pub mod journal;
pub mod locale;
pub mod logging;
pub mod preferences;
pub mod stats;

pub use error::{JournalError, JournalResult, StorageError};
pub use journal::model::{GeoPoint, MapPlatform, NewPhoto, Photo, PhotoId, Trip, TripId};
pub use journal::Journal;
pub use stats::{compute_stats, StatsSnapshot, TripStat};
