//! ruler-core — shared types for the ruler's rule-group backup.
//!
//! Defines the rule-group data model passed through the backup untouched,
//! the deterministic group-key derivation that ties backed-up groups to
//! their live identities, and the ruler configuration.

pub mod config;
pub mod key;
pub mod types;

pub use config::{ConfigError, RulerConfig};
pub use key::{clean_path, group_key, path_escape};
pub use types::*;
