//! ruler-backup — in-memory backup of every tenant's rule groups.
//!
//! Keeps a last-known-good copy of the rule groups each tenant owns, so
//! rule evaluation can fall back to it while the remote rule store is
//! unreachable. Every backed-up group is also exported as a presence
//! gauge labeled by tenant and group key.
//!
//! # Architecture
//!
//! ```text
//! RulesBackupManager
//!   ├── set_rule_groups() ← full desired snapshot from the sync loop
//!   │     └── diff per tenant → BackupMetrics (emit / retract)
//!   ├── get_rule_groups() → fallback lookups
//!   └── RwLock<BackupStore> (tenant → ordered rule groups)
//! ```

pub mod error;
pub mod manager;
pub mod metrics;
pub mod store;

pub use error::BackupError;
pub use manager::{BackupStats, RulesBackupManager};
pub use metrics::{
    BACKUP_RULE_GROUP_METRIC, BackupMetrics, NoopBackupMetrics, PrometheusBackupMetrics,
};
pub use store::BackupStore;
