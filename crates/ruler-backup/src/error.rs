//! Error types for the rule-group backup.

use thiserror::Error;

/// Errors raised while constructing the backup.
///
/// Reconciliation and lookups themselves never fail.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("backup metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}
