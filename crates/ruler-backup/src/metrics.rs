//! Presence metrics for backed-up rule groups.
//!
//! One series per (tenant, group key) currently held in the backup,
//! always valued 1. Series are retracted when the group leaves the
//! backup rather than set to zero.

use prometheus::{GaugeVec, Opts, Registry};
use tracing::debug;

use crate::error::BackupError;

/// Gauge name, before any configured namespace prefix.
pub const BACKUP_RULE_GROUP_METRIC: &str = "ruler_backup_rule_group";

const BACKUP_RULE_GROUP_HELP: &str = "The rule groups backed up from the ruler.";

/// Sink for backup presence changes.
///
/// Calls arrive only while the backup's write lock is held, so an
/// implementation sees the changes of one reconciliation contiguously.
pub trait BackupMetrics: Send + Sync {
    /// `group` is now backed up for `user`.
    fn group_present(&self, user: &str, group: &str);

    /// `group` is no longer backed up for `user`.
    fn group_absent(&self, user: &str, group: &str);
}

/// Discards every presence change.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBackupMetrics;

impl BackupMetrics for NoopBackupMetrics {
    fn group_present(&self, _user: &str, _group: &str) {}

    fn group_absent(&self, _user: &str, _group: &str) {}
}

/// Presence gauge labeled by `user` and `rule_group`.
#[derive(Clone)]
pub struct PrometheusBackupMetrics {
    gauge: GaugeVec,
}

impl PrometheusBackupMetrics {
    /// Create the gauge and register it with `registry` when given.
    ///
    /// Without a registry the gauge still tracks series but nothing
    /// exports them. Registering twice into one registry fails.
    pub fn new(namespace: Option<&str>, registry: Option<&Registry>) -> Result<Self, BackupError> {
        let mut opts = Opts::new(BACKUP_RULE_GROUP_METRIC, BACKUP_RULE_GROUP_HELP);
        if let Some(ns) = namespace {
            opts = opts.namespace(ns);
        }
        let gauge = GaugeVec::new(opts, &["user", "rule_group"])?;
        if let Some(registry) = registry {
            registry.register(Box::new(gauge.clone()))?;
        }
        Ok(Self { gauge })
    }
}

impl BackupMetrics for PrometheusBackupMetrics {
    fn group_present(&self, user: &str, group: &str) {
        self.gauge.with_label_values(&[user, group]).set(1.0);
    }

    fn group_absent(&self, user: &str, group: &str) {
        if let Err(err) = self.gauge.remove_label_values(&[user, group]) {
            debug!(%user, rule_group = %group, %err, "backup metric already absent");
        }
    }
}
