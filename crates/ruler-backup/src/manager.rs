//! RulesBackupManager — reconciles the backup against a desired snapshot.
//!
//! Each `set_rule_groups()` call carries the complete desired state for
//! every tenant. The manager replaces its backup with it exactly and
//! diffs group keys per tenant so presence metrics only change for
//! groups that actually appeared or disappeared.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use prometheus::Registry;
use tracing::{debug, info};

use ruler_core::{RuleGroupDesc, RuleGroupList, RulerConfig, UserId};

use crate::error::BackupError;
use crate::metrics::{BackupMetrics, PrometheusBackupMetrics};
use crate::store::BackupStore;

/// Outcome of one reconciliation pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BackupStats {
    /// Tenants present in the backup after the pass.
    pub tenants_backed_up: usize,
    /// Tenants dropped because the desired state no longer names them.
    pub tenants_removed: usize,
    /// Groups stored across all tenants, duplicates included.
    pub groups_stored: usize,
    pub metrics_emitted: usize,
    pub metrics_retracted: usize,
}

/// Metric changes for one tenant.
struct TenantDiff {
    user: UserId,
    retract: Vec<String>,
    emit: Vec<String>,
}

/// Owns the rule-group backup and its presence metrics.
///
/// Share it behind an `Arc`: the sync loop writes through
/// `set_rule_groups()` while evaluation paths read concurrently.
pub struct RulesBackupManager {
    rule_path: PathBuf,
    state: RwLock<BackupStore>,
    metrics: Arc<dyn BackupMetrics>,
}

impl RulesBackupManager {
    /// Create a manager exporting its gauge through `registry`.
    ///
    /// With `None` the gauge is kept but never registered.
    pub fn new(cfg: &RulerConfig, registry: Option<&Registry>) -> Result<Self, BackupError> {
        let metrics = PrometheusBackupMetrics::new(cfg.metrics_namespace.as_deref(), registry)?;
        Ok(Self::with_metrics(cfg, Arc::new(metrics)))
    }

    /// Create a manager reporting presence changes to `metrics`.
    pub fn with_metrics(cfg: &RulerConfig, metrics: Arc<dyn BackupMetrics>) -> Self {
        debug!(rule_path = ?cfg.rule_path, "rule group backup initialized");
        Self {
            rule_path: cfg.rule_path.clone(),
            state: RwLock::new(BackupStore::new()),
            metrics,
        }
    }

    /// Replace the backup with `desired`.
    ///
    /// Tenants missing from `desired` lose their backup entirely. For the
    /// rest, metrics are retracted for keys that disappeared and emitted
    /// for keys that are new; keys present before and after are left
    /// alone even when the group's rules changed. Stored snapshots are
    /// always replaced verbatim.
    ///
    /// Every metric change is computed up front and applied before the
    /// store is touched, so the store moves from one complete snapshot to
    /// the next in a single step.
    pub fn set_rule_groups(&self, desired: HashMap<UserId, RuleGroupList>) -> BackupStats {
        let mut store = self.write();
        let mut stats = BackupStats::default();

        for diff in self.diff(&store, &desired) {
            for key in &diff.retract {
                self.retract(&diff.user, key, &mut stats);
            }
            for key in &diff.emit {
                self.emit(&diff.user, key, &mut stats);
            }
        }

        for user in store.users() {
            if !desired.contains_key(&user) {
                store.remove_tenant(&user);
                stats.tenants_removed += 1;
                debug!(%user, "tenant dropped from rule group backup");
            }
        }
        for (user, groups) in desired {
            stats.groups_stored += groups.len();
            store.replace(&user, groups);
        }

        stats.tenants_backed_up = store.len();
        info!(
            tenants = stats.tenants_backed_up,
            removed = stats.tenants_removed,
            groups = stats.groups_stored,
            emitted = stats.metrics_emitted,
            retracted = stats.metrics_retracted,
            "rule group backup updated"
        );
        stats
    }

    /// Backed-up groups for `user`; empty when there is no backup.
    pub fn get_rule_groups(&self, user: &str) -> RuleGroupList {
        self.read().get(user).cloned().unwrap_or_default()
    }

    /// A single backed-up group by identity.
    ///
    /// When the snapshot holds several groups with the same namespace and
    /// name, the last one wins.
    pub fn get_rule_group(&self, user: &str, namespace: &str, name: &str) -> Option<RuleGroupDesc> {
        self.read()
            .get(user)?
            .iter()
            .rev()
            .find(|g| g.namespace == namespace && g.name == name)
            .cloned()
    }

    /// Tenants with a backup, sorted.
    pub fn users(&self) -> Vec<UserId> {
        self.read().users()
    }

    pub fn has_backup(&self, user: &str) -> bool {
        self.read().contains(user)
    }

    pub fn tenant_count(&self) -> usize {
        self.read().len()
    }

    /// Key under which `group` is tracked for `user`.
    pub fn group_key(&self, user: &str, group: &RuleGroupDesc) -> String {
        group.key(&self.rule_path, user)
    }

    /// Dropped tenants first, then desired tenants in sorted order.
    fn diff(
        &self,
        store: &BackupStore,
        desired: &HashMap<UserId, RuleGroupList>,
    ) -> Vec<TenantDiff> {
        let mut diffs = Vec::new();

        for user in store.users() {
            if desired.contains_key(&user) {
                continue;
            }
            let retract = match store.get(&user) {
                Some(groups) => self.keys_of(&user, groups).into_iter().collect(),
                None => Vec::new(),
            };
            diffs.push(TenantDiff {
                user,
                retract,
                emit: Vec::new(),
            });
        }

        let mut users: Vec<&UserId> = desired.keys().collect();
        users.sort();
        for user in users {
            let previous = match store.get(user) {
                Some(groups) => self.keys_of(user, groups),
                None => BTreeSet::new(),
            };
            let wanted = self.keys_of(user, &desired[user]);
            diffs.push(TenantDiff {
                user: user.clone(),
                retract: previous.difference(&wanted).cloned().collect(),
                emit: wanted.difference(&previous).cloned().collect(),
            });
        }

        diffs
    }

    fn keys_of(&self, user: &str, groups: &[RuleGroupDesc]) -> BTreeSet<String> {
        groups.iter().map(|g| self.group_key(user, g)).collect()
    }

    fn emit(&self, user: &str, key: &str, stats: &mut BackupStats) {
        self.metrics.group_present(user, key);
        stats.metrics_emitted += 1;
        debug!(%user, rule_group = %key, "backup metric emitted");
    }

    fn retract(&self, user: &str, key: &str, stats: &mut BackupStats) {
        self.metrics.group_absent(user, key);
        stats.metrics_retracted += 1;
        debug!(%user, rule_group = %key, "backup metric retracted");
    }

    // The store is only written after every metric update of a pass has
    // returned, so a lock poisoned by a panicking sink still guards the
    // previous complete snapshot.
    fn read(&self) -> RwLockReadGuard<'_, BackupStore> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BackupStore> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
