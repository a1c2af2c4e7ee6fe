//! BackupStore — latest reconciled rule groups per tenant.
//!
//! A passive container. It has no synchronization of its own; the
//! `RulesBackupManager` owns the only instance and guards it together
//! with the presence metrics.

use std::collections::HashMap;

use ruler_core::{RuleGroupList, UserId};

/// Tenant → ordered rule groups, exactly as last supplied.
#[derive(Debug, Default)]
pub struct BackupStore {
    groups: HashMap<UserId, RuleGroupList>,
}

impl BackupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored snapshot for `user`, if any.
    pub fn get(&self, user: &str) -> Option<&RuleGroupList> {
        self.groups.get(user)
    }

    /// Overwrite the snapshot for `user`, returning the previous one.
    pub fn replace(&mut self, user: &str, groups: RuleGroupList) -> Option<RuleGroupList> {
        self.groups.insert(user.to_string(), groups)
    }

    /// Drop `user` entirely.
    pub fn remove_tenant(&mut self, user: &str) -> Option<RuleGroupList> {
        self.groups.remove(user)
    }

    pub fn contains(&self, user: &str) -> bool {
        self.groups.contains_key(user)
    }

    /// Tenants with a backup, sorted.
    pub fn users(&self) -> Vec<UserId> {
        let mut users: Vec<UserId> = self.groups.keys().cloned().collect();
        users.sort();
        users
    }

    /// Number of tenants with a backup.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total groups across all tenants, duplicates included.
    pub fn group_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}
