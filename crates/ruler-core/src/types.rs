//! Rule-group data model.
//!
//! These records travel from the remote rule store into the backup and
//! back out to rule evaluation unmodified. Only `namespace` and `name`
//! carry meaning here: together they form a group's identity.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::key::group_key;

/// Tenant identifier.
pub type UserId = String;

/// Ordered rule groups belonging to one tenant.
pub type RuleGroupList = Vec<RuleGroupDesc>;

// ── Rules ──────────────────────────────────────────────────────────

/// A single recording or alerting rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RuleDesc {
    pub expr: String,
    /// Output series name for recording rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,
    /// Alert name for alerting rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
    #[serde(rename = "for", skip_serializing_if = "Option::is_none")]
    pub for_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_firing_for: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl RuleDesc {
    /// Recording rule shorthand.
    pub fn recording(record: &str, expr: &str) -> Self {
        Self {
            expr: expr.to_string(),
            record: Some(record.to_string()),
            ..Default::default()
        }
    }

    /// Alerting rule shorthand.
    pub fn alerting(alert: &str, expr: &str) -> Self {
        Self {
            expr: expr.to_string(),
            alert: Some(alert.to_string()),
            ..Default::default()
        }
    }
}

// ── Rule groups ────────────────────────────────────────────────────

/// A named, namespaced group of rules evaluated together.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RuleGroupDesc {
    pub namespace: String,
    pub name: String,
    /// Evaluation interval, e.g. `"1m"`. Unset means the ruler default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    pub rules: Vec<RuleDesc>,
    /// Owning tenant as recorded by the rule store.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user: String,
    /// Series/alert limit; zero means unlimited.
    #[serde(skip_serializing_if = "is_zero")]
    pub limit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_offset: Option<String>,
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

impl RuleGroupDesc {
    pub fn new(namespace: &str, name: &str, rules: Vec<RuleDesc>) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            rules,
            ..Default::default()
        }
    }

    /// Identity key of this group for `user` under `rule_path`.
    ///
    /// Rule content does not participate: two groups with the same
    /// namespace and name always share a key.
    pub fn key(&self, rule_path: &Path, user: &str) -> String {
        group_key(rule_path, user, &self.namespace, &self.name)
    }
}
