//! Snapshot files: one complete desired backup state as JSON.
//!
//! ```json
//! { "tenant-a": [ { "namespace": "ns1", "name": "g1", "rules": [...] } ] }
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;

use ruler_core::{RuleGroupList, UserId};

pub fn load(path: &Path) -> anyhow::Result<HashMap<UserId, RuleGroupList>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    parse(&content).with_context(|| format!("invalid snapshot {}", path.display()))
}

pub fn parse(content: &str) -> anyhow::Result<HashMap<UserId, RuleGroupList>> {
    Ok(serde_json::from_str(content)?)
}
