//! Plain-text summary of the current backup.

use ruler_backup::RulesBackupManager;

/// One block per tenant listing each group's key and rule count.
pub fn render_backup(manager: &RulesBackupManager) -> String {
    let mut out = String::new();
    let users = manager.users();
    out.push_str(&format!("backed up tenants: {}\n", users.len()));

    for user in users {
        let groups = manager.get_rule_groups(&user);
        out.push_str(&format!("{user}: {} group(s)\n", groups.len()));
        for group in &groups {
            let key = manager.group_key(&user, group);
            out.push_str(&format!("  {key} ({} rule(s))\n", group.rules.len()));
        }
    }
    out
}
