//! rulerd — operator tool for the ruler's rule-group backup.
//!
//! Drives a `RulesBackupManager` the way the ruler's sync loop does:
//! each snapshot file is one complete desired state, applied in order.
//!
//! # Usage
//!
//! ```text
//! rulerd key --config ruler.toml --user tenant-a --namespace ns1 --name g1
//! rulerd reconcile --config ruler.toml sync-1.json sync-2.json
//! ```

mod report;
mod snapshot;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use prometheus::Registry;
use tracing::{info, warn};

use ruler_backup::RulesBackupManager;
use ruler_core::{RulerConfig, group_key};

#[derive(Parser)]
#[command(name = "rulerd", about = "Ruler rule-group backup tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the backup key of a rule group.
    Key {
        /// Ruler config file (TOML). Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        user: String,

        #[arg(long)]
        namespace: String,

        #[arg(long)]
        name: String,
    },

    /// Apply rule-group snapshots in order and print the resulting backup.
    Reconcile {
        /// Ruler config file (TOML). Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// JSON files mapping tenant → rule groups.
        #[arg(required = true)]
        snapshots: Vec<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,rulerd=debug,ruler_backup=debug")
            }),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Key {
            config,
            user,
            namespace,
            name,
        } => {
            let cfg = load_config(config.as_deref())?;
            println!("{}", group_key(&cfg.rule_path, &user, &namespace, &name));
            Ok(())
        }
        Command::Reconcile { config, snapshots } => {
            let cfg = load_config(config.as_deref())?;
            run_reconcile(&cfg, &snapshots)
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<RulerConfig> {
    match path {
        Some(path) => {
            let cfg = RulerConfig::from_file(path)?;
            info!(?path, "config loaded");
            Ok(cfg)
        }
        None => Ok(RulerConfig::default()),
    }
}

fn run_reconcile(cfg: &RulerConfig, snapshots: &[PathBuf]) -> anyhow::Result<()> {
    if !cfg.enable_rules_backup {
        warn!("enable_rules_backup is off; applying snapshots anyway");
    }

    let registry = Registry::new();
    let manager = RulesBackupManager::new(cfg, Some(&registry))?;

    for path in snapshots {
        let desired = snapshot::load(path)?;
        let stats = manager.set_rule_groups(desired);
        info!(
            ?path,
            tenants = stats.tenants_backed_up,
            removed = stats.tenants_removed,
            emitted = stats.metrics_emitted,
            retracted = stats.metrics_retracted,
            "snapshot applied"
        );
    }

    print!("{}", report::render_backup(&manager));
    println!();
    print!("{}", ruler_metrics::render_prometheus(&registry)?);
    Ok(())
}
