use clap::{Parser, Subcommand};
use std::path::PathBuf;

use zfs_hanoi::consts::{DEFAULT_DATE_FORMAT, DEFAULT_TAPES};
use zfs_hanoi::HanoiConfig;

use crate::util::parse_switch;

/// Tower-of-Hanoi rotation of ZFS snapshots
#[derive(Parser, Debug)]
#[command(name = "zfs-hanoi", version, about = "Hanoi rotation of ZFS snapshots")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,

    /// Print mutating zfs commands instead of running them
    #[arg(long, global = true, default_value_t = false)]
    pub dry_run: bool,

    /// Debug logging (RUST_LOG still wins)
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,

    /// zfs executable (default: $HANOI_ZFS_BIN or "zfs")
    #[arg(long, global = true)]
    pub zfs_bin: Option<String>,

    /// Serialize ticks per (dataset, policy) with lock files in this directory
    #[arg(long, global = true)]
    pub lock_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Initialize (or reset) a policy on a dataset
    ///
    /// Пример:
    ///   zfs-hanoi init --volume tank/home --policy daily --tapes 10
    Init {
        #[arg(long)]
        volume: String,
        #[arg(long)]
        policy: String,
        #[arg(long, default_value_t = DEFAULT_TAPES)]
        tapes: u32,
        /// strftime pattern rendered into snapshot names
        #[arg(long, default_value = DEFAULT_DATE_FORMAT)]
        date_format: String,
        /// Snapshot name prefix (default: policy name)
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Change selected policy fields, leaving the rest untouched
    ///
    /// Пример:
    ///   zfs-hanoi set --volume tank/home/tmp --policy daily --skip on
    Set {
        #[arg(long)]
        volume: String,
        #[arg(long)]
        policy: String,
        #[arg(long)]
        tapes: Option<u32>,
        #[arg(long)]
        date_format: Option<String>,
        #[arg(long)]
        prefix: Option<String>,
        /// on|off
        #[arg(long, value_parser = parse_switch)]
        skip: Option<bool>,
        /// Override the rotation counter (normally managed by `snapshot`)
        #[arg(long)]
        sequence: Option<u64>,
    },
    /// Run one rotation tick: snapshot, recurse, prune the superseded slot
    ///
    /// Пример (cron):
    ///   zfs-hanoi snapshot --volume tank --policy daily --recursive
    Snapshot {
        #[arg(long)]
        volume: String,
        #[arg(long)]
        policy: String,
        #[arg(long, short = 'r', default_value_t = false)]
        recursive: bool,
    },
    /// Print the decoded policy, next slot and the policy's snapshots
    Status {
        #[arg(long)]
        volume: String,
        #[arg(long)]
        policy: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List the policy's snapshots by slot
    List {
        #[arg(long)]
        volume: String,
        #[arg(long)]
        policy: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Cli as Parser>::parse()
    }

    /// Environment config overridden by the global flags.
    pub fn config(&self) -> HanoiConfig {
        let mut cfg = HanoiConfig::from_env();
        if self.dry_run {
            cfg = cfg.with_dry_run(true);
        }
        if let Some(bin) = &self.zfs_bin {
            cfg = cfg.with_zfs_bin(bin.clone());
        }
        if let Some(dir) = &self.lock_dir {
            cfg = cfg.with_lock_dir(Some(dir.display().to_string()));
        }
        cfg
    }
}
