use anyhow::{anyhow, Result};
use std::path::Path;

use zfs_hanoi::lock::{try_acquire_policy_lock, LockGuard};
use zfs_hanoi::HanoiConfig;

/// `--skip` values: on/off plus the usual boolean spellings.
pub fn parse_switch(s: &str) -> Result<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "on" | "1" | "true" | "yes" => Ok(true),
        "off" | "0" | "false" | "no" => Ok(false),
        other => Err(anyhow!("expected on|off, got '{}'", other)),
    }
}

/// Take the (volume, policy) lock when a lock dir is configured.
pub fn maybe_lock(cfg: &HanoiConfig, volume: &str, policy: &str) -> Result<Option<LockGuard>> {
    match cfg.lock_dir.as_deref() {
        Some(dir) => Ok(Some(try_acquire_policy_lock(Path::new(dir), volume, policy)?)),
        None => Ok(None),
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) {
    let s = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    println!("{s}");
}
