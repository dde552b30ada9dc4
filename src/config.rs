//! Runtime configuration for zfs-hanoi.
//!
//! Goals:
//! - Single place to collect tunables instead of scattering env lookups.
//! - HanoiConfig::from_env() reads HANOI_* variables; CLI flags override via with_* setters.
//!
//! Variables:
//! - HANOI_ZFS_BIN  - path to the zfs executable (default "zfs")
//! - HANOI_DRY_RUN  - "1|true|on|yes": log mutating zfs calls instead of running them
//! - HANOI_LOCK_DIR - directory for per-policy lock files (unset: no locking)

use std::fmt;

#[derive(Clone, Debug)]
pub struct HanoiConfig {
    /// Env: HANOI_ZFS_BIN (default "zfs")
    pub zfs_bin: String,

    /// Env: HANOI_DRY_RUN (default false)
    pub dry_run: bool,

    /// Env: HANOI_LOCK_DIR (default None)
    pub lock_dir: Option<String>,
}

impl Default for HanoiConfig {
    fn default() -> Self {
        Self {
            zfs_bin: "zfs".to_string(),
            dry_run: false,
            lock_dir: None,
        }
    }
}

fn env_flag(s: &str) -> bool {
    let s = s.trim().to_ascii_lowercase();
    s == "1" || s == "true" || s == "on" || s == "yes"
}

impl HanoiConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("HANOI_ZFS_BIN") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.zfs_bin = s.to_string();
            }
        }

        if let Ok(v) = std::env::var("HANOI_DRY_RUN") {
            cfg.dry_run = env_flag(&v);
        }

        if let Ok(v) = std::env::var("HANOI_LOCK_DIR") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.lock_dir = Some(s.to_string());
            }
        }

        cfg
    }

    pub fn with_zfs_bin<S: Into<String>>(mut self, bin: S) -> Self {
        self.zfs_bin = bin.into();
        self
    }

    pub fn with_dry_run(mut self, on: bool) -> Self {
        self.dry_run = on;
        self
    }

    pub fn with_lock_dir<S: Into<String>>(mut self, dir: Option<S>) -> Self {
        self.lock_dir = dir.map(Into::into);
        self
    }
}

impl fmt::Display for HanoiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HanoiConfig {{ zfs_bin: {}, dry_run: {}, lock_dir: {} }}",
            self.zfs_bin,
            self.dry_run,
            self.lock_dir.as_deref().unwrap_or("none"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_override_defaults() {
        let cfg = HanoiConfig::default()
            .with_zfs_bin("/sbin/zfs")
            .with_dry_run(true)
            .with_lock_dir(Some("/run/zfs-hanoi"));
        assert_eq!(cfg.zfs_bin, "/sbin/zfs");
        assert!(cfg.dry_run);
        assert_eq!(cfg.lock_dir.as_deref(), Some("/run/zfs-hanoi"));
        assert!(cfg.to_string().contains("dry_run: true"));
    }

    #[test]
    fn flag_vocabulary() {
        for on in ["1", "true", "ON", " yes "] {
            assert!(env_flag(on), "{on}");
        }
        for off in ["0", "false", "", "nope"] {
            assert!(!env_flag(off), "{off}");
        }
    }
}
