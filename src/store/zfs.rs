//! VolumeStore over the `zfs` command line utility.
//!
//! Чтения (list/get) выполняются всегда; изменяющие вызовы (snapshot/destroy/set)
//! в режиме dry-run только логируются на уровне info.
//!
//! Используется машиночитаемый вывод `-H` (без заголовка, поля через TAB).

use log::{debug, info};
use std::process::{Command, Output};

use super::VolumeStore;
use crate::config::HanoiConfig;
use crate::consts::UNSET;
use crate::error::{HanoiError, Result};
use crate::naming::short_name;

pub struct ZfsStore {
    bin: String,
    dry_run: bool,
}

impl ZfsStore {
    pub fn new(cfg: &HanoiConfig) -> Self {
        Self {
            bin: cfg.zfs_bin.clone(),
            dry_run: cfg.dry_run,
        }
    }

    fn command_line(&self, args: &[&str]) -> String {
        let mut s = self.bin.clone();
        for a in args {
            s.push(' ');
            s.push_str(a);
        }
        s
    }

    fn exec(&self, args: &[&str]) -> Result<Output> {
        debug!("exec: {}", self.command_line(args));
        Ok(Command::new(&self.bin).args(args).output()?)
    }

    /// Run a read-only command and return stdout; non-zero exit is a store error.
    fn read(&self, args: &[&str]) -> Result<String> {
        let out = self.exec(args)?;
        if !out.status.success() {
            return Err(HanoiError::Store(format!(
                "`{}` failed: {}",
                self.command_line(args),
                stderr_text(&out)
            )));
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }

    /// Run a mutating command; Err(reason) on non-zero exit. Dry-run only echoes.
    fn write(&self, args: &[&str]) -> Result<std::result::Result<(), String>> {
        if self.dry_run {
            info!("dry-run: {}", self.command_line(args));
            return Ok(Ok(()));
        }
        let out = self.exec(args)?;
        if out.status.success() {
            Ok(Ok(()))
        } else {
            Ok(Err(stderr_text(&out)))
        }
    }
}

fn stderr_text(out: &Output) -> String {
    let s = String::from_utf8_lossy(&out.stderr).trim().to_string();
    if s.is_empty() {
        format!("exit status {}", out.status)
    } else {
        s
    }
}

/// Non-empty trimmed lines of `-H -o name` output.
pub(crate) fn parse_names(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// `zfs get -H -o value` prints `-` for properties that were never set.
pub(crate) fn parse_property(stdout: &str) -> Option<String> {
    let v = stdout.trim_end_matches(['\n', '\r']);
    if v.is_empty() || v == UNSET {
        None
    } else {
        Some(v.to_string())
    }
}

impl VolumeStore for ZfsStore {
    fn list_volumes(&self) -> Result<Vec<String>> {
        let out = self.read(&["list", "-H", "-o", "name", "-t", "filesystem,volume"])?;
        Ok(parse_names(&out))
    }

    fn volume_exists(&self, volume: &str) -> Result<bool> {
        let out = self.exec(&["list", "-H", "-o", "name", volume])?;
        Ok(out.status.success())
    }

    fn list_child_volumes(&self, parent: &str) -> Result<Vec<String>> {
        let out = self.read(&[
            "list", "-H", "-o", "name", "-t", "filesystem,volume", "-d", "1", parent,
        ])?;
        Ok(parse_names(&out)
            .into_iter()
            .filter(|v| super::is_direct_child(parent, v))
            .collect())
    }

    fn list_snapshots(&self, volume: &str) -> Result<Vec<String>> {
        let out = self.read(&["list", "-H", "-o", "name", "-t", "snapshot", "-d", "1", volume])?;
        Ok(parse_names(&out)
            .iter()
            .map(|n| short_name(n).to_string())
            .collect())
    }

    fn create_snapshot(&mut self, volume: &str, name: &str) -> Result<()> {
        let full = format!("{volume}@{name}");
        self.write(&["snapshot", full.as_str()])?
            .map_err(|reason| HanoiError::SnapshotCreateFailed { snapshot: full.clone(), reason })
    }

    fn destroy_snapshot(&mut self, volume: &str, name: &str) -> Result<()> {
        let full = format!("{volume}@{name}");
        self.write(&["destroy", full.as_str()])?
            .map_err(|reason| HanoiError::SnapshotDestroyFailed { snapshot: full.clone(), reason })
    }

    fn get_property(&self, volume: &str, key: &str) -> Result<Option<String>> {
        let out = self.read(&["get", "-H", "-o", "value", key, volume])?;
        Ok(parse_property(&out))
    }

    fn set_property(&mut self, volume: &str, key: &str, value: &str) -> Result<()> {
        let assignment = format!("{key}={value}");
        self.write(&["set", assignment.as_str(), volume])?
            .map_err(|reason| HanoiError::Store(format!("set {assignment} on {volume}: {reason}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_skip_blank_lines() {
        let out = "tank\ntank/a\n\n  tank/b  \n";
        assert_eq!(parse_names(out), vec!["tank", "tank/a", "tank/b"]);
    }

    #[test]
    fn unset_property_is_none() {
        assert_eq!(parse_property("-\n"), None);
        assert_eq!(parse_property(""), None);
        assert_eq!(parse_property("8\n"), Some("8".to_string()));
        assert_eq!(parse_property("\"%Y %m\"\n"), Some("\"%Y %m\"".to_string()));
    }

    #[test]
    fn dry_run_does_not_spawn() {
        let cfg = HanoiConfig::default()
            .with_zfs_bin("/nonexistent/zfs-hanoi-test-bin")
            .with_dry_run(true);
        let mut store = ZfsStore::new(&cfg);
        store.create_snapshot("tank", "snap").unwrap();
        store.destroy_snapshot("tank", "snap").unwrap();
        store.set_property("tank", "zfs-hanoi:p:sequence", "1").unwrap();
        // reads still go to the binary
        assert!(matches!(store.list_volumes(), Err(HanoiError::Io(_))));
    }
}
