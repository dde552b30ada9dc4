//! Per-policy advisory locking (fs2).
//!
//! Ядро ротации не защищает sequence от гонок: два одновременных тика одной
//! политики на одном томе могут занять один и тот же слот. CLI сериализует тики
//! через файл блокировки, если задан lock dir.
//!
//! Lock file path: <lock_dir>/zfs-hanoi.<policy>.<volume with '/' -> '%'>.lock
//! Lock is released on Drop.

use anyhow::{anyhow, Context, Result};
use fs2::FileExt;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::consts::TOOL_NAME;

pub struct LockGuard {
    file: std::fs::File,
    path: PathBuf,
}

impl LockGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Lock file for one (volume, policy) pair.
pub fn lock_file_path(lock_dir: &Path, volume: &str, policy: &str) -> PathBuf {
    let vol = volume.replace('/', "%");
    lock_dir.join(format!("{}.{}.{}.lock", TOOL_NAME, policy, vol))
}

fn open_lock_file(path: &Path) -> Result<std::fs::File> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(path)
        .with_context(|| format!("open lock file {}", path.display()))
}

/// Try to acquire the policy lock; Err if another tick holds it.
pub fn try_acquire_policy_lock(lock_dir: &Path, volume: &str, policy: &str) -> Result<LockGuard> {
    let path = lock_file_path(lock_dir, volume, policy);
    let file = open_lock_file(&path)?;
    file.try_lock_exclusive().map_err(|e| {
        anyhow!(
            "policy {} on {} is locked by another tick ({}): {}",
            policy,
            volume,
            path.display(),
            e
        )
    })?;
    Ok(LockGuard { file, path })
}
