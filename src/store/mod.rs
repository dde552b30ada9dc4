//! store - интерфейс к менеджеру томов (датасеты, снапшоты, user-properties).
//!
//! Состав:
//! - VolumeStore: то, что ядро ротации требует от бэкенда.
//! - ZfsStore: реализация через утилиту `zfs` (с dry-run).
//! - MemoryStore: in-process реализация для тестов и экспериментов.
//!
//! Свойства возвращаются «как есть» (без снятия кавычек); декодирование -
//! забота policy.

use crate::error::Result;

pub mod memory;
pub mod zfs;

pub use memory::MemoryStore;
pub use zfs::ZfsStore;

/// Backend operations consumed by the rotation core.
///
/// Calls are blocking; there is no timeout and no retry at this layer.
pub trait VolumeStore {
    /// All volume paths known to the backend.
    fn list_volumes(&self) -> Result<Vec<String>>;

    fn volume_exists(&self, volume: &str) -> Result<bool> {
        Ok(self.list_volumes()?.iter().any(|v| v == volume))
    }

    /// Direct children of `parent` (one level down, no grandchildren).
    fn list_child_volumes(&self, parent: &str) -> Result<Vec<String>> {
        Ok(self
            .list_volumes()?
            .into_iter()
            .filter(|v| is_direct_child(parent, v))
            .collect())
    }

    /// Snapshot names of `volume` (bare, without the `volume@` part).
    fn list_snapshots(&self, volume: &str) -> Result<Vec<String>>;

    fn create_snapshot(&mut self, volume: &str, name: &str) -> Result<()>;

    fn destroy_snapshot(&mut self, volume: &str, name: &str) -> Result<()>;

    /// Raw property value; `None` when the backend has nothing stored.
    fn get_property(&self, volume: &str, key: &str) -> Result<Option<String>>;

    fn set_property(&mut self, volume: &str, key: &str, value: &str) -> Result<()>;
}

/// `candidate` is `<parent>/<segment>` with exactly one extra segment.
pub fn is_direct_child(parent: &str, candidate: &str) -> bool {
    candidate
        .strip_prefix(parent)
        .and_then(|rest| rest.strip_prefix('/'))
        .map(|seg| !seg.is_empty() && !seg.contains('/'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::is_direct_child;

    #[test]
    fn direct_child_detection() {
        assert!(is_direct_child("tank", "tank/a"));
        assert!(is_direct_child("tank/a", "tank/a/b"));
        assert!(!is_direct_child("tank", "tank/a/b"));
        assert!(!is_direct_child("tank", "tank"));
        assert!(!is_direct_child("tank", "tankx/a"));
        assert!(!is_direct_child("tank", "tank/"));
    }
}
