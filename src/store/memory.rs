//! In-memory VolumeStore.
//!
//! Ведёт себя как zfs там, где это важно для ротации: дубликат имени снапшота -
//! ошибка создания, удаление несуществующего - ошибка удаления. Позволяет
//! подсовывать сбои create/destroy по тому и считает мутации.

use std::collections::{BTreeMap, BTreeSet};

use super::VolumeStore;
use crate::error::{HanoiError, Result};

#[derive(Debug, Default, Clone)]
struct VolumeEntry {
    snapshots: Vec<String>,
    props: BTreeMap<String, String>,
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    volumes: BTreeMap<String, VolumeEntry>,
    fail_create: BTreeSet<String>,
    fail_destroy: BTreeSet<String>,
    mutations: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_volumes<I, S>(volumes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut store = Self::new();
        for v in volumes {
            store.add_volume(v);
        }
        store
    }

    pub fn add_volume<S: Into<String>>(&mut self, volume: S) {
        self.volumes.entry(volume.into()).or_default();
    }

    /// Snapshots of `volume` in creation order.
    pub fn snapshots(&self, volume: &str) -> Vec<String> {
        self.volumes
            .get(volume)
            .map(|e| e.snapshots.clone())
            .unwrap_or_default()
    }

    /// Store a property bypassing the mutation counter (test setup).
    pub fn put_raw_property(&mut self, volume: &str, key: &str, value: &str) {
        if let Some(e) = self.volumes.get_mut(volume) {
            e.props.insert(key.to_string(), value.to_string());
        }
    }

    pub fn raw_property(&self, volume: &str, key: &str) -> Option<&str> {
        self.volumes
            .get(volume)
            .and_then(|e| e.props.get(key))
            .map(|s| s.as_str())
    }

    /// Make every following create on `volume` fail.
    pub fn fail_creates_on(&mut self, volume: &str) {
        self.fail_create.insert(volume.to_string());
    }

    /// Make every following destroy on `volume` fail.
    pub fn fail_destroys_on(&mut self, volume: &str) {
        self.fail_destroy.insert(volume.to_string());
    }

    pub fn clear_failures(&mut self) {
        self.fail_create.clear();
        self.fail_destroy.clear();
    }

    /// Number of successful create/destroy/set calls.
    pub fn mutation_count(&self) -> u64 {
        self.mutations
    }

    fn entry_mut(&mut self, volume: &str) -> Result<&mut VolumeEntry> {
        self.volumes
            .get_mut(volume)
            .ok_or_else(|| HanoiError::VolumeNotFound(volume.to_string()))
    }
}

impl VolumeStore for MemoryStore {
    fn list_volumes(&self) -> Result<Vec<String>> {
        Ok(self.volumes.keys().cloned().collect())
    }

    fn volume_exists(&self, volume: &str) -> Result<bool> {
        Ok(self.volumes.contains_key(volume))
    }

    fn list_snapshots(&self, volume: &str) -> Result<Vec<String>> {
        self.volumes
            .get(volume)
            .map(|e| e.snapshots.clone())
            .ok_or_else(|| HanoiError::VolumeNotFound(volume.to_string()))
    }

    fn create_snapshot(&mut self, volume: &str, name: &str) -> Result<()> {
        let full = format!("{volume}@{name}");
        if self.fail_create.contains(volume) {
            return Err(HanoiError::SnapshotCreateFailed {
                snapshot: full,
                reason: "injected failure".into(),
            });
        }
        let e = self.entry_mut(volume)?;
        if e.snapshots.iter().any(|s| s == name) {
            return Err(HanoiError::SnapshotCreateFailed {
                snapshot: full,
                reason: "dataset already exists".into(),
            });
        }
        e.snapshots.push(name.to_string());
        self.mutations += 1;
        Ok(())
    }

    fn destroy_snapshot(&mut self, volume: &str, name: &str) -> Result<()> {
        let full = format!("{volume}@{name}");
        if self.fail_destroy.contains(volume) {
            return Err(HanoiError::SnapshotDestroyFailed {
                snapshot: full,
                reason: "injected failure".into(),
            });
        }
        let e = self.entry_mut(volume)?;
        let Some(pos) = e.snapshots.iter().position(|s| s == name) else {
            return Err(HanoiError::SnapshotDestroyFailed {
                snapshot: full,
                reason: "could not find any snapshots to destroy".into(),
            });
        };
        e.snapshots.remove(pos);
        self.mutations += 1;
        Ok(())
    }

    fn get_property(&self, volume: &str, key: &str) -> Result<Option<String>> {
        let e = self
            .volumes
            .get(volume)
            .ok_or_else(|| HanoiError::VolumeNotFound(volume.to_string()))?;
        Ok(e.props.get(key).cloned())
    }

    fn set_property(&mut self, volume: &str, key: &str, value: &str) -> Result<()> {
        let e = self.entry_mut(volume)?;
        e.props.insert(key.to_string(), value.to_string());
        self.mutations += 1;
        Ok(())
    }
}
