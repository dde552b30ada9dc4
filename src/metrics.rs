//! Lightweight global metrics for zfs-hanoi.
//!
//! Потокобезопасные атомарные счётчики на процесс: сколько тиков прошло,
//! сколько пропущено по skip, сколько снапшотов создано/удалено, сколько
//! дочерних томов упало (report-and-continue).

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

static TICKS_RUN: AtomicU64 = AtomicU64::new(0);
static TICKS_SKIPPED: AtomicU64 = AtomicU64::new(0);
static SNAPSHOTS_CREATED: AtomicU64 = AtomicU64::new(0);
static SNAPSHOTS_DESTROYED: AtomicU64 = AtomicU64::new(0);
static CHILD_FAILURES: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSnapshot {
    pub ticks_run: u64,
    pub ticks_skipped: u64,
    pub snapshots_created: u64,
    pub snapshots_destroyed: u64,
    pub child_failures: u64,
}

#[inline]
pub fn record_tick() {
    TICKS_RUN.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub fn record_tick_skipped() {
    TICKS_SKIPPED.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub fn record_snapshot_created() {
    SNAPSHOTS_CREATED.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub fn record_snapshot_destroyed() {
    SNAPSHOTS_DESTROYED.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub fn record_child_failure() {
    CHILD_FAILURES.fetch_add(1, Ordering::Relaxed);
}

pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        ticks_run: TICKS_RUN.load(Ordering::Relaxed),
        ticks_skipped: TICKS_SKIPPED.load(Ordering::Relaxed),
        snapshots_created: SNAPSHOTS_CREATED.load(Ordering::Relaxed),
        snapshots_destroyed: SNAPSHOTS_DESTROYED.load(Ordering::Relaxed),
        child_failures: CHILD_FAILURES.load(Ordering::Relaxed),
    }
}
