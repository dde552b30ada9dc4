//! zfs-hanoi - ротация ZFS-снапшотов по схеме «Ханойской башни».
//!
//! Ограниченное число слотов (tapes) на политику: слот 1 обновляется каждый
//! второй тик, слот k - каждый 2^k-й, так что история покрывается
//! экспоненциально, а число хранимых снапшотов не растёт.

// Формат и ошибки
pub mod consts;
pub mod error;

// Окружение (env/CLI), счётчики, блокировки
pub mod config;
pub mod metrics;
pub mod lock;

// Ядро ротации
pub mod slot;     // slot_for / next_sequence
pub mod naming;   // <tool>-<prefix>-<date>-t<slot>
pub mod store;    // src/store/{mod,zfs,memory}.rs
pub mod policy;   // src/policy/{mod,init}.rs
pub mod rotation; // run_tick

// Удобные реэкспорты
pub use config::HanoiConfig;
pub use error::{HanoiError, Result};
pub use policy::{apply_update, initialize, PolicyConfig, PolicySettings, PolicyUpdate, PolicyView};
pub use rotation::{policy_snapshots, run_tick, run_tick_at, ChildFailure, TickReport};
pub use slot::{is_terminal_slot, next_sequence, slot_for};
pub use store::{MemoryStore, VolumeStore, ZfsStore};
