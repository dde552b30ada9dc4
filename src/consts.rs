//! Константы формата: имя инструмента, ключи свойств, границы значений.
//!
//! Всё, что попадает в имена снапшотов и в ключи user-properties, должно
//! совпадать бит-в-бит между версиями, иначе старые снапшоты перестанут
//! находиться при ротации.

/// Identity string used in snapshot names and property keys.
pub const TOOL_NAME: &str = "zfs-hanoi";

/// Value the backend reports for an unset property.
pub const UNSET: &str = "-";

/// Tape count bounds (slot positions must stay 32-bit shift safe).
pub const MIN_TAPES: u32 = 1;
pub const MAX_TAPES: u32 = 31;

/// Defaults used by `init` when the operator does not pass them.
pub const DEFAULT_TAPES: u32 = 8;
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d-%H%M";

// Имена полей в пространстве ключей <tool>:<policy>:<field>
pub const FIELD_TAPES: &str = "tapes";
pub const FIELD_SEQUENCE: &str = "sequence";
pub const FIELD_DATE_FORMAT: &str = "dateformat";
pub const FIELD_PREFIX: &str = "prefix";
pub const FIELD_SKIP: &str = "skip";
