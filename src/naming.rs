//! Snapshot names: `<tool>-<prefix>-<date>-t<slot>`.
//!
//! Имя строится детерминированно, и по нему же ищутся снапшоты, занимающие
//! слот: начало `<tool>-<prefix>-`, конец `-t<slot>`, между ними что угодно.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use std::fmt::Write;

use crate::consts::TOOL_NAME;
use crate::error::{HanoiError, Result};

/// Build the name of a new snapshot (without the `volume@` part).
pub fn snapshot_name(prefix: &str, rendered_date: &str, slot: u32) -> String {
    format!("{}-{}-{}-t{}", TOOL_NAME, prefix, rendered_date, slot)
}

/// Render `at` with a strftime-style pattern.
/// An unparsable pattern is reported against `key` instead of panicking inside chrono.
pub fn render_date<Tz>(format: &str, at: &DateTime<Tz>, key: &str) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let invalid = || HanoiError::InvalidConfigValue {
        key: key.to_string(),
        value: format.to_string(),
    };
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|i| matches!(i, Item::Error)) {
        return Err(invalid());
    }
    let mut out = String::new();
    write!(out, "{}", at.format_with_items(items.into_iter())).map_err(|_| invalid())?;
    Ok(out)
}

/// Part after `@` for fully-qualified names, the name itself otherwise.
pub fn short_name(name: &str) -> &str {
    match name.split_once('@') {
        Some((_, snap)) => snap,
        None => name,
    }
}

fn policy_head(prefix: &str) -> String {
    format!("{}-{}-", TOOL_NAME, prefix)
}

/// Does `name` belong to policy `prefix` and occupy `slot`?
///
/// Prefixes are compared textually: with policies `d` and `d-x` on one volume,
/// `d` also claims the snapshots of `d-x`. Keep prefixes on a volume free of such overlaps.
pub fn matches_slot(name: &str, prefix: &str, slot: u32) -> bool {
    let short = short_name(name);
    let head = policy_head(prefix);
    let tail = format!("-t{}", slot);
    short.len() >= head.len() + tail.len() && short.starts_with(&head) && short.ends_with(&tail)
}

/// Slot encoded in a policy snapshot name, `None` for foreign snapshots.
/// Same prefix overlap caveat as `matches_slot`.
pub fn slot_of(name: &str, prefix: &str) -> Option<u32> {
    let short = short_name(name);
    let head = policy_head(prefix);
    if !short.starts_with(&head) {
        return None;
    }
    let idx = short.rfind("-t")?;
    if idx < head.len() {
        return None;
    }
    let digits = &short[idx + 2..];
    if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
