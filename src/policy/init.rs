//! Policy setup: full (re)initialization and selective update.

use log::info;

use super::{validate_tapes, PolicyConfig};
use crate::error::{HanoiError, Result};
use crate::store::VolumeStore;

/// Write tapes, date format and prefix, and reset the sequence to 0.
///
/// Re-running it on an initialized policy overwrites it (the rotation starts
/// over). The skip flag is left untouched.
pub fn initialize<S: VolumeStore + ?Sized>(
    store: &mut S,
    volume: &str,
    policy: &str,
    tapes: u32,
    date_format: &str,
    prefix: &str,
) -> Result<()> {
    if !store.volume_exists(volume)? {
        return Err(HanoiError::VolumeNotFound(volume.to_string()));
    }
    validate_tapes(tapes)?;

    let mut cfg = PolicyConfig::new(store, volume, policy);
    cfg.set_tape_count(tapes)?;
    cfg.set_date_format(date_format)?;
    cfg.set_prefix(prefix)?;
    cfg.set_sequence(0)?;

    info!(
        "init: {} policy={} tapes={} dateformat='{}' prefix={}",
        volume, policy, tapes, date_format, prefix
    );
    Ok(())
}

/// Fields to change; `None` leaves the stored value as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyUpdate {
    pub tapes: Option<u32>,
    pub date_format: Option<String>,
    pub prefix: Option<String>,
    pub skip: Option<bool>,
    pub sequence: Option<u64>,
}

impl PolicyUpdate {
    pub fn is_empty(&self) -> bool {
        self.tapes.is_none()
            && self.date_format.is_none()
            && self.prefix.is_none()
            && self.skip.is_none()
            && self.sequence.is_none()
    }
}

/// Write only the supplied fields. Validation happens before the first write.
/// Returns the number of fields written.
pub fn apply_update<S: VolumeStore + ?Sized>(
    store: &mut S,
    volume: &str,
    policy: &str,
    update: &PolicyUpdate,
) -> Result<usize> {
    if !store.volume_exists(volume)? {
        return Err(HanoiError::VolumeNotFound(volume.to_string()));
    }
    if let Some(t) = update.tapes {
        validate_tapes(t)?;
    }

    let mut cfg = PolicyConfig::new(store, volume, policy);
    let mut written = 0;
    if let Some(t) = update.tapes {
        cfg.set_tape_count(t)?;
        written += 1;
    }
    if let Some(f) = update.date_format.as_deref() {
        cfg.set_date_format(f)?;
        written += 1;
    }
    if let Some(p) = update.prefix.as_deref() {
        cfg.set_prefix(p)?;
        written += 1;
    }
    if let Some(s) = update.skip {
        cfg.set_skip(s)?;
        written += 1;
    }
    if let Some(seq) = update.sequence {
        cfg.set_sequence(seq)?;
        written += 1;
    }

    info!("set: {} policy={} fields={}", volume, policy, written);
    Ok(written)
}
