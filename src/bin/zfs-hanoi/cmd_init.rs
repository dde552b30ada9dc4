use anyhow::{Context, Result};

use zfs_hanoi::{initialize, VolumeStore};

pub fn exec<S: VolumeStore>(
    store: &mut S,
    volume: String,
    policy: String,
    tapes: u32,
    date_format: String,
    prefix: Option<String>,
) -> Result<()> {
    let prefix = prefix.unwrap_or_else(|| policy.clone());
    initialize(store, &volume, &policy, tapes, &date_format, &prefix)
        .with_context(|| format!("init policy '{}' on {}", policy, volume))?;
    println!(
        "Initialized policy '{}' on {} (tapes={}, prefix={}, dateformat='{}')",
        policy, volume, tapes, prefix, date_format
    );
    Ok(())
}
