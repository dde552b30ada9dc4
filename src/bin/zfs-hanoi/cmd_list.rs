use anyhow::{anyhow, Context, Result};

use zfs_hanoi::{PolicyConfig, VolumeStore};

use crate::cmd_status::collect;
use crate::util::print_json;

pub fn exec<S: VolumeStore>(store: &mut S, volume: String, policy: String, json: bool) -> Result<()> {
    if !store.volume_exists(&volume)? {
        return Err(anyhow!("volume not found: {}", volume));
    }
    let prefix = PolicyConfig::new(store, &volume, &policy)
        .prefix()
        .with_context(|| format!("read prefix of policy '{}' on {}", policy, volume))?
        .unwrap_or_else(|| policy.clone());
    let entries = collect(&*store, &volume, &prefix)?;

    if json {
        print_json(&entries);
        return Ok(());
    }
    if entries.is_empty() {
        println!("(no snapshots)");
        return Ok(());
    }
    for e in entries {
        println!("t{}\t{}@{}", e.slot, volume, e.name);
    }
    Ok(())
}
