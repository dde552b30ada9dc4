use anyhow::{anyhow, Context, Result};

use zfs_hanoi::{apply_update, PolicyUpdate, VolumeStore};

pub fn exec<S: VolumeStore>(
    store: &mut S,
    volume: String,
    policy: String,
    update: PolicyUpdate,
) -> Result<()> {
    if update.is_empty() {
        return Err(anyhow!(
            "nothing to set: pass at least one of --tapes/--date-format/--prefix/--skip/--sequence"
        ));
    }
    let n = apply_update(store, &volume, &policy, &update)
        .with_context(|| format!("set policy '{}' on {}", policy, volume))?;
    println!("set: OK ({} field(s) on {}, policy '{}')", n, volume, policy);
    Ok(())
}
