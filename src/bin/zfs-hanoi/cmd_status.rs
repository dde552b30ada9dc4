use anyhow::{anyhow, Context, Result};
use serde::Serialize;

use zfs_hanoi::{policy_snapshots, slot_for, PolicyConfig, PolicyView, VolumeStore};

use crate::util::print_json;

#[derive(Serialize)]
struct StatusOut<'a> {
    volume: &'a str,
    policy: &'a str,
    config: PolicyView,
    initialized: bool,
    next_slot: Option<u32>,
    snapshots: Vec<SlotEntry>,
}

#[derive(Serialize)]
pub struct SlotEntry {
    pub slot: u32,
    pub name: String,
}

pub fn exec<S: VolumeStore>(store: &mut S, volume: String, policy: String, json: bool) -> Result<()> {
    if !store.volume_exists(&volume)? {
        return Err(anyhow!("volume not found: {}", volume));
    }
    let view = PolicyConfig::new(store, &volume, &policy)
        .view()
        .with_context(|| format!("read policy '{}' on {}", policy, volume))?;
    let initialized = view.tapes.is_some() && view.sequence.is_some() && view.date_format.is_some();
    let next_slot = view.sequence.map(slot_for);
    let prefix = view.prefix.clone().unwrap_or_else(|| policy.clone());
    let snapshots = collect(&*store, &volume, &prefix)?;

    if json {
        print_json(&StatusOut {
            volume: &volume,
            policy: &policy,
            config: view,
            initialized,
            next_slot,
            snapshots,
        });
        return Ok(());
    }

    println!("Policy '{}' on {}", policy, volume);
    println!("  initialized = {}", initialized);
    println!("  tapes       = {}", opt(view.tapes));
    println!("  sequence    = {}", opt(view.sequence));
    println!("  dateformat  = {}", view.date_format.as_deref().unwrap_or("(unset)"));
    println!("  prefix      = {}", prefix);
    println!("  skip        = {}", view.skip);
    println!("  next slot   = {}", opt(next_slot));
    println!("Snapshots: {}", snapshots.len());
    for e in &snapshots {
        println!("  - t{:<3} {}", e.slot, e.name);
    }
    Ok(())
}

/// Снапшоты политики, отсортированные по слоту.
pub fn collect<S: VolumeStore>(store: &S, volume: &str, prefix: &str) -> Result<Vec<SlotEntry>> {
    let list = policy_snapshots(store, volume, prefix)
        .with_context(|| format!("list snapshots of {}", volume))?;
    Ok(list
        .into_iter()
        .map(|(slot, name)| SlotEntry { slot, name })
        .collect())
}

fn opt<T: std::fmt::Display>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_else(|| "(unset)".to_string())
}
