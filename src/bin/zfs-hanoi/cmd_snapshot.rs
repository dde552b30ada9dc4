use anyhow::{anyhow, Context, Result};
use log::debug;

use zfs_hanoi::{metrics, run_tick, ChildFailure, HanoiConfig, VolumeStore};

use crate::util::maybe_lock;

/// Один тик ротации. Ошибки дочерних томов печатаются, код выхода - ненулевой.
pub fn exec<S: VolumeStore>(
    store: &mut S,
    cfg: &HanoiConfig,
    volume: String,
    policy: String,
    recursive: bool,
) -> Result<()> {
    let _lock = maybe_lock(cfg, &volume, &policy)?;

    let report = run_tick(store, &volume, recursive, &policy)
        .with_context(|| format!("snapshot tick for policy '{}' on {}", policy, volume))?;

    if cfg.dry_run {
        println!("(dry-run: nothing was changed)");
    }
    for name in &report.created {
        println!("created   {}", name);
    }
    for name in &report.destroyed {
        println!("destroyed {}", name);
    }
    for vol in &report.skipped {
        println!("skipped   {}", vol);
    }
    for f in &report.failures {
        eprintln!("{}", failure_line(f));
    }
    debug!("tick: {} metrics={:?}", report, metrics::snapshot());

    if !report.is_clean() {
        return Err(anyhow!(
            "{} child volume(s) failed under {}",
            report.failures.len(),
            volume
        ));
    }
    Ok(())
}

fn failure_line(f: &ChildFailure) -> String {
    format!("failed    {} [{}]: {}", f.volume, f.error.kind(), f.error)
}

#[cfg(test)]
mod tests {
    use super::failure_line;
    use zfs_hanoi::{ChildFailure, HanoiError};

    #[test]
    fn failure_line_names_volume_and_kind() {
        let f = ChildFailure {
            volume: "tank/b".to_string(),
            error: HanoiError::VolumeNotFound("tank/b".to_string()),
        };
        assert_eq!(
            failure_line(&f),
            "failed    tank/b [volume_not_found]: volume not found: tank/b"
        );
    }
}
