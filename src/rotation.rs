//! rotation - один «тик» политики для тома и, опционально, его поддерева.
//!
//! Порядок шагов внутри тика:
//! 1. том должен существовать;
//! 2. skip=true - для этого тома ничего не делаем (дети всё равно обходятся при -r);
//! 3. tapes/sequence/dateformat обязаны быть заданы;
//! 4. slot = slot_for(sequence);
//! 5. запоминаем снапшоты, занимающие этот слот (obsolete set);
//! 6. создаём новый снапшот (сначала создать, потом удалять);
//! 7. при -r - тики дочерних томов, каждый со своей конфигурацией;
//! 8. удаляем obsolete set;
//! 9. сохраняем следующий sequence (с переходом в 0 после последней ленты).
//!
//! Ошибка create прерывает тик до удаления и до сдвига sequence. Ошибка дочернего
//! тома записывается в отчёт и не мешает соседям и родителю.

use chrono::{DateTime, Local, TimeZone};
use log::{debug, info, warn};
use std::fmt;

use crate::consts::FIELD_DATE_FORMAT;
use crate::error::{HanoiError, Result};
use crate::metrics;
use crate::naming::{matches_slot, render_date, slot_of, snapshot_name};
use crate::policy::PolicyConfig;
use crate::slot::{next_sequence, slot_for};
use crate::store::VolumeStore;

/// A child volume whose tick failed while the parent went on.
#[derive(Debug)]
pub struct ChildFailure {
    pub volume: String,
    pub error: HanoiError,
}

/// What a (possibly recursive) tick did.
#[derive(Debug, Default)]
pub struct TickReport {
    /// Created snapshots, `volume@name`.
    pub created: Vec<String>,
    /// Destroyed snapshots, `volume@name`.
    pub destroyed: Vec<String>,
    /// Volumes whose policy carries skip=true.
    pub skipped: Vec<String>,
    pub failures: Vec<ChildFailure>,
}

impl TickReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for TickReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "created={} destroyed={} skipped={} failed={}",
            self.created.len(),
            self.destroyed.len(),
            self.skipped.len(),
            self.failures.len()
        )
    }
}

/// Run one tick at the current local time.
pub fn run_tick<S: VolumeStore + ?Sized>(
    store: &mut S,
    volume: &str,
    recursive: bool,
    policy: &str,
) -> Result<TickReport> {
    run_tick_at(store, volume, recursive, policy, &Local::now())
}

/// Run one tick with an explicit timestamp. The whole subtree shares `now`.
///
/// Errors of `volume` itself are returned; errors of descendants end up in
/// `TickReport::failures`.
pub fn run_tick_at<S, Tz>(
    store: &mut S,
    volume: &str,
    recursive: bool,
    policy: &str,
    now: &DateTime<Tz>,
) -> Result<TickReport>
where
    S: VolumeStore + ?Sized,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut report = TickReport::default();
    tick_volume(store, volume, recursive, policy, now, &mut report)?;
    Ok(report)
}

fn tick_volume<S, Tz>(
    store: &mut S,
    volume: &str,
    recursive: bool,
    policy: &str,
    now: &DateTime<Tz>,
    report: &mut TickReport,
) -> Result<()>
where
    S: VolumeStore + ?Sized,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if !store.volume_exists(volume)? {
        return Err(HanoiError::VolumeNotFound(volume.to_string()));
    }

    let cfg = PolicyConfig::new(&mut *store, volume, policy);
    if cfg.skip()? {
        info!("{}: policy {} is skipped", volume, policy);
        metrics::record_tick_skipped();
        report.skipped.push(volume.to_string());
        if recursive {
            visit_children(store, volume, policy, now, report)?;
        }
        return Ok(());
    }
    let settings = cfg.load()?;
    let date_key = cfg.key(FIELD_DATE_FORMAT);

    let slot = slot_for(settings.sequence);
    if slot > settings.tapes {
        // sequence задан вручную за пределами цикла
        warn!(
            "{}: sequence {} maps to slot {} above tapes={}",
            volume, settings.sequence, slot, settings.tapes
        );
    }
    debug!(
        "{}: policy={} sequence={} tapes={} -> slot {}",
        volume, policy, settings.sequence, settings.tapes, slot
    );

    let obsolete: Vec<String> = store
        .list_snapshots(volume)?
        .into_iter()
        .filter(|n| matches_slot(n, &settings.prefix, slot))
        .collect();
    debug!("{}: {} snapshot(s) in slot {}", volume, obsolete.len(), slot);

    let date = render_date(&settings.date_format, now, &date_key)?;
    let name = snapshot_name(&settings.prefix, &date, slot);
    store.create_snapshot(volume, &name)?;
    metrics::record_snapshot_created();
    info!("created {}@{}", volume, name);
    report.created.push(format!("{}@{}", volume, name));

    if recursive {
        visit_children(store, volume, policy, now, report)?;
    }

    for old in &obsolete {
        store.destroy_snapshot(volume, old)?;
        metrics::record_snapshot_destroyed();
        info!("destroyed {}@{}", volume, old);
        report.destroyed.push(format!("{}@{}", volume, old));
    }

    let next = next_sequence(settings.sequence, settings.tapes);
    PolicyConfig::new(&mut *store, volume, policy).set_sequence(next)?;
    metrics::record_tick();
    debug!("{}: sequence {} -> {}", volume, settings.sequence, next);
    Ok(())
}

fn visit_children<S, Tz>(
    store: &mut S,
    volume: &str,
    policy: &str,
    now: &DateTime<Tz>,
    report: &mut TickReport,
) -> Result<()>
where
    S: VolumeStore + ?Sized,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    for child in store.list_child_volumes(volume)? {
        if let Err(e) = tick_volume(store, &child, true, policy, now, report) {
            warn!("{}: tick for policy {} failed: {}", child, policy, e);
            metrics::record_child_failure();
            report.failures.push(ChildFailure {
                volume: child,
                error: e,
            });
        }
    }
    Ok(())
}

/// Snapshots of `volume` that belong to `prefix`, as (slot, name), ordered by slot.
pub fn policy_snapshots<S: VolumeStore + ?Sized>(
    store: &S,
    volume: &str,
    prefix: &str,
) -> Result<Vec<(u32, String)>> {
    let mut out: Vec<(u32, String)> = store
        .list_snapshots(volume)?
        .into_iter()
        .filter_map(|n| slot_of(&n, prefix).map(|s| (s, n)))
        .collect();
    out.sort();
    Ok(out)
}
