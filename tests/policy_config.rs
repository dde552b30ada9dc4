use anyhow::Result;

use zfs_hanoi::policy::PolicyView;
use zfs_hanoi::{
    apply_update, initialize, HanoiError, MemoryStore, PolicyConfig, PolicySettings, PolicyUpdate,
};

#[test]
fn tape_count_round_trip_and_bounds() -> Result<()> {
    let mut store = MemoryStore::with_volumes(["tank"]);
    let mut cfg = PolicyConfig::new(&mut store, "tank", "daily");

    cfg.set_tape_count(5)?;
    assert_eq!(cfg.tape_count()?, Some(5));

    for bad in [0u32, 32] {
        let err = cfg.set_tape_count(bad).unwrap_err();
        assert!(matches!(err, HanoiError::OutOfRange { .. }), "{bad}: {err}");
    }
    // отклонённая запись не меняет сохранённое значение
    assert_eq!(cfg.tape_count()?, Some(5));

    cfg.set_tape_count(1)?;
    assert_eq!(cfg.tape_count()?, Some(1));
    cfg.set_tape_count(31)?;
    assert_eq!(cfg.tape_count()?, Some(31));
    Ok(())
}

#[test]
fn skip_round_trip_uses_sentinel_encoding() -> Result<()> {
    let mut store = MemoryStore::with_volumes(["tank"]);
    {
        let mut cfg = PolicyConfig::new(&mut store, "tank", "daily");
        assert!(!cfg.skip()?, "unset skip means not skipped");
        cfg.set_skip(true)?;
        assert!(cfg.skip()?);
    }
    assert_eq!(store.raw_property("tank", "zfs-hanoi:daily:skip"), Some("On"));
    {
        let mut cfg = PolicyConfig::new(&mut store, "tank", "daily");
        cfg.set_skip(false)?;
        assert!(!cfg.skip()?);
    }
    assert_eq!(store.raw_property("tank", "zfs-hanoi:daily:skip"), Some("-"));
    Ok(())
}

#[test]
fn unknown_skip_token_is_fatal() {
    let mut store = MemoryStore::with_volumes(["tank"]);
    store.put_raw_property("tank", "zfs-hanoi:daily:skip", "maybe");
    let cfg = PolicyConfig::new(&mut store, "tank", "daily");
    match cfg.skip() {
        Err(HanoiError::InvalidConfigValue { key, value }) => {
            assert_eq!(key, "zfs-hanoi:daily:skip");
            assert_eq!(value, "maybe");
        }
        other => panic!("expected InvalidConfigValue, got {other:?}"),
    }
}

#[test]
fn quoted_values_are_unquoted() -> Result<()> {
    let mut store = MemoryStore::with_volumes(["tank"]);
    store.put_raw_property("tank", "zfs-hanoi:p:prefix", "\"foo\"");
    store.put_raw_property("tank", "zfs-hanoi:p:dateformat", "\"%Y %m\"");
    store.put_raw_property("tank", "zfs-hanoi:p:tapes", "\"7\"");
    store.put_raw_property("tank", "zfs-hanoi:p:sequence", "3");
    store.put_raw_property("tank", "zfs-hanoi:p:skip", "\"False\"");

    let cfg = PolicyConfig::new(&mut store, "tank", "p");
    assert_eq!(
        cfg.load()?,
        PolicySettings {
            tapes: 7,
            sequence: 3,
            date_format: "%Y %m".to_string(),
            prefix: "foo".to_string(),
        }
    );
    assert!(!cfg.skip()?);
    Ok(())
}

#[test]
fn non_numeric_counter_is_invalid() {
    let mut store = MemoryStore::with_volumes(["tank"]);
    store.put_raw_property("tank", "zfs-hanoi:p:sequence", "seven");
    let cfg = PolicyConfig::new(&mut store, "tank", "p");
    let err = cfg.sequence().unwrap_err();
    assert!(matches!(err, HanoiError::InvalidConfigValue { .. }), "{err}");
}

#[test]
fn load_reports_first_missing_field() {
    let mut store = MemoryStore::with_volumes(["tank"]);
    store.put_raw_property("tank", "zfs-hanoi:p:tapes", "4");
    store.put_raw_property("tank", "zfs-hanoi:p:sequence", "-");
    let cfg = PolicyConfig::new(&mut store, "tank", "p");
    match cfg.load() {
        Err(HanoiError::PolicyNotInitialized { field, volume, policy }) => {
            assert_eq!(field, "sequence");
            assert_eq!(volume, "tank");
            assert_eq!(policy, "p");
        }
        other => panic!("expected PolicyNotInitialized, got {other:?}"),
    }
}

#[test]
fn initialize_writes_namespaced_fields() -> Result<()> {
    let mut store = MemoryStore::with_volumes(["tank"]);
    initialize(&mut store, "tank", "daily", 6, "%F", "d")?;
    initialize(&mut store, "tank", "weekly", 3, "%Y-W%V", "w")?;

    assert_eq!(store.raw_property("tank", "zfs-hanoi:daily:tapes"), Some("6"));
    assert_eq!(store.raw_property("tank", "zfs-hanoi:daily:sequence"), Some("0"));
    assert_eq!(store.raw_property("tank", "zfs-hanoi:daily:dateformat"), Some("%F"));
    assert_eq!(store.raw_property("tank", "zfs-hanoi:daily:prefix"), Some("d"));
    assert_eq!(store.raw_property("tank", "zfs-hanoi:weekly:tapes"), Some("3"));
    assert_eq!(store.raw_property("tank", "zfs-hanoi:weekly:prefix"), Some("w"));
    assert_eq!(store.raw_property("tank", "zfs-hanoi:daily:skip"), None);
    Ok(())
}

#[test]
fn initialize_rejects_before_writing() {
    let mut store = MemoryStore::with_volumes(["tank"]);
    let err = initialize(&mut store, "tank", "p", 32, "%F", "p").unwrap_err();
    assert!(matches!(err, HanoiError::OutOfRange { .. }), "{err}");
    assert_eq!(store.mutation_count(), 0);

    let err = initialize(&mut store, "pool/missing", "p", 4, "%F", "p").unwrap_err();
    assert!(matches!(err, HanoiError::VolumeNotFound(_)), "{err}");
    assert_eq!(store.mutation_count(), 0);
}

#[test]
fn reinitialize_resets_sequence_but_keeps_skip() -> Result<()> {
    let mut store = MemoryStore::with_volumes(["tank"]);
    initialize(&mut store, "tank", "p", 4, "%F", "p")?;
    {
        let mut cfg = PolicyConfig::new(&mut store, "tank", "p");
        cfg.set_sequence(5)?;
        cfg.set_skip(true)?;
    }
    initialize(&mut store, "tank", "p", 3, "%F-%H", "q")?;

    let cfg = PolicyConfig::new(&mut store, "tank", "p");
    assert_eq!(
        cfg.view()?,
        PolicyView {
            tapes: Some(3),
            sequence: Some(0),
            date_format: Some("%F-%H".to_string()),
            prefix: Some("q".to_string()),
            skip: true,
        }
    );
    Ok(())
}

#[test]
fn update_writes_only_supplied_fields() -> Result<()> {
    let mut store = MemoryStore::with_volumes(["tank"]);
    initialize(&mut store, "tank", "p", 4, "%F", "p")?;
    PolicyConfig::new(&mut store, "tank", "p").set_sequence(3)?;

    let n = apply_update(
        &mut store,
        "tank",
        "p",
        &PolicyUpdate {
            tapes: Some(9),
            skip: Some(true),
            ..Default::default()
        },
    )?;
    assert_eq!(n, 2);

    let cfg = PolicyConfig::new(&mut store, "tank", "p");
    let v = cfg.view()?;
    assert_eq!(v.tapes, Some(9));
    assert_eq!(v.sequence, Some(3), "sequence must not be reset by set");
    assert_eq!(v.date_format.as_deref(), Some("%F"));
    assert_eq!(v.prefix.as_deref(), Some("p"));
    assert!(v.skip);
    Ok(())
}

#[test]
fn update_validates_before_any_write() {
    let mut store = MemoryStore::with_volumes(["tank"]);
    let update = PolicyUpdate {
        prefix: Some("x".to_string()),
        tapes: Some(0),
        ..Default::default()
    };
    let err = apply_update(&mut store, "tank", "p", &update).unwrap_err();
    assert!(matches!(err, HanoiError::OutOfRange { .. }), "{err}");
    assert_eq!(store.raw_property("tank", "zfs-hanoi:p:prefix"), None);
    assert!(PolicyUpdate::default().is_empty());
}
