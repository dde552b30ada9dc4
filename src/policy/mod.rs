//! policy - типизированный вид на user-properties одной пары (том, политика).
//!
//! Ключи: `<tool>:<policy>:<field>`, field ∈ {tapes, sequence, dateformat, prefix, skip}.
//! Значения хранятся строками; при чтении снимается один слой двойных кавычек,
//! `-` (или отсутствие) означает «не задано».
//!
//! Неизвестный токен - ошибка InvalidConfigValue, молча не приводим.

use serde::Serialize;

use crate::consts::{
    FIELD_DATE_FORMAT, FIELD_PREFIX, FIELD_SEQUENCE, FIELD_SKIP, FIELD_TAPES, MAX_TAPES,
    MIN_TAPES, TOOL_NAME, UNSET,
};
use crate::error::{HanoiError, Result};
use crate::store::VolumeStore;

pub mod init;

pub use init::{apply_update, initialize, PolicyUpdate};

/// Namespaced property key for one field of one policy.
pub fn property_key(policy: &str, field: &str) -> String {
    format!("{}:{}:{}", TOOL_NAME, policy, field)
}

/// Strip one leading and one trailing double quote, if present.
pub fn unquote(raw: &str) -> &str {
    let s = raw.strip_prefix('"').unwrap_or(raw);
    s.strip_suffix('"').unwrap_or(s)
}

/// Decode the skip flag. `None` is the unset sentinel.
pub fn decode_skip(key: &str, raw: Option<&str>) -> Result<bool> {
    match raw.map(unquote) {
        None | Some(UNSET) | Some("0") | Some("Off") | Some("False") | Some("false") => Ok(false),
        Some("1") | Some("On") | Some("True") | Some("true") => Ok(true),
        Some(other) => Err(HanoiError::InvalidConfigValue {
            key: key.to_string(),
            value: other.to_string(),
        }),
    }
}

/// Encoded form of the skip flag; reads back through `decode_skip`.
pub fn encode_skip(skip: bool) -> &'static str {
    if skip {
        "On"
    } else {
        UNSET
    }
}

pub fn validate_tapes(tapes: u32) -> Result<()> {
    if (MIN_TAPES..=MAX_TAPES).contains(&tapes) {
        Ok(())
    } else {
        Err(HanoiError::OutOfRange {
            field: FIELD_TAPES,
            value: tapes as u64,
            min: MIN_TAPES,
            max: MAX_TAPES,
        })
    }
}

/// Fully decoded, initialized policy (what a tick needs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicySettings {
    pub tapes: u32,
    pub sequence: u64,
    pub date_format: String,
    pub prefix: String,
}

/// Everything stored for a policy, unset fields as `None` (status output).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PolicyView {
    pub tapes: Option<u32>,
    pub sequence: Option<u64>,
    pub date_format: Option<String>,
    pub prefix: Option<String>,
    pub skip: bool,
}

/// Typed accessors over the store for one (volume, policy) pair.
pub struct PolicyConfig<'a, S: VolumeStore + ?Sized> {
    store: &'a mut S,
    volume: &'a str,
    policy: &'a str,
}

impl<'a, S: VolumeStore + ?Sized> PolicyConfig<'a, S> {
    pub fn new(store: &'a mut S, volume: &'a str, policy: &'a str) -> Self {
        Self { store, volume, policy }
    }

    pub fn key(&self, field: &str) -> String {
        property_key(self.policy, field)
    }

    /// Raw value with quotes stripped; `None` when unset.
    fn read(&self, field: &str) -> Result<Option<String>> {
        let raw = self.store.get_property(self.volume, &self.key(field))?;
        Ok(raw
            .as_deref()
            .map(unquote)
            .filter(|v| *v != UNSET)
            .map(str::to_string))
    }

    fn read_int<T: std::str::FromStr>(&self, field: &str) -> Result<Option<T>> {
        match self.read(field)? {
            None => Ok(None),
            Some(v) => v.trim().parse::<T>().map(Some).map_err(|_| {
                HanoiError::InvalidConfigValue {
                    key: self.key(field),
                    value: v.clone(),
                }
            }),
        }
    }

    fn write(&mut self, field: &str, value: &str) -> Result<()> {
        let key = self.key(field);
        self.store.set_property(self.volume, &key, value)
    }

    pub fn tape_count(&self) -> Result<Option<u32>> {
        self.read_int(FIELD_TAPES)
    }

    pub fn sequence(&self) -> Result<Option<u64>> {
        self.read_int(FIELD_SEQUENCE)
    }

    pub fn date_format(&self) -> Result<Option<String>> {
        self.read(FIELD_DATE_FORMAT)
    }

    pub fn prefix(&self) -> Result<Option<String>> {
        self.read(FIELD_PREFIX)
    }

    pub fn skip(&self) -> Result<bool> {
        let raw = self.store.get_property(self.volume, &self.key(FIELD_SKIP))?;
        decode_skip(&self.key(FIELD_SKIP), raw.as_deref())
    }

    pub fn set_tape_count(&mut self, tapes: u32) -> Result<()> {
        validate_tapes(tapes)?;
        self.write(FIELD_TAPES, &tapes.to_string())
    }

    pub fn set_sequence(&mut self, sequence: u64) -> Result<()> {
        self.write(FIELD_SEQUENCE, &sequence.to_string())
    }

    pub fn set_date_format(&mut self, format: &str) -> Result<()> {
        self.write(FIELD_DATE_FORMAT, format)
    }

    pub fn set_prefix(&mut self, prefix: &str) -> Result<()> {
        self.write(FIELD_PREFIX, prefix)
    }

    pub fn set_skip(&mut self, skip: bool) -> Result<()> {
        self.write(FIELD_SKIP, encode_skip(skip))
    }

    /// Decode the fields a tick needs; any missing one is PolicyNotInitialized.
    /// An unset prefix falls back to the policy name.
    pub fn load(&self) -> Result<PolicySettings> {
        let missing = |field: &'static str| HanoiError::PolicyNotInitialized {
            volume: self.volume.to_string(),
            policy: self.policy.to_string(),
            field,
        };
        let tapes = self.tape_count()?.ok_or_else(|| missing(FIELD_TAPES))?;
        // значение могли выставить мимо set_tape_count (zfs set руками)
        validate_tapes(tapes)?;
        let sequence = self.sequence()?.ok_or_else(|| missing(FIELD_SEQUENCE))?;
        let date_format = self.date_format()?.ok_or_else(|| missing(FIELD_DATE_FORMAT))?;
        let prefix = self.prefix()?.unwrap_or_else(|| self.policy.to_string());
        Ok(PolicySettings {
            tapes,
            sequence,
            date_format,
            prefix,
        })
    }

    /// Snapshot of all fields without requiring initialization.
    pub fn view(&self) -> Result<PolicyView> {
        Ok(PolicyView {
            tapes: self.tape_count()?,
            sequence: self.sequence()?,
            date_format: self.date_format()?,
            prefix: self.prefix()?,
            skip: self.skip()?,
        })
    }
}
