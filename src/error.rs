//! Error types for the rotation core.

use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, HanoiError>;

/// Fatal errors of a tick, an init or a config write.
#[derive(Error, Debug)]
pub enum HanoiError {
    /// Referenced dataset is absent from the store.
    #[error("volume not found: {0}")]
    VolumeNotFound(String),

    /// A required policy field is unset.
    #[error("policy '{policy}' is not initialized on {volume} (missing '{field}')")]
    PolicyNotInitialized {
        volume: String,
        policy: String,
        field: &'static str,
    },

    /// Numeric field outside its allowed range; rejected before any write.
    #[error("{field} out of range: {value} (allowed {min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u32,
        max: u32,
    },

    /// Stored token does not decode (unknown skip token, non-numeric integer, bad date format).
    #[error("invalid value for {key}: '{value}'")]
    InvalidConfigValue { key: String, value: String },

    #[error("failed to create snapshot {snapshot}: {reason}")]
    SnapshotCreateFailed { snapshot: String, reason: String },

    #[error("failed to destroy snapshot {snapshot}: {reason}")]
    SnapshotDestroyFailed { snapshot: String, reason: String },

    /// Generic backend failure (enumeration, property read/write).
    #[error("store error: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl HanoiError {
    /// Short machine-friendly tag, used in JSON reports.
    pub fn kind(&self) -> &'static str {
        match self {
            HanoiError::VolumeNotFound(_) => "volume_not_found",
            HanoiError::PolicyNotInitialized { .. } => "policy_not_initialized",
            HanoiError::OutOfRange { .. } => "out_of_range",
            HanoiError::InvalidConfigValue { .. } => "invalid_config_value",
            HanoiError::SnapshotCreateFailed { .. } => "snapshot_create_failed",
            HanoiError::SnapshotDestroyFailed { .. } => "snapshot_destroy_failed",
            HanoiError::Store(_) => "store",
            HanoiError::Io(_) => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HanoiError;

    #[test]
    fn io_error_is_not_repeated_in_chain() {
        let e = anyhow::Error::from(HanoiError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "zfs: not found",
        )));
        assert_eq!(format!("{:#}", e), "zfs: not found");
    }
}
