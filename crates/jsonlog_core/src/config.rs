//! Store configuration.

use crate::error::{CoreError, CoreResult};

/// Default size threshold that triggers a rotation (5 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Default number of archived segments kept by retention.
pub const DEFAULT_MAX_FILE_COUNT: usize = 5;

/// Configuration for opening a [`LogStore`](crate::LogStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Size of the active file, in bytes, at which it is rotated.
    pub max_file_size: u64,

    /// Whether an append checks the active file size and rotates.
    pub rotation_enabled: bool,

    /// Retention cap on archived segments. `0` disables pruning entirely.
    pub max_file_count: usize,

    /// Whether each record gets a generated `timestamp` field.
    pub add_timestamp: bool,

    /// Whether to fsync the active file after every append.
    pub sync_on_append: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            rotation_enabled: true,
            max_file_count: DEFAULT_MAX_FILE_COUNT,
            add_timestamp: true,
            sync_on_append: false,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rotation size threshold.
    #[must_use]
    pub const fn max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Sets whether appends trigger rotation.
    #[must_use]
    pub const fn rotation_enabled(mut self, value: bool) -> Self {
        self.rotation_enabled = value;
        self
    }

    /// Sets the retention cap. `0` disables pruning.
    #[must_use]
    pub const fn max_file_count(mut self, count: usize) -> Self {
        self.max_file_count = count;
        self
    }

    /// Sets whether records are timestamped.
    #[must_use]
    pub const fn add_timestamp(mut self, value: bool) -> Self {
        self.add_timestamp = value;
        self
    }

    /// Sets whether every append is followed by an fsync.
    #[must_use]
    pub const fn sync_on_append(mut self, value: bool) -> Self {
        self.sync_on_append = value;
        self
    }

    /// Returns `true` if retention pruning is active.
    #[must_use]
    pub const fn retention_enabled(&self) -> bool {
        self.max_file_count > 0
    }

    /// Checks the configuration for contradictions.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if rotation is enabled with a
    /// zero size threshold, which would rotate on every append including
    /// appends to an empty file.
    pub fn validate(&self) -> CoreResult<()> {
        if self.rotation_enabled && self.max_file_size == 0 {
            return Err(CoreError::invalid_config(
                "max_file_size must be greater than zero when rotation is enabled",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.max_file_size, 5_242_880);
        assert!(config.rotation_enabled);
        assert_eq!(config.max_file_count, 5);
        assert!(config.add_timestamp);
        assert!(!config.sync_on_append);
        assert!(config.retention_enabled());
    }

    #[test]
    fn builder_pattern() {
        let config = Config::new()
            .max_file_size(1024)
            .max_file_count(0)
            .add_timestamp(false)
            .rotation_enabled(false);

        assert_eq!(config.max_file_size, 1024);
        assert!(!config.retention_enabled());
        assert!(!config.add_timestamp);
        assert!(!config.rotation_enabled);
    }

    #[test]
    fn zero_threshold_rejected_only_with_rotation() {
        assert!(Config::new().max_file_size(0).validate().is_err());
        assert!(Config::new()
            .max_file_size(0)
            .rotation_enabled(false)
            .validate()
            .is_ok());
    }
}
