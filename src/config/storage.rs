//! Local survey storage configuration

use serde::Deserialize;
use std::path::PathBuf;

/// File-backed survey storage
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `{slug}.yaml` definitions; unset means use the HTTP API
    pub survey_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Check if surveys are served from disk
    pub fn is_local(&self) -> bool {
        self.survey_dir.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_defaults_to_remote() {
        assert!(!StorageConfig::default().is_local());
    }

    #[test]
    fn test_storage_local_when_dir_set() {
        let config = StorageConfig {
            survey_dir: Some(PathBuf::from("/var/lib/surveys")),
        };
        assert!(config.is_local());
    }
}
