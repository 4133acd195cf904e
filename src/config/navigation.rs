//! Navigation limits

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::survey::DEFAULT_MAX_PATH_LENGTH;

/// Navigation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NavigationConfig {
    /// Longest path a respondent may walk before the survey is submitted
    #[serde(default = "default_max_path_length")]
    pub max_path_length: usize,
}

impl NavigationConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_path_length == 0 {
            return Err(ValidationError::InvalidPathLength);
        }
        Ok(())
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            max_path_length: default_max_path_length(),
        }
    }
}

fn default_max_path_length() -> usize {
    DEFAULT_MAX_PATH_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_defaults() {
        let config = NavigationConfig::default();
        assert_eq!(config.max_path_length, 256);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_path_length_rejected() {
        let config = NavigationConfig { max_path_length: 0 };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPathLength));
    }
}
