//! Survey reader port.
//!
//! Fetches a survey's metadata and node records once per session.
//! Implementations own transport details; the core treats any failure as
//! "no survey available" and does not retry.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, SurveySlug};
use crate::domain::survey::{SurveyDefinition, SurveyError};

/// Port for loading survey definitions.
#[async_trait]
pub trait SurveyReader: Send + Sync {
    /// Loads the survey published under `slug`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no survey exists for the slug
    /// - `Network` on transport failure
    /// - `Malformed` if the response could not be decoded
    async fn get_survey(&self, slug: &SurveySlug) -> Result<SurveyDefinition, SurveyReadError>;
}

/// Failure kinds of a survey read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurveyReadError {
    #[error("Survey not found: {0}")]
    NotFound(SurveySlug),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed survey data: {0}")]
    Malformed(String),
}

impl SurveyReadError {
    pub fn network(message: impl Into<String>) -> Self {
        SurveyReadError::Network(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        SurveyReadError::Malformed(message.into())
    }
}

impl From<SurveyReadError> for SurveyError {
    fn from(err: SurveyReadError) -> Self {
        match err {
            SurveyReadError::NotFound(slug) => SurveyError::NotFound(slug),
            SurveyReadError::Network(msg) => SurveyError::Transport(msg),
            SurveyReadError::Malformed(msg) => SurveyError::Malformed(msg),
        }
    }
}

impl From<SurveyReadError> for DomainError {
    fn from(err: SurveyReadError) -> Self {
        let code = match &err {
            SurveyReadError::NotFound(_) => ErrorCode::SurveyNotFound,
            SurveyReadError::Network(_) => ErrorCode::NetworkError,
            SurveyReadError::Malformed(_) => ErrorCode::MalformedResponse,
        };
        DomainError::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survey_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn SurveyReader) {}
    }

    #[test]
    fn read_errors_map_to_survey_errors() {
        let slug = SurveySlug::new("nps").unwrap();
        assert_eq!(
            SurveyError::from(SurveyReadError::NotFound(slug.clone())),
            SurveyError::NotFound(slug)
        );
        assert_eq!(
            SurveyError::from(SurveyReadError::network("timeout")),
            SurveyError::Transport("timeout".into())
        );
    }
}
