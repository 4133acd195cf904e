//! Survey-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, SurveyId, SurveySlug};

/// Errors raised while loading or running a survey.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurveyError {
    #[error("Survey not found: {0}")]
    NotFound(SurveySlug),

    #[error("Survey is not accepting responses: {0}")]
    Inactive(SurveySlug),

    #[error("Survey {0} has no nodes")]
    Empty(SurveyId),

    #[error("Invalid survey data: {0}")]
    Malformed(String),

    #[error("Network error: {0}")]
    Transport(String),
}

impl SurveyError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SurveyError::NotFound(_) => ErrorCode::SurveyNotFound,
            SurveyError::Inactive(_) => ErrorCode::SurveyNotFound,
            SurveyError::Empty(_) => ErrorCode::NodeNotFound,
            SurveyError::Malformed(_) => ErrorCode::MalformedResponse,
            SurveyError::Transport(_) => ErrorCode::NetworkError,
        }
    }
}

impl From<SurveyError> for DomainError {
    fn from(err: SurveyError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
