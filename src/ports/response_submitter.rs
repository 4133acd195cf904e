//! Response submitter port.
//!
//! Posts a completed answer set. Called exactly once per submission attempt;
//! retries are driven by the respondent, never by the port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::SurveyId;
use crate::domain::survey::{SubmissionPayload, SubmissionReceipt};

/// Port for submitting survey responses.
#[async_trait]
pub trait ResponseSubmitter: Send + Sync {
    /// Submits the payload for `survey_id`.
    ///
    /// # Errors
    ///
    /// - `Rejected` if the service refused the response
    /// - `Network` on transport failure
    async fn submit_response(
        &self,
        survey_id: &SurveyId,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt, SubmitError>;
}

/// Failure kinds of a submission.
///
/// `Display` is the user-visible text the navigator stores in `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Your response could not be saved: {0}")]
    Rejected(String),

    #[error("Could not reach the server: {0}")]
    Network(String),
}

impl SubmitError {
    pub fn network(message: impl Into<String>) -> Self {
        SubmitError::Network(message.into())
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        SubmitError::Rejected(message.into())
    }
}
