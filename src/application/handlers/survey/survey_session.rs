//! SurveySession - Drives a navigator and delivers its submissions.

use std::sync::Arc;

use crate::domain::foundation::{NodeId, SurveyId};
use crate::domain::survey::{
    Advance, Answer, NavigationState, SubmissionReceipt, SubmissionRequest, SurveyNavigator,
};
use crate::ports::ResponseSubmitter;

/// Sends a submission and flattens the error into the message shown on the
/// failure screen.
pub async fn deliver_submission(
    submitter: &dyn ResponseSubmitter,
    survey_id: &SurveyId,
    request: &SubmissionRequest,
) -> Result<SubmissionReceipt, String> {
    tracing::info!(
        %survey_id,
        ticket = %request.ticket,
        answers = request.payload.answers.len(),
        "Submitting survey response"
    );

    match submitter.submit_response(survey_id, &request.payload).await {
        Ok(receipt) => Ok(receipt),
        Err(error) => {
            tracing::warn!(%survey_id, error = %error, "Survey response delivery failed");
            Err(error.to_string())
        }
    }
}

/// A running survey: the navigator plus the port its answers go to.
pub struct SurveySession {
    navigator: SurveyNavigator,
    submitter: Arc<dyn ResponseSubmitter>,
}

impl SurveySession {
    pub fn new(navigator: SurveyNavigator, submitter: Arc<dyn ResponseSubmitter>) -> Self {
        Self {
            navigator,
            submitter,
        }
    }

    pub fn navigator(&self) -> &SurveyNavigator {
        &self.navigator
    }

    pub fn state(&self) -> &NavigationState {
        self.navigator.state()
    }

    pub fn answer(&mut self, node_id: NodeId, answer: impl Into<Answer>) {
        self.navigator.answer(node_id, answer);
    }

    pub fn clear_answer(&mut self, node_id: &NodeId) -> Option<Answer> {
        self.navigator.clear_answer(node_id)
    }

    pub fn back(&mut self) -> bool {
        self.navigator.back()
    }

    /// Advances and, when the survey ends, submits before returning.
    pub async fn advance(&mut self) -> Advance {
        let step = self.navigator.advance();
        if let Advance::Submit(request) = &step {
            self.submit(request).await;
        }
        step
    }

    /// Submits from a result screen. Returns false outside `Terminal`.
    pub async fn finish(&mut self) -> bool {
        match self.navigator.finish() {
            Some(request) => self.submit(&request).await,
            None => false,
        }
    }

    /// Resubmits after a failure. Returns false outside `Failed`.
    pub async fn retry(&mut self) -> bool {
        match self.navigator.retry() {
            Some(request) => self.submit(&request).await,
            None => false,
        }
    }

    pub fn detach(&mut self) {
        self.navigator.detach();
    }

    pub fn into_navigator(self) -> SurveyNavigator {
        self.navigator
    }

    async fn submit(&mut self, request: &SubmissionRequest) -> bool {
        let survey_id = self.navigator.survey().id.clone();
        let outcome = deliver_submission(self.submitter.as_ref(), &survey_id, request).await;
        self.navigator.complete_submission(request.ticket, outcome)
    }
}
