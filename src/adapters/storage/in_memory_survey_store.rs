//! In-Memory Survey Store Adapter
//!
//! Holds survey definitions and received responses in memory.
//! Useful for testing, demos, and embedding surveys compiled into a binary.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{SurveyId, SurveySlug};
use crate::domain::survey::{SubmissionPayload, SubmissionReceipt, SurveyDefinition};
use crate::ports::{ResponseSubmitter, SubmitError, SurveyReadError, SurveyReader};

/// In-memory survey reader and response sink.
#[derive(Debug, Clone, Default)]
pub struct InMemorySurveyStore {
    surveys: Arc<RwLock<HashMap<SurveySlug, SurveyDefinition>>>,
    responses: Arc<RwLock<Vec<SubmissionPayload>>>,
    submit_failure: Arc<RwLock<Option<SubmitError>>>,
}

impl InMemorySurveyStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with definitions
    pub async fn with_surveys(definitions: impl IntoIterator<Item = SurveyDefinition>) -> Self {
        let store = Self::new();
        for definition in definitions {
            store.insert(definition).await;
        }
        store
    }

    /// Add or replace a survey definition, keyed by its slug
    pub async fn insert(&self, definition: SurveyDefinition) {
        let slug = definition.survey.slug.clone();
        self.surveys.write().await.insert(slug, definition);
    }

    /// Make every following submission fail with `error` (None to recover)
    pub async fn set_submit_failure(&self, error: Option<SubmitError>) {
        *self.submit_failure.write().await = error;
    }

    /// Responses received for a survey, in arrival order
    pub async fn responses_for(&self, survey_id: &SurveyId) -> Vec<SubmissionPayload> {
        self.responses
            .read()
            .await
            .iter()
            .filter(|p| &p.survey_id == survey_id)
            .cloned()
            .collect()
    }

    /// Total number of responses received
    pub async fn response_count(&self) -> usize {
        self.responses.read().await.len()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.surveys.write().await.clear();
        self.responses.write().await.clear();
    }

    async fn find_by_id(&self, survey_id: &SurveyId) -> Option<SurveyDefinition> {
        self.surveys
            .read()
            .await
            .values()
            .find(|d| &d.survey.id == survey_id)
            .cloned()
    }
}

#[async_trait]
impl SurveyReader for InMemorySurveyStore {
    async fn get_survey(&self, slug: &SurveySlug) -> Result<SurveyDefinition, SurveyReadError> {
        self.surveys
            .read()
            .await
            .get(slug)
            .cloned()
            .ok_or_else(|| SurveyReadError::NotFound(slug.clone()))
    }
}

#[async_trait]
impl ResponseSubmitter for InMemorySurveyStore {
    async fn submit_response(
        &self,
        survey_id: &SurveyId,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt, SubmitError> {
        if let Some(error) = self.submit_failure.read().await.clone() {
            return Err(error);
        }

        let definition = self
            .find_by_id(survey_id)
            .await
            .ok_or_else(|| SubmitError::rejected(format!("unknown survey {}", survey_id)))?;

        self.responses.write().await.push(payload.clone());

        Ok(SubmissionReceipt {
            success_message: definition.survey.success_message,
        })
    }
}
