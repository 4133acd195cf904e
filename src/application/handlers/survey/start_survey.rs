//! StartSurveyHandler - Loads a survey and opens a session on it.

use serde_json::{Map, Value};
use std::sync::Arc;

use super::SurveySession;
use crate::config::NavigationConfig;
use crate::domain::foundation::SurveySlug;
use crate::domain::survey::{Respondent, SurveyError, SurveyNavigator, DEFAULT_MAX_PATH_LENGTH};
use crate::ports::{FingerprintProvider, ResponseSubmitter, SurveyReader};

/// Command to start answering a survey.
#[derive(Debug, Clone)]
pub struct StartSurveyCommand {
    pub slug: SurveySlug,
    pub external_user_id: Option<String>,
    pub metadata: Option<Map<String, Value>>,
}

impl StartSurveyCommand {
    pub fn new(slug: SurveySlug) -> Self {
        Self {
            slug,
            external_user_id: None,
            metadata: None,
        }
    }

    pub fn with_external_user_id(mut self, id: impl Into<String>) -> Self {
        self.external_user_id = Some(id.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Handler for starting survey sessions.
pub struct StartSurveyHandler {
    reader: Arc<dyn SurveyReader>,
    submitter: Arc<dyn ResponseSubmitter>,
    fingerprint: Arc<dyn FingerprintProvider>,
    max_path_length: usize,
}

impl StartSurveyHandler {
    pub fn new(
        reader: Arc<dyn SurveyReader>,
        submitter: Arc<dyn ResponseSubmitter>,
        fingerprint: Arc<dyn FingerprintProvider>,
    ) -> Self {
        Self {
            reader,
            submitter,
            fingerprint,
            max_path_length: DEFAULT_MAX_PATH_LENGTH,
        }
    }

    pub fn with_max_path_length(mut self, max_path_length: usize) -> Self {
        self.max_path_length = max_path_length;
        self
    }

    /// Applies the configured navigation limits.
    pub fn with_navigation(self, config: &NavigationConfig) -> Self {
        self.with_max_path_length(config.max_path_length)
    }

    pub async fn handle(&self, cmd: StartSurveyCommand) -> Result<SurveySession, SurveyError> {
        // 1. Load the definition
        let definition = self.reader.get_survey(&cmd.slug).await.map_err(|e| {
            tracing::warn!(slug = %cmd.slug, error = %e, "Survey could not be loaded");
            SurveyError::from(e)
        })?;

        if !definition.survey.is_active {
            return Err(SurveyError::Inactive(cmd.slug));
        }

        // 2. Identify the respondent
        let mut respondent = Respondent::anonymous(self.fingerprint.fingerprint());
        if let Some(id) = cmd.external_user_id {
            respondent = respondent.with_external_user_id(id);
        }
        if let Some(metadata) = cmd.metadata {
            respondent = respondent.with_metadata(metadata);
        }

        // 3. Open the navigator at the root
        let navigator = SurveyNavigator::new(definition, respondent)?
            .with_max_path_length(self.max_path_length);

        tracing::info!(
            survey_id = %navigator.survey().id,
            slug = %cmd.slug,
            "Survey started"
        );

        Ok(SurveySession::new(navigator, self.submitter.clone()))
    }
}
