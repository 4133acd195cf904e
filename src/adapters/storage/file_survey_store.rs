//! File-based Survey Store Adapter
//!
//! Loads survey definitions from `{base}/{slug}.yaml` (also `.yml` or
//! `.json`) and appends submitted responses as JSON lines to
//! `{base}/responses/{survey_id}.jsonl`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::config::StorageConfig;
use crate::domain::foundation::{SurveyId, SurveySlug};
use crate::domain::survey::{SubmissionPayload, SubmissionReceipt, SurveyDefinition};
use crate::ports::{ResponseSubmitter, SubmitError, SurveyReadError, SurveyReader};

const DEFINITION_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// File-based survey reader and response log
#[derive(Debug, Clone)]
pub struct FileSurveyStore {
    base_path: PathBuf,
}

impl FileSurveyStore {
    /// Create a store rooted at `base_path`
    ///
    /// # Example
    /// ```ignore
    /// let store = FileSurveyStore::new("./surveys");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Create a store from configuration, or `None` when no survey
    /// directory is configured
    pub fn from_config(config: &StorageConfig) -> Option<Self> {
        config.survey_dir.as_ref().map(Self::new)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the responses directory
    fn responses_dir(&self) -> PathBuf {
        self.base_path.join("responses")
    }

    /// Get the response log path for a survey
    fn response_log_path(&self, survey_id: &SurveyId) -> PathBuf {
        self.responses_dir().join(format!("{}.jsonl", survey_id))
    }

    /// First existing definition file for the slug
    fn definition_path(&self, slug: &SurveySlug) -> Option<PathBuf> {
        DEFINITION_EXTENSIONS
            .iter()
            .map(|ext| self.base_path.join(format!("{}.{}", slug, ext)))
            .find(|path| path.is_file())
    }

    /// Reads back every response logged for a survey
    pub async fn responses(&self, survey_id: &SurveyId) -> Result<Vec<SubmissionPayload>, SubmitError> {
        if !is_safe_file_stem(survey_id.as_str()) {
            return Err(SubmitError::rejected(format!("invalid survey id {}", survey_id)));
        }
        let path = self.response_log_path(survey_id);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&path)
            .await
            .map_err(|e| SubmitError::network(e.to_string()))?;

        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(|e| SubmitError::rejected(e.to_string())))
            .collect()
    }
}

/// Ids become file names; anything that could escape the base directory
/// is refused.
fn is_safe_file_stem(s: &str) -> bool {
    !s.is_empty()
        && s != "."
        && s != ".."
        && !s.contains(['/', '\\'])
        && !s.contains("..")
}

fn parse_definition(path: &Path, contents: &str) -> Result<SurveyDefinition, SurveyReadError> {
    let is_json = path.extension().is_some_and(|ext| ext == "json");
    if is_json {
        serde_json::from_str(contents).map_err(|e| SurveyReadError::malformed(e.to_string()))
    } else {
        serde_yaml::from_str(contents).map_err(|e| SurveyReadError::malformed(e.to_string()))
    }
}

#[async_trait]
impl SurveyReader for FileSurveyStore {
    async fn get_survey(&self, slug: &SurveySlug) -> Result<SurveyDefinition, SurveyReadError> {
        if !is_safe_file_stem(slug.as_str()) {
            return Err(SurveyReadError::NotFound(slug.clone()));
        }

        let path = self
            .definition_path(slug)
            .ok_or_else(|| SurveyReadError::NotFound(slug.clone()))?;

        tracing::debug!(path = %path.display(), "Loading survey definition");

        let contents = fs::read_to_string(&path)
            .await
            .map_err(|e| SurveyReadError::network(e.to_string()))?;

        parse_definition(&path, &contents)
    }
}

#[async_trait]
impl ResponseSubmitter for FileSurveyStore {
    async fn submit_response(
        &self,
        survey_id: &SurveyId,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt, SubmitError> {
        if !is_safe_file_stem(survey_id.as_str()) {
            return Err(SubmitError::rejected(format!("invalid survey id {}", survey_id)));
        }

        fs::create_dir_all(self.responses_dir())
            .await
            .map_err(|e| SubmitError::network(e.to_string()))?;

        let mut line =
            serde_json::to_string(payload).map_err(|e| SubmitError::rejected(e.to_string()))?;
        line.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.response_log_path(survey_id))
            .await
            .map_err(|e| SubmitError::network(e.to_string()))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| SubmitError::network(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| SubmitError::network(e.to_string()))?;

        Ok(SubmissionReceipt::default())
    }
}
