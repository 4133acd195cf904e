//! HTTP Survey Client - Implementation of the survey ports over the hosted API.
//!
//! # Endpoints
//!
//! - `GET  {base_url}/surveys/{slug}` → `SurveyDefinition`
//! - `POST {base_url}/surveys/{survey_id}/responses` → `{ "successMessage": ... }`
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpClientConfig::new("https://feedback.example.com/api/v1")
//!     .with_api_key(api_key)
//!     .with_organization("acme");
//!
//! let client = HttpSurveyClient::new(config)?;
//! ```
//!
//! No retries: the respondent retries by hand from the failure screen.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::domain::foundation::{SurveyId, SurveySlug};
use crate::domain::survey::{SubmissionPayload, SubmissionReceipt, SurveyDefinition};
use crate::ports::{ResponseSubmitter, SubmitError, SurveyReadError, SurveyReader};

/// Header carrying the organization a request is scoped to.
pub const ORGANIZATION_HEADER: &str = "X-Organization";

/// Configuration for the HTTP survey client.
pub struct HttpClientConfig {
    /// API root, e.g. `https://feedback.example.com/api/v1`.
    pub base_url: String,
    /// Optional bearer token.
    api_key: Option<Secret<String>>,
    /// Organization the surveys belong to.
    pub organization: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
}

impl HttpClientConfig {
    /// Creates a configuration for the given API root.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            organization: None,
            timeout: Duration::from_secs(15),
        }
    }

    /// Sets the bearer token.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(api_key.into()));
        self
    }

    /// Sets the organization header.
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|k| k.expose_secret().as_str())
    }
}

impl fmt::Debug for HttpClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("organization", &self.organization)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl From<&ClientConfig> for HttpClientConfig {
    fn from(config: &ClientConfig) -> Self {
        let mut http = HttpClientConfig::new(config.base_url.clone()).with_timeout(config.timeout());
        if config.has_api_key() {
            if let Some(key) = &config.api_key {
                http = http.with_api_key(key.expose_secret().clone());
            }
        }
        if let Some(org) = config.organization.as_ref().filter(|o| !o.is_empty()) {
            http = http.with_organization(org.clone());
        }
        http
    }
}

/// Survey reader and response submitter backed by the hosted API.
pub struct HttpSurveyClient {
    config: HttpClientConfig,
    client: Client,
}

impl HttpSurveyClient {
    /// Creates a client with the given configuration.
    pub fn new(config: HttpClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// `GET` URL for a survey definition.
    pub fn survey_url(&self, slug: &SurveySlug) -> Result<Url, String> {
        self.endpoint(&["surveys", slug.as_str()])
    }

    /// `POST` URL for a survey's responses.
    pub fn responses_url(&self, survey_id: &SurveyId) -> Result<Url, String> {
        self.endpoint(&["surveys", survey_id.as_str(), "responses"])
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, String> {
        let mut url = Url::parse(&self.config.base_url).map_err(|e| e.to_string())?;
        url.path_segments_mut()
            .map_err(|_| format!("base URL cannot take a path: {}", self.config.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(key) = self.config.api_key() {
            builder = builder.bearer_auth(key);
        }
        if let Some(org) = &self.config.organization {
            builder = builder.header(ORGANIZATION_HEADER, org);
        }
        builder
    }
}

/// Error body the API sends with 4xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status))
}

/// Maps a survey read response to the port's result.
fn read_result(
    slug: &SurveySlug,
    status: StatusCode,
    body: &str,
) -> Result<SurveyDefinition, SurveyReadError> {
    if status == StatusCode::NOT_FOUND {
        return Err(SurveyReadError::NotFound(slug.clone()));
    }
    if !status.is_success() {
        return Err(SurveyReadError::Network(error_message(status, body)));
    }
    serde_json::from_str(body).map_err(|e| SurveyReadError::malformed(e.to_string()))
}

/// Maps a submission response to the port's result.
fn submit_result(status: StatusCode, body: &str) -> Result<SubmissionReceipt, SubmitError> {
    if status.is_success() {
        if body.trim().is_empty() {
            return Ok(SubmissionReceipt::default());
        }
        // A 2xx means the response was stored; an odd body does not undo that.
        return Ok(serde_json::from_str(body).unwrap_or_default());
    }
    if status.is_client_error() {
        return Err(SubmitError::Rejected(error_message(status, body)));
    }
    Err(SubmitError::Network(error_message(status, body)))
}

#[async_trait]
impl SurveyReader for HttpSurveyClient {
    async fn get_survey(&self, slug: &SurveySlug) -> Result<SurveyDefinition, SurveyReadError> {
        let url = self.survey_url(slug).map_err(SurveyReadError::Network)?;
        tracing::debug!(%url, "Fetching survey");

        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(%slug, error = %e, "Survey fetch failed");
                SurveyReadError::network(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SurveyReadError::network(e.to_string()))?;

        read_result(slug, status, &body)
    }
}

#[async_trait]
impl ResponseSubmitter for HttpSurveyClient {
    async fn submit_response(
        &self,
        survey_id: &SurveyId,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt, SubmitError> {
        let url = self.responses_url(survey_id).map_err(SubmitError::Network)?;
        tracing::debug!(%url, answers = payload.answers.len(), "Posting survey response");

        let response = self
            .request(Method::POST, url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(%survey_id, error = %e, "Survey response post failed");
                SubmitError::network(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubmitError::network(e.to_string()))?;

        submit_result(status, &body)
    }
}
