//! HTTP adapter for the hosted survey API.

mod survey_client;

pub use survey_client::{HttpClientConfig, HttpSurveyClient, ORGANIZATION_HEADER};
