//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the survey domain to external systems:
//! - `storage` - In-memory and file-backed survey stores
//! - `http_client` - The hosted survey API over HTTP
//! - `fingerprint` - Respondent fingerprint providers

pub mod fingerprint;
pub mod http_client;
pub mod storage;

pub use fingerprint::{HashedFingerprint, StaticFingerprint};
pub use http_client::{HttpClientConfig, HttpSurveyClient};
pub use storage::{FileSurveyStore, InMemorySurveyStore};
