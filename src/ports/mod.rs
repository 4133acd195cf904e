//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the survey core and its collaborators. Adapters implement these ports.
//!
//! - `SurveyReader` - Loads a survey and its nodes by slug
//! - `ResponseSubmitter` - Posts a completed answer set
//! - `FingerprintProvider` - Supplies the respondent's opaque id

mod fingerprint_provider;
mod response_submitter;
mod survey_reader;

pub use fingerprint_provider::FingerprintProvider;
pub use response_submitter::{ResponseSubmitter, SubmitError};
pub use survey_reader::{SurveyReadError, SurveyReader};
