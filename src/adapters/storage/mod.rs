//! Storage Adapters
//!
//! Implementations of the `SurveyReader` and `ResponseSubmitter` ports
//! that do not need the hosted API.
//!
//! ## Available Adapters
//!
//! - **FileSurveyStore** - Reads YAML/JSON definitions from disk, logs responses as JSON lines
//! - **InMemorySurveyStore** - Keeps everything in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileSurveyStore, InMemorySurveyStore};
//!
//! // Self-hosted: definitions shipped alongside the binary
//! let store = FileSurveyStore::new("./surveys");
//!
//! // Testing: in-memory store
//! let store = InMemorySurveyStore::new();
//! ```

mod file_survey_store;
mod in_memory_survey_store;

pub use file_survey_store::FileSurveyStore;
pub use in_memory_survey_store::InMemorySurveyStore;
