//! Application layer - Commands and Handlers.
//!
//! This layer wires the survey domain to its ports: it loads definitions,
//! drives the navigator and delivers submissions.

pub mod handlers;

pub use handlers::{deliver_submission, StartSurveyCommand, StartSurveyHandler, SurveySession};
