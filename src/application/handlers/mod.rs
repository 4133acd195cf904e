//! Command handlers organized by domain.

pub mod survey;

pub use survey::{deliver_submission, StartSurveyCommand, StartSurveyHandler, SurveySession};
