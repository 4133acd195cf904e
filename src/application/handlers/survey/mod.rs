//! Survey handlers - starting a session and running it to submission.

mod start_survey;
mod survey_session;

pub use start_survey::{StartSurveyCommand, StartSurveyHandler};
pub use survey_session::{deliver_submission, SurveySession};
