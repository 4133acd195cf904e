//! Survey domain module.
//!
//! A survey is a decision tree of question nodes. This module holds the
//! node records, the branch evaluator that picks each successor, the
//! navigation state machine that walks one respondent through the tree,
//! and the assembler that turns recorded answers into a submission.
//!
//! # Flow
//!
//! answer → `SurveyNavigator::advance` → `next_node` → next question,
//! result screen, or a `SubmissionRequest` built by `build_submission`.

mod answer;
mod errors;
mod evaluator;
mod navigator;
mod node;
mod node_set;
mod state;
mod submission;
mod survey;

pub use answer::Answer;
pub use errors::SurveyError;
pub use evaluator::{condition_matches, next_node};
pub use navigator::{
    Advance, SubmissionRequest, SurveyNavigator, DEFAULT_MAX_PATH_LENGTH, DEFAULT_SUCCESS_MESSAGE,
};
pub use node::{
    Branch, BranchCondition, ConditionOperator, QuestionType, SurveyNode, SurveyOption,
    DEFAULT_MAX_RATING, DEFAULT_MIN_RATING,
};
pub use node_set::NodeSet;
pub use state::{NavigationPhase, NavigationState};
pub use submission::{
    build_submission, AnswerRecord, Respondent, SubmissionPayload, SubmissionReceipt,
};
pub use survey::{Survey, SurveyDefinition};
