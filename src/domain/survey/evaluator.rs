//! Branch evaluation: maps a node and its recorded answer to the successor.
//!
//! Pure functions only. Malformed conditions never error; they just do not
//! match, and evaluation falls through to the next rule.

use std::cmp::Ordering;

use super::{Answer, BranchCondition, ConditionOperator, QuestionType, SurveyNode};
use crate::domain::foundation::NodeId;

/// Computes the node that follows `node` given its answer.
///
/// Resolution order, first applicable wins:
/// 1. legacy yes/no routing (`answer_yes_node_id` / `answer_no_node_id`)
/// 2. `branches`, in declaration order
/// 3. `next_node_id`
///
/// `None` means the survey ends after this node.
pub fn next_node(node: &SurveyNode, answer: Option<&Answer>) -> Option<NodeId> {
    if let Some(answer) = answer {
        if node.question_type == QuestionType::YesNo {
            let legacy = if answer.is_yes() {
                node.answer_yes_node_id.as_ref()
            } else {
                node.answer_no_node_id.as_ref()
            };
            if let Some(next) = legacy {
                return Some(next.clone());
            }
        }

        let matched = node
            .branches
            .iter()
            .filter(|b| b.next_node_id.is_some())
            .find(|b| condition_matches(&b.condition, answer));
        if let Some(branch) = matched {
            return branch.next_node_id.clone();
        }
    }

    node.next_node_id.clone()
}

/// Returns true if `answer` satisfies `condition`.
///
/// Every answer shape the operator applies to is checked; a shape the
/// operator does not apply to never matches.
pub fn condition_matches(condition: &BranchCondition, answer: &Answer) -> bool {
    match condition.operator {
        ConditionOperator::Equals => equals(condition, answer),
        ConditionOperator::Contains => contains(condition, answer),
        ConditionOperator::Gt => compare_rating(condition, answer).is_some_and(Ordering::is_gt),
        ConditionOperator::Lt => compare_rating(condition, answer).is_some_and(Ordering::is_lt),
        ConditionOperator::Gte => compare_rating(condition, answer).is_some_and(Ordering::is_ge),
        ConditionOperator::Lte => compare_rating(condition, answer).is_some_and(Ordering::is_le),
        ConditionOperator::Unknown => false,
    }
}

fn equals(condition: &BranchCondition, answer: &Answer) -> bool {
    match answer {
        Answer::Text(text) => condition.value_text().is_some_and(|v| *text == v),
        Answer::Rating(_) => compare_rating(condition, answer).is_some_and(Ordering::is_eq),
        Answer::Options(selected) => match selected.as_slice() {
            [only] => condition.value_text().is_some_and(|v| *only == v),
            _ => false,
        },
        Answer::YesNo(yes) => condition.value_text().is_some_and(|v| {
            let v = v.trim().to_ascii_lowercase();
            if *yes {
                v == "yes" || v == "true"
            } else {
                v == "no" || v == "false"
            }
        }),
    }
}

fn contains(condition: &BranchCondition, answer: &Answer) -> bool {
    let Some(value) = condition.value_text() else {
        return false;
    };
    match answer {
        Answer::Text(text) => text.contains(value.as_str()),
        Answer::Options(selected) => selected.iter().any(|s| *s == value),
        Answer::YesNo(_) | Answer::Rating(_) => false,
    }
}

/// Orders a rating answer against the condition value. Integral values are
/// compared exactly; fractional ones as floats.
fn compare_rating(condition: &BranchCondition, answer: &Answer) -> Option<Ordering> {
    let rating = answer.as_rating()?;
    match condition.value_integer() {
        Some(value) => Some(rating.cmp(&value)),
        None => (rating as f64).partial_cmp(&condition.value_number()?),
    }
}
