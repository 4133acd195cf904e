//! Survey node record and its branching rules.
//!
//! A node is a single flat record: fields that only make sense for some
//! question types (options, rating bounds, legacy yes/no routing) are
//! optional and ignored for the others.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use super::Answer;
use crate::domain::foundation::{NodeId, ValidationError};

/// Lower rating bound used when a rating node does not specify one.
pub const DEFAULT_MIN_RATING: i64 = 1;

/// Upper rating bound used when a rating node does not specify one.
pub const DEFAULT_MAX_RATING: i64 = 5;

/// Kind of input a node asks for. Each kind has its own answer shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    YesNo,
    ShortAnswer,
    Paragraph,
    MultipleChoice,
    Checkboxes,
    Rating,
}

impl QuestionType {
    /// Returns true if answers are picked from the node's options.
    pub fn uses_options(&self) -> bool {
        matches!(self, QuestionType::MultipleChoice | QuestionType::Checkboxes)
    }

    /// Returns true if answers are free text.
    pub fn is_text(&self) -> bool {
        matches!(self, QuestionType::ShortAnswer | QuestionType::Paragraph)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QuestionType::YesNo => "yes_no",
            QuestionType::ShortAnswer => "short_answer",
            QuestionType::Paragraph => "paragraph",
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::Checkboxes => "checkboxes",
            QuestionType::Rating => "rating",
        };
        write!(f, "{}", s)
    }
}

/// One selectable option of a multiple choice or checkboxes node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyOption {
    pub value: String,
    pub label: String,
}

/// Comparison a branch applies to the recorded answer.
///
/// Operators the evaluator does not know deserialize to `Unknown` and never
/// match, so a newer survey definition cannot break an older client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    Contains,
    Gt,
    Lt,
    Gte,
    Lte,
    #[serde(other)]
    Unknown,
}

/// Condition half of a branch: operator plus a loosely-typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchCondition {
    #[serde(rename = "type")]
    pub operator: ConditionOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl BranchCondition {
    pub fn new(operator: ConditionOperator, value: impl Into<Value>) -> Self {
        Self {
            operator,
            value: Some(value.into()),
        }
    }

    /// Condition value as text; numbers and booleans are stringified.
    pub fn value_text(&self) -> Option<String> {
        match self.value.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Condition value as an integer, when it is integral.
    pub fn value_integer(&self) -> Option<i64> {
        match self.value.as_ref()? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// Condition value as a number; numeric strings are parsed.
    pub fn value_number(&self) -> Option<f64> {
        match self.value.as_ref()? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

/// Conditional edge from a node to a successor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub condition: BranchCondition,
    #[serde(default, deserialize_with = "optional_node_id")]
    pub next_node_id: Option<NodeId>,
}

impl Branch {
    pub fn new(condition: BranchCondition, next_node_id: NodeId) -> Self {
        Self {
            condition,
            next_node_id: Some(next_node_id),
        }
    }
}

/// One question or result step of a survey's decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyNode {
    pub id: NodeId,

    #[serde(default, deserialize_with = "optional_node_id")]
    pub parent_id: Option<NodeId>,

    pub question_type: QuestionType,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub options: Vec<SurveyOption>,

    #[serde(default)]
    pub min_rating: Option<i64>,

    #[serde(default)]
    pub max_rating: Option<i64>,

    #[serde(default = "default_is_required")]
    pub is_required: bool,

    #[serde(default, deserialize_with = "optional_node_id")]
    pub answer_yes_node_id: Option<NodeId>,

    #[serde(default, deserialize_with = "optional_node_id")]
    pub answer_no_node_id: Option<NodeId>,

    #[serde(default)]
    pub branches: Vec<Branch>,

    #[serde(default, deserialize_with = "optional_node_id")]
    pub next_node_id: Option<NodeId>,

    #[serde(default)]
    pub result_message: Option<String>,

    #[serde(default)]
    pub sort_order: i64,
}

fn default_is_required() -> bool {
    true
}

/// Reads an optional node reference. Null, missing and blank ids all mean
/// "not set".
fn optional_node_id<'de, D>(deserializer: D) -> Result<Option<NodeId>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(id) if !id.trim().is_empty() => NodeId::new(id)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

impl SurveyNode {
    /// Creates a required node with no routing and no options.
    pub fn new(id: NodeId, question_type: QuestionType) -> Self {
        Self {
            id,
            parent_id: None,
            question_type,
            title: String::new(),
            description: None,
            options: Vec::new(),
            min_rating: None,
            max_rating: None,
            is_required: true,
            answer_yes_node_id: None,
            answer_no_node_id: None,
            branches: Vec::new(),
            next_node_id: None,
            result_message: None,
            sort_order: 0,
        }
    }

    /// Returns true if the node only displays a result message.
    pub fn is_result(&self) -> bool {
        self.result_message.is_some()
    }

    /// Inclusive rating bounds, falling back to 1..=5.
    pub fn rating_bounds(&self) -> (i64, i64) {
        (
            self.min_rating.unwrap_or(DEFAULT_MIN_RATING),
            self.max_rating.unwrap_or(DEFAULT_MAX_RATING),
        )
    }

    /// Checks that `answer` has the shape this node's question type expects.
    ///
    /// Ratings must fall inside [`rating_bounds`](Self::rating_bounds). When
    /// the node lists options, selections must come from them.
    pub fn check_answer(&self, answer: &Answer) -> Result<(), ValidationError> {
        match (self.question_type, answer) {
            (QuestionType::YesNo, Answer::YesNo(_)) => Ok(()),
            (QuestionType::YesNo, Answer::Text(text))
                if text.trim().eq_ignore_ascii_case("yes")
                    || text.trim().eq_ignore_ascii_case("no") =>
            {
                Ok(())
            }
            (QuestionType::Rating, Answer::Rating(rating)) => {
                let (min, max) = self.rating_bounds();
                if (min..=max).contains(rating) {
                    Ok(())
                } else {
                    Err(ValidationError::out_of_range("rating", min, max, *rating))
                }
            }
            (QuestionType::ShortAnswer | QuestionType::Paragraph, Answer::Text(_)) => Ok(()),
            (QuestionType::MultipleChoice, Answer::Options(selected)) if selected.len() > 1 => {
                Err(ValidationError::invalid_format(
                    "answer",
                    "multiple_choice accepts a single option",
                ))
            }
            (QuestionType::MultipleChoice | QuestionType::Checkboxes, Answer::Options(selected)) => {
                match selected
                    .iter()
                    .find(|value| !self.options.is_empty() && self.option_label(value).is_none())
                {
                    Some(unknown) => Err(ValidationError::invalid_format(
                        "answer",
                        format!("'{}' is not an option of this question", unknown),
                    )),
                    None => Ok(()),
                }
            }
            (question_type, _) => Err(ValidationError::invalid_format(
                "answer",
                format!("answer shape does not fit a {} question", question_type),
            )),
        }
    }

    /// Looks up the label of an option value.
    pub fn option_label(&self, value: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }

    // Builder helpers, mostly used to assemble surveys in code.

    pub fn with_parent(mut self, parent_id: NodeId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push(SurveyOption {
            value: value.into(),
            label: label.into(),
        });
        self
    }

    pub fn with_rating_bounds(mut self, min: i64, max: i64) -> Self {
        self.min_rating = Some(min);
        self.max_rating = Some(max);
        self
    }

    pub fn optional(mut self) -> Self {
        self.is_required = false;
        self
    }

    pub fn with_yes_no_routing(mut self, yes: Option<NodeId>, no: Option<NodeId>) -> Self {
        self.answer_yes_node_id = yes;
        self.answer_no_node_id = no;
        self
    }

    pub fn with_branch(mut self, condition: BranchCondition, next: NodeId) -> Self {
        self.branches.push(Branch::new(condition, next));
        self
    }

    pub fn with_next(mut self, next: NodeId) -> Self {
        self.next_node_id = Some(next);
        self
    }

    pub fn with_result(mut self, message: impl Into<String>) -> Self {
        self.result_message = Some(message.into());
        self
    }

    pub fn with_sort_order(mut self, sort_order: i64) -> Self {
        self.sort_order = sort_order;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nid(s: &str) -> NodeId {
        NodeId::new(s).unwrap()
    }

    #[test]
    fn deserializes_minimal_node_with_defaults() {
        let node: SurveyNode = serde_json::from_value(json!({
            "id": "n1",
            "questionType": "short_answer"
        }))
        .unwrap();

        assert_eq!(node.id, nid("n1"));
        assert_eq!(node.question_type, QuestionType::ShortAnswer);
        assert!(node.is_required);
        assert!(node.parent_id.is_none());
        assert!(node.branches.is_empty());
        assert_eq!(node.rating_bounds(), (1, 5));
    }

    #[test]
    fn deserializes_branches_and_legacy_routing() {
        let node: SurveyNode = serde_json::from_value(json!({
            "id": "n1",
            "questionType": "yes_no",
            "parentId": null,
            "isRequired": false,
            "answerYesNodeId": "n2",
            "answerNoNodeId": "n3",
            "branches": [
                { "condition": { "type": "equals", "value": "yes" }, "nextNodeId": "n4" }
            ],
            "nextNodeId": "n5",
            "sortOrder": 3
        }))
        .unwrap();

        assert!(!node.is_required);
        assert_eq!(node.answer_yes_node_id, Some(nid("n2")));
        assert_eq!(node.answer_no_node_id, Some(nid("n3")));
        assert_eq!(node.branches[0].condition.operator, ConditionOperator::Equals);
        assert_eq!(node.branches[0].next_node_id, Some(nid("n4")));
        assert_eq!(node.next_node_id, Some(nid("n5")));
        assert_eq!(node.sort_order, 3);
    }

    #[test]
    fn unknown_condition_type_deserializes_as_unknown() {
        let branch: Branch = serde_json::from_value(json!({
            "condition": { "type": "regex", "value": "^a" },
            "nextNodeId": "n2"
        }))
        .unwrap();

        assert_eq!(branch.condition.operator, ConditionOperator::Unknown);
    }

    #[test]
    fn condition_value_coercions() {
        let numeric = BranchCondition::new(ConditionOperator::Equals, 3);
        assert_eq!(numeric.value_text().as_deref(), Some("3"));
        assert_eq!(numeric.value_number(), Some(3.0));

        let text = BranchCondition::new(ConditionOperator::Equals, " 4 ");
        assert_eq!(text.value_number(), Some(4.0));

        let missing = BranchCondition {
            operator: ConditionOperator::Gt,
            value: None,
        };
        assert!(missing.value_text().is_none());
        assert!(missing.value_number().is_none());

        let object = BranchCondition::new(ConditionOperator::Equals, json!({"a": 1}));
        assert!(object.value_text().is_none());
    }

    #[test]
    fn blank_node_references_read_as_unset() {
        let node: SurveyNode = serde_json::from_value(json!({
            "id": "q",
            "questionType": "yes_no",
            "parentId": "",
            "answerYesNodeId": "",
            "answerNoNodeId": "  ",
            "nextNodeId": "end",
            "branches": [ { "condition": { "type": "equals", "value": "yes" }, "nextNodeId": "" } ]
        }))
        .unwrap();

        assert!(node.parent_id.is_none());
        assert!(node.answer_yes_node_id.is_none());
        assert!(node.answer_no_node_id.is_none());
        assert!(node.branches[0].next_node_id.is_none());
        assert_eq!(node.next_node_id, Some(nid("end")));
    }

    #[test]
    fn blank_node_id_is_rejected() {
        let result = serde_json::from_value::<SurveyNode>(json!({
            "id": "",
            "questionType": "rating"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn rating_outside_bounds_is_rejected() {
        let node = SurveyNode::new(nid("rate"), QuestionType::Rating).with_rating_bounds(1, 5);

        assert!(node.check_answer(&Answer::Rating(5)).is_ok());
        assert_eq!(
            node.check_answer(&Answer::Rating(99)),
            Err(ValidationError::out_of_range("rating", 1, 5, 99))
        );
        assert!(node.check_answer(&Answer::Rating(0)).is_err());
    }

    #[test]
    fn answer_shape_must_match_question_type() {
        let rating = SurveyNode::new(nid("rate"), QuestionType::Rating);
        assert!(rating.check_answer(&Answer::text("five")).is_err());

        let yes_no = SurveyNode::new(nid("yn"), QuestionType::YesNo);
        assert!(yes_no.check_answer(&Answer::YesNo(false)).is_ok());
        assert!(yes_no.check_answer(&Answer::text(" Yes ")).is_ok());
        assert!(yes_no.check_answer(&Answer::text("maybe")).is_err());
        assert!(yes_no.check_answer(&Answer::Rating(1)).is_err());

        let text = SurveyNode::new(nid("t"), QuestionType::Paragraph);
        assert!(text.check_answer(&Answer::text("fine")).is_ok());
        assert!(text.check_answer(&Answer::YesNo(true)).is_err());
    }

    #[test]
    fn option_answers_must_come_from_the_node() {
        let single = SurveyNode::new(nid("one"), QuestionType::MultipleChoice)
            .with_option("a", "A")
            .with_option("b", "B");
        assert!(single.check_answer(&Answer::options(["a"])).is_ok());
        assert!(single.check_answer(&Answer::options(["a", "b"])).is_err());
        assert!(single.check_answer(&Answer::options(["z"])).is_err());

        let many = SurveyNode::new(nid("many"), QuestionType::Checkboxes)
            .with_option("a", "A")
            .with_option("b", "B");
        assert!(many.check_answer(&Answer::options(["a", "b"])).is_ok());

        let open = SurveyNode::new(nid("open"), QuestionType::Checkboxes);
        assert!(open.check_answer(&Answer::options(["anything"])).is_ok());
    }

    #[test]
    fn integral_condition_values() {
        let big = BranchCondition::new(ConditionOperator::Gte, 9_007_199_254_740_993_i64);
        assert_eq!(big.value_integer(), Some(9_007_199_254_740_993));
        assert_eq!(BranchCondition::new(ConditionOperator::Gte, "7").value_integer(), Some(7));
        assert_eq!(BranchCondition::new(ConditionOperator::Gte, 2.5).value_integer(), None);
    }

    #[test]
    fn option_label_lookup() {
        let node = SurveyNode::new(nid("n1"), QuestionType::Checkboxes)
            .with_option("a", "Apples")
            .with_option("b", "Bananas");

        assert_eq!(node.option_label("b"), Some("Bananas"));
        assert_eq!(node.option_label("z"), None);
        assert!(node.question_type.uses_options());
    }
}
