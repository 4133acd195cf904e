//! Submission assembly: turns recorded answers into the wire payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::Answer;
use crate::domain::foundation::{Fingerprint, NodeId, SurveyId};

/// Who is answering, attached to every submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Respondent {
    pub fingerprint: Fingerprint,
    pub external_user_id: Option<String>,
    pub metadata: Option<Map<String, Value>>,
}

impl Respondent {
    pub fn anonymous(fingerprint: Fingerprint) -> Self {
        Self {
            fingerprint,
            external_user_id: None,
            metadata: None,
        }
    }

    pub fn with_external_user_id(mut self, id: impl Into<String>) -> Self {
        self.external_user_id = Some(id.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// One answered node on the wire. Only the field matching the answer's
/// shape is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub node_id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_rating: Option<i64>,
}

impl AnswerRecord {
    pub fn new(node_id: NodeId, answer: &Answer) -> Self {
        let mut record = Self {
            node_id,
            answer: None,
            answer_text: None,
            answer_options: None,
            answer_rating: None,
        };
        match answer {
            Answer::YesNo(b) => record.answer = Some(*b),
            Answer::Text(t) => record.answer_text = Some(t.clone()),
            Answer::Options(o) => record.answer_options = Some(o.clone()),
            Answer::Rating(r) => record.answer_rating = Some(*r),
        }
        record
    }

    /// Recovers the answer carried by this record, if any field is set.
    pub fn to_answer(&self) -> Option<Answer> {
        if let Some(b) = self.answer {
            return Some(Answer::YesNo(b));
        }
        if let Some(t) = &self.answer_text {
            return Some(Answer::Text(t.clone()));
        }
        if let Some(o) = &self.answer_options {
            return Some(Answer::Options(o.clone()));
        }
        self.answer_rating.map(Answer::Rating)
    }
}

/// Body posted to the response endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub survey_id: SurveyId,
    pub fingerprint: Fingerprint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    pub answers: Vec<AnswerRecord>,
}

/// What the response endpoint returns on success.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    #[serde(default)]
    pub success_message: Option<String>,
}

impl SubmissionReceipt {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            success_message: Some(message.into()),
        }
    }
}

/// Builds the submission payload from the recorded answers.
///
/// One record per answered node, ordered by node id. Nodes without an
/// answer never appear.
pub fn build_submission(
    answers: &BTreeMap<NodeId, Answer>,
    survey_id: &SurveyId,
    fingerprint: &Fingerprint,
    external_user_id: Option<&str>,
    metadata: Option<&Map<String, Value>>,
) -> SubmissionPayload {
    SubmissionPayload {
        survey_id: survey_id.clone(),
        fingerprint: fingerprint.clone(),
        external_user_id: external_user_id.map(str::to_string),
        metadata: metadata.cloned(),
        answers: answers
            .iter()
            .map(|(id, answer)| AnswerRecord::new(id.clone(), answer))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nid(s: &str) -> NodeId {
        NodeId::new(s).unwrap()
    }

    fn survey_id() -> SurveyId {
        SurveyId::new("s1").unwrap()
    }

    fn fingerprint() -> Fingerprint {
        Fingerprint::new("fp-123").unwrap()
    }

    #[test]
    fn one_record_per_answered_node_with_only_its_field() {
        let mut answers = BTreeMap::new();
        answers.insert(nid("a_yes"), Answer::YesNo(true));
        answers.insert(nid("b_text"), Answer::text("great"));
        answers.insert(nid("c_opts"), Answer::options(["x", "y"]));
        answers.insert(nid("d_rate"), Answer::Rating(4));

        let payload = build_submission(&answers, &survey_id(), &fingerprint(), None, None);
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            value,
            json!({
                "surveyId": "s1",
                "fingerprint": "fp-123",
                "answers": [
                    { "nodeId": "a_yes", "answer": true },
                    { "nodeId": "b_text", "answerText": "great" },
                    { "nodeId": "c_opts", "answerOptions": ["x", "y"] },
                    { "nodeId": "d_rate", "answerRating": 4 }
                ]
            })
        );
    }

    #[test]
    fn empty_answers_produce_empty_record_list() {
        let payload = build_submission(&BTreeMap::new(), &survey_id(), &fingerprint(), None, None);
        assert!(payload.answers.is_empty());
    }

    #[test]
    fn carries_external_user_and_metadata() {
        let mut metadata = Map::new();
        metadata.insert("plan".to_string(), json!("pro"));

        let payload = build_submission(
            &BTreeMap::new(),
            &survey_id(),
            &fingerprint(),
            Some("user-7"),
            Some(&metadata),
        );
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["externalUserId"], json!("user-7"));
        assert_eq!(value["metadata"], json!({ "plan": "pro" }));
    }

    #[test]
    fn record_recovers_its_answer() {
        let record = AnswerRecord::new(nid("n1"), &Answer::Rating(2));
        assert_eq!(record.to_answer(), Some(Answer::Rating(2)));
    }

    #[test]
    fn receipt_tolerates_missing_message() {
        let receipt: SubmissionReceipt = serde_json::from_str("{}").unwrap();
        assert!(receipt.success_message.is_none());
    }
}
