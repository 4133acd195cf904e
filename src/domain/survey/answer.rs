//! Recorded answers.

use serde::{Deserialize, Serialize};

/// Answer to a single node. Exactly one shape per answer; which one is
/// expected depends on the node's question type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// yes_no
    YesNo(bool),
    /// rating
    Rating(i64),
    /// short_answer and paragraph
    Text(String),
    /// multiple_choice (one element) and checkboxes
    Options(Vec<String>),
}

impl Answer {
    pub fn text(value: impl Into<String>) -> Self {
        Answer::Text(value.into())
    }

    pub fn options<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Answer::Options(values.into_iter().map(Into::into).collect())
    }

    /// Interprets the answer as a yes/no choice.
    ///
    /// A boolean `true` or the text "yes" (any case) counts as yes;
    /// everything else counts as no.
    pub fn is_yes(&self) -> bool {
        match self {
            Answer::YesNo(b) => *b,
            Answer::Text(t) => t.trim().eq_ignore_ascii_case("yes"),
            _ => false,
        }
    }

    /// Returns true if the answer carries no usable content.
    ///
    /// Blank text and an empty selection do not satisfy a required node.
    pub fn is_blank(&self) -> bool {
        match self {
            Answer::Text(t) => t.trim().is_empty(),
            Answer::Options(o) => o.is_empty(),
            Answer::YesNo(_) | Answer::Rating(_) => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Answer::YesNo(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Answer::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_options(&self) -> Option<&[String]> {
        match self {
            Answer::Options(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_rating(&self) -> Option<i64> {
        match self {
            Answer::Rating(r) => Some(*r),
            _ => None,
        }
    }
}

impl From<bool> for Answer {
    fn from(value: bool) -> Self {
        Answer::YesNo(value)
    }
}

impl From<i64> for Answer {
    fn from(value: i64) -> Self {
        Answer::Rating(value)
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Answer::Text(value.to_string())
    }
}

impl From<String> for Answer {
    fn from(value: String) -> Self {
        Answer::Text(value)
    }
}

impl From<Vec<String>> for Answer {
    fn from(value: Vec<String>) -> Self {
        Answer::Options(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_detection_accepts_bool_and_text() {
        assert!(Answer::YesNo(true).is_yes());
        assert!(!Answer::YesNo(false).is_yes());
        assert!(Answer::text(" Yes ").is_yes());
        assert!(!Answer::text("no").is_yes());
        assert!(!Answer::Rating(1).is_yes());
    }

    #[test]
    fn blank_answers() {
        assert!(Answer::text("   ").is_blank());
        assert!(Answer::Options(vec![]).is_blank());
        assert!(!Answer::YesNo(false).is_blank());
        assert!(!Answer::Rating(0).is_blank());
        assert!(!Answer::options(["a"]).is_blank());
    }

    #[test]
    fn untagged_deserialization_picks_shape_from_json_type() {
        let answers: Vec<Answer> = serde_json::from_str(r#"[true, 4, "hello", ["a", "b"]]"#).unwrap();
        assert_eq!(
            answers,
            vec![
                Answer::YesNo(true),
                Answer::Rating(4),
                Answer::text("hello"),
                Answer::options(["a", "b"]),
            ]
        );
    }
}
