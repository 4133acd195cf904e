//! Survey metadata and the definition returned by a survey reader.

use serde::{Deserialize, Serialize};

use super::SurveyNode;
use crate::domain::foundation::{SurveyId, SurveySlug};

/// Survey-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    pub id: SurveyId,
    pub slug: SurveySlug,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Shown after a successful submission when the server sends none.
    #[serde(default)]
    pub success_message: Option<String>,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

fn default_is_active() -> bool {
    true
}

impl Survey {
    pub fn new(id: SurveyId, slug: SurveySlug) -> Self {
        Self {
            id,
            slug,
            title: String::new(),
            description: None,
            success_message: None,
            is_active: true,
        }
    }
}

/// A survey together with its node records, as fetched once per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyDefinition {
    pub survey: Survey,
    #[serde(default)]
    pub nodes: Vec<SurveyNode>,
}
