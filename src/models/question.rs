use core::fmt;
use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

pub type QuestionId = i64;
pub type SubjectId = i64;

fn default_points() -> i64 {
    10
}

#[derive(Debug, Serialize, Deserialize, Hash, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    FillBlank,
    DragDrop,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::TrueFalse => "true_false",
            QuestionType::FillBlank => "fill_blank",
            QuestionType::DragDrop => "drag_drop",
        }
    }

    pub fn uses_options(&self) -> bool {
        matches!(self, QuestionType::MultipleChoice | QuestionType::DragDrop)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestionType::MultipleChoice => write!(f, "Multiple choice"),
            QuestionType::TrueFalse => write!(f, "True/False"),
            QuestionType::FillBlank => write!(f, "Fill in the blank"),
            QuestionType::DragDrop => write!(f, "Drag & drop"),
        }
    }
}

/// A student's response to one question. The wire shape is the bare object
/// (`{"selected": 2}`, `{"order": [1, 0]}`), so the variant is recovered
/// from whichever key is present.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Answer {
    MultipleChoice { selected: usize },
    TrueFalse { answer: bool },
    FillBlank { fills: BTreeMap<String, String> },
    DragDrop { order: Vec<usize> },
}

impl Answer {
    pub fn question_type(&self) -> QuestionType {
        match self {
            Answer::MultipleChoice { .. } => QuestionType::MultipleChoice,
            Answer::TrueFalse { .. } => QuestionType::TrueFalse,
            Answer::FillBlank { .. } => QuestionType::FillBlank,
            Answer::DragDrop { .. } => QuestionType::DragDrop,
        }
    }
}

// Malformed answer keys from the server only disable local preview.
fn lenient_answer<'de, D>(deserializer: D) -> Result<Option<Answer>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Question {
    pub id: QuestionId,
    pub subject_id: SubjectId,
    pub question_type: QuestionType,
    pub question_text: String,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_answer")]
    pub correct_answer: Option<Answer>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default = "default_points")]
    pub points: i64,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Question {
    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}
