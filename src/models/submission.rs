use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::question::{Answer, QuestionId};

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitAnswerRequest {
    pub question_id: QuestionId,
    pub answer: Answer,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SubmissionResult {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub question_id: Option<QuestionId>,
    pub is_correct: bool,
    pub points_earned: i64,
    #[serde(default, deserialize_with = "null_as_false")]
    pub level_up: bool,
    #[serde(default)]
    pub new_level: Option<i32>,
    #[serde(default)]
    pub submitted_at: Option<NaiveDateTime>,
}

impl SubmissionResult {
    #[cfg(test)]
    pub fn graded(is_correct: bool, points_earned: i64) -> Self {
        Self {
            id: None,
            question_id: None,
            is_correct,
            points_earned,
            level_up: false,
            new_level: None,
            submitted_at: None,
        }
    }
}
