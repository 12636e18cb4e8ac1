use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::question::SubjectId;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserLevel {
    pub level: i32,
    pub total_experience: i64,
    pub current_streak: i32,
    pub max_streak: i32,
    pub total_correct: i32,
    pub total_questions: i32,
    #[serde(default)]
    pub experience_to_next_level: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RequirementType {
    Streak,
    TotalCorrect,
    Level,
    TotalPoints,
    #[serde(other)]
    Other,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Achievement {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub requirement_type: RequirementType,
    pub requirement_value: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserAchievement {
    pub id: i64,
    pub achievement: Achievement,
    pub unlocked_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubjectProgress {
    pub subject_id: SubjectId,
    pub subject_name: String,
    pub total_questions: i64,
    pub correct_answers: i64,
    pub total_points: i64,
    pub accuracy: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StudentProgress {
    pub total_questions_attempted: i64,
    pub total_correct: i64,
    pub total_points: i64,
    pub accuracy: f64,
    pub subjects: Vec<SubjectProgress>,
}
