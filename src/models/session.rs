use core::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{
    question::{QuestionId, QuestionType},
    submission::SubmissionResult,
};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    Empty,
    Active,
    Finished,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::Loading => write!(f, "loading"),
            SessionPhase::Empty => write!(f, "empty"),
            SessionPhase::Active => write!(f, "active"),
            SessionPhase::Finished => write!(f, "finished"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum QuestionPhase {
    Answering,
    Submitted,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionSummary {
    pub total_points: i64,
    pub correct_count: usize,
    pub submitted_count: usize,
    pub timed_out_count: usize,
    pub question_count: usize,
    pub accuracy: f64,
    pub best_combo: u32,
}

/// Outcome of a successful state-machine step, for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Loaded { question_count: usize },
    Empty,
    Answered { question_id: QuestionId },
    Submitted {
        question_id: QuestionId,
        result: SubmissionResult,
        combo: u32,
    },
    Moved { index: usize },
    Unchanged,
    Ticked { remaining: u32 },
    TimedOut { question_id: QuestionId },
    Finished(SessionSummary),
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TransitionError {
    #[error("Session is {0}, operation requires an active session")]
    NotActive(SessionPhase),

    #[error("Questions were already loaded for this session")]
    AlreadyLoaded,

    #[error("Question {0} was already submitted")]
    AlreadySubmitted(QuestionId),

    #[error("Question {0} has not been submitted yet")]
    NotSubmitted(QuestionId),

    #[error("A {got} answer does not fit a {expected} question")]
    MismatchedAnswer {
        expected: QuestionType,
        got: QuestionType,
    },

    #[error("Result for question {0} does not belong to the current question")]
    StaleResult(QuestionId),
}
