use reqwest::StatusCode;
use thiserror::Error;
use tracing::{error, warn};

use crate::{api::quiz_client::QuizClientError, models::session::TransitionError};

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authorization error: {0}")]
    Auth(String),

    #[error("Api error: {0} - {1}")]
    Api(StatusCode, String),

    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Transition rejected: {0}")]
    Transition(#[from] TransitionError),
}

impl From<QuizClientError> for QuizError {
    fn from(value: QuizClientError) -> Self {
        match value {
            QuizClientError::Http(e) => QuizError::Network(e.to_string()),
            QuizClientError::Serialize(e) => QuizError::Json(e),
            QuizClientError::ApiError(status, message) => match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => QuizError::Auth(message),
                StatusCode::NOT_FOUND => QuizError::NotFound(message),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    QuizError::Validation(message)
                }
                _ => QuizError::Api(status, message),
            },
        }
    }
}

impl QuizError {
    /// Text shown to the student. Every variant is recoverable by retrying.
    pub fn user_message(&self) -> String {
        match self {
            QuizError::Network(e) => {
                error!("Quiz api unreachable: {}", e);
                String::from("Could not reach the quiz server, please try again")
            }
            QuizError::Validation(e) => {
                warn!("Rejected answer: {}", e);
                format!("Invalid answer: {}", e)
            }
            QuizError::NotFound(e) => {
                warn!("Entity not found: {}", e);
                format!("Not found: {}", e)
            }
            QuizError::Auth(e) => {
                warn!("Unauthorized request: {}", e);
                String::from("Your session has expired, please log in again")
            }
            QuizError::Api(sc, msg) => {
                error!("Api error: {} - {}", sc, msg);
                String::from("The quiz server failed to handle the request")
            }
            QuizError::Json(e) => {
                error!("Json error: {}", e);
                String::from("The quiz server sent an unreadable response")
            }
            QuizError::Transition(e) => {
                warn!("Transition rejected: {}", e);
                e.to_string()
            }
        }
    }
}
