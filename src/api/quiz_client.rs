use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error};

use crate::{
    api::quiz_api::QuizApi,
    models::{
        error::QuizError,
        progress::{Achievement, StudentProgress, UserAchievement, UserLevel},
        question::{Answer, Question, QuestionId, Subject, SubjectId},
        submission::{SubmissionResult, SubmitAnswerRequest},
    },
};

#[derive(Debug, thiserror::Error)]
pub enum QuizClientError {
    #[error("Http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Api error: {0} - {1}")]
    ApiError(StatusCode, String),

    #[error("Failed to serialize object: {0}")]
    Serialize(#[from] serde_json::Error),
}

// FastAPI style error bodies carry the message under `detail`.
fn detail_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from))
        .unwrap_or_else(|| body.to_string())
}

#[derive(Debug, Clone)]
pub struct QuizClient {
    domain: String,
    token: Option<String>,
    client: Client,
}

impl QuizClient {
    pub fn new(domain: impl Into<String>, timeout: Duration) -> Result<Self, QuizClientError> {
        let domain = domain.into().trim_end_matches('/').to_string();
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            domain,
            token: None,
            client,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.domain, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, QuizClientError> {
        let response = self.authorize(request).send().await?;

        let status = response.status();
        let body = response.text().await.unwrap_or("No response body".into());
        if !status.is_success() {
            error!("QuizClient request failed: {} - {}", status, body);
            return Err(QuizClientError::ApiError(status, detail_message(&body)));
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, QuizClientError> {
        let url = self.url(path);
        debug!("GET {}", url);
        self.send(self.client.get(&url)).await
    }

    async fn post<B, T>(&self, path: &str, payload: &B) -> Result<T, QuizClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("POST {}", url);
        let request = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(payload);
        self.send(request).await
    }

    pub async fn health_check(&self) -> Result<(), QuizClientError> {
        let response = self.client.get(self.url("health")).send().await?;
        if !response.status().is_success() {
            return Err(QuizClientError::ApiError(
                StatusCode::SERVICE_UNAVAILABLE,
                "Failed to reach quiz api".into(),
            ));
        }

        Ok(())
    }
}

impl QuizApi for QuizClient {
    async fn fetch_subjects(&self) -> Result<Vec<Subject>, QuizError> {
        Ok(self.get("quizzes/subjects").await?)
    }

    async fn fetch_questions(&self, subject_id: SubjectId) -> Result<Vec<Question>, QuizError> {
        let path = format!("quizzes/subjects/{}/questions", subject_id);
        Ok(self.get(&path).await?)
    }

    async fn submit_answer(
        &self,
        question_id: QuestionId,
        answer: &Answer,
    ) -> Result<SubmissionResult, QuizError> {
        let payload = SubmitAnswerRequest {
            question_id,
            answer: answer.clone(),
        };
        Ok(self.post("quizzes/submit", &payload).await?)
    }

    async fn fetch_level(&self) -> Result<UserLevel, QuizError> {
        Ok(self.get("students/level").await?)
    }

    async fn fetch_achievements(&self) -> Result<Vec<UserAchievement>, QuizError> {
        Ok(self.get("students/achievements").await?)
    }

    async fn fetch_available_achievements(&self) -> Result<Vec<Achievement>, QuizError> {
        Ok(self.get("students/achievements/available").await?)
    }

    async fn fetch_progress(&self) -> Result<StudentProgress, QuizError> {
        Ok(self.get("students/progress").await?)
    }
}
