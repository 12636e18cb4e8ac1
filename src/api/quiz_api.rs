use std::{future::Future, sync::Arc};

use crate::models::{
    error::QuizError,
    progress::{Achievement, StudentProgress, UserAchievement, UserLevel},
    question::{Answer, Question, QuestionId, Subject, SubjectId},
    submission::SubmissionResult,
};

/// The external quiz service: question source, grading service and the
/// progress endpoints.
pub trait QuizApi {
    fn fetch_subjects(&self) -> impl Future<Output = Result<Vec<Subject>, QuizError>> + Send;

    fn fetch_questions(
        &self,
        subject_id: SubjectId,
    ) -> impl Future<Output = Result<Vec<Question>, QuizError>> + Send;

    fn submit_answer(
        &self,
        question_id: QuestionId,
        answer: &Answer,
    ) -> impl Future<Output = Result<SubmissionResult, QuizError>> + Send;

    fn fetch_level(&self) -> impl Future<Output = Result<UserLevel, QuizError>> + Send;

    fn fetch_achievements(
        &self,
    ) -> impl Future<Output = Result<Vec<UserAchievement>, QuizError>> + Send;

    fn fetch_available_achievements(
        &self,
    ) -> impl Future<Output = Result<Vec<Achievement>, QuizError>> + Send;

    fn fetch_progress(&self) -> impl Future<Output = Result<StudentProgress, QuizError>> + Send;
}

impl<T> QuizApi for Arc<T>
where
    T: QuizApi + Send + Sync,
{
    fn fetch_subjects(&self) -> impl Future<Output = Result<Vec<Subject>, QuizError>> + Send {
        self.as_ref().fetch_subjects()
    }

    fn fetch_questions(
        &self,
        subject_id: SubjectId,
    ) -> impl Future<Output = Result<Vec<Question>, QuizError>> + Send {
        self.as_ref().fetch_questions(subject_id)
    }

    fn submit_answer(
        &self,
        question_id: QuestionId,
        answer: &Answer,
    ) -> impl Future<Output = Result<SubmissionResult, QuizError>> + Send {
        self.as_ref().submit_answer(question_id, answer)
    }

    fn fetch_level(&self) -> impl Future<Output = Result<UserLevel, QuizError>> + Send {
        self.as_ref().fetch_level()
    }

    fn fetch_achievements(
        &self,
    ) -> impl Future<Output = Result<Vec<UserAchievement>, QuizError>> + Send {
        self.as_ref().fetch_achievements()
    }

    fn fetch_available_achievements(
        &self,
    ) -> impl Future<Output = Result<Vec<Achievement>, QuizError>> + Send {
        self.as_ref().fetch_available_achievements()
    }

    fn fetch_progress(&self) -> impl Future<Output = Result<StudentProgress, QuizError>> + Send {
        self.as_ref().fetch_progress()
    }
}
