use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use chrono::NaiveDate;

use crate::{
    api::quiz_api::QuizApi,
    models::{
        error::QuizError,
        progress::{
            Achievement, RequirementType, StudentProgress, SubjectProgress, UserAchievement,
            UserLevel,
        },
        question::{Answer, Question, QuestionId, QuestionType, Subject, SubjectId},
        submission::SubmissionResult,
    },
    service::{evaluator, session_controller::SessionSettings},
};

fn question(id: QuestionId, question_type: QuestionType, text: &str) -> Question {
    Question {
        id,
        subject_id: 1,
        question_type,
        question_text: text.to_string(),
        options: None,
        correct_answer: None,
        explanation: None,
        points: 10,
        created_at: None,
        updated_at: None,
    }
}

pub fn multiple_choice(id: QuestionId, options: &[&str], selected: usize) -> Question {
    Question {
        options: Some(options.iter().map(|o| o.to_string()).collect()),
        correct_answer: Some(Answer::MultipleChoice { selected }),
        ..question(id, QuestionType::MultipleChoice, "Pick one")
    }
}

pub fn true_false(id: QuestionId, answer: bool) -> Question {
    Question {
        correct_answer: Some(Answer::TrueFalse { answer }),
        explanation: Some(String::from("Because it is")),
        ..question(id, QuestionType::TrueFalse, "True or false?")
    }
}

pub fn fill_blank(id: QuestionId, text: &str, fills: &[(&str, &str)]) -> Question {
    Question {
        correct_answer: Some(Answer::FillBlank { fills: fills_of(fills) }),
        ..question(id, QuestionType::FillBlank, text)
    }
}

pub fn drag_drop(id: QuestionId, options: &[&str], order: &[usize]) -> Question {
    Question {
        options: Some(options.iter().map(|o| o.to_string()).collect()),
        correct_answer: Some(Answer::DragDrop {
            order: order.to_vec(),
        }),
        ..question(id, QuestionType::DragDrop, "Put these in order")
    }
}

pub fn fills_of(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Three questions worth 10, 20 and 30 points.
pub fn sample_questions() -> Vec<Question> {
    let mut questions = vec![
        multiple_choice(1, &["Jakarta", "Bandung", "Surabaya"], 0),
        true_false(2, true),
        drag_drop(3, &["A", "B", "C"], &[0, 1, 2]),
    ];
    questions[1].points = 20;
    questions[2].points = 30;
    questions
}

pub fn settings(question_time: u32) -> SessionSettings {
    SessionSettings {
        question_time,
        tick_period: Duration::from_secs(1),
    }
}

pub fn achievement(id: i64, name: &str, requirement_type: RequirementType) -> Achievement {
    Achievement {
        id,
        name: name.to_string(),
        description: format!("{} description", name),
        icon: String::from("*"),
        requirement_type,
        requirement_value: 5,
    }
}

pub fn level(level: i32, total_experience: i64) -> UserLevel {
    UserLevel {
        level,
        total_experience,
        current_streak: 2,
        max_streak: 4,
        total_correct: 12,
        total_questions: 20,
        experience_to_next_level: None,
    }
}

pub fn unlocked_at() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("valid date")
}

/// Grades with the local evaluator, so answers keyed correctly earn the
/// question's points.
pub struct FakeApi {
    questions: Vec<Question>,
    subject_found: bool,
    failing_submissions: AtomicUsize,
    submit_calls: AtomicUsize,
    level_up_on: Option<QuestionId>,
}

impl FakeApi {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            subject_found: true,
            failing_submissions: AtomicUsize::new(0),
            submit_calls: AtomicUsize::new(0),
            level_up_on: None,
        }
    }

    pub fn missing_subject() -> Self {
        Self {
            subject_found: false,
            ..Self::new(vec![])
        }
    }

    pub fn level_up_on(mut self, question_id: QuestionId) -> Self {
        self.level_up_on = Some(question_id);
        self
    }

    pub fn fail_next_submissions(&self, count: usize) {
        self.failing_submissions.store(count, Ordering::SeqCst);
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }
}

impl QuizApi for FakeApi {
    async fn fetch_subjects(&self) -> Result<Vec<Subject>, QuizError> {
        Ok(vec![Subject {
            id: 1,
            name: String::from("Geography"),
            description: None,
            created_at: None,
        }])
    }

    async fn fetch_questions(&self, subject_id: SubjectId) -> Result<Vec<Question>, QuizError> {
        if !self.subject_found {
            return Err(QuizError::NotFound(format!("subject {}", subject_id)));
        }
        Ok(self.questions.clone())
    }

    async fn submit_answer(
        &self,
        question_id: QuestionId,
        answer: &Answer,
    ) -> Result<SubmissionResult, QuizError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);

        let failing = self.failing_submissions.load(Ordering::SeqCst);
        if failing > 0 {
            self.failing_submissions.store(failing - 1, Ordering::SeqCst);
            return Err(QuizError::Network(String::from("connection reset")));
        }

        let question = self
            .questions
            .iter()
            .find(|q| q.id == question_id)
            .ok_or_else(|| QuizError::NotFound(format!("question {}", question_id)))?;

        let is_correct =
            evaluator::evaluate(question, Some(answer)) == Some(evaluator::Verdict::Correct);
        let points_earned = if is_correct { question.points } else { 0 };

        let mut result = SubmissionResult::graded(is_correct, points_earned);
        result.question_id = Some(question_id);
        if self.level_up_on == Some(question_id) {
            result.level_up = true;
            result.new_level = Some(2);
        }
        Ok(result)
    }

    async fn fetch_level(&self) -> Result<UserLevel, QuizError> {
        Ok(level(2, 250))
    }

    async fn fetch_achievements(&self) -> Result<Vec<UserAchievement>, QuizError> {
        Ok(vec![UserAchievement {
            id: 7,
            achievement: achievement(1, "First steps", RequirementType::TotalCorrect),
            unlocked_at: unlocked_at(),
        }])
    }

    async fn fetch_available_achievements(&self) -> Result<Vec<Achievement>, QuizError> {
        Ok(vec![
            achievement(1, "First steps", RequirementType::TotalCorrect),
            achievement(2, "On fire", RequirementType::Streak),
        ])
    }

    async fn fetch_progress(&self) -> Result<StudentProgress, QuizError> {
        Ok(StudentProgress {
            total_questions_attempted: 20,
            total_correct: 12,
            total_points: 250,
            accuracy: 60.0,
            subjects: vec![SubjectProgress {
                subject_id: 1,
                subject_name: String::from("Geography"),
                total_questions: 20,
                correct_answers: 12,
                total_points: 250,
                accuracy: 60.0,
            }],
        })
    }
}
