use std::collections::HashMap;

use tracing::{debug, info};

use crate::{
    models::{
        error::QuizError,
        question::{Answer, Question, QuestionId, SubjectId},
        session::{QuestionPhase, SessionPhase, SessionSummary, Transition, TransitionError},
        submission::SubmissionResult,
    },
    service::evaluator::{self, Verdict},
};

/// Everything one student's pass through a subject owns. All mutation goes
/// through the transition methods below; the async controller wraps them
/// with the network calls and the countdown task.
#[derive(Debug)]
pub struct QuizSessionState {
    subject_id: SubjectId,
    phase: SessionPhase,
    questions: Vec<Question>,
    current: usize,
    answers: HashMap<QuestionId, Answer>,
    results: HashMap<QuestionId, SubmissionResult>,
    timed_out: Vec<QuestionId>,
    score: i64,
    combo: u32,
    best_combo: u32,
    latest_level: Option<i32>,
    question_time: u32,
    countdown: u32,
}

impl QuizSessionState {
    pub fn new(subject_id: SubjectId, question_time: u32) -> Self {
        Self {
            subject_id,
            phase: SessionPhase::Loading,
            questions: vec![],
            current: 0,
            answers: HashMap::new(),
            results: HashMap::new(),
            timed_out: vec![],
            score: 0,
            combo: 0,
            best_combo: 0,
            latest_level: None,
            question_time,
            countdown: question_time,
        }
    }

    pub fn subject_id(&self) -> SubjectId {
        self.subject_id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn question_time(&self) -> u32 {
        self.question_time
    }

    pub fn latest_level(&self) -> Option<i32> {
        self.latest_level
    }

    pub fn answer(&self, question_id: QuestionId) -> Option<&Answer> {
        self.answers.get(&question_id)
    }

    pub fn result(&self, question_id: QuestionId) -> Option<&SubmissionResult> {
        self.results.get(&question_id)
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            SessionPhase::Active => self.questions.get(self.current),
            _ => None,
        }
    }

    pub fn question_phase(&self) -> Option<QuestionPhase> {
        let question = self.current_question()?;
        match self.results.contains_key(&question.id) {
            true => Some(QuestionPhase::Submitted),
            false => Some(QuestionPhase::Answering),
        }
    }

    /// The countdown only runs while the current question awaits an answer.
    pub fn timer_should_run(&self) -> bool {
        self.question_phase() == Some(QuestionPhase::Answering)
    }

    /// Local feedback for the current question, if it has an answer key.
    pub fn preview(&self) -> Option<Verdict> {
        let question = self.current_question()?;
        evaluator::evaluate(question, self.answers.get(&question.id))
    }

    fn require_active(&self) -> Result<&Question, TransitionError> {
        self.current_question()
            .ok_or(TransitionError::NotActive(self.phase))
    }

    fn require_answering(&self) -> Result<&Question, TransitionError> {
        let question = self.require_active()?;
        if self.results.contains_key(&question.id) {
            return Err(TransitionError::AlreadySubmitted(question.id));
        }
        Ok(question)
    }

    pub fn load(&mut self, questions: Vec<Question>) -> Result<Transition, QuizError> {
        if self.phase != SessionPhase::Loading {
            return Err(TransitionError::AlreadyLoaded.into());
        }

        if questions.is_empty() {
            info!("Subject {} has no questions", self.subject_id);
            self.phase = SessionPhase::Empty;
            return Ok(Transition::Empty);
        }

        let question_count = questions.len();
        debug!("Loaded {} questions for subject {}", question_count, self.subject_id);
        self.questions = questions;
        self.current = 0;
        self.countdown = self.question_time;
        self.phase = SessionPhase::Active;
        Ok(Transition::Loaded { question_count })
    }

    pub fn set_answer(&mut self, answer: Answer) -> Result<Transition, QuizError> {
        let question = self.require_answering()?;
        if answer.question_type() != question.question_type {
            return Err(TransitionError::MismatchedAnswer {
                expected: question.question_type,
                got: answer.question_type(),
            }
            .into());
        }

        let question_id = question.id;
        self.answers.insert(question_id, answer);
        Ok(Transition::Answered { question_id })
    }

    /// The `(question_id, answer)` pair to send for the current question.
    /// Nothing is mutated; the question stays answering until
    /// [`record_result`](Self::record_result) succeeds.
    pub fn prepare_submission(&self) -> Result<(QuestionId, Answer), QuizError> {
        let question = self.require_answering()?;
        let Some(answer) = self.answers.get(&question.id) else {
            return Err(QuizError::Validation(String::from(
                "Choose an answer before submitting",
            )));
        };

        evaluator::validate_shape(question, answer).map_err(QuizError::Validation)?;
        Ok((question.id, answer.clone()))
    }

    pub fn record_result(
        &mut self,
        question_id: QuestionId,
        result: SubmissionResult,
    ) -> Result<Transition, QuizError> {
        let question = self.require_answering()?;
        if question.id != question_id {
            return Err(TransitionError::StaleResult(question_id).into());
        }

        self.score += result.points_earned;
        match result.is_correct {
            true => {
                self.combo += 1;
                self.best_combo = self.best_combo.max(self.combo);
            }
            false => self.combo = 0,
        }
        if result.level_up {
            self.latest_level = result.new_level;
        }

        info!(
            "Question {} graded: correct={} points={} score={}",
            question_id, result.is_correct, result.points_earned, self.score
        );

        self.results.insert(question_id, result.clone());
        Ok(Transition::Submitted {
            question_id,
            result,
            combo: self.combo,
        })
    }

    pub fn next(&mut self) -> Result<Transition, QuizError> {
        let question = self.require_active()?;
        if !self.results.contains_key(&question.id) {
            return Err(TransitionError::NotSubmitted(question.id).into());
        }
        Ok(self.advance())
    }

    pub fn previous(&mut self) -> Result<Transition, QuizError> {
        self.require_answering()?;
        if self.current == 0 {
            return Ok(Transition::Unchanged);
        }

        self.current -= 1;
        self.countdown = self.question_time;
        debug!("Moved back to question index {}", self.current);
        Ok(Transition::Moved {
            index: self.current,
        })
    }

    /// One unit of countdown. At zero the question is skipped without a
    /// result and the session advances exactly once.
    pub fn tick(&mut self) -> Option<Transition> {
        if !self.timer_should_run() {
            return None;
        }

        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return Some(Transition::Ticked {
                remaining: self.countdown,
            });
        }

        let question_id = self.questions[self.current].id;
        info!("Question {} timed out", question_id);
        if !self.timed_out.contains(&question_id) {
            self.timed_out.push(question_id);
        }
        self.advance();
        Some(Transition::TimedOut { question_id })
    }

    fn advance(&mut self) -> Transition {
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            self.countdown = self.question_time;
            debug!("Advanced to question index {}", self.current);
            return Transition::Moved {
                index: self.current,
            };
        }

        self.phase = SessionPhase::Finished;
        let summary = self.summary();
        info!(
            "Session for subject {} finished with {} points",
            self.subject_id, summary.total_points
        );
        Transition::Finished(summary)
    }

    pub fn summary(&self) -> SessionSummary {
        let correct_count = self.results.values().filter(|r| r.is_correct).count();
        let question_count = self.questions.len();
        let accuracy = match question_count {
            0 => 0.0,
            n => ((correct_count as f64 / n as f64) * 1000.0).round() / 10.0,
        };

        SessionSummary {
            total_points: self.results.values().map(|r| r.points_earned).sum(),
            correct_count,
            submitted_count: self.results.len(),
            timed_out_count: self
                .timed_out
                .iter()
                .filter(|id| !self.results.contains_key(*id))
                .count(),
            question_count,
            accuracy,
            best_combo: self.best_combo,
        }
    }
}
