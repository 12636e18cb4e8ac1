use std::time::Duration;

use tracing::{debug, error, warn};

use crate::{
    api::quiz_api::QuizApi,
    models::{
        error::QuizError,
        question::{Answer, SubjectId},
        session::{SessionPhase, Transition},
    },
    service::{
        question_timer::{QuestionTimer, Tick},
        session_state::QuizSessionState,
    },
};

#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub question_time: u32,
    pub tick_period: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            question_time: 30,
            tick_period: Duration::from_secs(1),
        }
    }
}

/// Drives one [`QuizSessionState`] against the quiz api and owns the
/// countdown for the current question.
pub struct SessionController<A: QuizApi> {
    api: A,
    state: QuizSessionState,
    timer: QuestionTimer,
    timer_index: Option<usize>,
}

impl<A: QuizApi> SessionController<A> {
    pub fn new(api: A, subject_id: SubjectId, settings: SessionSettings) -> Self {
        Self {
            api,
            state: QuizSessionState::new(subject_id, settings.question_time),
            timer: QuestionTimer::new(settings.tick_period),
            timer_index: None,
        }
    }

    pub fn state(&self) -> &QuizSessionState {
        &self.state
    }

    #[cfg(test)]
    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Fetches the subject's questions. A failed fetch leaves the session
    /// loading so the call can be repeated.
    pub async fn load(&mut self) -> Result<Transition, QuizError> {
        let subject_id = self.state.subject_id();
        let questions = self.api.fetch_questions(subject_id).await.map_err(|e| {
            error!("Failed to load questions for subject {}: {}", subject_id, e);
            e
        })?;

        let transition = self.state.load(questions)?;
        self.sync_timer();
        Ok(transition)
    }

    pub fn answer(&mut self, answer: Answer) -> Result<Transition, QuizError> {
        self.state.set_answer(answer)
    }

    /// Sends the current answer for grading. Submitted questions are refused
    /// before any request goes out; a failed request changes nothing.
    pub async fn submit(&mut self) -> Result<Transition, QuizError> {
        let (question_id, answer) = self.state.prepare_submission()?;
        debug!("Submitting answer for question {}", question_id);

        let result = match self.api.submit_answer(question_id, &answer).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Submission for question {} failed: {}", question_id, e);
                return Err(e);
            }
        };

        let transition = self.state.record_result(question_id, result)?;
        self.sync_timer();
        Ok(transition)
    }

    pub fn next(&mut self) -> Result<Transition, QuizError> {
        let transition = self.state.next()?;
        self.sync_timer();
        Ok(transition)
    }

    pub fn previous(&mut self) -> Result<Transition, QuizError> {
        let transition = self.state.previous()?;
        self.sync_timer();
        Ok(transition)
    }

    /// Waits for the countdown of the current question to tick.
    pub async fn wait_tick(&mut self) -> Tick {
        self.timer.tick().await
    }

    pub fn on_tick(&mut self, tick: Tick) -> Option<Transition> {
        if tick.epoch != self.timer.epoch() {
            return None;
        }

        let transition = self.state.tick()?;
        if let Transition::TimedOut { .. } = transition {
            self.sync_timer();
        }
        Some(transition)
    }

    #[cfg(test)]
    pub async fn tick(&mut self) -> Option<Transition> {
        let tick = self.wait_tick().await;
        self.on_tick(tick)
    }

    // Restarts the countdown whenever the current index changed and stops it
    // on every exit from answering.
    fn sync_timer(&mut self) {
        if !self.state.timer_should_run() {
            self.timer.cancel();
            self.timer_index = None;
            if self.state.phase() == SessionPhase::Finished {
                debug!("Session finished, timer stopped");
            }
            return;
        }

        let index = self.state.current_index();
        if self.timer_index != Some(index) || !self.timer.is_running() {
            self.timer.start();
            self.timer_index = Some(index);
        }
    }
}
