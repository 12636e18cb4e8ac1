use clap::Parser;
use dotenvy::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api::{quiz_api::QuizApi, quiz_client::QuizClient},
    config::app_config::CONFIG,
    models::{
        error::QuizError,
        question::{Answer, SubjectId},
        session::{SessionPhase, SessionSummary, Transition},
    },
    service::{
        evaluator::{self, Verdict},
        progress_report::ProgressReport,
        session_controller::SessionController,
        session_state::QuizSessionState,
    },
};

mod api;
mod config;
mod models;
mod service;
mod tests;

const HELP: &str = "commands: answer <json> | submit | next | prev | show | help | quit";

/// Terminal front-end for the quiz platform
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct AppArgs {
    /// Play the quiz of this subject.
    #[arg(long = "subject")]
    subject: Option<SubjectId>,
    /// Show level, achievements and per-subject progress.
    #[arg(long = "progress")]
    progress: bool,
}

#[tokio::main]
async fn main() {
    // Initialize .env
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let args = AppArgs::parse();

    let mut client = match QuizClient::new(&CONFIG.api.base_url, CONFIG.api.timeout()) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build http client: {}", e);
            return;
        }
    };
    if let Some(token) = &CONFIG.api.token {
        client = client.with_token(token);
    }

    if let Err(e) = client.health_check().await {
        error!("Quiz api is not reachable: {}", e);
        return;
    }
    info!("Connected to quiz api at {}", CONFIG.api.base_url);

    let outcome = match (args.subject, args.progress) {
        (_, true) => show_progress(&client).await,
        (Some(subject_id), false) => play(client, subject_id).await,
        (None, false) => list_subjects(&client).await,
    };

    if let Err(e) = outcome {
        println!("{}", e.user_message());
    }
}

async fn list_subjects(client: &QuizClient) -> Result<(), QuizError> {
    let subjects = client.fetch_subjects().await?;
    if subjects.is_empty() {
        println!("No subjects available yet");
    }
    for subject in subjects {
        match subject.description {
            Some(description) => println!("[{}] {} - {}", subject.id, subject.name, description),
            None => println!("[{}] {}", subject.id, subject.name),
        }
    }
    Ok(())
}

async fn show_progress(client: &QuizClient) -> Result<(), QuizError> {
    let report = ProgressReport::fetch(client).await?;
    let level = &report.level;

    println!("Level {} ({} XP)", level.level, level.total_experience);
    println!(
        "{} / {} XP, {} XP to level {}",
        level.total_experience,
        report.next_level_threshold,
        report.experience_to_next_level,
        level.level + 1
    );
    println!("Streak {} (max {})", level.current_streak, level.max_streak);
    println!(
        "Answered {} questions, {} correct ({:.1}%)",
        report.progress.total_questions_attempted,
        report.progress.total_correct,
        report.progress.accuracy
    );
    for subject in &report.progress.subjects {
        println!(
            "  {}: {} / {} correct, {} points ({:.1}%)",
            subject.subject_name,
            subject.correct_answers,
            subject.total_questions,
            subject.total_points,
            subject.accuracy
        );
    }

    println!(
        "Achievements {} / {}",
        report.unlocked_count(),
        report.achievements.len()
    );
    for status in &report.achievements {
        let mark = if status.unlocked() { "x" } else { " " };
        println!(
            "  [{}] {} {} - {}",
            mark, status.achievement.icon, status.achievement.name, status.achievement.description
        );
    }
    Ok(())
}

async fn play(client: QuizClient, subject_id: SubjectId) -> Result<(), QuizError> {
    let mut controller = SessionController::new(client, subject_id, CONFIG.session.settings());

    if let Transition::Empty = controller.load().await? {
        println!("There are no questions for this subject yet");
        return Ok(());
    }
    println!("{}", HELP);
    render_question(controller.state());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while controller.state().phase() == SessionPhase::Active {
        tokio::select! {
            line = lines.next_line() => {
                let Ok(Some(line)) = line else {
                    break;
                };
                match run_command(&mut controller, line.trim()).await {
                    Ok(Some(transition)) => render_transition(controller.state(), &transition),
                    Ok(None) => break,
                    Err(e) => println!("{}", e.user_message()),
                }
            }
            tick = controller.wait_tick() => {
                if let Some(transition) = controller.on_tick(tick) {
                    render_transition(controller.state(), &transition);
                }
            }
        }
    }

    Ok(())
}

// `Ok(None)` ends the session.
async fn run_command(
    controller: &mut SessionController<QuizClient>,
    line: &str,
) -> Result<Option<Transition>, QuizError> {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let transition = match command {
        "answer" => {
            let answer: Answer = serde_json::from_str(rest.trim())
                .map_err(|e| QuizError::Validation(format!("answer is not valid json: {}", e)))?;
            controller.answer(answer)?
        }
        "submit" => controller.submit().await?,
        "next" => controller.next()?,
        "prev" => controller.previous()?,
        "show" => {
            render_question(controller.state());
            Transition::Unchanged
        }
        "quit" => return Ok(None),
        _ => {
            println!("{}", HELP);
            Transition::Unchanged
        }
    };
    Ok(Some(transition))
}

fn render_transition(state: &QuizSessionState, transition: &Transition) {
    match transition {
        Transition::Answered { .. } => println!("Answer saved, type 'submit' to send it"),
        Transition::Submitted { result, combo, .. } => {
            match result.is_correct {
                true => println!("Correct! +{} (combo {}x)", result.points_earned, combo),
                false => println!("Wrong answer"),
            }
            render_feedback(state);
            if let (true, Some(level)) = (result.level_up, state.latest_level()) {
                println!("Level up! You are now level {}", level);
            }
        }
        Transition::Moved { .. } => render_question(state),
        Transition::Ticked { remaining } if *remaining <= 5 || remaining % 10 == 0 => {
            println!("{}s left", remaining)
        }
        Transition::TimedOut { .. } => {
            println!("Time is up!");
            match state.phase() {
                SessionPhase::Finished => render_summary(state, &state.summary()),
                _ => render_question(state),
            }
        }
        Transition::Finished(summary) => render_summary(state, summary),
        _ => {}
    }
}

fn render_question(state: &QuizSessionState) {
    let Some(question) = state.current_question() else {
        return;
    };

    println!();
    println!(
        "Question {} of {} [{}] score {} combo {}x, {}/{}s",
        state.current_index() + 1,
        state.questions().len(),
        question.question_type,
        state.score(),
        state.combo(),
        state.countdown(),
        state.question_time()
    );
    if let Some(level) = state.latest_level() {
        println!("Level {}", level);
    }
    println!("{}", question.question_text);
    if question.question_type.uses_options() {
        for (index, option) in question.options().iter().enumerate() {
            println!("  {}: {}", index, option);
        }
    }
    if let Some(answer) = state.answer(question.id) {
        println!("Current answer: {}", serde_json::to_string(answer).unwrap_or_default());
    }
    if let Some(result) = state.result(question.id) {
        match result.is_correct {
            true => println!("Submitted: correct, +{}", result.points_earned),
            false => println!("Submitted: wrong answer"),
        }
        render_feedback(state);
    }
}

fn render_feedback(state: &QuizSessionState) {
    let Some(question) = state.current_question() else {
        return;
    };

    match (&question.correct_answer, state.answer(question.id)) {
        (Some(Answer::FillBlank { fills: correct }), Some(Answer::FillBlank { fills })) => {
            let keys = evaluator::fill_keys(question, correct);
            for blank in evaluator::fill_feedback(&keys, correct, fills) {
                let mark = if blank.correct { "ok" } else { "x" };
                println!(
                    "  {} = {} [{}]",
                    blank.name,
                    blank.expected.unwrap_or_default(),
                    mark
                );
            }
        }
        (Some(Answer::DragDrop { order: correct }), Some(Answer::DragDrop { order })) => {
            let options = question.options();
            for (pos, placed) in evaluator::drag_feedback(correct, order).iter().enumerate() {
                let label = order
                    .get(pos)
                    .and_then(|i| options.get(*i))
                    .map(String::as_str)
                    .unwrap_or("?");
                println!("  {}. {} [{}]", pos + 1, label, if *placed { "ok" } else { "x" });
            }
        }
        _ => {}
    }

    if state.preview() == Some(Verdict::Incorrect) {
        if let Some(correct) = &question.correct_answer {
            println!(
                "Expected: {}",
                serde_json::to_string(correct).unwrap_or_default()
            );
        }
    }
    if let Some(explanation) = &question.explanation {
        println!("{}", explanation);
    }
}

fn render_summary(state: &QuizSessionState, summary: &SessionSummary) {
    println!();
    println!("Mission complete!");
    println!("Final score: {}", summary.total_points);
    println!(
        "Correct: {} / {} ({:.1}%)",
        summary.correct_count, summary.question_count, summary.accuracy
    );
    println!(
        "Best combo: {}x, skipped by timer: {}",
        summary.best_combo, summary.timed_out_count
    );
    if let Some(level) = state.latest_level() {
        println!("Reached level {}", level);
    }
}
