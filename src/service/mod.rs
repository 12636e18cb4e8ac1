pub mod evaluator;
pub mod progress_report;
pub mod question_timer;
pub mod session_controller;
pub mod session_state;
