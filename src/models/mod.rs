pub mod error;
pub mod progress;
pub mod question;
pub mod session;
pub mod submission;
