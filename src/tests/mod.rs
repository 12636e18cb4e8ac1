#[cfg(test)]
mod common;

mod app_config;
mod progress_report;
