pub mod quiz_api;
pub mod quiz_client;
