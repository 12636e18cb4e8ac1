#[cfg(test)]
mod tests {
    use std::time::Duration;

    use validator::Validate;

    use crate::config::app_config::{ApiConfig, SessionConfig};

    #[test]
    fn session_defaults_to_thirty_one_second_ticks() {
        let settings = SessionConfig::default().settings();
        assert_eq!(settings.question_time, 30);
        assert_eq!(settings.tick_period, Duration::from_secs(1));
    }

    #[test]
    fn rejects_invalid_api_config() {
        let config = ApiConfig {
            base_url: String::from("not a url"),
            token: None,
            timeout_secs: 0,
        };
        let errors = config.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("base_url"));
        assert!(fields.contains_key("timeout_secs"));
    }

    #[test]
    fn rejects_zero_question_time() {
        let config = SessionConfig {
            question_time: 0,
            tick_millis: 1000,
        };
        assert!(config.validate().is_err());

        let config = SessionConfig {
            question_time: 45,
            tick_millis: 250,
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.settings().tick_period, Duration::from_millis(250));
    }
}
