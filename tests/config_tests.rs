use calcdesk::evaluator::AngleMode;
use calcdesk::scientific::DEFAULT_HISTORY_LIMIT;
use calcdesk::CalcDeskConfig;
use std::path::PathBuf;

#[test]
fn test_default_config() {
    let config = CalcDeskConfig::default();
    assert_eq!(config.history_dir, PathBuf::from("calcdesk_history"));
    assert_eq!(config.scientific_history_limit, DEFAULT_HISTORY_LIMIT);
    assert_eq!(config.default_angle_mode, AngleMode::Degrees);
    assert_eq!(config.theme_model, "gpt-4.1-mini");
}

#[test]
fn test_init_logger_is_idempotent() {
    calcdesk::init_logger();
    calcdesk::init_logger();
    log::debug!("logger initialised twice without panicking");
}
