use parallel_rc::cli::LogLevel;
use parallel_rc::logging::{build_filter, parse_level_str};
use tracing::Level;

#[test]
fn cli_level_wins_over_environment() {
    let filter = build_filter(Some(LogLevel::Debug), Some("trace"));
    assert_eq!(filter.to_string(), "debug");
}

#[test]
fn environment_accepts_levels_and_directives() {
    assert_eq!(build_filter(None, Some("INFO")).to_string(), "info");
    assert_eq!(
        build_filter(None, Some("parallel_rc::engine=trace")).to_string(),
        "parallel_rc::engine=trace"
    );
}

#[test]
fn defaults_to_warn() {
    assert_eq!(build_filter(None, None).to_string(), "warn");
    assert_eq!(build_filter(None, Some("   ")).to_string(), "warn");
}

#[test]
fn level_names() {
    assert_eq!(parse_level_str(" Warning "), Some(Level::WARN));
    assert_eq!(parse_level_str("trace"), Some(Level::TRACE));
    assert_eq!(parse_level_str("loud"), None);
    assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
}
