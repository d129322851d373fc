use crate::LogLevel;

use std::str::FromStr;

use log::LevelFilter;

#[test]
fn given_mixed_case_level_when_parsed_then_matches() {
    assert_eq!(LogLevel::from_str("DeBuG"), Ok(LogLevel(LevelFilter::Debug)));
    assert_eq!(LogLevel::from_str(" warning "), Ok(LogLevel(LevelFilter::Warn)));
    assert_eq!(LogLevel::from_str("off"), Ok(LogLevel(LevelFilter::Off)));
}

#[test]
fn given_unknown_level_when_parsed_then_error() {
    assert_eq!(LogLevel::from_str("verbose"), Err(()));
}

#[test]
fn given_log_level_when_converted_then_level_filter() {
    let level: LevelFilter = LogLevel(LevelFilter::Trace).into();

    assert_eq!(level, LevelFilter::Trace);
    assert_eq!(LogLevel::default(), LogLevel(LevelFilter::Info));
}
