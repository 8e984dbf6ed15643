// src/config/parsing.rs

use log::LevelFilter;

/// Maps the `--log-level` value to a level filter.
///
/// Accepts `DEBUG`, `INFO`, `WARN`, `ERROR` and `CRITICAL` in any case; anything
/// else means `INFO`. Without a value, metadata operations (tags/branches) default
/// to `WARN` and downloads to `INFO`.
pub fn parse_log_level(level: Option<&str>, info_operation: bool) -> LevelFilter {
    match level.map(|l| l.trim().to_ascii_uppercase()) {
        Some(l) => match l.as_str() {
            "DEBUG" => LevelFilter::Debug,
            "INFO" => LevelFilter::Info,
            "WARN" | "WARNING" => LevelFilter::Warn,
            "ERROR" | "CRITICAL" => LevelFilter::Error,
            _ => LevelFilter::Info,
        },
        None if info_operation => LevelFilter::Warn,
        None => LevelFilter::Info,
    }
}
