// src/config/validation.rs

use super::{ConfigBuilder, Operation};
use crate::errors::{ConfigError, Result};

/// Validates combinations of options that clap cannot easily express.
pub(super) fn validate_builder_options(builder: &ConfigBuilder) -> Result<()> {
    let operation = builder.operation.as_ref();

    if builder.submodules.unwrap_or(false) && !matches!(operation, Some(Operation::Directory(_)))
    {
        return Err(ConfigError::MissingDependency {
            option: "--submodules".to_string(),
            required: "--dir".to_string(),
        }
        .into());
    }

    if builder.target.as_deref().is_some_and(|t| !t.is_empty())
        && operation.is_some_and(Operation::is_info)
    {
        return Err(ConfigError::Conflict {
            option1: "--target".to_string(),
            option2: "--tags or --branches".to_string(),
        }
        .into());
    }

    if let Some(Operation::File(path)) = operation {
        if path.trim_matches(['/', '\\']).is_empty() {
            return Err(ConfigError::InvalidValue {
                option: "--file".to_string(),
                reason: "must name a file in the repository".to_string(),
            }
            .into());
        }
    }

    if builder.jobs == Some(0) {
        return Err(ConfigError::InvalidValue {
            option: "--jobs".to_string(),
            reason: "must be at least 1".to_string(),
        }
        .into());
    }

    if builder.timeout_secs == Some(0) {
        return Err(ConfigError::InvalidValue {
            option: "--timeout".to_string(),
            reason: "must be at least 1 second".to_string(),
        }
        .into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    fn base() -> ConfigBuilder {
        ConfigBuilder::new().repo_url("https://github.com/o/r")
    }

    fn config_error(builder: &ConfigBuilder) -> ConfigError {
        match validate_builder_options(builder) {
            Err(Error::Config(e)) => e,
            other => panic!("Expected a config error, got {other:?}"),
        }
    }

    #[test]
    fn test_submodules_require_directory() {
        let err = config_error(&base().file("a.txt").submodules(true));
        assert!(matches!(err, ConfigError::MissingDependency { .. }));
        validate_builder_options(&base().directory("a").submodules(true)).unwrap();
    }

    #[test]
    fn test_target_conflicts_with_info_operations() {
        let err = config_error(&base().tags().target("out"));
        assert!(matches!(err, ConfigError::Conflict { .. }));
    }

    #[test]
    fn test_zero_jobs_and_timeout() {
        assert!(matches!(
            config_error(&base().tags().jobs(0)),
            ConfigError::InvalidValue { .. }
        ));
        assert!(matches!(
            config_error(&base().tags().timeout_secs(0)),
            ConfigError::InvalidValue { .. }
        ));
    }

    #[test]
    fn test_file_must_name_a_file() {
        assert!(matches!(
            config_error(&base().file("/")),
            ConfigError::InvalidValue { .. }
        ));
    }
}
