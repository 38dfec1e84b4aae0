use crate::config::types::CrawlConfig;
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.interval_ms < 1 {
        return Err(ConfigError::Validation(
            "interval-ms must be >= 1".to_string(),
        ));
    }

    if config.concurrency < 1 || config.concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 100, got {}",
            config.concurrency
        )));
    }

    if config.max_resource_size < 1 {
        return Err(ConfigError::Validation(
            "max-resource-size must be >= 1 byte".to_string(),
        ));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    validate_user_agent(&config.user_agent)?;

    Ok(())
}

/// Validates the user-agent string: non-empty, printable ASCII only
///
/// The string is sent verbatim as an HTTP header value and matched against
/// robots.txt groups, so anything outside printable ASCII is rejected.
fn validate_user_agent(user_agent: &str) -> Result<(), ConfigError> {
    if user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if !user_agent
        .chars()
        .all(|c| c.is_ascii_graphic() || c == ' ')
    {
        return Err(ConfigError::Validation(format!(
            "user-agent must be printable ASCII, got '{}'",
            user_agent
        )));
    }

    Ok(())
}
