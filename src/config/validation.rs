//! Configuration validation.
//!
//! Runs on every load and reload so a bad edit never replaces a working
//! configuration.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("host is required")]
    MissingHost,
    #[error("nick is required")]
    MissingNick,
    #[error("port must be non-zero")]
    InvalidPort,
    #[error("channel name must start with #, &, + or !, got '{0}'")]
    InvalidChannelName(String),
    #[error("channels.{0}.banAccountOnSpamJoin.maxJoins must be at least 1")]
    InvalidMaxJoins(String),
    #[error("channels.{0}.banAccountOnSpamJoin.intervalSeconds must be at least 1")]
    InvalidInterval(String),
}

const CHANNEL_PREFIXES: &[char] = &['#', '&', '+', '!'];

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.host.trim().is_empty() {
        errors.push(ValidationError::MissingHost);
    }
    if config.nick.trim().is_empty() {
        errors.push(ValidationError::MissingNick);
    }
    if config.port == 0 {
        errors.push(ValidationError::InvalidPort);
    }

    for (name, policy) in &config.channels {
        if !name.starts_with(CHANNEL_PREFIXES) {
            errors.push(ValidationError::InvalidChannelName(name.clone()));
        }
        if let Some(spam) = &policy.ban_account_on_spam_join {
            if spam.max_joins == 0 {
                errors.push(ValidationError::InvalidMaxJoins(name.clone()));
            }
            if spam.interval_seconds == 0 {
                errors.push(ValidationError::InvalidInterval(name.clone()));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_unchecked(toml: &str) -> Config {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn test_valid_config_passes() {
        let config = parse_unchecked(
            r##"
host = "irc.example.net"
nick = "warden"

[channels."#rust"]
ops = ["alice"]
"##,
        );
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_host_and_nick_fail() {
        let config = parse_unchecked(
            r#"
host = ""
nick = " "
"#,
        );
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::MissingHost)));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::MissingNick)));
    }

    #[test]
    fn test_bad_channel_name_fails() {
        let config = parse_unchecked(
            r#"
host = "irc.example.net"
nick = "warden"

[channels.rust]
"#,
        );
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidChannelName(n) if n == "rust")));
    }

    #[test]
    fn test_zero_spam_limits_fail() {
        let config = parse_unchecked(
            r##"
host = "irc.example.net"
nick = "warden"

[channels."#rust"]
banAccountOnSpamJoin = { intervalSeconds = 0, maxJoins = 0 }
"##,
        );
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
