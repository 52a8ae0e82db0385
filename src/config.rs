use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{BotError, Result};

/// Environment variable holding the Bot API token.
pub const TOKEN_VAR: &str = "BOT_TOKEN";

/// Optional dotenv file read from the working directory.
pub const ENV_FILE: &str = ".env";

/// Load a dotenv file into the process environment without overriding
/// variables that are already set. Must run before logging is initialized
/// so a `RUST_LOG` from the file takes effect. Returns the path if loaded.
pub fn load_env_file(path: &Path) -> Option<PathBuf> {
    dotenvy::from_path(path).ok().map(|()| path.to_path_buf())
}

/// Bot API token. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretToken(String);

impl SecretToken {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretToken(***)")
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub token: SecretToken,
    /// Timeout of the `getUpdates` connectivity probe at startup.
    pub probe_timeout: Duration,
    /// Long-poll timeout of each `getUpdates` cycle while polling.
    pub poll_timeout: Duration,
}

fn default_probe_timeout() -> Duration {
    Duration::from_secs(2)
}

fn default_poll_timeout() -> Duration {
    Duration::from_secs(30)
}

impl Config {
    /// Read the token from the process environment (see [`load_env_file`]).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(TOKEN_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                BotError::Configuration(format!("{} is not set in the environment or .env", TOKEN_VAR))
            })?;

        Ok(Self {
            token: SecretToken(token),
            probe_timeout: default_probe_timeout(),
            poll_timeout: default_poll_timeout(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token_is_configuration_error() {
        let err = Config::from_lookup(|_| None).unwrap_err();
        assert!(matches!(err, BotError::Configuration(_)));
        assert!(err.to_string().contains(TOKEN_VAR));
    }

    #[test]
    fn test_blank_token_is_rejected() {
        let err = Config::from_lookup(|_| Some("   ".to_string())).unwrap_err();
        assert!(matches!(err, BotError::Configuration(_)));
    }

    #[test]
    fn test_token_loaded_with_defaults() {
        let config = Config::from_lookup(|key| {
            (key == TOKEN_VAR).then(|| " 123:abc \n".to_string())
        })
        .unwrap();
        assert_eq!(config.token.expose(), "123:abc");
        assert_eq!(config.probe_timeout, Duration::from_secs(2));
        assert_eq!(config.poll_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_env_file_sets_variables() {
        let path = std::env::temp_dir().join(format!("statusbot-{}.env", std::process::id()));
        std::fs::write(&path, "STATUSBOT_TEST_RUST_LOG=debug\n").unwrap();

        assert_eq!(load_env_file(&path), Some(path.clone()));
        assert_eq!(std::env::var("STATUSBOT_TEST_RUST_LOG").as_deref(), Ok("debug"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_env_file_is_skipped() {
        let path = std::env::temp_dir().join("statusbot-does-not-exist.env");
        assert_eq!(load_env_file(&path), None);
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = Config::from_lookup(|_| Some("123:secret".to_string())).unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("secret"));
        assert!(printed.contains("SecretToken(***)"));
    }
}
