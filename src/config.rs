use std::{path::PathBuf, time::Duration};

use crate::errors::ConfigError;

pub const DEFAULT_DATA_FILE: &str = "reaction_roles.json";
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_PLATFORM_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_REACTION_DELAY_MS: u64 = 400;
pub const DEFAULT_EVENT_BUFFER: usize = 256;

#[derive(Clone)]
pub struct Config {
    pub discord_token: String,
    /// Bearer token for the operator and ingress routes. Unset locks them.
    pub api_token: Option<String>,
    pub data_file: PathBuf,
    pub port: u16,
    pub api_base: String,
    pub platform_timeout: Duration,
    pub reaction_delay: Duration,
    pub event_buffer: usize,
}

// Tokens stay out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_token_set", &self.api_token.is_some())
            .field("data_file", &self.data_file)
            .field("port", &self.port)
            .field("api_base", &self.api_base)
            .field("platform_timeout", &self.platform_timeout)
            .field("reaction_delay", &self.reaction_delay)
            .field("event_buffer", &self.event_buffer)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let discord_token = non_blank("DISCORD_TOKEN").ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        Ok(Self {
            discord_token: discord_token.trim().to_string(),
            api_token: non_blank("API_TOKEN").map(|token| token.trim().to_string()),
            data_file: non_blank("DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE)),
            port: parse_or("PORT", non_blank("PORT"), DEFAULT_PORT)?,
            api_base: non_blank("DISCORD_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            platform_timeout: Duration::from_millis(parse_or(
                "PLATFORM_TIMEOUT_MS",
                non_blank("PLATFORM_TIMEOUT_MS"),
                DEFAULT_PLATFORM_TIMEOUT_MS,
            )?),
            reaction_delay: Duration::from_millis(parse_or(
                "REACTION_DELAY_MS",
                non_blank("REACTION_DELAY_MS"),
                DEFAULT_REACTION_DELAY_MS,
            )?),
            event_buffer: match parse_or("EVENT_BUFFER", non_blank("EVENT_BUFFER"), DEFAULT_EVENT_BUFFER)? {
                0 => {
                    return Err(ConfigError::Invalid {
                        var: "EVENT_BUFFER",
                        value: "0".to_string(),
                    });
                }
                n => n,
            },
        })
    }
}

fn parse_or<T: std::str::FromStr>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn refuses_to_load_without_discord_token() {
        assert_eq!(
            config_from(&[]).unwrap_err(),
            ConfigError::Missing("DISCORD_TOKEN")
        );
        assert_eq!(
            config_from(&[("DISCORD_TOKEN", "   ")]).unwrap_err(),
            ConfigError::Missing("DISCORD_TOKEN")
        );
    }

    #[test]
    fn applies_defaults() {
        let config = config_from(&[("DISCORD_TOKEN", "abc")]).unwrap();
        assert_eq!(config.discord_token, "abc");
        assert_eq!(config.api_token, None);
        assert_eq!(config.data_file, PathBuf::from(DEFAULT_DATA_FILE));
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.platform_timeout, Duration::from_secs(10));
        assert_eq!(config.reaction_delay, Duration::from_millis(400));
        assert_eq!(config.event_buffer, DEFAULT_EVENT_BUFFER);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("API_TOKEN", "secret"),
            ("DATA_FILE", "/var/lib/rr/roles.json"),
            ("PORT", "3000"),
            ("DISCORD_API_BASE", "http://localhost:9000/api/"),
            ("PLATFORM_TIMEOUT_MS", "2500"),
            ("REACTION_DELAY_MS", "0"),
            ("EVENT_BUFFER", "16"),
        ])
        .unwrap();
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.data_file, PathBuf::from("/var/lib/rr/roles.json"));
        assert_eq!(config.port, 3000);
        assert_eq!(config.api_base, "http://localhost:9000/api");
        assert_eq!(config.platform_timeout, Duration::from_millis(2500));
        assert_eq!(config.reaction_delay, Duration::ZERO);
        assert_eq!(config.event_buffer, 16);
    }

    #[test]
    fn rejects_malformed_numbers() {
        assert_eq!(
            config_from(&[("DISCORD_TOKEN", "abc"), ("PORT", "eighty")]).unwrap_err(),
            ConfigError::Invalid {
                var: "PORT",
                value: "eighty".to_string()
            }
        );
        assert!(config_from(&[("DISCORD_TOKEN", "abc"), ("EVENT_BUFFER", "0")]).is_err());
    }

    #[test]
    fn debug_output_hides_tokens() {
        let config = config_from(&[("DISCORD_TOKEN", "super-secret"), ("API_TOKEN", "also-secret")]).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("also-secret"));
    }
}
