//! Startup configuration from environment variables.
//!
//! Required variables are validated together so a misconfigured deployment
//! reports every problem at once instead of failing on first use.

use std::env;
use std::fmt;
use std::time::Duration;

use tracing::warn;

use crate::error::ConfigError;
use crate::github::RepositoryId;
use crate::monitor::{DeliveryGuarantee, RestartPolicy};
use crate::notify::transport::DEFAULT_TELEGRAM_API_URL;
use crate::sentiment::summarize::DEFAULT_SUMMARIZER_URL;

pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";
pub const TELEGRAM_BOT_TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";
pub const REPOS_VAR: &str = "REPOS";
pub const HF_API_TOKEN_VAR: &str = "HF_API_TOKEN";

const SUMMARIZER_URL_VAR: &str = "SHIPSIGNAL_SUMMARIZER_URL";
const POLL_INTERVAL_VAR: &str = "SHIPSIGNAL_POLL_INTERVAL";
const FETCH_TIMEOUT_VAR: &str = "SHIPSIGNAL_FETCH_TIMEOUT";
const MAX_RESTARTS_VAR: &str = "SHIPSIGNAL_MAX_RESTARTS";
const DELIVERY_VAR: &str = "SHIPSIGNAL_DELIVERY";
const GITHUB_API_URL_VAR: &str = "SHIPSIGNAL_GITHUB_API_URL";
const TELEGRAM_API_URL_VAR: &str = "SHIPSIGNAL_TELEGRAM_API_URL";

const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_RESTARTS: u32 = 20;

/// Everything the bot needs to run.
#[derive(Clone)]
pub struct Config {
    pub github_token: String,
    pub telegram_bot_token: String,
    pub telegram_chat_id: String,
    /// Polled in this order.
    pub repositories: Vec<RepositoryId>,
    pub hf_api_token: Option<String>,
    pub summarizer_url: String,
    pub poll_interval: Duration,
    /// Bound on each GitHub request.
    pub fetch_timeout: Duration,
    pub restart_policy: RestartPolicy,
    pub delivery: DeliveryGuarantee,
    pub github_api_url: Option<String>,
    pub telegram_api_url: String,
}

impl Config {
    /// Load and validate configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let github_token = non_empty_var(GITHUB_TOKEN_VAR);
        let telegram_bot_token = non_empty_var(TELEGRAM_BOT_TOKEN_VAR);
        let telegram_chat_id = non_empty_var(TELEGRAM_CHAT_ID_VAR);
        let repos = non_empty_var(REPOS_VAR);

        let (Some(github_token), Some(telegram_bot_token), Some(telegram_chat_id), Some(repos)) =
            (github_token, telegram_bot_token, telegram_chat_id, repos)
        else {
            let missing = [
                GITHUB_TOKEN_VAR,
                TELEGRAM_BOT_TOKEN_VAR,
                TELEGRAM_CHAT_ID_VAR,
                REPOS_VAR,
            ]
            .into_iter()
            .filter(|name| non_empty_var(name).is_none())
            .collect();
            return Err(ConfigError::MissingVariables(missing));
        };

        let repositories = RepositoryId::parse_list(&repos)?;

        let delivery = match non_empty_var(DELIVERY_VAR) {
            Some(mode) => mode.parse()?,
            None => DeliveryGuarantee::default(),
        };

        let max_restarts = match parse_var(MAX_RESTARTS_VAR, DEFAULT_MAX_RESTARTS) {
            0 => None,
            n => Some(n),
        };

        Ok(Self {
            github_token,
            telegram_bot_token,
            telegram_chat_id,
            repositories,
            hf_api_token: non_empty_var(HF_API_TOKEN_VAR),
            summarizer_url: non_empty_var(SUMMARIZER_URL_VAR)
                .unwrap_or_else(|| DEFAULT_SUMMARIZER_URL.to_string()),
            poll_interval: parse_secs_var(POLL_INTERVAL_VAR, DEFAULT_POLL_INTERVAL_SECS),
            fetch_timeout: parse_secs_var(FETCH_TIMEOUT_VAR, DEFAULT_FETCH_TIMEOUT_SECS),
            restart_policy: RestartPolicy {
                max_restarts,
                ..Default::default()
            },
            delivery,
            github_api_url: non_empty_var(GITHUB_API_URL_VAR),
            telegram_api_url: non_empty_var(TELEGRAM_API_URL_VAR)
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
        })
    }
}

// Tokens stay out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("github_token", &"<redacted>")
            .field("telegram_bot_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("repositories", &self.repositories)
            .field("hf_api_token", &self.hf_api_token.as_ref().map(|_| "<redacted>"))
            .field("summarizer_url", &self.summarizer_url)
            .field("poll_interval", &self.poll_interval)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("restart_policy", &self.restart_policy)
            .field("delivery", &self.delivery)
            .field("github_api_url", &self.github_api_url)
            .field("telegram_api_url", &self.telegram_api_url)
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read a numeric tunable, warning and falling back to `default` on bad input.
fn parse_var<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + fmt::Display,
{
    match non_empty_var(name) {
        Some(v) => match v.parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!("Invalid {} value '{}', using default {}", name, v, default);
                default
            }
        },
        None => default,
    }
}

/// Read a duration in whole seconds. Zero is rejected like any other bad value.
fn parse_secs_var(name: &str, default_secs: u64) -> Duration {
    match parse_var(name, default_secs) {
        0 => {
            warn!("{} must be at least 1 second, using default {}", name, default_secs);
            Duration::from_secs(default_secs)
        }
        secs => Duration::from_secs(secs),
    }
}
