//! # Runtime Configuration
//!
//! Everything the service needs is read once from the environment (after an
//! optional `.env` file) and handed to the components at construction. There
//! is no global configuration state.
//!
//! | Variable | Default |
//! |---|---|
//! | `TOGETHER_API_KEY` | required |
//! | `LLM_BASE_URL` | `https://api.together.xyz/v1` |
//! | `LLM_MODEL` | `meta-llama/Meta-Llama-3.1-8B-Instruct-Turbo` |
//! | `PAGESPEED_API_KEY` | unset, page speed disabled |
//! | `PAGESPEED_BASE_URL` | `https://www.googleapis.com` |
//! | `FUNCTIONS_CUSTOMHANDLER_PORT` | unset |
//! | `LISTEN_ADDR` | `0.0.0.0:3000` |
//! | `ENABLE_READABILITY` | `true` |
//! | `ENABLE_PAGE_SPEED` | `true` |
//! | `ENABLE_ESTIMATION` | `false` |
//! | `ACCEPT_COMPETITOR_URLS` | `false` |

use std::env;

use thiserror::Error;

use crate::analysis::AnalysisOptions;
use crate::crawler::FetcherConfig;
use crate::insights::pagespeed;
use crate::model::ChatCompletionConfig;
use crate::model::http::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Default address the HTTP function listens on
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";

/// Errors raised while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable is set but cannot be used
    #[error("{name} has an invalid value '{value}': {reason}")]
    Invalid {
        /// Variable name
        name: &'static str,
        /// The rejected value
        value: String,
        /// What was expected
        reason: &'static str,
    },
}

impl From<ConfigError> for crate::Error {
    fn from(err: ConfigError) -> Self {
        crate::Error::Config(err.to_string())
    }
}

/// Page-speed settings
#[derive(Debug, Clone)]
pub struct PageSpeedSettings {
    /// API key for PageSpeed Insights
    pub api_key: String,

    /// Base URL of the API
    pub base_url: String,
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Completion API settings
    pub llm: ChatCompletionConfig,

    /// PageSpeed Insights settings; `None` disables the section
    pub page_speed: Option<PageSpeedSettings>,

    /// Address the HTTP function binds to
    pub listen_addr: String,

    /// Fetcher settings
    pub fetcher: FetcherConfig,

    /// Report sections and competitor handling
    pub analysis: AnalysisOptions,
}

impl Config {
    /// Load configuration from the process environment and `.env`
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = var("TOGETHER_API_KEY").ok_or(ConfigError::Missing("TOGETHER_API_KEY"))?;
        let llm = ChatCompletionConfig::new(api_key)
            .with_base_url(var("LLM_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()))
            .with_model(var("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()));

        let page_speed = var("PAGESPEED_API_KEY").map(|api_key| PageSpeedSettings {
            api_key,
            base_url: var("PAGESPEED_BASE_URL")
                .unwrap_or_else(|| pagespeed::DEFAULT_BASE_URL.to_string()),
        });

        let listen_addr = match var("FUNCTIONS_CUSTOMHANDLER_PORT") {
            Some(port) => {
                let port: u16 = port.parse().map_err(|_| ConfigError::Invalid {
                    name: "FUNCTIONS_CUSTOMHANDLER_PORT",
                    value: port.clone(),
                    reason: "expected a port number",
                })?;
                format!("0.0.0.0:{}", port)
            }
            None => var("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
        };

        let defaults = AnalysisOptions::default();
        let flag = |name: &'static str, default: bool| -> Result<bool, ConfigError> {
            match var(name) {
                Some(value) => parse_bool(&value).ok_or(ConfigError::Invalid {
                    name,
                    value,
                    reason: "expected true or false",
                }),
                None => Ok(default),
            }
        };

        let analysis = AnalysisOptions::builder()
            .readability(flag("ENABLE_READABILITY", defaults.readability)?)
            .page_speed(flag("ENABLE_PAGE_SPEED", defaults.page_speed)? && page_speed.is_some())
            .estimation(flag("ENABLE_ESTIMATION", defaults.estimation)?)
            .caller_competitors(flag("ACCEPT_COMPETITOR_URLS", defaults.caller_competitors)?)
            .build();

        let fetcher = FetcherConfig::builder()
            .include_body_text(analysis.readability)
            .build();

        Ok(Self {
            llm,
            page_speed,
            listen_addr,
            fetcher,
            analysis,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
