//! Environment-driven configuration.
//!
//! Every backend is optional: a missing variable leaves that client
//! unconfigured, and the routing pipeline degrades to the next tier instead
//! of failing at startup.

use crate::error::AppError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Connection settings for the completion service (OpenAI-compatible API).
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
}

/// Connection settings for the graph knowledge store (Neo4j HTTP API).
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

/// Connection settings for the full-text search fallback index.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub endpoint: String,
    pub api_key: String,
    pub index: String,
}

/// Site identity used in prompts and fallback strings.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub name: String,
    pub home_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "MadeWithNestlé".to_string(),
            home_url: "https://www.madewithnestle.ca/".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub completion: Option<CompletionConfig>,
    pub graph: Option<GraphConfig>,
    pub search: Option<SearchConfig>,
    pub site: SiteConfig,
    pub feedback_db_path: PathBuf,
    /// Budget for one store/search call; on expiry the call degrades to
    /// "no results" rather than hanging the turn.
    pub retrieval_timeout: Duration,
    /// Budget for one completion call; expiry is a hard failure.
    pub completion_timeout: Duration,
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn checked_url(key: &str, value: String) -> Result<String, AppError> {
    Url::parse(&value)
        .map_err(|e| AppError::Config(format!("{} is not a valid URL: {}", key, e)))?;
    Ok(value.trim_end_matches('/').to_string())
}

fn duration_var(key: &str, default_secs: u64) -> Result<Duration, AppError> {
    match optional_var(key) {
        Some(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| AppError::Config(format!("{} must be an integer number of seconds", key))),
        None => Ok(Duration::from_secs(default_secs)),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let completion = match optional_var("OPENAI_API_KEY") {
            Some(api_key) => {
                let base_url = match optional_var("OPENAI_BASE_URL") {
                    Some(url) => checked_url("OPENAI_BASE_URL", url)?,
                    None => "https://api.openai.com".to_string(),
                };
                Some(CompletionConfig {
                    base_url,
                    api_key,
                    model: optional_var("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o".to_string()),
                    temperature: 0.3,
                })
            }
            None => None,
        };

        let graph = match (
            optional_var("NEO4J_URI"),
            optional_var("NEO4J_USER"),
            optional_var("NEO4J_PASS"),
        ) {
            (Some(uri), Some(user), Some(password)) => Some(GraphConfig {
                uri: checked_url("NEO4J_URI", uri)?,
                user,
                password,
                database: optional_var("NEO4J_DATABASE").unwrap_or_else(|| "neo4j".to_string()),
            }),
            _ => None,
        };

        let search = match (
            optional_var("AZ_SEARCH_ENDPOINT"),
            optional_var("AZ_SEARCH_KEY"),
            optional_var("AZ_SEARCH_INDEX"),
        ) {
            (Some(endpoint), Some(api_key), Some(index)) => Some(SearchConfig {
                endpoint: checked_url("AZ_SEARCH_ENDPOINT", endpoint)?,
                api_key,
                index,
            }),
            _ => None,
        };

        let mut site = SiteConfig::default();
        if let Some(name) = optional_var("SITE_NAME") {
            site.name = name;
        }
        if let Some(home) = optional_var("SITE_HOME_URL") {
            site.home_url = checked_url("SITE_HOME_URL", home.clone()).map(|_| home)?;
        }

        Ok(Self {
            completion,
            graph,
            search,
            site,
            feedback_db_path: optional_var("FEEDBACK_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("feedback.sqlite")),
            retrieval_timeout: duration_var("RETRIEVAL_TIMEOUT_SECS", 5)?,
            completion_timeout: duration_var("COMPLETION_TIMEOUT_SECS", 30)?,
        })
    }
}
