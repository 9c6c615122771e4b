use herald_core::formalizer::DEFAULT_MODEL;
use herald_core::gateway::CaseSensitivity;
use herald_core::graph::DEFAULT_GRAPH_BASE_URL;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

const DEFAULT_LLM_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub openai_api_key: String,
    pub llm_endpoint: String,
    pub chat_model: String,
    pub email_domain: String,
    pub address_separator: String,
    pub graph_base_url: String,
    pub graph_access_token: String,
    pub group_routing: CaseSensitivity,
    pub topic_matching: CaseSensitivity,
    pub http_timeout_secs: u64,
    pub log_level: Level,
    pub prompts_path: PathBuf,
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingVar(name.to_string()))
}

fn comparison(name: &str, default: CaseSensitivity) -> Result<CaseSensitivity, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e)),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let openai_api_key = required("OPENAI_API_KEY")?;
        let llm_endpoint =
            std::env::var("LLM_ENDPOINT").unwrap_or_else(|_| DEFAULT_LLM_ENDPOINT.to_string());
        let chat_model = std::env::var("CHAT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let email_domain = required("EMAIL_DOMAIN")?;
        let address_separator =
            std::env::var("ADDRESS_SEPARATOR").unwrap_or_else(|_| ".".to_string());

        let graph_base_url =
            std::env::var("GRAPH_BASE_URL").unwrap_or_else(|_| DEFAULT_GRAPH_BASE_URL.to_string());
        let graph_access_token = required("GRAPH_ACCESS_TOKEN")?;

        let group_routing = comparison("GROUP_ROUTING_MATCH", CaseSensitivity::Insensitive)?;
        let topic_matching = comparison("GROUP_TOPIC_MATCH", CaseSensitivity::Sensitive)?;

        let timeout_str = std::env::var("HTTP_TIMEOUT_SECS").unwrap_or_else(|_| "30".to_string());
        let http_timeout_secs = timeout_str.parse::<u64>().map_err(|_| {
            ConfigError::InvalidValue(
                "HTTP_TIMEOUT_SECS".to_string(),
                format!("'{}' is not a whole number of seconds", timeout_str),
            )
        })?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let prompts_path = std::env::var("PROMPTS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./prompts"));

        Ok(Self {
            bind_address,
            openai_api_key,
            llm_endpoint,
            chat_model,
            email_domain,
            address_separator,
            graph_base_url,
            graph_access_token,
            group_routing,
            topic_matching,
            http_timeout_secs,
            log_level,
            prompts_path,
        })
    }
}
