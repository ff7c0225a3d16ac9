use std::net::SocketAddr;

/// Application-level constants
pub const APP_NAME: &str = "Shukalafiya";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum accepted image upload size (20 MiB), enforced before any decoding.
pub const MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;

/// Upstream model call timeout.
pub const UPSTREAM_TIMEOUT_SECS: u64 = 30;
/// Total attempts per upstream call (1 initial + 2 retries on transport failure).
pub const UPSTREAM_MAX_ATTEMPTS: u32 = 3;

/// Response-length bound for the image analysis call.
pub const ANALYSIS_MAX_TOKENS: u32 = 1500;
/// Response-length bound for follow-up chat replies.
pub const CHAT_MAX_TOKENS: u32 = 1000;
/// Diagnosis is inherently uncertain — favor some diversity over determinism.
pub const SAMPLING_TEMPERATURE: f32 = 0.7;

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    "info,shukalafiya=debug".to_string()
}

/// Runtime configuration, read once at startup. The API key is read-only
/// after this point.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub bind_addr: SocketAddr,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is not configured")]
    MissingApiKey,
    #[error("Invalid bind address '{0}'")]
    InvalidBindAddr(String),
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// `OPENAI_API_KEY` is required; everything else has defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let model =
            std::env::var("SHUKALAFIYA_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());

        let bind = std::env::var("SHUKALAFIYA_BIND")
            .unwrap_or_else(|_| "127.0.0.1:8090".to_string());
        let bind_addr = bind
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(bind))?;

        Ok(Self {
            api_key,
            model,
            base_url,
            bind_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_image_bytes_is_20_mib() {
        assert_eq!(MAX_IMAGE_BYTES, 20 * 1024 * 1024);
    }

    #[test]
    fn app_version_is_populated() {
        assert!(!APP_VERSION.is_empty());
    }

    #[test]
    fn retry_count_is_bounded() {
        assert!(UPSTREAM_MAX_ATTEMPTS <= 3);
        assert!(UPSTREAM_TIMEOUT_SECS <= 60);
    }
}
