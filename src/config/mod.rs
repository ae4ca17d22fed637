use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How many leading token characters status output may reveal.
    pub token_preview_chars: usize,
    /// Chain depth at which the CLI starts warning on further pushes.
    pub warn_depth: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("API_BASE_URL") {
            self.api.base_url = v;
        }
        if let Ok(v) = env::var("API_REQUEST_TIMEOUT_SECS") {
            self.api.request_timeout_secs = v.parse().unwrap_or(self.api.request_timeout_secs);
        }

        // Session overrides
        if let Ok(v) = env::var("SESSION_TOKEN_PREVIEW_CHARS") {
            self.session.token_preview_chars = v.parse().unwrap_or(self.session.token_preview_chars);
        }
        if let Ok(v) = env::var("SESSION_WARN_DEPTH") {
            self.session.warn_depth = v.parse().unwrap_or(self.session.warn_depth);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:9001".to_string(),
                request_timeout_secs: 30,
            },
            session: SessionConfig {
                token_preview_chars: 8,
                warn_depth: 5,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: "https://api.staging.relay.example.com".to_string(),
                request_timeout_secs: 15,
            },
            session: SessionConfig {
                token_preview_chars: 8,
                warn_depth: 3,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: "https://api.relay.example.com".to_string(),
                request_timeout_secs: 10,
            },
            session: SessionConfig {
                token_preview_chars: 4,
                warn_depth: 3,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.api.base_url, "http://localhost:9001");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.session.warn_depth, 5);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.api.base_url.starts_with("https://"));
        assert_eq!(config.api.request_timeout_secs, 10);
        assert_eq!(config.session.token_preview_chars, 4);
    }
}
