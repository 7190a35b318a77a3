use std::fmt;

use tracing::warn;

use crate::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Runtime settings, read from the process environment.
#[derive(Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// Absent keys are tolerated at startup; LLM calls fail until one is set.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_upload_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
                warn!(value = %raw, "Invalid PORT, using default {}", DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => defaults.port,
        };

        let max_upload_bytes = match non_empty("MAX_UPLOAD_BYTES") {
            Some(raw) => raw.parse::<usize>().unwrap_or_else(|_| {
                warn!(value = %raw, "Invalid MAX_UPLOAD_BYTES, using default");
                DEFAULT_MAX_UPLOAD_BYTES
            }),
            None => defaults.max_upload_bytes,
        };

        Self {
            host: non_empty("HOST").unwrap_or(defaults.host),
            port,
            api_key: non_empty("GROQ_API_KEY"),
            base_url: non_empty("GROQ_BASE_URL").unwrap_or(defaults.base_url),
            model: non_empty("LLM_MODEL").unwrap_or(defaults.model),
            max_upload_bytes,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}
