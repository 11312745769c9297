use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_MAX_DOCUMENT_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    /// The HTTP summarization / quiz backend.
    Backend,
    /// Canned offline questions, for demos without a backend.
    Sample,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub generator: GeneratorKind,
    pub chatgpt_api_key: Option<String>,
    pub database_path: String,
    pub download_dir: PathBuf,
    pub max_document_bytes: u64,
    pub request_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            generator: GeneratorKind::Backend,
            chatgpt_api_key: None,
            database_path: "db.sqlite".to_string(),
            download_dir: PathBuf::from("downloads"),
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            request_timeout: None,
        }
    }
}

impl Config {
    /// Reads the process environment. Call `dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let generator = match var("GENERATOR").as_deref().map(str::trim) {
            None | Some("backend") => GeneratorKind::Backend,
            Some("sample") => GeneratorKind::Sample,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "GENERATOR",
                    value: other.to_string(),
                    reason: "expected `backend` or `sample`".to_string(),
                })
            }
        };

        let max_document_bytes = match var("MAX_DOCUMENT_BYTES") {
            Some(raw) => parse_number("MAX_DOCUMENT_BYTES", &raw)?,
            None => defaults.max_document_bytes,
        };

        let request_timeout = var("REQUEST_TIMEOUT_SECS")
            .map(|raw| parse_number("REQUEST_TIMEOUT_SECS", &raw).map(Duration::from_secs))
            .transpose()?;

        Ok(Self {
            backend_url: var("BACKEND_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.backend_url),
            generator,
            chatgpt_api_key: var("CHATGPT_API_KEY"),
            database_path: var("DATABASE_PATH").unwrap_or(defaults.database_path),
            download_dir: var("DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.download_dir),
            max_document_bytes,
            request_timeout,
        })
    }
}

fn parse_number(name: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
        name,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config(&[]).unwrap();
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.generator, GeneratorKind::Backend);
        assert_eq!(config.max_document_bytes, DEFAULT_MAX_DOCUMENT_BYTES);
        assert!(config.request_timeout.is_none());
        assert!(config.chatgpt_api_key.is_none());
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("BACKEND_URL", "http://quiz.internal:9000/"),
            ("GENERATOR", "sample"),
            ("MAX_DOCUMENT_BYTES", "1024"),
            ("REQUEST_TIMEOUT_SECS", "30"),
            ("CHATGPT_API_KEY", "sk-test"),
        ])
        .unwrap();
        assert_eq!(config.backend_url, "http://quiz.internal:9000");
        assert_eq!(config.generator, GeneratorKind::Sample);
        assert_eq!(config.max_document_bytes, 1024);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.chatgpt_api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn rejects_garbage() {
        assert!(config(&[("GENERATOR", "magic")]).is_err());
        assert!(config(&[("MAX_DOCUMENT_BYTES", "ten")]).is_err());
    }

    #[test]
    fn blank_key_counts_as_unset() {
        let config = config(&[("CHATGPT_API_KEY", "  ")]).unwrap();
        assert!(config.chatgpt_api_key.is_none());
    }
}
