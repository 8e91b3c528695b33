use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const DEFAULT_SUBMIT_URL: &str = "https://jsonplaceholder.typicode.com/posts";
const DEFAULT_SUBMIT_TIMEOUT_SECS: u64 = 5;
const DEFAULT_COMPLETION_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 500;
const DEFAULT_DATA_DIR: &str = ".benefit-intake";

/// Environment variable consulted when `[completion].api_key` is unset.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

// ─── SubmissionConfig ─────────────────────────────────────────────────────────

/// Submission endpoint configuration (`[submission]` in config.toml).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SubmissionConfig {
    /// Where the finalized record is POSTed.
    pub endpoint_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_SUBMIT_URL.to_string(),
            timeout_secs: DEFAULT_SUBMIT_TIMEOUT_SECS,
        }
    }
}

// ─── CompletionConfig ─────────────────────────────────────────────────────────

/// Completion endpoint configuration (`[completion]` in config.toml).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Base URL of the OpenAI-style API.
    pub base_url: String,
    /// API key. Falls back to the `OPENAI_API_KEY` environment variable
    /// when unset so keys stay out of config files.
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Request timeout in seconds. Generations are slower than plain
    /// POSTs.
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_COMPLETION_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_COMPLETION_TIMEOUT_SECS,
        }
    }
}

impl CompletionConfig {
    /// The configured key, or the environment fallback.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()))
    }
}

// ─── StorageConfig ────────────────────────────────────────────────────────────

/// Snapshot storage configuration (`[storage]` in config.toml).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the snapshot file.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

// ─── EngineConfig ─────────────────────────────────────────────────────────────

/// Top-level engine configuration. Every knob has a default, so an absent
/// or partial config file is fine.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub submission: SubmissionConfig,
    pub completion: CompletionConfig,
    pub storage: StorageConfig,
}

impl EngineConfig {
    /// Load from a TOML file. A missing file yields defaults; a file that
    /// fails to parse is logged and also yields defaults — configuration
    /// problems never keep the form from starting.
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no config file — using defaults");
                return Self::default();
            }
            Err(e) => {
                warn!(path = %path.display(), err = %e, "config unreadable — using defaults");
                return Self::default();
            }
        };
        match toml::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), err = %e, "config invalid — using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let config = EngineConfig::default();
        assert_eq!(config.submission.endpoint_url, DEFAULT_SUBMIT_URL);
        assert_eq!(config.completion.model, DEFAULT_MODEL);
        assert_eq!(config.completion.max_tokens, 500);
        assert_eq!(config.storage.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            [completion]
            model = "gpt-4o-mini"
            "#,
        )
        .unwrap();
        assert_eq!(config.completion.model, "gpt-4o-mini");
        assert_eq!(config.completion.base_url, DEFAULT_COMPLETION_BASE_URL);
        assert_eq!(config.submission.timeout_secs, DEFAULT_SUBMIT_TIMEOUT_SECS);
    }

    #[test]
    fn configured_api_key_wins_over_environment() {
        let config = CompletionConfig {
            api_key: Some("sk-from-config".into()),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-from-config"));
    }

    #[test]
    fn empty_api_key_counts_as_unset() {
        let config = CompletionConfig {
            api_key: Some(String::new()),
            ..Default::default()
        };
        // Falls through to the environment, which may or may not be set;
        // either way the empty configured value must not be returned.
        assert_ne!(config.resolve_api_key().as_deref(), Some(""));
    }

    #[test]
    fn missing_config_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load(&dir.path().join("nope.toml"));
        assert_eq!(config.completion.model, DEFAULT_MODEL);
    }

    #[test]
    fn invalid_config_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not = [valid").unwrap();
        let config = EngineConfig::load(&path);
        assert_eq!(config.submission.endpoint_url, DEFAULT_SUBMIT_URL);
    }
}
