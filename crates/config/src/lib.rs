//! Configuration loading, validation, and management for Scriptorium.
//!
//! Loads configuration from `~/.scriptorium/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Key values that ship in templates and must never reach a provider.
const PLACEHOLDER_KEYS: &[&str] = &["SUA_CHAVE_API_AQUI", "YOUR_API_KEY_HERE"];

/// The root configuration structure.
///
/// Maps directly to `~/.scriptorium/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// LLM provider: "gemini" or any OpenAI-compatible name
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model name sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Temperature for generation and expansion
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Temperature for rewrites
    #[serde(default = "default_creative_temperature")]
    pub creative_temperature: f32,

    /// Max tokens per response (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Language the essay is written in
    #[serde(default = "default_language")]
    pub language: String,

    /// Directory holding saved records and exported PDFs
    #[serde(default = "default_history_dir")]
    pub history_dir: PathBuf,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// PDF layout settings
    #[serde(default)]
    pub export: ExportConfig,
}

fn default_provider() -> String {
    "gemini".into()
}
fn default_model() -> String {
    "gemini-2.5-flash".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_creative_temperature() -> f32 {
    0.9
}
fn default_language() -> String {
    "English".into()
}
fn default_history_dir() -> PathBuf {
    PathBuf::from("works")
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("creative_temperature", &self.creative_temperature)
            .field("max_tokens", &self.max_tokens)
            .field("language", &self.language)
            .field("history_dir", &self.history_dir)
            .field("providers", &self.providers)
            .field("export", &self.export)
            .finish()
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Page geometry and font sizes for PDF export. Lengths in millimetres,
/// font sizes in points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_margin")]
    pub margin_left: f32,

    #[serde(default = "default_margin")]
    pub margin_top: f32,

    #[serde(default = "default_margin")]
    pub margin_right: f32,

    #[serde(default = "default_margin")]
    pub margin_bottom: f32,

    #[serde(default = "default_title_size")]
    pub title_size: f32,

    #[serde(default = "default_heading_size")]
    pub heading_size: f32,

    #[serde(default = "default_subheading_size")]
    pub subheading_size: f32,

    #[serde(default = "default_text_size")]
    pub text_size: f32,

    /// TrueType font with Unicode coverage; built-in Helvetica when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
}

fn default_margin() -> f32 {
    15.0
}
fn default_title_size() -> f32 {
    16.0
}
fn default_heading_size() -> f32 {
    14.0
}
fn default_subheading_size() -> f32 {
    12.0
}
fn default_text_size() -> f32 {
    11.0
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            margin_left: default_margin(),
            margin_top: default_margin(),
            margin_right: default_margin(),
            margin_bottom: default_margin(),
            title_size: default_title_size(),
            heading_size: default_heading_size(),
            subheading_size: default_subheading_size(),
            text_size: default_text_size(),
            font_path: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.scriptorium/config.toml).
    ///
    /// Also checks environment variables:
    /// - `SCRIPTORIUM_API_KEY` (highest priority), `GEMINI_API_KEY`, `OPENAI_API_KEY`
    /// - `SCRIPTORIUM_PROVIDER`, `SCRIPTORIUM_MODEL`, `SCRIPTORIUM_HISTORY_DIR`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through a lookup function.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.api_key.as_deref().is_none_or(|k| !is_usable_key(k)) {
            let usable = |name: &str| lookup(name).filter(|k| is_usable_key(k));
            if let Some(key) = usable("SCRIPTORIUM_API_KEY")
                .or_else(|| usable("GEMINI_API_KEY"))
                .or_else(|| usable("OPENAI_API_KEY"))
            {
                self.api_key = Some(key);
            }
        }

        if let Some(provider) = lookup("SCRIPTORIUM_PROVIDER") {
            self.provider = provider;
        }

        if let Some(model) = lookup("SCRIPTORIUM_MODEL") {
            self.model = model;
        }

        if let Some(dir) = lookup("SCRIPTORIUM_HISTORY_DIR") {
            self.history_dir = PathBuf::from(dir);
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".scriptorium")
    }

    /// Get the configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, t) in [
            ("temperature", self.temperature),
            ("creative_temperature", self.creative_temperature),
        ] {
            if !(0.0..=2.0).contains(&t) {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be between 0.0 and 2.0"
                )));
            }
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationError("model must not be empty".into()));
        }

        let e = &self.export;
        if [e.title_size, e.heading_size, e.subheading_size, e.text_size]
            .iter()
            .any(|s| *s <= 0.0)
        {
            return Err(ConfigError::ValidationError("font sizes must be > 0".into()));
        }
        if [e.margin_left, e.margin_top, e.margin_right, e.margin_bottom]
            .iter()
            .any(|m| *m < 0.0)
        {
            return Err(ConfigError::ValidationError("margins must be >= 0".into()));
        }

        Ok(())
    }

    /// The key for the active provider: per-provider key first, then the
    /// top-level one. Placeholder values count as missing.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.providers
            .get(&self.provider)
            .and_then(|p| p.api_key.clone())
            .filter(|k| is_usable_key(k))
            .or_else(|| self.api_key.clone().filter(|k| is_usable_key(k)))
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.resolved_api_key().is_some()
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            model: default_model(),
            temperature: default_temperature(),
            creative_temperature: default_creative_temperature(),
            max_tokens: None,
            language: default_language(),
            history_dir: default_history_dir(),
            providers: HashMap::new(),
            export: ExportConfig::default(),
        }
    }
}

/// A key is usable when it is non-blank and not a template placeholder.
pub fn is_usable_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && !PLACEHOLDER_KEYS.contains(&key)
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "gemini");
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.history_dir, PathBuf::from("works"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.provider, config.provider);
        assert_eq!(parsed.export.text_size, config.export.text_size);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            creative_temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_font_size_rejected() {
        let mut config = AppConfig::default();
        config.export.subheading_size = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().provider, "gemini");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            tmp,
            r#"
model = "gemini-2.0-flash"
history_dir = "/var/lib/scriptorium"

[export]
text_size = 10.5
"#
        )
        .unwrap();

        let config = AppConfig::load_from(tmp.path()).unwrap();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.history_dir, PathBuf::from("/var/lib/scriptorium"));
        assert_eq!(config.export.text_size, 10.5);
        assert_eq!(config.export.heading_size, 14.0);
        assert_eq!(config.provider, "gemini");
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "model = [unterminated").unwrap();
        let err = AppConfig::load_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn env_overrides_apply_in_priority_order() {
        let mut config = AppConfig::default();
        config.apply_env(|name| match name {
            "GEMINI_API_KEY" => Some("gemini-key".into()),
            "OPENAI_API_KEY" => Some("openai-key".into()),
            "SCRIPTORIUM_MODEL" => Some("gemini-2.5-pro".into()),
            _ => None,
        });
        assert_eq!(config.api_key.as_deref(), Some("gemini-key"));
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.provider, "gemini");
    }

    #[test]
    fn file_key_wins_over_env() {
        let mut config = AppConfig {
            api_key: Some("from-file".into()),
            ..AppConfig::default()
        };
        config.apply_env(|_| Some("from-env".into()));
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn placeholder_keys_are_not_usable() {
        let config = AppConfig {
            api_key: Some("SUA_CHAVE_API_AQUI".into()),
            ..AppConfig::default()
        };
        assert!(!config.has_api_key());
        assert!(!is_usable_key("   "));
        assert!(is_usable_key("AIza-real-key"));
    }

    #[test]
    fn provider_key_overrides_top_level() {
        let mut config = AppConfig {
            api_key: Some("top".into()),
            ..AppConfig::default()
        };
        config.providers.insert(
            "gemini".into(),
            ProviderConfig {
                api_key: Some("scoped".into()),
                api_url: None,
            },
        );
        assert_eq!(config.resolved_api_key().as_deref(), Some("scoped"));
    }

    #[test]
    fn env_key_replaces_placeholder_file_key() {
        let mut config = AppConfig {
            api_key: Some("SUA_CHAVE_API_AQUI".into()),
            ..AppConfig::default()
        };
        config.apply_env(|name| match name {
            "SCRIPTORIUM_API_KEY" => Some("YOUR_API_KEY_HERE".into()),
            "GEMINI_API_KEY" => Some("AIza-real-env-key".into()),
            _ => None,
        });
        assert_eq!(config.resolved_api_key().as_deref(), Some("AIza-real-env-key"));
    }

    #[test]
    fn placeholder_provider_key_falls_back_to_top_level() {
        let mut config = AppConfig {
            api_key: Some("top".into()),
            ..AppConfig::default()
        };
        config.providers.insert(
            "gemini".into(),
            ProviderConfig {
                api_key: Some("SUA_CHAVE_API_AQUI".into()),
                api_url: None,
            },
        );
        assert_eq!(config.resolved_api_key().as_deref(), Some("top"));
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = AppConfig {
            api_key: Some("AIza-secret".into()),
            ..AppConfig::default()
        };
        let text = format!("{config:?}");
        assert!(!text.contains("AIza-secret"));
        assert!(text.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("gemini-2.5-flash"));
        assert!(toml_str.contains("[export]"));
    }
}
