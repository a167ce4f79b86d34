use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Status of config file loading
#[derive(Debug, Clone)]
pub enum ConfigLoadStatus {
    /// Config loaded successfully from existing file
    Loaded,
    /// Created default config file (first run)
    Created,
    /// Error occurred during loading, using defaults.
    Error(String),
}

/// Generation endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Base URL of the OpenAI-compatible chat-completion service.
    pub base_url: String,
    pub model: String,
    /// Bound on every generation request. An unresponsive endpoint fails
    /// the call instead of stalling the session.
    pub timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:1234".to_string(),
            model: "local-model".to_string(),
            timeout_secs: 120,
        }
    }
}

impl EndpointConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Per-call generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub spec_max_tokens: u32,
    pub spec_temperature: f32,
    pub checklist_max_tokens: u32,
    pub checklist_temperature: f32,
    /// Verification calls are classification, not prose: small budget,
    /// near-deterministic temperature.
    pub verify_max_tokens: u32,
    pub verify_temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            spec_max_tokens: 3000,
            spec_temperature: 0.7,
            checklist_max_tokens: 1500,
            checklist_temperature: 0.5,
            verify_max_tokens: 300,
            verify_temperature: 0.1,
        }
    }
}

/// Text-to-speech configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    pub voice: String,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:8880".to_string(),
            model: "kokoro".to_string(),
            voice: "af_sky".to_string(),
        }
    }
}

/// Path configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub output_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output_dir: "./outputs".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub tts: TtsConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Expand `~` to home directory in a path string
    pub fn expand_tilde(path: &str) -> PathBuf {
        if let Some(stripped) = path.strip_prefix("~/")
            && let Some(home) = dirs::home_dir()
        {
            return home.join(stripped);
        }
        PathBuf::from(path)
    }

    /// Get the expanded output directory path
    pub fn output_dir(&self) -> PathBuf {
        Self::expand_tilde(&self.paths.output_dir)
    }
}

/// Loaded configuration with metadata
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub config_path: PathBuf,
    pub status: ConfigLoadStatus,
}

/// Get the platform-appropriate config directory
fn get_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "cmoel", "specsmith").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the full path to the config file
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.toml"))
}

/// Load configuration from file, environment, and defaults
pub fn load_config() -> LoadedConfig {
    let config_path = match get_config_path() {
        Some(path) => path,
        None => {
            warn!("Could not determine config directory, using defaults");
            return LoadedConfig {
                config: apply_env_overrides(Config::default()),
                config_path: PathBuf::from("config.toml"),
                status: ConfigLoadStatus::Error("Could not determine config directory".to_string()),
            };
        }
    };

    debug!("Config path: {:?}", config_path);

    let (config, status) = load_or_create_config(&config_path);
    let config = apply_env_overrides(config);

    LoadedConfig {
        config,
        config_path,
        status,
    }
}

/// Load config from file, or create default if not exists
fn load_or_create_config(config_path: &PathBuf) -> (Config, ConfigLoadStatus) {
    match fs::read_to_string(config_path) {
        Ok(contents) => match toml::from_str::<Config>(&contents) {
            Ok(config) => {
                info!("Loaded config from {:?}", config_path);
                (config, ConfigLoadStatus::Loaded)
            }
            Err(e) => {
                warn!(
                    "Config file malformed at {:?}: {}. Using defaults.",
                    config_path, e
                );
                (
                    Config::default(),
                    ConfigLoadStatus::Error(format!("Malformed TOML: {}", e)),
                )
            }
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            // Config doesn't exist, create default
            create_default_config(config_path)
        }
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            warn!(
                "Permission denied reading config at {:?}. Using defaults.",
                config_path
            );
            (
                Config::default(),
                ConfigLoadStatus::Error("Permission denied reading config".to_string()),
            )
        }
        Err(e) => {
            warn!(
                "Error reading config at {:?}: {}. Using defaults.",
                config_path, e
            );
            (
                Config::default(),
                ConfigLoadStatus::Error(format!("Read error: {}", e)),
            )
        }
    }
}

/// Create the default config file
fn create_default_config(config_path: &PathBuf) -> (Config, ConfigLoadStatus) {
    let config = Config::default();

    // Ensure parent directory exists
    if let Some(parent) = config_path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!(
            "Could not create config directory {:?}: {}. Continuing without file.",
            parent, e
        );
        return (
            config,
            ConfigLoadStatus::Error(format!("Could not create config directory: {}", e)),
        );
    }

    // Serialize to TOML
    let toml_content = match toml::to_string_pretty(&config) {
        Ok(s) => s,
        Err(e) => {
            warn!("Could not serialize default config: {}", e);
            return (
                config,
                ConfigLoadStatus::Error(format!("Serialization error: {}", e)),
            );
        }
    };

    // Write file
    match fs::write(config_path, &toml_content) {
        Ok(()) => {
            info!("Created default config at {:?}", config_path);
            (config, ConfigLoadStatus::Created)
        }
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            warn!(
                "Permission denied creating config at {:?}. Continuing without file.",
                config_path
            );
            (
                config,
                ConfigLoadStatus::Error("Permission denied creating config".to_string()),
            )
        }
        Err(e) => {
            warn!(
                "Could not write default config to {:?}: {}. Continuing without file.",
                config_path, e
            );
            (
                config,
                ConfigLoadStatus::Error(format!("Write error: {}", e)),
            )
        }
    }
}

/// Apply environment variable overrides to config
fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(url) = env::var("SPECSMITH_ENDPOINT") {
        debug!("Overriding endpoint.base_url from SPECSMITH_ENDPOINT");
        config.endpoint.base_url = url;
    }

    if let Ok(model) = env::var("SPECSMITH_MODEL") {
        debug!("Overriding endpoint.model from SPECSMITH_MODEL");
        config.endpoint.model = model;
    }

    if let Ok(dir) = env::var("SPECSMITH_OUTPUT_DIR") {
        debug!("Overriding paths.output_dir from SPECSMITH_OUTPUT_DIR");
        config.paths.output_dir = dir;
    }

    if let Ok(level) = env::var("SPECSMITH_LOG") {
        debug!("Overriding logging.level from SPECSMITH_LOG");
        config.logging.level = level;
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.endpoint.base_url, "http://localhost:1234");
        assert_eq!(config.endpoint.model, "local-model");
        assert_eq!(config.endpoint.timeout_secs, 120);
        assert_eq!(config.paths.output_dir, "./outputs");
        assert_eq!(config.logging.level, "info");
        assert!(config.tts.enabled);
    }

    #[test]
    fn test_default_generation_parameters() {
        let config = Config::default();
        // Verification calls are terse classification.
        assert!(config.generation.verify_max_tokens < config.generation.spec_max_tokens);
        assert!(config.generation.verify_temperature < config.generation.spec_temperature);
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = Config::expand_tilde("~/.config/test");
        assert!(!expanded.to_string_lossy().starts_with('~'));

        let no_tilde = Config::expand_tilde("/absolute/path");
        assert_eq!(no_tilde, PathBuf::from("/absolute/path"));

        let relative = Config::expand_tilde("./relative/path");
        assert_eq!(relative, PathBuf::from("./relative/path"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
[endpoint]
base_url = "http://localhost:8080"
model = "qwen2.5-coder"
timeout_secs = 60

[paths]
output_dir = "./custom-outputs"

[logging]
level = "debug"
"#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.endpoint.base_url, "http://localhost:8080");
        assert_eq!(config.endpoint.model, "qwen2.5-coder");
        assert_eq!(config.endpoint.timeout_secs, 60);
        assert_eq!(config.paths.output_dir, "./custom-outputs");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_config_partial_deserialization() {
        // Only endpoint section specified, others should use defaults
        let toml_str = r#"
[endpoint]
model = "custom-model"
"#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.endpoint.model, "custom-model");
        // Unspecified fields within the section keep their defaults
        assert_eq!(config.endpoint.base_url, "http://localhost:1234");
        // Other sections are defaults
        assert_eq!(config.paths.output_dir, "./outputs");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let toml_str = r#"
[endpoint]
model = "custom-model"
unknown_key = "should be ignored"

[unknown_section]
foo = "bar"
"#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.endpoint.model, "custom-model");
    }

    #[test]
    fn test_tts_section() {
        let toml_str = r#"
[tts]
enabled = false
voice = "af_bella"
"#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(!config.tts.enabled);
        assert_eq!(config.tts.voice, "af_bella");
        assert_eq!(config.tts.model, "kokoro");
    }

    #[test]
    fn test_endpoint_timeout_duration() {
        let config = EndpointConfig {
            timeout_secs: 30,
            ..EndpointConfig::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }
}
