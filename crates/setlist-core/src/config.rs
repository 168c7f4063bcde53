//! Service configuration
//!
//! TOML-based configuration for the metadata server, the SoundCloud client
//! and the recognition pipeline. Every field has a default, so an empty file
//! (or no file at all) is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SetlistConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub soundcloud: SoundCloudConfig,
    #[serde(default)]
    pub recognition: RecognitionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins; `*` allows any origin
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_allowed_origins: default_cors_allowed_origins(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_cors_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

/// SoundCloud client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SoundCloudConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_web_base_url")]
    pub web_base_url: String,
    /// Public API client id; discovered from the web app when unset
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default = "default_soundcloud_timeout")]
    pub timeout_secs: u64,
    /// Fall back to scraping the track page when the API is unavailable
    #[serde(default = "default_scrape_fallback")]
    pub scrape_fallback: bool,
}

impl Default for SoundCloudConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            web_base_url: default_web_base_url(),
            client_id: None,
            timeout_secs: default_soundcloud_timeout(),
            scrape_fallback: default_scrape_fallback(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://api-v2.soundcloud.com".to_string()
}
fn default_web_base_url() -> String {
    "https://soundcloud.com".to_string()
}
fn default_soundcloud_timeout() -> u64 {
    10
}
fn default_scrape_fallback() -> bool {
    true
}

/// Recognition pipeline configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecognitionConfig {
    #[serde(default = "default_chunk_seconds")]
    pub chunk_seconds: u64,
    /// Sample rate of the segments sent for recognition
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Per-segment recognition timeout
    #[serde(default = "default_recognition_timeout")]
    pub timeout_secs: u64,
    /// Segments recognized in parallel
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_token: Option<String>,
    /// Work directory for downloads and segments; a temporary directory when unset
    #[serde(default)]
    pub work_dir: Option<PathBuf>,
    #[serde(default)]
    pub keep_download: bool,
    /// yt-dlp format selector
    #[serde(default = "default_download_format")]
    pub download_format: Option<String>,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            chunk_seconds: default_chunk_seconds(),
            sample_rate: default_sample_rate(),
            timeout_secs: default_recognition_timeout(),
            concurrency: default_concurrency(),
            endpoint: default_endpoint(),
            api_token: None,
            work_dir: None,
            keep_download: false,
            download_format: default_download_format(),
        }
    }
}

fn default_chunk_seconds() -> u64 {
    60
}
fn default_sample_rate() -> u32 {
    16000
}
fn default_recognition_timeout() -> u64 {
    20
}
fn default_concurrency() -> usize {
    1
}
fn default_endpoint() -> String {
    crate::recognizer::AUDD_API_URL.to_string()
}
fn default_download_format() -> Option<String> {
    Some("http_mp3_1_0".to_string())
}

/// Output artifact locations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_setlist_path")]
    pub setlist_path: PathBuf,
    /// Raw per-segment track list, written only when set
    #[serde(default)]
    pub track_list_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            setlist_path: default_setlist_path(),
            track_list_path: None,
        }
    }
}

fn default_setlist_path() -> PathBuf {
    PathBuf::from("src/data/track_setlist_melted.json")
}

impl SetlistConfig {
    /// Load configuration from TOML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file {}: {}", path.display(), e))?;
        let config: SetlistConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML config: {}", e))?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise from `setlist.toml` when present,
    /// otherwise defaults; then apply environment overrides and validate
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None if Path::new("setlist.toml").exists() => Self::load(Path::new("setlist.toml"))?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Override values from environment variables
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(origins) = lookup("CORS_ALLOWED_ORIGINS") {
            let origins: Vec<String> = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
            if !origins.is_empty() {
                self.server.cors_allowed_origins = origins;
            }
        }
        if let Some(client_id) = lookup("SOUNDCLOUD_CLIENT_ID").filter(|v| !v.is_empty()) {
            self.soundcloud.client_id = Some(client_id);
        }
        if let Some(token) = lookup("AUDD_API_TOKEN").filter(|v| !v.is_empty()) {
            self.recognition.api_token = Some(token);
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.recognition.chunk_seconds == 0 {
            anyhow::bail!("recognition.chunk_seconds must be > 0");
        }
        if self.recognition.sample_rate == 0 {
            anyhow::bail!("recognition.sample_rate must be > 0");
        }
        if self.recognition.concurrency == 0 {
            anyhow::bail!("recognition.concurrency must be > 0");
        }
        if self.server.cors_allowed_origins.is_empty() {
            anyhow::bail!("server.cors_allowed_origins must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SetlistConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.recognition.chunk_seconds, 60);
        assert_eq!(config.recognition.concurrency, 1);
        assert_eq!(config.server.cors_allowed_origins, vec!["*"]);
        assert!(config.soundcloud.scrape_fallback);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_str = r#"
            [server]
            port = 5002

            [recognition]
            chunk_seconds = 30
            concurrency = 4

            [output]
            setlist_path = "out/setlist.json"
            track_list_path = "out/track_list.json"
        "#;

        let config: SetlistConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 5002);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.recognition.chunk_seconds, 30);
        assert_eq!(config.recognition.sample_rate, 16000);
        assert_eq!(config.output.setlist_path, PathBuf::from("out/setlist.json"));
        assert_eq!(
            config.output.track_list_path,
            Some(PathBuf::from("out/track_list.json"))
        );
    }

    #[test]
    fn test_env_overrides() {
        let mut config = SetlistConfig::default();
        config.apply_env(|key| match key {
            "CORS_ALLOWED_ORIGINS" => Some("http://localhost:3000, https://setlists.example".to_string()),
            "AUDD_API_TOKEN" => Some("token".to_string()),
            _ => None,
        });

        assert_eq!(
            config.server.cors_allowed_origins,
            vec!["http://localhost:3000", "https://setlists.example"]
        );
        assert_eq!(config.recognition.api_token.as_deref(), Some("token"));
        assert_eq!(config.soundcloud.client_id, None);
    }

    #[test]
    fn test_zero_chunk_fails_validation() {
        let mut config = SetlistConfig::default();
        config.recognition.chunk_seconds = 0;
        assert!(config.validate().is_err());
    }
}
