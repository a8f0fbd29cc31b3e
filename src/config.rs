// Runtime configuration.
//
// Values come from built-in defaults, then an optional JSON file in the
// home directory, then environment variables (highest precedence).

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://pixelreviveai.onrender.com";
pub const CONFIG_FILE_NAME: &str = ".pixelrevive.json";

pub const ENV_BASE_URL: &str = "COLORIZE_API_URL";
pub const ENV_OUTPUT_DIR: &str = "PIXELREVIVE_OUTPUT_DIR";
pub const ENV_TIMEOUT_SECS: &str = "PIXELREVIVE_TIMEOUT_SECS";

/// Shape of `~/.pixelrevive.json`. Every key is optional.
#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Parsing configuration json")
    }

    /// Read the file if it exists. A missing file is not an error.
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(FileConfig::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Scheme and host of the colorization service, without trailing slash.
    pub base_url: String,
    /// Where colorized results are saved.
    pub output_dir: PathBuf,
    /// Request timeout. `None` waits as long as the server takes.
    pub timeout: Option<Duration>,
}

impl Config {
    /// Load from `~/.pixelrevive.json` and the process environment.
    pub fn load() -> Result<Self> {
        let file = match dirs::home_dir() {
            Some(home) => FileConfig::read(&home.join(CONFIG_FILE_NAME))?,
            None => FileConfig::default(),
        };
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merge a parsed file with an environment lookup.
    pub fn resolve<F>(file: FileConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = env(ENV_BASE_URL)
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            bail!("Colorization service URL is empty");
        }

        let output_dir = env(ENV_OUTPUT_DIR)
            .map(PathBuf::from)
            .or(file.output_dir)
            .unwrap_or_else(default_output_dir);

        let timeout_secs = match env(ENV_TIMEOUT_SECS) {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("{} must be a number of seconds, got {:?}", ENV_TIMEOUT_SECS, raw))?,
            ),
            None => file.timeout_secs,
        };

        Ok(Config {
            base_url,
            output_dir,
            timeout: timeout_secs.filter(|s| *s > 0).map(Duration::from_secs),
        })
    }

    /// Full URL of the colorize endpoint.
    pub fn colorize_url(&self) -> String {
        format!("{}/colorize", self.base_url)
    }
}

fn default_output_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = Config::resolve(FileConfig::default(), env_of(&[])).unwrap();
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.colorize_url(), "https://pixelreviveai.onrender.com/colorize");
        assert_eq!(cfg.timeout, None);
    }

    #[test]
    fn env_beats_file_beats_default() {
        let file = FileConfig {
            base_url: Some("http://file-host:9000".into()),
            output_dir: Some(PathBuf::from("/from/file")),
            timeout_secs: Some(10),
        };
        let cfg = Config::resolve(file, env_of(&[(ENV_BASE_URL, "http://env-host:8000/")])).unwrap();
        assert_eq!(cfg.base_url, "http://env-host:8000");
        assert_eq!(cfg.output_dir, PathBuf::from("/from/file"));
        assert_eq!(cfg.timeout, Some(Duration::from_secs(10)));

        let env = env_of(&[(ENV_OUTPUT_DIR, "/from/env"), (ENV_TIMEOUT_SECS, "0")]);
        let file = FileConfig {
            output_dir: Some(PathBuf::from("/from/file")),
            timeout_secs: Some(10),
            ..FileConfig::default()
        };
        let cfg = Config::resolve(file, env).unwrap();
        assert_eq!(cfg.output_dir, PathBuf::from("/from/env"));
        // zero means "no timeout"
        assert_eq!(cfg.timeout, None);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Config::resolve(FileConfig::default(), env_of(&[(ENV_BASE_URL, " / ")])).is_err());
        assert!(Config::resolve(FileConfig::default(), env_of(&[(ENV_TIMEOUT_SECS, "soon")])).is_err());
    }

    #[test]
    fn parses_file_json() {
        let parsed = FileConfig::parse(r#"{"base_url": "http://localhost:8000", "timeout_secs": 30}"#).unwrap();
        assert_eq!(parsed.base_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(parsed.timeout_secs, Some(30));
        assert!(parsed.output_dir.is_none());

        assert!(FileConfig::parse(r#"{"base_url": 5}"#).is_err());
        assert!(FileConfig::parse(r#"{"endpoint": "x"}"#).is_err());
    }

    #[test]
    fn missing_file_is_default() {
        let path = std::env::temp_dir().join("pixelrevive-config-does-not-exist.json");
        assert_eq!(FileConfig::read(&path).unwrap(), FileConfig::default());
    }
}
