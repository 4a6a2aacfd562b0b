//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Spreadsheet output path
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Spreadsheet format
    #[serde(default)]
    pub format: OutputFormat,

    /// First listing page to request
    #[serde(default = "default_start_page")]
    pub start_page: u32,

    /// Stop after this many listing pages even if the catalog continues
    #[serde(default)]
    pub max_pages: Option<u32>,

    /// Extra attempts for a listing page that failed to load
    #[serde(default)]
    pub page_retries: u32,

    /// Detail pages fetched at once for a single listing page
    #[serde(default = "default_detail_concurrency")]
    pub detail_concurrency: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,
}

fn default_output() -> PathBuf {
    PathBuf::from("products.xlsx")
}

fn default_start_page() -> u32 {
    1
}

fn default_detail_concurrency() -> usize {
    1
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: default_output(),
            format: OutputFormat::Xlsx,
            start_page: default_start_page(),
            max_pages: None,
            page_retries: 0,
            detail_concurrency: default_detail_concurrency(),
            timeout_secs: default_timeout_secs(),
            proxy: None,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("fragrance-scraper").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(self) -> Self {
        self.with_vars(|key| std::env::var(key).ok())
    }

    fn with_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(output) = var("FRAGRANCE_OUTPUT") {
            self.output = PathBuf::from(output);
        }

        if let Some(proxy) = var("FRAGRANCE_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Some(page) = var("FRAGRANCE_START_PAGE").and_then(|p| p.parse().ok()) {
            self.start_page = page;
        }

        self
    }

    /// Rejects settings the walker cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.start_page == 0 {
            anyhow::bail!("start_page must be at least 1");
        }
        if self.detail_concurrency == 0 {
            anyhow::bail!("detail_concurrency must be at least 1");
        }
        if self.max_pages == Some(0) {
            anyhow::bail!("max_pages must be at least 1 when set");
        }
        Ok(())
    }
}

/// Spreadsheet format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(OutputFormat::Xlsx),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: xlsx, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Xlsx => write!(f, "xlsx"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output, PathBuf::from("products.xlsx"));
        assert_eq!(config.format, OutputFormat::Xlsx);
        assert_eq!(config.start_page, 1);
        assert_eq!(config.max_pages, None);
        assert_eq!(config.page_retries, 0);
        assert_eq!(config.detail_concurrency, 1);
        assert_eq!(config.timeout_secs, 30);
        assert!(config.proxy.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("xlsx".parse::<OutputFormat>().unwrap(), OutputFormat::Xlsx);
        assert_eq!("EXCEL".parse::<OutputFormat>().unwrap(), OutputFormat::Xlsx);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);

        let err = "json".parse::<OutputFormat>().unwrap_err();
        assert!(err.contains("Unknown format"));
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Xlsx.to_string(), "xlsx");
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "output = \"out/fragrances.csv\"\nformat = \"csv\"\nmax_pages = 3").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.output, PathBuf::from("out/fragrances.csv"));
        assert_eq!(config.format, OutputFormat::Csv);
        assert_eq!(config.max_pages, Some(3));
        assert_eq!(config.start_page, 1);
        assert_eq!(config.detail_concurrency, 1);
    }

    #[test]
    fn test_from_file_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "start_page = \"first\"").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = Config::from_file("/nonexistent/fragrance.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "page_retries = 2").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.page_retries, 2);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("FRAGRANCE_OUTPUT", "env.xlsx"),
            ("FRAGRANCE_PROXY", "socks5://127.0.0.1:1080"),
            ("FRAGRANCE_START_PAGE", "12"),
        ]);

        let config = Config::default().with_vars(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.output, PathBuf::from("env.xlsx"));
        assert_eq!(config.proxy.as_deref(), Some("socks5://127.0.0.1:1080"));
        assert_eq!(config.start_page, 12);
    }

    #[test]
    fn test_env_ignores_unparseable_page() {
        let config = Config::default()
            .with_vars(|key| (key == "FRAGRANCE_START_PAGE").then(|| "abc".to_string()));
        assert_eq!(config.start_page, 1);
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        assert!(Config { start_page: 0, ..Config::default() }.validate().is_err());
        assert!(Config { detail_concurrency: 0, ..Config::default() }.validate().is_err());
        assert!(Config { max_pages: Some(0), ..Config::default() }.validate().is_err());
    }
}
