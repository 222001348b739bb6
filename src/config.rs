//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sheets: SheetsConfig,

    #[serde(default)]
    pub refresh: RefreshConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How sheets are downloaded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
    /// Public CSV export, columns matched by header name
    #[default]
    CsvExport,
    /// Sheets v4 values API, columns matched by position
    ValuesApi,
}

impl std::str::FromStr for SourceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv_export" | "csv" => Ok(SourceMode::CsvExport),
            "values_api" | "api" => Ok(SourceMode::ValuesApi),
            _ => Err(format!("Unknown source mode: {}", s)),
        }
    }
}

/// Spreadsheet source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
    #[serde(default)]
    pub mode: SourceMode,

    #[serde(default)]
    pub spreadsheet_id: String,

    /// Only used by the values API
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_transactions_sheet")]
    pub transactions_sheet: String,

    #[serde(default = "default_revenue_sheet")]
    pub revenue_sheet: String,

    #[serde(default = "default_transactions_range")]
    pub transactions_range: String,

    #[serde(default = "default_revenue_range")]
    pub revenue_range: String,

    #[serde(default = "default_sheet_timeout")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_export_base_url")]
    pub export_base_url: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

fn default_transactions_sheet() -> String {
    "거래내역".to_string()
}

fn default_revenue_sheet() -> String {
    "매출".to_string()
}

fn default_transactions_range() -> String {
    "A2:K".to_string()
}

fn default_revenue_range() -> String {
    "A2:C".to_string()
}

fn default_sheet_timeout() -> u64 {
    10_000
}

fn default_export_base_url() -> String {
    "https://docs.google.com".to_string()
}

fn default_api_base_url() -> String {
    "https://sheets.googleapis.com".to_string()
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            mode: SourceMode::default(),
            spreadsheet_id: String::new(),
            api_key: None,
            transactions_sheet: default_transactions_sheet(),
            revenue_sheet: default_revenue_sheet(),
            transactions_range: default_transactions_range(),
            revenue_range: default_revenue_range(),
            request_timeout_ms: default_sheet_timeout(),
            export_base_url: default_export_base_url(),
            api_base_url: default_api_base_url(),
        }
    }
}

/// Background refresh configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_refresh_enabled")]
    pub enabled: bool,

    #[serde(default = "default_refresh_interval")]
    pub interval_secs: u64,
}

fn default_refresh_enabled() -> bool {
    true
}

fn default_refresh_interval() -> u64 {
    30
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            enabled: default_refresh_enabled(),
            interval_secs: default_refresh_interval(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Empty means any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("sheetboard").join("config.toml")),
            Some(PathBuf::from("/etc/sheetboard/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup; unparseable numbers are ignored
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Sheets
        if let Some(id) = lookup("SHEETBOARD_SPREADSHEET_ID") {
            self.sheets.spreadsheet_id = id;
        }
        if let Some(key) = lookup("SHEETBOARD_API_KEY") {
            self.sheets.api_key = Some(key);
        }
        if let Some(mode) = lookup("SHEETBOARD_SOURCE_MODE") {
            match mode.parse() {
                Ok(m) => self.sheets.mode = m,
                Err(e) => tracing::warn!("Ignoring SHEETBOARD_SOURCE_MODE: {}", e),
            }
        }

        // Refresh
        if let Some(secs) = lookup("SHEETBOARD_REFRESH_SECS") {
            if let Ok(s) = secs.parse() {
                self.refresh.interval_secs = s;
            }
        }

        // API
        if let Some(host) = lookup("SHEETBOARD_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("SHEETBOARD_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Logging
        if let Some(level) = lookup("SHEETBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("SHEETBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Sheetboard Configuration
#
# Environment variables override these settings:
# - SHEETBOARD_SPREADSHEET_ID
# - SHEETBOARD_API_KEY
# - SHEETBOARD_SOURCE_MODE
# - SHEETBOARD_REFRESH_SECS
# - SHEETBOARD_API_HOST
# - SHEETBOARD_API_PORT
# - SHEETBOARD_LOG_LEVEL
# - SHEETBOARD_LOG_FORMAT

[sheets]
# csv_export (public CSV, columns by header) or values_api (API key, columns by position)
mode = "csv_export"

# Spreadsheet ID from the sheet URL (required)
spreadsheet_id = ""

# API key for values_api mode
# api_key = ""

# Sheet names
transactions_sheet = "거래내역"
revenue_sheet = "매출"

# Ranges read in values_api mode (row 1 is the header)
transactions_range = "A2:K"
revenue_range = "A2:C"

# Per-request timeout (ms)
request_timeout_ms = 10000

[refresh]
# Re-fetch both sheets in the background
enabled = true

# Seconds between fetches of each sheet
interval_secs = 30

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8082

# Allowed CORS origins (empty allows any)
cors_origins = []

# Request timeout in seconds
request_timeout_secs = 30

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.sheets.mode, SourceMode::CsvExport);
        assert_eq!(config.sheets.transactions_sheet, "거래내역");
        assert_eq!(config.sheets.revenue_range, "A2:C");
        assert!(config.refresh.enabled);
        assert_eq!(config.refresh.interval_secs, 30);
        assert_eq!(config.api.port, 8082);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();

        assert_eq!(config.sheets.revenue_sheet, "매출");
        assert_eq!(config.sheets.request_timeout_ms, 10_000);
        assert!(config.api.cors_origins.is_empty());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[sheets]\nmode = \"values_api\"\nspreadsheet_id = \"abc\"\napi_key = \"k\"\n\n[refresh]\ninterval_secs = 5\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.sheets.mode, SourceMode::ValuesApi);
        assert_eq!(config.sheets.spreadsheet_id, "abc");
        assert_eq!(config.sheets.api_key.as_deref(), Some("k"));
        assert_eq!(config.sheets.transactions_range, "A2:K");
        assert_eq!(config.refresh.interval_secs, 5);
        assert!(config.refresh.enabled);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[sheets\n").unwrap();
        assert!(matches!(Config::load(&bad), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SHEETBOARD_SPREADSHEET_ID", "from-env"),
            ("SHEETBOARD_SOURCE_MODE", "values_api"),
            ("SHEETBOARD_REFRESH_SECS", "60"),
            ("SHEETBOARD_API_PORT", "not-a-port"),
            ("SHEETBOARD_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.sheets.spreadsheet_id, "from-env");
        assert_eq!(config.sheets.mode, SourceMode::ValuesApi);
        assert_eq!(config.refresh.interval_secs, 60);
        assert_eq!(config.api.port, 8082);
        assert_eq!(config.logging.format, "json");
    }
}
