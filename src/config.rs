//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides. Every
//! field has a default that reproduces the stock dashboard: four county
//! datasets read from `./Cleaned Data`, boundaries fetched from the public
//! Plotly counties document.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::data::{DatasetMeta, DatasetRole, TickFormat, DEFAULT_CLAMP_QUANTILE};

/// Public county boundary document keyed by FIPS code
pub const DEFAULT_GEOJSON_URL: &str =
    "https://raw.githubusercontent.com/plotly/datasets/master/geojson-counties-fips.json";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub data: DataConfig,

    #[serde(default = "default_datasets")]
    pub datasets: Vec<DatasetConfig>,

    #[serde(default)]
    pub view: ViewConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Raise the log level to debug
    #[serde(default)]
    pub debug: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8050
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            debug: false,
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where the input files live
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Directory containing the dataset CSV files
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,

    /// Narrative insights file
    #[serde(default = "default_insights_file")]
    pub insights_file: PathBuf,

    /// Name of the FIPS column in every table
    #[serde(default = "default_fips_column")]
    pub fips_column: String,

    /// Name of the place-name column in every table
    #[serde(default = "default_name_column")]
    pub name_column: String,

    /// Remote boundary document
    #[serde(default = "default_geojson_url")]
    pub geojson_url: String,

    /// Local boundary document; takes precedence over the URL when set
    #[serde(default)]
    pub geojson_path: Option<PathBuf>,

    #[serde(default = "default_geojson_timeout")]
    pub geojson_timeout_secs: u64,

    #[serde(default = "default_geojson_attempts")]
    pub geojson_attempts: u32,

    /// Embed the boundary document in every map figure instead of
    /// referencing the server's boundary endpoint
    #[serde(default)]
    pub embed_geojson: bool,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./Cleaned Data")
}

fn default_insights_file() -> PathBuf {
    PathBuf::from("./data_insights.txt")
}

fn default_fips_column() -> String {
    crate::data::DEFAULT_FIPS_COLUMN.to_string()
}

fn default_name_column() -> String {
    crate::data::DEFAULT_NAME_COLUMN.to_string()
}

fn default_geojson_url() -> String {
    DEFAULT_GEOJSON_URL.to_string()
}

fn default_geojson_timeout() -> u64 {
    30
}

fn default_geojson_attempts() -> u32 {
    3
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            insights_file: default_insights_file(),
            fips_column: default_fips_column(),
            name_column: default_name_column(),
            geojson_url: default_geojson_url(),
            geojson_path: None,
            geojson_timeout_secs: default_geojson_timeout(),
            geojson_attempts: default_geojson_attempts(),
            embed_geojson: false,
        }
    }
}

/// One dataset entry (`[[datasets]]`)
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    /// Display name shown in dropdowns and titles
    pub name: String,

    /// CSV file, relative to `data.dir` unless absolute
    pub file: PathBuf,

    /// Plotted column; defaults to the display name
    #[serde(default)]
    pub column: Option<String>,

    #[serde(default)]
    pub tick_prefix: String,

    #[serde(default)]
    pub tick_suffix: String,

    #[serde(default = "default_clamp_quantile")]
    pub clamp_quantile: f64,

    #[serde(default)]
    pub role: DatasetRole,

    #[serde(default)]
    pub scatter_max: Option<f64>,
}

fn default_clamp_quantile() -> f64 {
    DEFAULT_CLAMP_QUANTILE
}

impl DatasetConfig {
    /// Display metadata for this entry
    pub fn meta(&self) -> DatasetMeta {
        DatasetMeta {
            display_name: self.name.clone(),
            column: self.column.clone().unwrap_or_else(|| self.name.clone()),
            tick_format: TickFormat::new(self.tick_prefix.clone(), self.tick_suffix.clone()),
            clamp_quantile: self.clamp_quantile,
            role: self.role,
            scatter_max: self.scatter_max,
        }
    }

    /// Path of the CSV file, resolved against `dir`
    pub fn resolve_file(&self, dir: &Path) -> PathBuf {
        if self.file.is_absolute() {
            self.file.clone()
        } else {
            dir.join(&self.file)
        }
    }
}

fn dataset(
    name: &str,
    file: &str,
    prefix: &str,
    suffix: &str,
    role: DatasetRole,
    scatter_max: Option<f64>,
) -> DatasetConfig {
    DatasetConfig {
        name: name.to_string(),
        file: PathBuf::from(file),
        column: None,
        tick_prefix: prefix.to_string(),
        tick_suffix: suffix.to_string(),
        clamp_quantile: DEFAULT_CLAMP_QUANTILE,
        role,
        scatter_max,
    }
}

fn default_datasets() -> Vec<DatasetConfig> {
    vec![
        dataset(
            "Instruction Spending Per Student, 2018",
            "expenditure.csv",
            "$",
            "",
            DatasetRole::Baseline,
            Some(15000.0),
        ),
        dataset(
            "Diabetes Percentage, 2019",
            "diabetes.csv",
            "",
            "%",
            DatasetRole::Comparison,
            None,
        ),
        dataset(
            "Heavy Drinking Percentage, 2012",
            "alcohol.csv",
            "",
            "%",
            DatasetRole::Comparison,
            None,
        ),
        dataset(
            "Life expectancy, 2014",
            "expectancy.csv",
            "",
            "",
            DatasetRole::Comparison,
            None,
        ),
    ]
}

/// Initial control values. Unset entries fall back to the catalog: the
/// first dataset for map 1, the first comparison dataset elsewhere.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub map_1: Option<String>,

    #[serde(default)]
    pub map_2: Option<String>,

    #[serde(default)]
    pub scatter_y: Option<String>,

    #[serde(default = "default_logit")]
    pub logit: bool,
}

fn default_logit() -> bool {
    true
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            map_1: None,
            map_2: None,
            scatter_y: None,
            logit: default_logit(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

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

        Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })?;
        config.validate()?;
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

    /// First existing file among the default config locations
    pub fn default_path() -> Option<PathBuf> {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("county-atlas").join("config.toml")),
            Some(PathBuf::from("/etc/county-atlas/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];
        config_paths.into_iter().flatten().find(|p| p.exists())
    }

    /// Load `path` with environment overrides, or the defaults with
    /// environment overrides when there is no file
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_with_env(path),
            None => Ok(Self::from_env()),
        }
    }

    /// Load from default locations or environment. A config file that exists
    /// but does not load is an error, never a silent fallback.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_from(Self::default_path().as_deref())
    }

    /// Check invariants serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.datasets.is_empty() {
            return Err(ConfigError::Invalid("no datasets configured".to_string()));
        }

        let baselines = self
            .datasets
            .iter()
            .filter(|d| d.role == DatasetRole::Baseline)
            .count();
        if baselines != 1 {
            return Err(ConfigError::Invalid(format!(
                "expected exactly one baseline dataset, found {}",
                baselines
            )));
        }
        if self.datasets.len() < 2 {
            return Err(ConfigError::Invalid(
                "at least one comparison dataset is required".to_string(),
            ));
        }

        if let Some(bad) = self
            .datasets
            .iter()
            .find(|d| !(0.0..0.5).contains(&d.clamp_quantile))
        {
            return Err(ConfigError::Invalid(format!(
                "clamp_quantile for {:?} must be in [0, 0.5), got {}",
                bad.name, bad.clamp_quantile
            )));
        }

        Ok(())
    }

    /// Apply environment variable overrides to an existing config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(host) = var("COUNTY_ATLAS_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("COUNTY_ATLAS_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        // Data overrides
        if let Some(dir) = var("COUNTY_ATLAS_DATA_DIR") {
            self.data.dir = PathBuf::from(dir);
        }
        if let Some(url) = var("COUNTY_ATLAS_GEOJSON_URL") {
            self.data.geojson_url = url;
        }
        if let Some(path) = var("COUNTY_ATLAS_GEOJSON_PATH") {
            self.data.geojson_path = Some(PathBuf::from(path));
        }

        // Logging overrides
        if let Some(level) = var("COUNTY_ATLAS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("COUNTY_ATLAS_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            data: DataConfig::default(),
            datasets: default_datasets(),
            view: ViewConfig::default(),
            logging: LoggingConfig::default(),
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

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# County Atlas Configuration
#
# Environment variables override these settings:
# - COUNTY_ATLAS_HOST
# - COUNTY_ATLAS_PORT
# - COUNTY_ATLAS_DATA_DIR
# - COUNTY_ATLAS_GEOJSON_URL
# - COUNTY_ATLAS_GEOJSON_PATH
# - COUNTY_ATLAS_LOG_LEVEL
# - COUNTY_ATLAS_LOG_FORMAT

[server]
host = "127.0.0.1"
port = 8050

# Verbose logging
debug = false

[data]
# Directory holding the dataset CSV files
dir = "./Cleaned Data"

# Narrative insights, segments separated by a NEWTOPIC line
insights_file = "./data_insights.txt"

fips_column = "FIPS"
name_column = "PlaceName"

# County boundaries (GeoJSON keyed by FIPS code)
geojson_url = "https://raw.githubusercontent.com/plotly/datasets/master/geojson-counties-fips.json"
# geojson_path = "./geojson-counties-fips.json"
geojson_timeout_secs = 30
geojson_attempts = 3

# Embed boundaries in every map figure instead of referencing /api/v1/geo/counties
embed_geojson = false

[[datasets]]
name = "Instruction Spending Per Student, 2018"
file = "expenditure.csv"
tick_prefix = "$"
role = "baseline"
# Only counties below this value are used on the scatter x axis
scatter_max = 15000.0

[[datasets]]
name = "Diabetes Percentage, 2019"
file = "diabetes.csv"
tick_suffix = "%"

[[datasets]]
name = "Heavy Drinking Percentage, 2012"
file = "alcohol.csv"
tick_suffix = "%"

[[datasets]]
name = "Life expectancy, 2014"
file = "expectancy.csv"

[view]
map_1 = "Instruction Spending Per Student, 2018"
map_2 = "Diabetes Percentage, 2019"
scatter_y = "Diabetes Percentage, 2019"
logit = true

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

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 8050);
        assert_eq!(config.datasets.len(), 4);
        assert_eq!(config.datasets[0].role, DatasetRole::Baseline);
        assert_eq!(config.datasets[0].scatter_max, Some(15000.0));
        assert!(config.view.logit);
        config.validate().unwrap();
    }

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config = Config::from_toml(&generate_default_config()).unwrap();
        let defaults = Config::default();

        assert_eq!(config.server.addr(), defaults.server.addr());
        assert_eq!(config.data.geojson_url, defaults.data.geojson_url);
        assert_eq!(config.datasets.len(), defaults.datasets.len());
        for (parsed, default) in config.datasets.iter().zip(&defaults.datasets) {
            assert_eq!(parsed.meta(), default.meta());
            assert_eq!(parsed.file, default.file);
        }
        assert_eq!(
            config.view.map_2.as_deref(),
            Some("Diabetes Percentage, 2019")
        );
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.datasets.len(), 4);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_dataset_meta_column_default() {
        let config = Config::default();
        let meta = config.datasets[1].meta();
        assert_eq!(meta.column, "Diabetes Percentage, 2019");
        assert_eq!(meta.tick_format, TickFormat::new("", "%"));
    }

    #[test]
    fn test_resolve_file() {
        let config = Config::default();
        let path = config.datasets[0].resolve_file(Path::new("/data"));
        assert_eq!(path, PathBuf::from("/data/expenditure.csv"));
    }

    #[test]
    fn test_rejects_two_baselines() {
        let toml = r#"
[[datasets]]
name = "A"
file = "a.csv"
role = "baseline"

[[datasets]]
name = "B"
file = "b.csv"
role = "baseline"
"#;
        let err = Config::from_toml(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_baseline_only() {
        let toml = r#"
[[datasets]]
name = "A"
file = "a.csv"
role = "baseline"
"#;
        let err = Config::from_toml(toml).unwrap_err();
        assert!(err.to_string().contains("comparison"));
    }

    #[test]
    fn test_rejects_bad_clamp_quantile() {
        let toml = r#"
[[datasets]]
name = "A"
file = "a.csv"
role = "baseline"
clamp_quantile = 0.7

[[datasets]]
name = "B"
file = "b.csv"
"#;
        let err = Config::from_toml(toml).unwrap_err();
        assert!(err.to_string().contains("clamp_quantile"));
    }

    #[test]
    fn test_parse_error() {
        let err = Config::from_toml("[server\nport = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("COUNTY_ATLAS_PORT", "9000"),
            ("COUNTY_ATLAS_DATA_DIR", "/srv/data"),
            ("COUNTY_ATLAS_GEOJSON_PATH", "/srv/counties.json"),
            ("COUNTY_ATLAS_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.data.dir, PathBuf::from("/srv/data"));
        assert_eq!(
            config.data.geojson_path,
            Some(PathBuf::from("/srv/counties.json"))
        );
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_invalid_port_override_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "COUNTY_ATLAS_PORT").then(|| "nope".to_string()));
        assert_eq!(config.server.port, 8050);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 9100\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.port, 9100);

        let err = Config::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_from_malformed_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nport = 9100\n").unwrap();

        let err = Config::load_from(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_from_without_file() {
        let config = Config::load_from(None).unwrap();
        assert_eq!(config.datasets.len(), 4);
    }
}
