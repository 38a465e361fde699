//! Configuration loading and resolution
//!
//! Every setting resolves in this priority order:
//! 1. Command-line argument (or its environment variable, handled by clap)
//! 2. TOML config file
//! 3. Compiled default

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "FLIXMAP_CONFIG";

/// Widest allowed `year_max - year_min`
pub const MAX_YEAR_SPAN: i64 = 1000;

/// Logging section of the TOML config
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level or filter directive (e.g. "info", "flixmap_dash=debug")
    pub level: Option<String>,
}

/// Contents of `config.toml`; every field is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub catalog_path: Option<PathBuf>,
    pub boundaries_path: Option<PathBuf>,
    /// Feature property holding the country name
    pub boundary_property: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    /// Upper bound of the color domain in fixed scale mode
    pub fixed_scale_max: Option<u32>,
    /// Country shown on the timeline before any map click
    pub fallback_country: Option<String>,
    pub logging: LoggingConfig,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub catalog_path: Option<PathBuf>,
    pub boundaries_path: Option<PathBuf>,
    pub boundary_property: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    pub fixed_scale_max: Option<u32>,
    pub fallback_country: Option<String>,
    pub log_level: Option<String>,
}

/// Fallback values used when neither CLI nor TOML provide a setting
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub catalog_path: PathBuf,
    pub boundaries_path: PathBuf,
    pub boundary_property: String,
    pub host: String,
    pub port: u16,
    pub fixed_scale_max: u32,
    pub fallback_country: String,
    pub log_level: String,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("netflix_titles.csv"),
            boundaries_path: PathBuf::from("countries.json"),
            boundary_property: "geounit".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8050,
            fixed_scale_max: 450,
            fallback_country: "Czech Republic".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Fully resolved dashboard configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub catalog_path: PathBuf,
    pub boundaries_path: PathBuf,
    pub boundary_property: String,
    pub host: String,
    pub port: u16,
    /// Explicit year range; `None` means derive it from the catalogue
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    pub fixed_scale_max: u32,
    pub fallback_country: String,
    pub log_level: String,
}

impl DashboardConfig {
    /// Merge CLI overrides, TOML values and compiled defaults
    pub fn resolve(cli: &CliOverrides, file: &TomlConfig) -> Result<Self> {
        let defaults = CompiledDefaults::default();

        let config = Self {
            catalog_path: pick(&cli.catalog_path, &file.catalog_path, defaults.catalog_path),
            boundaries_path: pick(
                &cli.boundaries_path,
                &file.boundaries_path,
                defaults.boundaries_path,
            ),
            boundary_property: pick(
                &cli.boundary_property,
                &file.boundary_property,
                defaults.boundary_property,
            ),
            host: pick(&cli.host, &file.host, defaults.host),
            port: pick(&cli.port, &file.port, defaults.port),
            year_min: cli.year_min.or(file.year_min),
            year_max: cli.year_max.or(file.year_max),
            fixed_scale_max: pick(
                &cli.fixed_scale_max,
                &file.fixed_scale_max,
                defaults.fixed_scale_max,
            ),
            fallback_country: pick(
                &cli.fallback_country,
                &file.fallback_country,
                defaults.fallback_country,
            ),
            log_level: pick(&cli.log_level, &file.logging.level, defaults.log_level),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (self.year_min, self.year_max) {
            if min > max {
                return Err(Error::Config(format!(
                    "year_min ({}) is greater than year_max ({})",
                    min, max
                )));
            }
            if i64::from(max) - i64::from(min) > MAX_YEAR_SPAN {
                return Err(Error::Config(format!(
                    "year range {}..={} spans more than {} years",
                    min, max, MAX_YEAR_SPAN
                )));
            }
        }
        if self.fixed_scale_max == 0 {
            return Err(Error::Config("fixed_scale_max must be positive".to_string()));
        }
        if self.boundary_property.trim().is_empty() {
            return Err(Error::Config("boundary_property must not be empty".to_string()));
        }
        Ok(())
    }
}

fn pick<T: Clone>(cli: &Option<T>, file: &Option<T>, default: T) -> T {
    cli.clone().or_else(|| file.clone()).unwrap_or(default)
}

/// Locate the TOML config file
///
/// Order: explicit path, `FLIXMAP_CONFIG`, `~/.config/flixmap/config.toml`,
/// `/etc/flixmap/config.toml`. An explicit path is returned even when it does
/// not exist so the caller can report it; the implicit locations are only
/// returned when present.
pub fn locate_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    let user_config = dirs::config_dir().map(|d| d.join("flixmap").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    let system_config = PathBuf::from("/etc/flixmap/config.toml");
    if system_config.exists() {
        return Some(system_config);
    }

    None
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// A parsed config file together with where it came from
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: TomlConfig,
    /// `None` when no config file was found
    pub source: Option<PathBuf>,
}

/// Load the config file if one is found, otherwise fall back to an empty one
///
/// A missing implicit config is not an error; a named file that cannot be
/// read or parsed is.
pub fn load_or_default(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let Some(path) = locate_config_file(explicit) else {
        return Ok(LoadedConfig::default());
    };

    if !path.exists() {
        return Err(Error::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let config = load_toml_config(&path)?;
    Ok(LoadedConfig {
        config,
        source: Some(path),
    })
}
