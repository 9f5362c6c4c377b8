//! Runtime configuration read from the environment (and `.env`).

use crate::processing::Thresholds;
use crate::store::Permissions;
use std::env;
use std::error::Error;

pub const DEFAULT_DATA_FILE: &str = "prefix_data.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Csv,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `PREFIX_DATA_FILE`
    pub data_file: String,
    /// `PREFIX_QUERY`, a filter query string.
    pub query: String,
    /// `PREFIX_NESTED_GAPS`
    pub nested_gaps: bool,
    /// `PREFIX_OUTPUT`
    pub output: OutputFormat,
    /// `UTILIZATION_WARNING` / `UTILIZATION_DANGER`
    pub thresholds: Thresholds,
    /// `PREFIX_PERMISSIONS` (comma separated, `*` for all) and `PREFIX_TENANTS`.
    pub permissions: Permissions,
}

impl Config {
    /// Read the configuration from the process environment.
    ///
    /// Call `dotenv::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Config, Box<dyn Error>> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let nested_gaps = match var("PREFIX_NESTED_GAPS") {
            Some(value) => parse_flag(&value)
                .ok_or_else(|| format!("PREFIX_NESTED_GAPS is not a boolean: {value}"))?,
            None => true,
        };

        let output = match var("PREFIX_OUTPUT").as_deref() {
            None | Some("terminal") => OutputFormat::Terminal,
            Some("csv") => OutputFormat::Csv,
            Some(other) => return Err(format!("PREFIX_OUTPUT must be terminal or csv, got: {other}").into()),
        };

        let defaults = Thresholds::default();
        let thresholds = Thresholds {
            warning: parse_percent("UTILIZATION_WARNING", var("UTILIZATION_WARNING"), defaults.warning)?,
            danger: parse_percent("UTILIZATION_DANGER", var("UTILIZATION_DANGER"), defaults.danger)?,
        };
        if thresholds.warning > thresholds.danger {
            return Err(format!(
                "UTILIZATION_WARNING ({}) is above UTILIZATION_DANGER ({})",
                thresholds.warning, thresholds.danger
            )
            .into());
        }

        let mut permissions = Permissions::parse(&var("PREFIX_PERMISSIONS").unwrap_or_else(|| "*".to_string()));
        if let Some(tenants) = var("PREFIX_TENANTS") {
            permissions = permissions.with_tenants(tenants.split(',').map(str::trim).filter(|t| !t.is_empty()));
        }

        let config = Config {
            data_file: var("PREFIX_DATA_FILE").unwrap_or_else(|| DEFAULT_DATA_FILE.to_string()),
            query: var("PREFIX_QUERY").unwrap_or_default(),
            nested_gaps,
            output,
            thresholds,
            permissions,
        };
        log::debug!("Config: {:?}", config);
        Ok(config)
    }
}

pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_percent(key: &str, value: Option<String>, default: f64) -> Result<f64, Box<dyn Error>> {
    let Some(value) = value else {
        return Ok(default);
    };
    let percent: f64 = value
        .parse()
        .map_err(|_| format!("{key} is not a number: {value}"))?;
    if !(0.0..=100.0).contains(&percent) {
        return Err(format!("{key} must be between 0 and 100: {value}").into());
    }
    Ok(percent)
}
