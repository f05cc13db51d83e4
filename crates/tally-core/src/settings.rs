//! User settings
//!
//! ## Resolution
//!
//! Settings are loaded with a two-layer resolution:
//! 1. An explicit path, or the override file in the platform config dir
//!    (~/.config/tally/config.toml on Linux)
//! 2. Embedded defaults (compiled into binary)
//!
//! Keys missing from an override keep their default value.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/tally.toml");

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// Ledger file location
    pub ledger_path: PathBuf,
    /// Budget used for months without their own entry
    pub monthly_budget: f64,
    /// ISO currency code (display only, no conversion)
    pub currency: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ledger_path: PathBuf::from("tally.json"),
            monthly_budget: 2000.0,
            currency: "USD".to_string(),
        }
    }
}

impl Settings {
    /// Load from `path` if given, else the platform override, else defaults.
    ///
    /// An explicit path that does not exist is an error; a missing platform
    /// override is not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = parse_settings(DEFAULT_CONFIG, Settings::default())?;

        let override_path = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Some(path.to_path_buf())
            }
            None => default_config_path().filter(|p| p.exists()),
        };

        match override_path {
            Some(path) => {
                debug!(path = %path.display(), "Loading settings override");
                let content = fs::read_to_string(&path)
                    .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;
                parse_settings(&content, defaults)
            }
            None => Ok(defaults),
        }
    }

    /// Symbol shown before amounts
    pub fn currency_symbol(&self) -> &'static str {
        match self.currency.to_uppercase().as_str() {
            "EUR" => "€",
            "GBP" => "£",
            "JPY" => "¥",
            "INR" => "₹",
            _ => "$",
        }
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tally").join("config.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawSettings {
    ledger: Option<RawLedger>,
    budget: Option<RawBudget>,
    display: Option<RawDisplay>,
}

#[derive(Debug, Deserialize)]
struct RawLedger {
    path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawBudget {
    monthly: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawDisplay {
    currency: Option<String>,
}

/// Parse TOML content on top of `base`
fn parse_settings(content: &str, base: Settings) -> Result<Settings> {
    let raw: RawSettings = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut settings = base;

    if let Some(path) = raw.ledger.and_then(|l| l.path) {
        settings.ledger_path = path;
    }
    if let Some(monthly) = raw.budget.and_then(|b| b.monthly) {
        if !monthly.is_finite() || monthly < 0.0 {
            return Err(Error::Config(format!(
                "budget.monthly must be a non-negative number, got {}",
                monthly
            )));
        }
        settings.monthly_budget = monthly;
    }
    if let Some(currency) = raw.display.and_then(|d| d.currency) {
        settings.currency = currency;
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_parse() {
        let settings = parse_settings(DEFAULT_CONFIG, Settings::default()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let settings = parse_settings(
            "[budget]\nmonthly = 1500.0\n",
            Settings::default(),
        )
        .unwrap();
        assert_eq!(settings.monthly_budget, 1500.0);
        assert_eq!(settings.currency, "USD");
        assert_eq!(settings.ledger_path, PathBuf::from("tally.json"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(parse_settings("[budget]\nmonthly = -5.0\n", Settings::default()).is_err());
        assert!(parse_settings("[budget\n", Settings::default()).is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[ledger]\npath = \"/tmp/money.json\"\n[display]\ncurrency = \"eur\"\n",
        )
        .unwrap();

        let settings = Settings::load(Some(path.as_path())).unwrap();
        assert_eq!(settings.ledger_path, PathBuf::from("/tmp/money.json"));
        assert_eq!(settings.currency_symbol(), "€");
        assert_eq!(settings.monthly_budget, 2000.0);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let result = Settings::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_currency_symbols() {
        let mut settings = Settings::default();
        assert_eq!(settings.currency_symbol(), "$");
        settings.currency = "GBP".into();
        assert_eq!(settings.currency_symbol(), "£");
        settings.currency = "INR".into();
        assert_eq!(settings.currency_symbol(), "₹");
        settings.currency = "CHF".into();
        assert_eq!(settings.currency_symbol(), "$");
    }
}
