//! # Desk Configuration
//!
//! Business identity, default pricing and document styling.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     QUOTE_MARKUP_PERCENT=15                                            │
//! │     QUOTE_BUSINESS_NAME="Hartley Building Ltd"                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/trade-quote/quote.toml (Linux)                           │
//! │     ~/Library/Application Support/com.tradequote.desk/quote.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     20% markup, 5% contingency, 20% VAT, 30 days validity              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # quote.toml
//! [business]
//! name = "Hartley Building Ltd"
//! address_lines = ["4 Mill Lane", "Leeds LS1 4AB"]
//! email = "office@hartley.example"
//!
//! [pricing]
//! markup_percent = 20
//! contingency_percent = 5
//! tax_percent = 20
//! validity_days = 30
//! terms = "Payment within 14 days of completion."
//!
//! [document]
//! margin = 40.0
//! row_height = 20.0
//! accent = "#1f4e79"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use quote_core::layout::{Color, LayoutConfig};
use quote_core::types::Party;
use quote_core::validation;
use quote_core::PricingSettings;

use crate::error::{DeskError, DeskResult};

// =============================================================================
// Business Identity
// =============================================================================

/// The issuing business, printed in the document header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessConfig {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub address_lines: Vec<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,
}

impl BusinessConfig {
    pub fn to_party(&self) -> Party {
        Party {
            name: self.name.clone(),
            address_lines: self.address_lines.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

// =============================================================================
// Pricing Defaults
// =============================================================================

/// Values a new quote starts with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingDefaults {
    #[serde(default = "default_markup")]
    pub markup_percent: f64,

    #[serde(default = "default_contingency")]
    pub contingency_percent: f64,

    #[serde(default = "default_tax")]
    pub tax_percent: f64,

    #[serde(default = "default_validity_days")]
    pub validity_days: u32,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub terms: Option<String>,
}

fn default_markup() -> f64 {
    20.0
}

fn default_contingency() -> f64 {
    5.0
}

fn default_tax() -> f64 {
    20.0
}

fn default_validity_days() -> u32 {
    30
}

impl Default for PricingDefaults {
    fn default() -> Self {
        PricingDefaults {
            markup_percent: default_markup(),
            contingency_percent: default_contingency(),
            tax_percent: default_tax(),
            validity_days: default_validity_days(),
            notes: None,
            terms: None,
        }
    }
}

impl PricingDefaults {
    /// Settings for a freshly created quote.
    pub fn to_settings(&self) -> DeskResult<PricingSettings> {
        let percent = |field: &str, value: f64| {
            validation::percent_from_f64(value)
                .map_err(|e| DeskError::Config(format!("pricing.{field}: {e}")))
        };
        Ok(PricingSettings {
            markup: percent("markup_percent", self.markup_percent)?,
            contingency: percent("contingency_percent", self.contingency_percent)?,
            tax: percent("tax_percent", self.tax_percent)?,
            validity_days: self.validity_days,
            notes: self.notes.clone(),
            terms: self.terms.clone(),
        })
    }
}

// =============================================================================
// Document Styling
// =============================================================================

/// Page geometry and accent colour of the emitted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Page margin in points.
    #[serde(default = "default_margin")]
    pub margin: f32,

    /// Table row height in points.
    #[serde(default = "default_row_height")]
    pub row_height: f32,

    /// Accent colour as `#rrggbb`.
    #[serde(default = "default_accent")]
    pub accent: String,
}

fn default_margin() -> f32 {
    40.0
}

fn default_row_height() -> f32 {
    20.0
}

fn default_accent() -> String {
    Color::ACCENT.to_hex()
}

impl Default for DocumentConfig {
    fn default() -> Self {
        DocumentConfig {
            margin: default_margin(),
            row_height: default_row_height(),
            accent: default_accent(),
        }
    }
}

impl DocumentConfig {
    /// Layout settings derived from this section. Call after `validate`.
    pub fn to_layout(&self) -> LayoutConfig {
        let defaults = LayoutConfig::default();
        LayoutConfig {
            margin: self.margin,
            row_height: self.row_height,
            accent: Color::from_hex(&self.accent).unwrap_or(defaults.accent),
            ..defaults
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete desk configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteDeskConfig {
    #[serde(default)]
    pub business: BusinessConfig,

    #[serde(default)]
    pub pricing: PricingDefaults,

    #[serde(default)]
    pub document: DocumentConfig,
}

impl QuoteDeskConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (quote.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> DeskResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading quote config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load quote config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> DeskResult<()> {
        self.pricing.to_settings()?;

        if self.pricing.validity_days == 0 {
            return Err(DeskError::Config(
                "pricing.validity_days must be greater than 0".into(),
            ));
        }

        let page = LayoutConfig::default().page;
        if !(0.0..page.width / 4.0).contains(&self.document.margin) {
            return Err(DeskError::Config(format!(
                "document.margin must be between 0 and {}",
                page.width / 4.0
            )));
        }

        if self.document.row_height.is_nan() || self.document.row_height <= 0.0 {
            return Err(DeskError::Config(
                "document.row_height must be greater than 0".into(),
            ));
        }

        if Color::from_hex(&self.document.accent).is_none() {
            return Err(DeskError::Config(format!(
                "document.accent must be #rrggbb, got: {}",
                self.document.accent
            )));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    ///
    /// Unparseable numeric values are ignored with a warning.
    fn apply_env_overrides(&mut self) {
        let percent_vars = [
            ("QUOTE_MARKUP_PERCENT", &mut self.pricing.markup_percent),
            ("QUOTE_CONTINGENCY_PERCENT", &mut self.pricing.contingency_percent),
            ("QUOTE_TAX_PERCENT", &mut self.pricing.tax_percent),
        ];
        for (var, slot) in percent_vars {
            if let Ok(raw) = std::env::var(var) {
                match validation::parse_percent(var, &raw) {
                    Ok(percent) => {
                        debug!(var, value = %percent, "Overriding pricing default from environment");
                        *slot = percent.percentage();
                    }
                    Err(e) => warn!(var, error = %e, "Ignoring invalid environment override"),
                }
            }
        }

        if let Ok(raw) = std::env::var("QUOTE_VALIDITY_DAYS") {
            match validation::parse_validity_days(&raw) {
                Ok(days) => self.pricing.validity_days = days,
                Err(e) => warn!(error = %e, "Ignoring invalid QUOTE_VALIDITY_DAYS"),
            }
        }

        if let Ok(name) = std::env::var("QUOTE_BUSINESS_NAME") {
            debug!(name = %name, "Overriding business name from environment");
            self.business.name = name;
        }

        if let Ok(raw) = std::env::var("QUOTE_PAGE_MARGIN") {
            match raw.trim().parse::<f32>() {
                Ok(margin) => self.document.margin = margin,
                Err(_) => warn!(value = %raw, "Ignoring invalid QUOTE_PAGE_MARGIN"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tradequote", "desk")
            .map(|dirs| dirs.config_dir().join("quote.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Default settings for a new quote.
    pub fn default_settings(&self) -> DeskResult<PricingSettings> {
        self.pricing.to_settings()
    }

    pub fn layout(&self) -> LayoutConfig {
        self.document.to_layout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote_core::types::Percent;

    #[test]
    fn test_default_config() {
        let config = QuoteDeskConfig::default();
        assert_eq!(config.pricing.validity_days, 30);
        assert!(config.validate().is_ok());

        let settings = config.default_settings().unwrap();
        assert_eq!(settings.markup, Percent::from_whole(20));
        assert_eq!(settings.contingency, Percent::from_whole(5));
        assert_eq!(settings.tax, Percent::from_whole(20));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: QuoteDeskConfig = toml::from_str(
            r#"
            [business]
            name = "Hartley Building Ltd"

            [pricing]
            markup_percent = 17.5
            "#,
        )
        .unwrap();
        assert_eq!(config.business.name, "Hartley Building Ltd");
        assert_eq!(config.pricing.markup_percent, 17.5);
        assert_eq!(config.pricing.tax_percent, 20.0);
        assert_eq!(config.document.margin, 40.0);
        assert_eq!(config.default_settings().unwrap().markup, Percent::from_bps(1750));
    }

    #[test]
    fn test_load_or_default_falls_back_on_bad_file() {
        let path = std::env::temp_dir().join(format!("quote-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[pricing]\nmarkup_percent = \"lots\"\n").unwrap();

        assert!(QuoteDeskConfig::load(Some(path.clone())).is_err());
        let config = QuoteDeskConfig::load_or_default(Some(path.clone()));
        assert_eq!(config.pricing.validity_days, 30);
        assert!(config.validate().is_ok());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_config_validation() {
        let mut config = QuoteDeskConfig::default();

        config.pricing.markup_percent = -5.0;
        assert!(config.validate().is_err());
        config.pricing.markup_percent = 20.0;

        config.pricing.validity_days = 0;
        assert!(config.validate().is_err());
        config.pricing.validity_days = 14;

        config.document.accent = "blue".into();
        assert!(config.validate().is_err());
        config.document.accent = "#0a0a0a".into();
        assert!(config.validate().is_ok());

        config.document.margin = 500.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_document_section_maps_to_layout() {
        let mut config = QuoteDeskConfig::default();
        config.document.margin = 30.0;
        config.document.accent = "#ff0000".into();
        let layout = config.layout();
        assert_eq!(layout.margin, 30.0);
        assert_eq!(layout.accent, Color::rgb(255, 0, 0));
        assert_eq!(layout.page, LayoutConfig::default().page);
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&QuoteDeskConfig::default()).unwrap();
        assert!(toml_str.contains("[pricing]"));
        assert!(toml_str.contains("[document]"));
    }

    #[test]
    fn test_business_becomes_issuer() {
        let business = BusinessConfig {
            name: "Hartley".into(),
            address_lines: vec!["4 Mill Lane".into()],
            email: None,
            phone: Some("0113 000 0000".into()),
        };
        assert_eq!(business.to_party().lines(), vec!["Hartley", "4 Mill Lane", "0113 000 0000"]);
    }
}
