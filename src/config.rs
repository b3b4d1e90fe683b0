use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::model::{KNOWN_SPECIES, MEASUREMENT_ATTRIBUTES};
use crate::error::DashboardError;

/// Env var naming a JSON config file.
pub const CONFIG_ENV: &str = "PENGUIN_DASHBOARD_CONFIG";
/// Config file picked up from the working directory when the env var is unset.
pub const DEFAULT_CONFIG_FILE: &str = "penguin-dashboard.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup settings. Every field is optional in the file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Window / page title.
    pub title: String,
    /// Penguin table to load instead of the bundled excerpt.
    pub penguins_path: Option<PathBuf>,
    /// Tips table to load instead of the bundled excerpt.
    pub tips_path: Option<PathBuf>,
    /// Declared species labels, in checkbox order.
    pub species: Vec<String>,
    /// Attributes initially picked in the sidebar.
    pub default_attributes: Vec<String>,
    /// Bins of the overlaid histogram (0 = automatic).
    pub overlay_bin_count: u32,
    /// Bins of the stacked histogram (0 = automatic).
    pub stacked_bin_count: u32,
    /// Upper end of the stacked-histogram slider.
    pub stacked_bin_max: u32,
    pub repository_url: String,
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Mee's Layout".to_string(),
            penguins_path: None,
            tips_path: None,
            species: KNOWN_SPECIES.iter().map(|s| s.to_string()).collect(),
            default_attributes: vec!["bill_length_mm".to_string()],
            overlay_bin_count: 0,
            stacked_bin_count: 10,
            stacked_bin_max: 20,
            repository_url: "https://github.com/meevang/cintel-02-data".to_string(),
            window_size: [1400.0, 900.0],
        }
    }
}

impl DashboardConfig {
    /// Resolve the config source: `$PENGUIN_DASHBOARD_CONFIG`, then
    /// `./penguin-dashboard.json`, then built-in defaults.
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::from_file(local);
        }
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("loading config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("parsing config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.species.is_empty() {
            return Err(DashboardError::InvalidConfig(
                "at least one species label must be declared".into(),
            ));
        }
        if let Some(dup) = first_duplicate(&self.species) {
            return Err(DashboardError::InvalidConfig(format!(
                "species label '{dup}' is declared twice"
            )));
        }
        if self.default_attributes.is_empty() {
            return Err(DashboardError::InvalidConfig(
                "at least one default attribute must be picked".into(),
            ));
        }
        if let Some(dup) = first_duplicate(&self.default_attributes) {
            return Err(DashboardError::InvalidConfig(format!(
                "default attribute '{dup}' is listed twice"
            )));
        }
        if let Some(bad) = self
            .default_attributes
            .iter()
            .find(|a| !MEASUREMENT_ATTRIBUTES.contains(&a.as_str()))
        {
            return Err(DashboardError::InvalidConfig(format!(
                "'{bad}' is not a measurement attribute"
            )));
        }
        if self.stacked_bin_count > self.stacked_bin_max {
            return Err(DashboardError::InvalidConfig(format!(
                "stacked_bin_count {} exceeds stacked_bin_max {}",
                self.stacked_bin_count, self.stacked_bin_max
            )));
        }
        Ok(())
    }
}

fn first_duplicate(items: &[String]) -> Option<&str> {
    items
        .iter()
        .enumerate()
        .find(|&(i, item)| items[..i].contains(item))
        .map(|(_, item)| item.as_str())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config =
            DashboardConfig::from_json(r#"{ "title": "Penguins", "stacked_bin_count": 5 }"#)
                .unwrap();
        assert_eq!(config.title, "Penguins");
        assert_eq!(config.stacked_bin_count, 5);
        assert_eq!(config.stacked_bin_max, 20);
        assert_eq!(config.species, vec!["Adelie", "Gentoo", "Chinstrap"]);
        assert_eq!(config.default_attributes, vec!["bill_length_mm"]);
    }

    #[test]
    fn unknown_attribute_is_rejected() {
        let err = DashboardConfig::from_json(r#"{ "default_attributes": ["wing_span_mm"] }"#)
            .unwrap_err();
        let root = err.downcast_ref::<DashboardError>().unwrap();
        assert!(
            matches!(root, DashboardError::InvalidConfig(msg) if msg.contains("wing_span_mm"))
        );
    }

    #[test]
    fn empty_default_attributes_are_rejected() {
        let err = DashboardConfig::from_json(r#"{ "default_attributes": [] }"#).unwrap_err();
        let root = err.downcast_ref::<DashboardError>().unwrap();
        assert!(matches!(root, DashboardError::InvalidConfig(msg) if msg.contains("attribute")));
    }

    #[test]
    fn duplicate_default_attributes_are_rejected() {
        let err = DashboardConfig::from_json(
            r#"{ "default_attributes": ["body_mass_g", "bill_depth_mm", "body_mass_g"] }"#,
        )
        .unwrap_err();
        let root = err.downcast_ref::<DashboardError>().unwrap();
        assert!(matches!(root, DashboardError::InvalidConfig(msg) if msg.contains("body_mass_g")));
    }

    #[test]
    fn duplicate_species_are_rejected() {
        let json = r#"{ "species": ["Adelie", "Gentoo", "Adelie"] }"#;
        assert!(DashboardConfig::from_json(json).is_err());
    }

    #[test]
    fn empty_species_is_rejected() {
        assert!(DashboardConfig::from_json(r#"{ "species": [] }"#).is_err());
    }

    #[test]
    fn bin_count_above_slider_range_is_rejected() {
        assert!(DashboardConfig::from_json(r#"{ "stacked_bin_count": 30 }"#).is_err());
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "penguins_path": "data/penguins.parquet" }}"#).unwrap();
        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.penguins_path, Some(PathBuf::from("data/penguins.parquet")));
    }
}
