use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::loader::LoaderOptions;
use crate::data::reference::ReferenceColumns;

/// Environment variable naming an optional JSON configuration file.
pub const CONFIG_ENV: &str = "VSIDV_CONFIG";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// File layout and column naming of the experiment files.
///
/// Every field has a default, so a configuration file only needs the keys it
/// changes:
///
/// ```json
/// { "columns": { "gas_flux": "J_Ar", "sensors": { "10 kPa": "DP-10" } } }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub loader: LoaderOptions,
    pub columns: ColumnConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Column the observation window slides along.
    pub ordering: String,
    #[serde(flatten)]
    pub reference: ReferenceColumns,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            ordering: "X_Value".to_string(),
            reference: ReferenceColumns::default(),
        }
    }
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load the file named by [`CONFIG_ENV`], falling back to the defaults
    /// when it is unset or unusable.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Config::default();
        };
        match Config::from_path(Path::new(&path)) {
            Ok(config) => {
                log::info!("Using configuration from {}", Path::new(&path).display());
                config
            }
            Err(e) => {
                log::error!("Ignoring configuration: {e:#}");
                Config::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::reference::Sensor;

    #[test]
    fn defaults_match_acquisition_layout() {
        let c = Config::default();
        assert_eq!(c.loader.header_lines, 23);
        assert_eq!(c.loader.delimiter, '\t');
        assert_eq!(c.loader.decimal, ',');
        assert_eq!(c.columns.ordering, "X_Value");
        assert_eq!(c.columns.reference.gas_flux, "J_SF6");
        assert_eq!(c.columns.reference.liquid_flux, "J_Oleo");
        assert_eq!(
            c.columns.reference.sensors.column_for(Sensor::Kpa10),
            "PDT-M-0101B-10kPa_mA"
        );
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "loader": {{ "header_lines": 5 }},
                 "columns": {{ "gas_flux": "J_Ar", "sensors": {{ "10 kPa": "DP-10" }} }} }}"#
        )
        .unwrap();

        let c = Config::from_path(file.path()).unwrap();
        assert_eq!(c.loader.header_lines, 5);
        assert_eq!(c.loader.decimal, ',');
        assert_eq!(c.columns.ordering, "X_Value");
        assert_eq!(c.columns.reference.gas_flux, "J_Ar");
        assert_eq!(c.columns.reference.liquid_flux, "J_Oleo");
        assert_eq!(c.columns.reference.sensors.column_for(Sensor::Kpa10), "DP-10");
        assert_eq!(
            c.columns.reference.sensors.column_for(Sensor::Kpa3),
            "PDT-M-0101C-3kPa_mA"
        );
    }

    #[test]
    fn invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(Config::from_path(file.path()).is_err());
    }
}
