use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DataError;
use super::loader::parse_number;
use super::model::Dataset;

// ---------------------------------------------------------------------------
// Sensor – differential pressure transmitter range
// ---------------------------------------------------------------------------

/// Differential pressure transmitter used for the pressure gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Sensor {
    #[default]
    #[serde(rename = "3 kPa")]
    Kpa3,
    #[serde(rename = "10 kPa")]
    Kpa10,
    #[serde(rename = "40 kPa")]
    Kpa40,
}

impl Sensor {
    pub const ALL: [Sensor; 3] = [Sensor::Kpa3, Sensor::Kpa10, Sensor::Kpa40];

    pub fn label(self) -> &'static str {
        match self {
            Sensor::Kpa3 => "3 kPa",
            Sensor::Kpa10 => "10 kPa",
            Sensor::Kpa40 => "40 kPa",
        }
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Sensor {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sensor::ALL
            .into_iter()
            .find(|sensor| sensor.label() == s)
            .ok_or_else(|| DataError::InvalidSensor(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Column lookup tables
// ---------------------------------------------------------------------------

/// Sensor → column name lookup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorColumns {
    #[serde(rename = "3 kPa")]
    pub kpa3: String,
    #[serde(rename = "10 kPa")]
    pub kpa10: String,
    #[serde(rename = "40 kPa")]
    pub kpa40: String,
}

impl Default for SensorColumns {
    fn default() -> Self {
        Self {
            kpa3: "PDT-M-0101C-3kPa_mA".to_string(),
            kpa10: "PDT-M-0101B-10kPa_mA".to_string(),
            kpa40: "PDT-M-0101-40kPa_mA".to_string(),
        }
    }
}

impl SensorColumns {
    pub fn column_for(&self, sensor: Sensor) -> &str {
        match sensor {
            Sensor::Kpa3 => &self.kpa3,
            Sensor::Kpa10 => &self.kpa10,
            Sensor::Kpa40 => &self.kpa40,
        }
    }
}

/// Columns read by the reference parameter calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceColumns {
    /// Gas superficial velocity column.
    pub gas_flux: String,
    /// Liquid superficial velocity column.
    pub liquid_flux: String,
    pub sensors: SensorColumns,
}

impl Default for ReferenceColumns {
    fn default() -> Self {
        Self {
            gas_flux: "J_SF6".to_string(),
            liquid_flux: "J_Oleo".to_string(),
            sensors: SensorColumns::default(),
        }
    }
}

impl ReferenceColumns {
    /// Configured columns absent from `dataset`, in configuration order.
    pub fn missing_in(&self, dataset: &Dataset) -> Vec<String> {
        let mut wanted = vec![self.gas_flux.as_str(), self.liquid_flux.as_str()];
        wanted.extend(Sensor::ALL.map(|s| self.sensors.column_for(s)));
        wanted
            .into_iter()
            .filter(|name| !dataset.has_column(name))
            .map(str::to_string)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Reference selection and results
// ---------------------------------------------------------------------------

/// Gamma-ray densitometer bounds typed by the user.
///
/// They are recorded with the selection but not used by any calculation yet.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GammaBounds {
    pub low: Option<f64>,
    pub high: Option<f64>,
}

impl GammaBounds {
    /// Parse free text; blank or non-numeric text gives `None`. Both `.` and
    /// `,` are accepted as decimal separators.
    pub fn parse(low: &str, high: &str) -> Self {
        let read = |s: &str| parse_number(s, ',');
        GammaBounds {
            low: read(low),
            high: read(high),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ReferenceSelection {
    pub sensor: Sensor,
    pub gamma: GammaBounds,
}

/// Holdup (void) fraction of the gas phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Holdup {
    /// No holdup calculation exists yet.
    NotImplemented,
}

impl fmt::Display for Holdup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Holdup::NotImplemented => f.write_str("not yet implemented"),
        }
    }
}

/// Whole-run reference values of an experimental point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceParameters {
    /// Mean gas superficial velocity, m/s.
    pub usg: f64,
    /// Mean liquid superficial velocity, m/s.
    pub usl: f64,
    pub holdup: Holdup,
    /// Mean reading of the selected differential pressure sensor.
    pub dpdx: f64,
    pub sensor: Sensor,
}

fn column_mean(dataset: &Dataset, name: &str) -> Result<f64, DataError> {
    let values = dataset.numeric(name)?;
    if values.is_empty() {
        return Err(DataError::EmptySelection);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean gas and liquid superficial velocities `(usg, usl)`.
pub fn superficial_velocities(
    dataset: &Dataset,
    columns: &ReferenceColumns,
) -> Result<(f64, f64), DataError> {
    Ok((
        column_mean(dataset, &columns.gas_flux)?,
        column_mean(dataset, &columns.liquid_flux)?,
    ))
}

/// Compute the reference values over the full, unfiltered dataset.
pub fn compute_reference(
    dataset: &Dataset,
    columns: &ReferenceColumns,
    selection: &ReferenceSelection,
) -> Result<ReferenceParameters, DataError> {
    let (usg, usl) = superficial_velocities(dataset, columns)?;
    Ok(ReferenceParameters {
        usg,
        usl,
        holdup: Holdup::NotImplemented,
        dpdx: column_mean(dataset, columns.sensors.column_for(selection.sensor))?,
        sensor: selection.sensor,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::data::model::{Column, ColumnData};

    fn num(name: &str, v: &[f64]) -> Column {
        Column {
            name: name.to_string(),
            data: ColumnData::Numeric(v.to_vec()),
        }
    }

    fn flow_dataset() -> Dataset {
        Dataset::from_columns(vec![
            num("X_Value", &[0.0, 1.0, 2.0]),
            num("J_SF6", &[1.0, 2.0, 3.0]),
            num("J_Oleo", &[0.5, 0.5, 0.5]),
            num("PDT-M-0101C-3kPa_mA", &[4.0, 5.0, 6.0]),
            num("PDT-M-0101-40kPa_mA", &[10.0, 12.0, 14.0]),
        ])
        .unwrap()
    }

    #[test]
    fn sensor_labels_round_trip() {
        for sensor in Sensor::ALL {
            assert_eq!(sensor.label().parse::<Sensor>(), Ok(sensor));
        }
        assert_eq!(
            "20 kPa".parse::<Sensor>(),
            Err(DataError::InvalidSensor("20 kPa".to_string()))
        );
    }

    #[test]
    fn reference_uses_full_dataset_and_selected_sensor() {
        let ds = flow_dataset();
        let cols = ReferenceColumns::default();
        let sel = ReferenceSelection {
            sensor: Sensor::Kpa40,
            ..Default::default()
        };
        let r = compute_reference(&ds, &cols, &sel).unwrap();
        assert_abs_diff_eq!(r.usg, 2.0);
        assert_abs_diff_eq!(r.usl, 0.5);
        assert_abs_diff_eq!(r.dpdx, 12.0);
        assert_eq!(r.holdup, Holdup::NotImplemented);
        assert_eq!(r.sensor, Sensor::Kpa40);
    }

    #[test]
    fn missing_sensor_column_is_reported() {
        let ds = flow_dataset();
        let sel = ReferenceSelection {
            sensor: Sensor::Kpa10,
            ..Default::default()
        };
        assert_eq!(
            compute_reference(&ds, &ReferenceColumns::default(), &sel),
            Err(DataError::MissingColumn("PDT-M-0101B-10kPa_mA".to_string()))
        );
        // Velocities do not depend on the sensor.
        let (usg, usl) = superficial_velocities(&ds, &ReferenceColumns::default()).unwrap();
        assert_abs_diff_eq!(usg, 2.0);
        assert_abs_diff_eq!(usl, 0.5);
    }

    #[test]
    fn schema_validation_lists_absent_columns() {
        let ds = flow_dataset();
        assert_eq!(
            ReferenceColumns::default().missing_in(&ds),
            vec!["PDT-M-0101B-10kPa_mA".to_string()]
        );
    }

    #[test]
    fn gamma_bounds_accept_either_decimal_separator() {
        let g = GammaBounds::parse("0,25", "1.5");
        assert_eq!(g.low, Some(0.25));
        assert_eq!(g.high, Some(1.5));
        assert_eq!(GammaBounds::parse("", "x"), GammaBounds::default());
    }
}
