use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::data::error::DataError;
use crate::data::filter::Window;
use crate::data::model::Dataset;
use crate::data::pipeline::{Analysis, Inputs};
use crate::data::reference::{GammaBounds, ReferenceSelection, Sensor};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: Config,

    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// Reference columns from the configuration that the dataset lacks.
    pub missing_columns: Vec<String>,

    /// Current user choices; rendering code edits these in place.
    pub inputs: Option<Inputs>,

    /// Results for `analysed_inputs`.
    pub analysis: Option<Result<Analysis, DataError>>,
    analysed_inputs: Option<Inputs>,

    /// Reference form fields, applied on submit.
    pub gamma_low_text: String,
    pub gamma_high_text: String,
    pub form_sensor: Sensor,
    /// Whether the reference form has been submitted for this dataset.
    pub submitted: bool,

    pub show_data_table: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            dataset: None,
            missing_columns: Vec::new(),
            inputs: None,
            analysis: None,
            analysed_inputs: None,
            gamma_low_text: String::new(),
            gamma_high_text: String::new(),
            form_sensor: Sensor::default(),
            submitted: false,
            show_data_table: false,
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset, reset every choice and recompute.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.missing_columns = self.config.columns.reference.missing_in(&dataset);
        if !self.missing_columns.is_empty() {
            log::warn!(
                "Dataset lacks configured reference columns: {:?}",
                self.missing_columns
            );
        }

        self.inputs = Some(Inputs::for_dataset(&dataset));
        self.analysed_inputs = None;
        self.analysis = None;
        self.submitted = false;
        self.form_sensor = Sensor::default();
        self.gamma_low_text.clear();
        self.gamma_high_text.clear();

        self.dataset = Some(dataset);
        self.status_message = None;
        self.refresh();
    }

    /// Load a file through the configured loader.
    pub fn load_path(&mut self, path: &Path) {
        match crate::data::loader::load_file(path, &self.config.loader) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows with columns {:?}",
                    dataset.len(),
                    dataset.column_names().collect::<Vec<_>>()
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
                    }
        }
    }

    /// Recompute the analysis if the inputs changed since the last run.
    /// Returns whether anything was recomputed.
    pub fn refresh(&mut self) -> bool {
        let (Some(dataset), Some(inputs)) = (&self.dataset, &self.inputs) else {
            return false;
        };
        if self.analysis.is_some() && self.analysed_inputs.as_ref() == Some(inputs) {
            return false;
        }
        self.analysis = Some(Analysis::run(dataset, &self.config, inputs));
        self.analysed_inputs = Some(inputs.clone());
        true
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref().and_then(|a| a.as_ref().ok())
    }

    /// Apply the reference form.
    pub fn submit_reference(&mut self) {
        let selection = ReferenceSelection {
            sensor: self.form_sensor,
            gamma: GammaBounds::parse(&self.gamma_low_text, &self.gamma_high_text),
        };
        if let Some(inputs) = &mut self.inputs {
            inputs.reference = selection;
        }
        self.submitted = true;
    }

    /// Move the observation window. Bounds are clamped during analysis.
    pub fn set_window(&mut self, low: f64, high: f64) {
        let Some(analysis) = self.analysis() else {
            return;
        };
        let step = analysis.window.step;
        let window = Window::clamped(low, high, analysis.extent, step);
        if let Some(inputs) = &mut self.inputs {
            inputs.window = Some(window);
        }
    }

    /// Write the current results as pretty JSON.
    pub fn export_report(&self, path: &Path) -> Result<()> {
        let analysis = self.analysis().context("nothing to export")?;
        let json = serde_json::to_string_pretty(&analysis.report()).context("encoding report")?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported summary to {}", path.display());
        Ok(())
    }
}
