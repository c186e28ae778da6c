use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::series_color;
use crate::data::filter::Window;
use crate::data::pipeline::{Analysis, Inputs};
use crate::data::reference::Sensor;
use crate::data::selection::MAX_SERIES;
use crate::state::AppState;
use crate::ui::{plot, tables};

const PLOT_HEIGHT: f32 = 280.0;

fn error_label(ui: &mut Ui, message: impl std::fmt::Display) {
    ui.label(RichText::new(message.to_string()).color(Color32::RED));
}

/// Combo box over `choices`; returns the newly picked entry, if any.
fn column_combo(
    ui: &mut Ui,
    id: impl std::hash::Hash,
    label: &str,
    current: &str,
    choices: &[String],
) -> Option<String> {
    let mut picked = None;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(current)
            .width(220.0)
            .show_ui(ui, |ui: &mut Ui| {
                for c in choices {
                    if ui.selectable_label(current == c.as_str(), c).clicked() {
                        picked = Some(c.clone());
                    }
                }
            });
    });
    picked
}

// ---------------------------------------------------------------------------
// Left side panel – reference values form
// ---------------------------------------------------------------------------

/// Render the left panel with the reference values form.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Reference values");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ui.label("Gamma-Ray D lower bound");
    ui.text_edit_singleline(&mut state.gamma_low_text);
    ui.label("Gamma-Ray D upper bound");
    ui.text_edit_singleline(&mut state.gamma_high_text);

    ui.add_space(4.0);
    egui::ComboBox::from_label("Differential sensor")
        .selected_text(state.form_sensor.label())
        .show_ui(ui, |ui: &mut Ui| {
            for sensor in Sensor::ALL {
                ui.selectable_value(&mut state.form_sensor, sensor, sensor.label());
            }
        });

    ui.add_space(4.0);
    if ui.button("Submit").clicked() {
        state.submit_reference();
    }

    if !state.missing_columns.is_empty() {
        ui.separator();
        ui.strong("Missing reference columns");
        for col in &state.missing_columns {
            error_label(ui, col);
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.analysis().is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export summary…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(a)) = (&state.dataset, state.analysis()) {
            ui.label(format!(
                "{} rows loaded, {} in range {:.2}..{:.2}",
                ds.len(),
                a.rows_in_view,
                a.window.low,
                a.window.high
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            error_label(ui, msg);
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – analysis sections
// ---------------------------------------------------------------------------

/// Render the analysis sections for the loaded dataset.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = &state.dataset else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open an experiment file to begin  (File → Open…)");
        });
        return;
    };
    let analysis = match &state.analysis {
        Some(Ok(a)) => a,
        Some(Err(e)) => {
            error_label(ui, e);
            return;
        }
        None => return,
    };
    let Some(inputs) = state.inputs.as_mut() else {
        return;
    };
    let ordering = state.config.columns.ordering.as_str();
    let submitted = state.submitted;
    let show_table = &mut state.show_data_table;
    let mut requested_window = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            reference_header(ui, analysis, submitted);
            ui.separator();
            requested_window = data_section(ui, analysis, inputs, ordering);
            ui.checkbox(show_table, "Show data table");
            if *show_table {
                tables::data_table(ui, dataset);
            }
            ui.separator();
            multivariable_section(ui, analysis, inputs, ordering);
            ui.separator();
            correlation_section(ui, analysis, inputs);
        });

    if let Some((low, high)) = requested_window {
        state.set_window(low, high);
    }
}

fn reference_header(ui: &mut Ui, analysis: &Analysis, submitted: bool) {
    ui.heading("General characteristics");
    let (usg, usl) = match &analysis.velocities {
        Ok(v) => *v,
        Err(e) => {
            error_label(ui, e);
            return;
        }
    };
    let mut text = format!("Usg = {usg:.3} m/s  ||  Usl = {usl:.3} m/s");
    if submitted {
        match &analysis.reference {
            Ok(r) => {
                text.push_str(&format!(
                    "  ||  α = {}  ||  ∂P/∂x = {:.3} ({})",
                    r.holdup, r.dpdx, r.sensor
                ));
            }
            Err(e) => {
                ui.strong(text);
                error_label(ui, e);
                return;
            }
        }
    }
    ui.strong(text);
}

/// Window sliders, single-variable plots and statistics. Returns the
/// requested window when a slider moved.
fn data_section(
    ui: &mut Ui,
    analysis: &Analysis,
    inputs: &mut Inputs,
    ordering: &str,
) -> Option<(f64, f64)> {
    ui.heading("Data and plots");

    let extent = analysis.extent;
    let Window {
        mut low,
        mut high,
        step,
    } = analysis.window;
    let mut changed = false;
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Select a window:");
        changed |= ui
            .add(egui::Slider::new(&mut low, extent.min..=extent.max).step_by(step).text("from"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut high, extent.min..=extent.max).step_by(step).text("to"))
            .changed();
    });
    if high < low {
        high = low;
    }
    ui.label(format!("Selected range: {low:.2} to {high:.2}"));

    if let Some(col) = column_combo(
        ui,
        "single_column",
        "Variable:",
        &analysis.column,
        &analysis.columns,
    ) {
        inputs.column = Some(col);
    }

    match &analysis.single {
        Ok(single) => {
            ui.columns(3, |cols| {
                cols[0].label(format!("{} vs {ordering}", analysis.column));
                plot::line_plot(
                    &mut cols[0],
                    "single_line",
                    ordering,
                    &[(&single.series, series_color(0))],
                    PLOT_HEIGHT,
                );
                cols[1].label(format!("{} boxplot", analysis.column));
                plot::box_plot(
                    &mut cols[1],
                    "single_box",
                    &[(analysis.column.as_str(), &single.boxplot, series_color(0))],
                    PLOT_HEIGHT,
                );
                tables::statistics_table(&mut cols[2], &single.summary);
            });
        }
        Err(e) => error_label(ui, e),
    }

    changed.then_some((low, high))
}

fn multivariable_section(ui: &mut Ui, analysis: &Analysis, inputs: &mut Inputs, ordering: &str) {
    ui.heading("Multi-variable analysis");

    let default = analysis.columns.first().map(String::as_str).unwrap_or_default();
    let mut count = inputs.series.len();
    egui::ComboBox::from_label("Number of variables")
        .selected_text(count.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for k in 1..=MAX_SERIES {
                ui.selectable_value(&mut count, k, k.to_string());
            }
        });
    if count != inputs.series.len() {
        inputs.series.resize(count, default);
    }

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for i in 0..inputs.series.len() {
            let current = inputs.series.columns()[i].clone();
            let label = format!("Variable {}:", i + 1);
            if let Some(col) =
                column_combo(ui, ("series", i), &label, &current, &analysis.columns)
            {
                inputs.series.set(i, &col);
            }
        }
    });

    let mut lines = Vec::new();
    let mut boxes = Vec::new();
    for (i, result) in analysis.multi.iter().enumerate() {
        match result {
            Ok(a) => {
                lines.push((&a.series, series_color(i)));
                boxes.push((a.series.name.as_str(), &a.boxplot, series_color(i)));
            }
            Err(e) => error_label(ui, format!("Variable {}: {e}", i + 1)),
        }
    }

    ui.columns(2, |cols| {
        plot::line_plot(&mut cols[0], "multi_line", ordering, &lines, PLOT_HEIGHT);
        plot::box_plot(&mut cols[1], "multi_box", &boxes, PLOT_HEIGHT);
    });
}

fn correlation_section(ui: &mut Ui, analysis: &Analysis, inputs: &mut Inputs) {
    ui.heading("Correlating variables");

    let correlation = match &analysis.correlation {
        Ok(c) => c,
        Err(e) => {
            error_label(ui, e);
            return;
        }
    };

    ui.horizontal(|ui: &mut Ui| {
        if let Some(x) = column_combo(ui, "corr_x", "x:", &correlation.pair.x, &analysis.columns) {
            inputs.x_corr = Some(x);
        }
        if let Some(y) = column_combo(
            ui,
            "corr_y",
            "y:",
            &correlation.pair.y,
            &correlation.y_choices,
        ) {
            inputs.y_corr = Some(y);
        }
    });

    ui.columns(2, |cols| {
        plot::scatter_plot(
            &mut cols[0],
            "correlation",
            correlation,
            series_color(0),
            PLOT_HEIGHT,
        );
        match &correlation.fit {
            Ok(fit) => tables::fit_summary(&mut cols[1], fit),
            Err(e) => error_label(&mut cols[1], e),
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open experiment file")
        .add_filter("Experiment files", &["txt", "lvm", "tsv", "dat"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export summary")
        .add_filter("JSON", &["json"])
        .set_file_name("summary.json")
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_report(&path) {
            log::error!("Failed to export summary: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
