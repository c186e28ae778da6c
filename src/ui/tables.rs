use eframe::egui::{self, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::Dataset;
use crate::data::regression::{Coefficient, LinearFit};
use crate::data::stats::StatisticsSummary;

fn fmt_opt(v: Option<f64>) -> String {
    v.map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}"))
}

/// Mean / std. deviation / median / variance table.
pub fn statistics_table(ui: &mut Ui, summary: &StatisticsSummary) {
    egui::Grid::new("statistics_table")
        .striped(true)
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.strong("Metric");
            ui.strong("");
            ui.end_row();
            for (label, value) in summary.table_rows() {
                ui.label(label);
                ui.monospace(format!("{value:.4}"));
                ui.end_row();
            }
            ui.label("Samples");
            ui.monospace(summary.count.to_string());
            ui.end_row();
        });
}

/// OLS regression summary.
pub fn fit_summary(ui: &mut Ui, fit: &LinearFit) {
    egui::Grid::new("fit_summary")
        .striped(true)
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.label("Observations");
            ui.monospace(fit.n.to_string());
            ui.end_row();
            ui.label("R²");
            ui.monospace(format!("{:.4}", fit.r_squared));
            ui.end_row();
            ui.label("Adj. R²");
            ui.monospace(fmt_opt(fit.adj_r_squared));
            ui.end_row();
            ui.label("Residual std. error");
            ui.monospace(fmt_opt(fit.residual_std_error));
            ui.end_row();
        });

    ui.add_space(6.0);

    egui::Grid::new("fit_coefficients")
        .striped(true)
        .num_columns(5)
        .show(ui, |ui: &mut Ui| {
            for h in ["", "coef", "std err", "t", "P>|t|"] {
                ui.strong(h);
            }
            ui.end_row();
            let row = |ui: &mut Ui, name: &str, c: &Coefficient| {
                ui.label(name);
                ui.monospace(format!("{:.4}", c.estimate));
                ui.monospace(fmt_opt(c.std_error));
                ui.monospace(fmt_opt(c.t_value));
                ui.monospace(fmt_opt(c.p_value));
                ui.end_row();
            };
            row(ui, "const", &fit.intercept);
            row(ui, "x", &fit.slope);
        });
}

/// The full dataset, one row per sample.
pub fn data_table(ui: &mut Ui, dataset: &Dataset) {
    let columns = dataset.columns();
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(TableColumn::auto())
        .columns(
            TableColumn::initial(110.0).at_least(40.0).clip(true),
            columns.len(),
        )
        .min_scrolled_height(0.0)
        .max_scroll_height(320.0)
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            for col in columns {
                header.col(|ui| {
                    ui.strong(&col.name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, dataset.len(), |mut row| {
                let i = row.index();
                row.col(|ui| {
                    ui.label(i.to_string());
                });
                for col in columns {
                    row.col(|ui| {
                        if let Some(cell) = col.data.cell(i) {
                            ui.label(cell.to_string());
                        }
                    });
                }
            });
        });
}
