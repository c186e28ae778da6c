use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points};

use crate::data::pipeline::Correlation;
use crate::data::selection::Series;
use crate::data::stats::BoxSummary;

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

/// Overlaid line plot of `series` against the ordering column.
pub fn line_plot(ui: &mut Ui, id: &str, x_label: &str, series: &[(&Series, Color32)], height: f32) {
    Plot::new(id)
        .height(height)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (s, color) in series {
                let points = PlotPoints::from(s.points.clone());
                plot_ui.line(Line::new(points).name(&s.name).color(*color).width(1.5));
            }
        });
}

// ---------------------------------------------------------------------------
// Boxplots
// ---------------------------------------------------------------------------

/// One box per entry, laid out left to right in entry order.
pub fn box_plot(ui: &mut Ui, id: &str, boxes: &[(&str, &BoxSummary, Color32)], height: f32) {
    Plot::new(id)
        .height(height)
        .legend(Legend::default())
        .show_x(false)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (pos, (name, summary, color)) in boxes.iter().enumerate() {
                let spread = BoxSpread::new(
                    summary.lower_whisker,
                    summary.q1,
                    summary.median,
                    summary.q3,
                    summary.upper_whisker,
                );
                let elem = BoxElem::new(pos as f64, spread)
                    .name(*name)
                    .box_width(0.6)
                    .fill(color.gamma_multiply(0.3))
                    .stroke(Stroke::new(1.5, *color));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(*name));
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter with trendline
// ---------------------------------------------------------------------------

pub fn scatter_plot(ui: &mut Ui, id: &str, correlation: &Correlation, color: Color32, height: f32) {
    let pair = &correlation.pair;
    Plot::new(id)
        .height(height)
        .legend(Legend::default())
        .x_axis_label(&pair.x)
        .y_axis_label(&pair.y)
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            let points = PlotPoints::from(correlation.points.clone());
            plot_ui.points(
                Points::new(points)
                    .name(format!("{} vs {}", pair.y, pair.x))
                    .color(color)
                    .radius(2.0),
            );

            if let Ok(fit) = &correlation.fit {
                let xs = correlation.points.iter().map(|p| p[0]);
                let min = xs.clone().fold(f64::INFINITY, f64::min);
                let max = xs.fold(f64::NEG_INFINITY, f64::max);
                let trend = vec![[min, fit.predict(min)], [max, fit.predict(max)]];
                plot_ui.line(
                    Line::new(PlotPoints::from(trend))
                        .name("OLS trendline")
                        .color(Color32::LIGHT_RED)
                        .width(2.0),
                );
            }
        });
}
