use serde::Serialize;

use super::error::DataError;
use super::filter::{filter_view, Extent, FilteredView, Window};
use super::model::Dataset;
use super::reference::{
    compute_reference, superficial_velocities, ReferenceParameters, ReferenceSelection,
};
use super::regression::LinearFit;
use super::selection::{
    resolve_one, x_candidates, y_candidates, CorrelationPair, Series, SeriesSelection,
};
use super::stats::{BoxSummary, StatisticsSummary};
use crate::config::Config;

// ---------------------------------------------------------------------------
// Inputs – everything the user can change
// ---------------------------------------------------------------------------

/// User choices that drive one recomputation.
#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    /// `None` means the full extent.
    pub window: Option<Window>,
    pub reference: ReferenceSelection,
    /// Column for the single-variable section; `None` picks the first column.
    pub column: Option<String>,
    pub series: SeriesSelection,
    pub x_corr: Option<String>,
    pub y_corr: Option<String>,
}

impl Inputs {
    /// Initial choices for a freshly loaded dataset.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        let first = dataset.column_names().next().unwrap_or_default();
        Inputs {
            window: None,
            reference: ReferenceSelection::default(),
            column: None,
            series: SeriesSelection::new(1, first),
            x_corr: None,
            y_corr: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Plot data and statistics of one column.
#[derive(Debug, Clone)]
pub struct ColumnAnalysis {
    pub series: Series,
    pub summary: StatisticsSummary,
    pub boxplot: BoxSummary,
}

impl ColumnAnalysis {
    fn build(view: &FilteredView<'_>, ordering: &str, column: &str) -> Result<Self, DataError> {
        let series = resolve_one(view, ordering, column)?;
        let values = series.values();
        Ok(ColumnAnalysis {
            summary: StatisticsSummary::from_values(&values)?,
            boxplot: BoxSummary::from_values(&values)?,
            series,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Correlation {
    pub pair: CorrelationPair,
    /// Columns offered for y once `pair.x` is chosen.
    pub y_choices: Vec<String>,
    /// Empty when either column is not numeric.
    pub points: Vec<[f64; 2]>,
    /// Also carries the error for a non-numeric x or y.
    pub fit: Result<LinearFit, DataError>,
}

/// Everything derived from a dataset and one set of [`Inputs`].
#[derive(Debug, Clone)]
pub struct Analysis {
    pub extent: Extent,
    /// Effective window after clamping.
    pub window: Window,
    pub rows_in_view: usize,
    /// Columns of the view, offered for every column choice.
    pub columns: Vec<String>,
    /// `(usg, usl)`, available even when the selected sensor column is not.
    pub velocities: Result<(f64, f64), DataError>,
    pub reference: Result<ReferenceParameters, DataError>,
    /// Resolved single-variable column.
    pub column: String,
    pub single: Result<ColumnAnalysis, DataError>,
    /// One entry per series slot, in slot order.
    pub multi: Vec<Result<ColumnAnalysis, DataError>>,
    pub correlation: Result<Correlation, DataError>,
}

impl Analysis {
    /// Recompute every output from scratch.
    ///
    /// Fails only when the window cannot be built, i.e. the ordering column
    /// is absent or not numeric. Section-level failures are kept per section
    /// so that one bad choice does not hide the rest.
    pub fn run(dataset: &Dataset, config: &Config, inputs: &Inputs) -> Result<Self, DataError> {
        let ordering = config.columns.ordering.as_str();
        let extent = Extent::of(dataset, ordering)?;
        let window = match inputs.window {
            Some(w) => w,
            None => Window::full(dataset, ordering)?,
        };
        let view = filter_view(dataset, ordering, &window)?;
        log::debug!(
            "Recomputing: window {:.3}..{:.3}, {} of {} rows",
            view.window().low,
            view.window().high,
            view.len(),
            dataset.len()
        );

        let velocities = superficial_velocities(dataset, &config.columns.reference);
        let reference = compute_reference(dataset, &config.columns.reference, &inputs.reference);

        let column = inputs
            .column
            .clone()
            .or_else(|| view.column_names().next().map(str::to_string))
            .unwrap_or_default();
        let single = ColumnAnalysis::build(&view, ordering, &column);

        let multi = inputs
            .series
            .columns()
            .iter()
            .map(|col| ColumnAnalysis::build(&view, ordering, col))
            .collect();

        let correlation =
            CorrelationPair::resolve(&view, inputs.x_corr.as_deref(), inputs.y_corr.as_deref())
                .map(|pair| {
                    let y_choices = y_candidates(&view, &pair.x)
                        .into_iter()
                        .map(str::to_string)
                        .collect();
                    // A text column leaves the pair and choices in place so
                    // the user can pick again.
                    let (points, fit) = match pair.values(&view) {
                        Ok((x, y)) => {
                            let fit = LinearFit::fit(&x, &y);
                            (x.into_iter().zip(y).map(|(a, b)| [a, b]).collect(), fit)
                        }
                        Err(e) => (Vec::new(), Err(e)),
                    };
                    Correlation {
                        pair,
                        y_choices,
                        points,
                        fit,
                    }
                });

        Ok(Analysis {
            extent,
            window: view.window(),
            rows_in_view: view.len(),
            columns: x_candidates(&view).into_iter().map(str::to_string).collect(),
            velocities,
            reference,
            column,
            single,
            multi,
            correlation,
        })
    }

    /// Serializable snapshot of the numeric results.
    pub fn report(&self) -> AnalysisReport {
        AnalysisReport {
            window: self.window,
            rows_in_view: self.rows_in_view,
            reference: self.reference.as_ref().ok().copied(),
            column: self.column.clone(),
            summary: self.single.as_ref().ok().map(|s| s.summary),
            correlation: self.correlation.as_ref().ok().map(|c| CorrelationReport {
                pair: c.pair.clone(),
                fit: c.fit.as_ref().ok().copied(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CorrelationReport {
    pub pair: CorrelationPair,
    pub fit: Option<LinearFit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub window: Window,
    pub rows_in_view: usize,
    pub reference: Option<ReferenceParameters>,
    pub column: String,
    pub summary: Option<StatisticsSummary>,
    pub correlation: Option<CorrelationReport>,
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::data::loader::{parse_bytes, tests::upload};
    use crate::data::reference::Sensor;

    fn flow_dataset() -> Dataset {
        let bytes = upload(
            "X_Value\tJ_SF6\tJ_Oleo\tPDT-M-0101C-3kPa_mA\tPDT-M-0101B-10kPa_mA\tPDT-M-0101-40kPa_mA\tComment",
            &[
                "0,0\t0,10\t1,0\t4,0\t5,0\t6,0\t",
                "0,5\t0,20\t1,0\t4,0\t5,0\t6,0\t",
                "1,0\t0,30\t1,0\t4,0\t5,0\t6,0\t",
                "1,5\t0,40\t1,0\t4,0\t5,0\t6,0\t",
            ],
        );
        parse_bytes(&bytes, &Config::default().loader).unwrap()
    }

    #[test]
    fn default_inputs_cover_the_full_dataset() {
        let ds = flow_dataset();
        let config = Config::default();
        let inputs = Inputs::for_dataset(&ds);
        let a = Analysis::run(&ds, &config, &inputs).unwrap();

        assert_eq!(a.rows_in_view, ds.len());
        assert_eq!(a.column, "X_Value");
        let single = a.single.as_ref().unwrap();
        assert_eq!(single.summary.count, 4);
        assert_abs_diff_eq!(single.summary.mean, 0.75);

        let r = a.reference.as_ref().unwrap();
        assert_abs_diff_eq!(r.usg, 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(r.dpdx, 4.0);

        let c = a.correlation.as_ref().unwrap();
        assert_eq!((c.pair.x.as_str(), c.pair.y.as_str()), ("X_Value", "J_SF6"));
        assert!(!c.y_choices.contains(&c.pair.x));
        assert_eq!(c.y_choices.len(), a.columns.len() - 1);
        let fit = c.fit.as_ref().unwrap();
        assert_abs_diff_eq!(fit.slope.estimate, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn reference_ignores_the_window() {
        let ds = flow_dataset();
        let config = Config::default();
        let mut inputs = Inputs::for_dataset(&ds);
        inputs.window = Some(Window {
            low: 0.0,
            high: 0.5,
            step: 0.5,
        });
        inputs.reference.sensor = Sensor::Kpa40;
        inputs.column = Some("J_SF6".to_string());

        let a = Analysis::run(&ds, &config, &inputs).unwrap();
        assert_eq!(a.rows_in_view, 1);
        assert_abs_diff_eq!(a.single.as_ref().unwrap().summary.mean, 0.1);
        assert_abs_diff_eq!(a.reference.as_ref().unwrap().usg, 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(a.reference.as_ref().unwrap().dpdx, 6.0);
        // A single point cannot carry a regression line.
        assert!(matches!(
            a.correlation.as_ref().unwrap().fit,
            Err(DataError::TooFewPoints { .. })
        ));
    }

    #[test]
    fn section_errors_stay_local() {
        let ds = flow_dataset();
        let config = Config::default();
        let mut inputs = Inputs::for_dataset(&ds);
        inputs.window = Some(Window {
            low: -1.0,
            high: -1.0,
            step: 0.5,
        });
        inputs.series.resize(2, "Comment");

        let a = Analysis::run(&ds, &config, &inputs).unwrap();
        assert_eq!(a.rows_in_view, 0);
        assert!(matches!(a.single, Err(DataError::EmptySelection)));
        assert!(a.reference.is_ok());
        assert!(matches!(a.multi[0], Err(DataError::EmptySelection)));
        assert_eq!(
            a.multi[1].as_ref().unwrap_err(),
            &DataError::NonNumericColumn("Comment".to_string())
        );
    }

    #[test]
    fn text_correlation_column_keeps_the_pair() {
        let ds = flow_dataset();
        let config = Config::default();
        let mut inputs = Inputs::for_dataset(&ds);
        inputs.x_corr = Some("Comment".to_string());

        let a = Analysis::run(&ds, &config, &inputs).unwrap();
        let c = a.correlation.as_ref().unwrap();
        assert_eq!(c.pair.x, "Comment");
        assert_eq!(c.pair.y, "X_Value");
        assert!(c.points.is_empty());
        assert_eq!(
            c.fit,
            Err(DataError::NonNumericColumn("Comment".to_string()))
        );
        assert!(!c.y_choices.is_empty());
        assert!(a.columns.contains(&"J_SF6".to_string()));

        // Picking a numeric x again recovers the fit.
        inputs.x_corr = Some("X_Value".to_string());
        let a = Analysis::run(&ds, &config, &inputs).unwrap();
        assert!(a.correlation.as_ref().unwrap().fit.is_ok());
    }

    #[test]
    fn missing_ordering_column_fails_the_run() {
        let ds = flow_dataset();
        let mut config = Config::default();
        config.columns.ordering = "Time".to_string();
        let inputs = Inputs::for_dataset(&ds);
        assert_eq!(
            Analysis::run(&ds, &config, &inputs).unwrap_err(),
            DataError::MissingColumn("Time".to_string())
        );
    }

    #[test]
    fn report_serialises() {
        let ds = flow_dataset();
        let config = Config::default();
        let a = Analysis::run(&ds, &config, &Inputs::for_dataset(&ds)).unwrap();
        let json = serde_json::to_value(a.report()).unwrap();
        assert_eq!(json["rows_in_view"], 4);
        assert_eq!(json["reference"]["holdup"], "NotImplemented");
        assert_eq!(json["reference"]["sensor"], "3 kPa");
        assert_eq!(json["correlation"]["pair"]["y"], "J_SF6");
    }
}
