use serde::Serialize;

use super::error::DataError;
use super::filter::FilteredView;

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

/// Mean, standard deviation, median and variance of one column.
///
/// Standard deviation and variance are population statistics (divide by N).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatisticsSummary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub median: f64,
    pub variance: f64,
}

impl StatisticsSummary {
    pub fn from_values(values: &[f64]) -> Result<Self, DataError> {
        if values.is_empty() {
            return Err(DataError::EmptySelection);
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Ok(StatisticsSummary {
            count: values.len(),
            mean,
            std_dev: variance.sqrt(),
            median: quantile_sorted(&sorted, 0.5),
            variance,
        })
    }

    /// Rows for the statistics table, in display order.
    pub fn table_rows(&self) -> [(&'static str, f64); 4] {
        [
            ("Mean", self.mean),
            ("Std. deviation", self.std_dev),
            ("Median", self.median),
            ("Variance", self.variance),
        ]
    }
}

/// Summarise `column` over the rows of `view`.
pub fn summarize(view: &FilteredView<'_>, column: &str) -> Result<StatisticsSummary, DataError> {
    StatisticsSummary::from_values(&view.numeric(column)?)
}

// ---------------------------------------------------------------------------
// Boxplot geometry
// ---------------------------------------------------------------------------

/// Five-number summary used to draw a boxplot.
///
/// Whiskers extend to the furthest observations within 1.5 IQR of the box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
}

impl BoxSummary {
    pub fn from_values(values: &[f64]) -> Result<Self, DataError> {
        if values.is_empty() {
            return Err(DataError::EmptySelection);
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile_sorted(&sorted, 0.25);
        let median = quantile_sorted(&sorted, 0.5);
        let q3 = quantile_sorted(&sorted, 0.75);
        let fence = 1.5 * (q3 - q1);

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= q1 - fence)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= q3 + fence)
            .unwrap_or(q3);

        Ok(BoxSummary {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
        })
    }
}

/// Linearly interpolated quantile of already sorted, non-empty data.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::data::filter::{filter_view, Window};
    use crate::data::model::{Column, ColumnData, Dataset};

    #[test]
    fn population_statistics() {
        let s = StatisticsSummary::from_values(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(s.count, 4);
        assert_abs_diff_eq!(s.mean, 2.5);
        assert_abs_diff_eq!(s.variance, 1.25);
        assert_abs_diff_eq!(s.std_dev, 1.118, epsilon = 1e-3);
        assert_abs_diff_eq!(s.median, 2.5);
    }

    #[test]
    fn median_of_odd_count_ignores_input_order() {
        let s = StatisticsSummary::from_values(&[9.0, 1.0, 5.0]).unwrap();
        assert_abs_diff_eq!(s.median, 5.0);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(
            StatisticsSummary::from_values(&[]),
            Err(DataError::EmptySelection)
        );
        assert_eq!(BoxSummary::from_values(&[]), Err(DataError::EmptySelection));
    }

    #[test]
    fn summarize_is_repeatable_and_respects_window() {
        let ds = Dataset::from_columns(vec![
            Column {
                name: "X_Value".to_string(),
                data: ColumnData::Numeric(vec![0.0, 1.0, 2.0, 3.0, 4.0]),
            },
            Column {
                name: "p".to_string(),
                data: ColumnData::Numeric(vec![100.0, 1.0, 2.0, 3.0, 4.0]),
            },
        ])
        .unwrap();
        let w = Window {
            low: 1.0,
            high: 4.0,
            step: 1.0,
        };
        let view = filter_view(&ds, "X_Value", &w).unwrap();

        let a = summarize(&view, "p").unwrap();
        let b = summarize(&view, "p").unwrap();
        assert_eq!(a, b);
        assert_abs_diff_eq!(a.mean, 2.5);
        assert_eq!(a.count, 4);

        let empty = Window {
            low: -1.0,
            high: -1.0,
            step: 1.0,
        };
        let view = filter_view(&ds, "X_Value", &empty).unwrap();
        assert_eq!(summarize(&view, "p"), Err(DataError::EmptySelection));
    }

    #[test]
    fn box_summary_with_outlier() {
        let b = BoxSummary::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 100.0]).unwrap();
        assert_abs_diff_eq!(b.q1, 3.0);
        assert_abs_diff_eq!(b.median, 5.0);
        assert_abs_diff_eq!(b.q3, 7.0);
        assert_abs_diff_eq!(b.lower_whisker, 1.0);
        assert_abs_diff_eq!(b.upper_whisker, 8.0);
    }

    #[test]
    fn box_summary_of_single_value() {
        let b = BoxSummary::from_values(&[2.0]).unwrap();
        assert_eq!(
            (b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker),
            (2.0, 2.0, 2.0, 2.0, 2.0)
        );
    }
}
