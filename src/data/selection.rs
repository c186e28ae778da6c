use serde::Serialize;

use super::error::DataError;
use super::filter::FilteredView;

/// Most series that can be compared at once.
pub const MAX_SERIES: usize = 5;

// ---------------------------------------------------------------------------
// Multi-series selection
// ---------------------------------------------------------------------------

/// Ordered column choices for the multi-variable plots. Repeats are allowed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSelection {
    columns: Vec<String>,
}

impl SeriesSelection {
    /// `count` slots (clamped to `1..=MAX_SERIES`), each set to `default`.
    pub fn new(count: usize, default: &str) -> Self {
        let count = count.clamp(1, MAX_SERIES);
        SeriesSelection {
            columns: vec![default.to_string(); count],
        }
    }

    /// Grow or shrink to `count` slots, keeping existing choices; new slots
    /// take `default`.
    pub fn resize(&mut self, count: usize, default: &str) {
        let count = count.clamp(1, MAX_SERIES);
        self.columns.resize(count, default.to_string());
    }

    /// Set slot `index`; out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, column: &str) {
        if let Some(slot) = self.columns.get_mut(index) {
            *slot = column.to_string();
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// One resolved series: `(ordering, value)` points over the filtered rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

impl Series {
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p[1]).collect()
    }
}

/// Build a series against `ordering` for `column` over the view.
pub fn resolve_one(
    view: &FilteredView<'_>,
    ordering: &str,
    column: &str,
) -> Result<Series, DataError> {
    let x = view.numeric(ordering)?;
    let y = view.numeric(column)?;
    Ok(Series {
        name: column.to_string(),
        points: x.into_iter().zip(y).map(|(a, b)| [a, b]).collect(),
    })
}

/// Resolve every slot of `selection`, in order.
pub fn resolve_series(
    view: &FilteredView<'_>,
    ordering: &str,
    selection: &SeriesSelection,
) -> Result<Vec<Series>, DataError> {
    selection
        .columns()
        .iter()
        .map(|col| resolve_one(view, ordering, col))
        .collect()
}

// ---------------------------------------------------------------------------
// Correlation pair
// ---------------------------------------------------------------------------

/// Candidate x columns: every column of the view.
pub fn x_candidates<'a>(view: &FilteredView<'a>) -> Vec<&'a str> {
    view.column_names().collect()
}

/// Candidate y columns: every column except `x`.
pub fn y_candidates<'a>(view: &FilteredView<'a>, x: &str) -> Vec<&'a str> {
    view.column_names().filter(|c| *c != x).collect()
}

/// Two distinct columns to correlate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorrelationPair {
    pub x: String,
    pub y: String,
}

impl CorrelationPair {
    /// Resolve the user's choices against the view.
    ///
    /// A missing or unknown `x` falls back to the first column. A missing,
    /// unknown or equal `y` falls back to the first y candidate.
    pub fn resolve(
        view: &FilteredView<'_>,
        x: Option<&str>,
        y: Option<&str>,
    ) -> Result<Self, DataError> {
        let xs = x_candidates(view);
        let x = x
            .and_then(|wanted| xs.iter().copied().find(|c| *c == wanted))
            .or_else(|| xs.first().copied())
            .ok_or(DataError::NotEnoughColumns)?;

        let ys = y_candidates(view, x);
        let y = y
            .and_then(|wanted| ys.iter().copied().find(|c| *c == wanted))
            .or_else(|| ys.first().copied())
            .ok_or(DataError::NotEnoughColumns)?;

        Ok(CorrelationPair {
            x: x.to_string(),
            y: y.to_string(),
        })
    }

    /// Paired numeric values of both columns over the view.
    pub fn values(&self, view: &FilteredView<'_>) -> Result<(Vec<f64>, Vec<f64>), DataError> {
        Ok((view.numeric(&self.x)?, view.numeric(&self.y)?))
    }
}
