use serde::Serialize;

use super::error::DataError;
use super::model::Dataset;

// ---------------------------------------------------------------------------
// Window – the observation range on the ordering column
// ---------------------------------------------------------------------------

/// Smallest and largest value of the ordering column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    pub fn of(dataset: &Dataset, ordering: &str) -> Result<Self, DataError> {
        let values = dataset.numeric(ordering)?;
        if values.is_empty() {
            return Err(DataError::EmptySelection);
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Ok(Extent { min, max })
    }
}

/// Bounds on the ordering column plus the slider granularity.
///
/// Rows are kept when `low <= v < high`, except that a window reaching the
/// column maximum keeps the maximum itself. Without that exception the
/// full-extent window would silently drop the final sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Window {
    pub low: f64,
    pub high: f64,
    pub step: f64,
}

impl Window {
    /// The default window: the full extent of `ordering`, stepped by the
    /// spacing between the second and third samples.
    pub fn full(dataset: &Dataset, ordering: &str) -> Result<Self, DataError> {
        let extent = Extent::of(dataset, ordering)?;
        let step = sample_step(dataset.numeric(ordering)?);
        Ok(Window {
            low: extent.min,
            high: extent.max,
            step,
        })
    }

    /// Build a window whose bounds lie within `extent`.
    ///
    /// Out-of-range bounds are clamped, non-finite bounds fall back to the
    /// matching end of the extent, and reversed bounds are swapped. Never
    /// fails.
    pub fn clamped(low: f64, high: f64, extent: Extent, step: f64) -> Self {
        let fix = |v: f64, fallback: f64| {
            if v.is_finite() {
                v.clamp(extent.min, extent.max)
            } else {
                fallback
            }
        };
        let mut low = fix(low, extent.min);
        let mut high = fix(high, extent.max);
        if low > high {
            std::mem::swap(&mut low, &mut high);
        }
        Window { low, high, step }
    }

    fn contains(&self, v: f64, extent: Extent) -> bool {
        v >= self.low && (v < self.high || (self.high >= extent.max && v <= self.high))
    }
}

/// Spacing used to step the window bounds.
fn sample_step(values: &[f64]) -> f64 {
    match values {
        [_, a, b, ..] => (b - a).abs(),
        [a, b] => (b - a).abs(),
        _ => 0.0,
    }
}

// ---------------------------------------------------------------------------
// FilteredView – rows of the dataset inside the window
// ---------------------------------------------------------------------------

/// The rows of a [`Dataset`] that fall inside a [`Window`], in load order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    rows: Vec<usize>,
    window: Window,
}

impl<'a> FilteredView<'a> {
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Indices into the dataset of the rows in view.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The effective (clamped) window.
    pub fn window(&self) -> Window {
        self.window
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'a str> {
        self.dataset.column_names()
    }

    /// Values of a numeric column restricted to the rows in view.
    pub fn numeric(&self, name: &str) -> Result<Vec<f64>, DataError> {
        let values = self.dataset.numeric(name)?;
        Ok(self.rows.iter().map(|&i| values[i]).collect())
    }
}

/// Filter `dataset` to the rows whose `ordering` value lies in `window`.
///
/// The window is clamped to the column extent first.
pub fn filter_view<'a>(
    dataset: &'a Dataset,
    ordering: &str,
    window: &Window,
) -> Result<FilteredView<'a>, DataError> {
    let extent = Extent::of(dataset, ordering)?;
    let window = Window::clamped(window.low, window.high, extent, window.step);
    let rows = dataset
        .numeric(ordering)?
        .iter()
        .enumerate()
        .filter(|&(_, &v)| window.contains(v, extent))
        .map(|(i, _)| i)
        .collect();
    Ok(FilteredView {
        dataset,
        rows,
        window,
    })
}
