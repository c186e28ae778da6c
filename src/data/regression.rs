use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

use super::error::DataError;

/// Coefficient of an ordinary least-squares fit with its inference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coefficient {
    pub estimate: f64,
    /// `None` when there are no residual degrees of freedom.
    pub std_error: Option<f64>,
    pub t_value: Option<f64>,
    /// Two-sided p-value of the hypothesis that the coefficient is zero.
    pub p_value: Option<f64>,
}

/// Simple linear regression `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub n: usize,
    pub intercept: Coefficient,
    pub slope: Coefficient,
    pub r_squared: f64,
    pub adj_r_squared: Option<f64>,
    /// Standard deviation of the residuals.
    pub residual_std_error: Option<f64>,
}

impl LinearFit {
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self, DataError> {
        let n = x.len().min(y.len());
        if n < 2 {
            return Err(DataError::TooFewPoints { needed: 2, found: n });
        }
        let (x, y) = (&x[..n], &y[..n]);
        let nf = n as f64;

        let mean_x = x.iter().sum::<f64>() / nf;
        let mean_y = y.iter().sum::<f64>() / nf;
        let ss_xx: f64 = x.iter().map(|v| (v - mean_x).powi(2)).sum();
        let ss_yy: f64 = y.iter().map(|v| (v - mean_y).powi(2)).sum();
        let ss_xy: f64 = x
            .iter()
            .zip(y)
            .map(|(a, b)| (a - mean_x) * (b - mean_y))
            .sum();

        // Relative to the magnitude of x so that tiny but varying columns fit.
        let ss_x0: f64 = x.iter().map(|v| v * v).sum();
        if ss_xx <= f64::EPSILON * ss_x0 {
            return Err(DataError::DegenerateFit);
        }

        let slope = ss_xy / ss_xx;
        let intercept = mean_y - slope * mean_x;

        let sse: f64 = x
            .iter()
            .zip(y)
            .map(|(a, b)| (b - (intercept + slope * a)).powi(2))
            .sum();
        // A constant y is fitted exactly.
        let r_squared = if ss_yy > 0.0 { 1.0 - sse / ss_yy } else { 1.0 };

        let dof = n - 2;
        let (residual_std_error, adj_r_squared) = if dof > 0 {
            (
                Some((sse / dof as f64).sqrt()),
                Some(1.0 - (1.0 - r_squared) * (nf - 1.0) / dof as f64),
            )
        } else {
            (None, None)
        };

        let se_slope = residual_std_error.map(|s| s / ss_xx.sqrt());
        let se_intercept =
            residual_std_error.map(|s| s * (1.0 / nf + mean_x.powi(2) / ss_xx).sqrt());

        Ok(LinearFit {
            n,
            intercept: coefficient(intercept, se_intercept, dof),
            slope: coefficient(slope, se_slope, dof),
            r_squared,
            adj_r_squared,
            residual_std_error,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.intercept.estimate + self.slope.estimate * x
    }
}

fn coefficient(estimate: f64, std_error: Option<f64>, dof: usize) -> Coefficient {
    let t_value = std_error.filter(|se| *se > 0.0).map(|se| estimate / se);
    let p_value = t_value.and_then(|t| {
        let dist = StudentsT::new(0.0, 1.0, dof as f64).ok()?;
        Some(2.0 * (1.0 - dist.cdf(t.abs())))
    });
    Coefficient {
        estimate,
        std_error,
        t_value,
        p_value,
    }
}
