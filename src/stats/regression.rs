//! Ordinary least squares
//!
//! Simple regression of `y` on a single regressor `x` with an intercept,
//! reporting the classical (non-robust) inference statistics.

use serde::Serialize;

use super::distribution::{student_t_ppf, student_t_two_sided_p};
use super::error::{StatsError, StatsResult};

/// Minimum number of observations for a fit with residual degrees of freedom
pub const MIN_OBSERVATIONS: usize = 3;

/// One estimated coefficient with its inference statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coefficient {
    /// Row label in the summary table ("const" or "x1")
    pub name: String,
    pub estimate: f64,
    pub std_err: f64,
    pub t_value: f64,
    /// Two-sided p-value
    pub p_value: f64,
    /// Lower bound of the 95% confidence interval
    pub conf_low: f64,
    /// Upper bound of the 95% confidence interval
    pub conf_high: f64,
}

/// Result of an OLS fit of `y = intercept + slope * x`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OlsFit {
    pub observations: usize,
    pub df_resid: f64,
    pub intercept: Coefficient,
    pub slope: Coefficient,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub f_statistic: f64,
    pub f_pvalue: f64,
    /// Sum of squared residuals
    pub ssr: f64,
}

impl OlsFit {
    /// Fit `y` on `x` with an implicit intercept
    pub fn fit(x: &[f64], y: &[f64]) -> StatsResult<Self> {
        if x.len() != y.len() {
            return Err(StatsError::LengthMismatch {
                x: x.len(),
                y: y.len(),
            });
        }
        if x.len() < MIN_OBSERVATIONS {
            return Err(StatsError::InsufficientData {
                observations: x.len(),
                required: MIN_OBSERVATIONS,
            });
        }

        let n = x.len() as f64;
        let mean_x = x.iter().sum::<f64>() / n;
        let mean_y = y.iter().sum::<f64>() / n;

        let mut sxx = 0.0;
        let mut sxy = 0.0;
        let mut syy = 0.0;
        for (&xi, &yi) in x.iter().zip(y) {
            let dx = xi - mean_x;
            let dy = yi - mean_y;
            sxx += dx * dx;
            sxy += dx * dy;
            syy += dy * dy;
        }

        if sxx <= 0.0 {
            return Err(StatsError::ZeroVariance("x"));
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;

        let ssr: f64 = x
            .iter()
            .zip(y)
            .map(|(&xi, &yi)| (yi - intercept - slope * xi).powi(2))
            .sum();

        let df_resid = n - 2.0;
        let sigma2 = ssr / df_resid;
        let se_slope = (sigma2 / sxx).sqrt();
        let se_intercept = (sigma2 * (1.0 / n + mean_x * mean_x / sxx)).sqrt();

        // A constant response leaves R² undefined (NaN); the fit is still flat
        let r_squared = 1.0 - ssr / syy;
        let adj_r_squared = 1.0 - (1.0 - r_squared) * (n - 1.0) / df_resid;
        let f_statistic = (syy - ssr) / sigma2;

        let t_crit = student_t_ppf(0.975, df_resid)?;
        let intercept = coefficient("const", intercept, se_intercept, df_resid, t_crit);
        let slope = coefficient("x1", slope, se_slope, df_resid, t_crit);

        // With one regressor the F test is the squared slope t test
        let f_pvalue = slope.p_value;

        Ok(Self {
            observations: x.len(),
            df_resid,
            intercept,
            slope,
            r_squared,
            adj_r_squared,
            f_statistic,
            f_pvalue,
            ssr,
        })
    }

    /// Fitted value at `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept.estimate + self.slope.estimate * x
    }
}

fn coefficient(name: &str, estimate: f64, std_err: f64, df: f64, t_crit: f64) -> Coefficient {
    let t_value = estimate / std_err;
    Coefficient {
        name: name.to_string(),
        estimate,
        std_err,
        t_value,
        p_value: student_t_two_sided_p(t_value, df),
        conf_low: estimate - t_crit * std_err,
        conf_high: estimate + t_crit * std_err,
    }
}
