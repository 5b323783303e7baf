//! Statistics
//!
//! The numeric core behind the charts: empirical quantiles for color ranges,
//! the logit transform for percentage outcomes, ordinary least squares with
//! an intercept, and the fixed-width regression summary shown next to the
//! scatter plot.

mod distribution;
mod error;
mod quantile;
mod regression;
mod summary;
mod transform;

pub use distribution::{
    ln_gamma, regularized_incomplete_beta, student_t_cdf, student_t_ppf, student_t_two_sided_p,
};
pub use error::{StatsError, StatsResult};
pub use quantile::{quantile, quantile_range};
pub use regression::{Coefficient, OlsFit};
pub use summary::{render_summary, summary_dependent_name};
pub use transform::{logit, logit_percent};
