//! Regression summary text
//!
//! Renders an [`OlsFit`] as a 78-column plain-text table: a header block
//! with fit statistics followed by the coefficient table. The trailing notes
//! block that usually follows such tables is left out.

use super::regression::{Coefficient, OlsFit};

const WIDTH: usize = 78;

/// Name shown as the dependent variable: the first 14 characters of the
/// column name followed by an ellipsis
pub fn summary_dependent_name(column: &str) -> String {
    let prefix: String = column.chars().take(14).collect();
    format!("{}...", prefix)
}

/// Render the fixed-width summary for `fit`
pub fn render_summary(fit: &OlsFit, dependent: &str) -> String {
    let mut lines = Vec::with_capacity(14);
    let heavy = "=".repeat(WIDTH);
    let light = "-".repeat(WIDTH);

    lines.push(format!("{:^width$}", "OLS Regression Results", width = WIDTH));
    lines.push(heavy.clone());
    lines.push(header_row(
        ("Dep. Variable:", dependent.to_string()),
        ("R-squared:", format_fixed(fit.r_squared, 3)),
    ));
    lines.push(header_row(
        ("Model:", "OLS".to_string()),
        ("Adj. R-squared:", format_fixed(fit.adj_r_squared, 3)),
    ));
    lines.push(header_row(
        ("No. Observations:", fit.observations.to_string()),
        ("F-statistic:", format_general(fit.f_statistic, 4)),
    ));
    lines.push(header_row(
        ("Covariance Type:", "nonrobust".to_string()),
        ("Prob (F-statistic):", format_general(fit.f_pvalue, 3)),
    ));
    lines.push(heavy.clone());
    lines.push(format!(
        "{:<10}{:>11}{:>11}{:>11}{:>11}{:>12}{:>12}",
        "", "coef", "std err", "t", "P>|t|", "[0.025", "0.975]"
    ));
    lines.push(light);
    lines.push(coefficient_row(&fit.intercept));
    lines.push(coefficient_row(&fit.slope));
    lines.push(heavy);

    lines.join("\n")
}

fn header_row(left: (&str, String), right: (&str, String)) -> String {
    format!(
        "{:<18}{:>18}   {:<20}{:>19}",
        left.0, left.1, right.0, right.1
    )
}

fn coefficient_row(coef: &Coefficient) -> String {
    format!(
        "{:<10}{:>11}{:>11}{:>11}{:>11}{:>12}{:>12}",
        coef.name,
        format_cell(coef.estimate, 4),
        format_cell(coef.std_err, 3),
        format_cell(coef.t_value, 3),
        format_fixed(coef.p_value, 3),
        format_cell(coef.conf_low, 3),
        format_cell(coef.conf_high, 3),
    )
}

fn format_fixed(value: f64, precision: usize) -> String {
    if value.is_finite() {
        format!("{:.*}", precision, value)
    } else {
        non_finite(value)
    }
}

/// Fixed notation for moderate magnitudes, scientific otherwise
fn format_cell(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }
    let magnitude = value.abs();
    if value != 0.0 && !(1e-4..1e4).contains(&magnitude) {
        scientific(value, 3)
    } else {
        format!("{:.*}", precision, value)
    }
}

/// `%#.Ng`-style formatting: `significant` digits, trailing zeros kept
fn format_general(value: f64, significant: usize) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }
    if value == 0.0 {
        return format!("{:.*}", significant.saturating_sub(1), 0.0);
    }

    let exponent = value.abs().log10().floor() as i32;
    if exponent < -4 || exponent >= significant as i32 {
        scientific(value, significant.saturating_sub(1))
    } else {
        let decimals = (significant as i32 - 1 - exponent).max(0) as usize;
        format!("{:.*}", decimals, value)
    }
}

/// Scientific notation with a signed two-digit exponent (`1.234e-05`)
fn scientific(value: f64, decimals: usize) -> String {
    let raw = format!("{:.*e}", decimals, value);
    match raw.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.abs())
        }
        None => raw,
    }
}

fn non_finite(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value > 0.0 {
        "inf".to_string()
    } else {
        "-inf".to_string()
    }
}
