//! Scatter Chart Builder
//!
//! Joins two datasets on FIPS, fits an OLS trendline and renders the fit as a
//! fixed-width summary alongside the figure.

use super::error::{ChartError, ChartResult};
use super::figure::{Axis, Figure, Layout, Line, Margin, Marker, ScatterTrace, Title, Trace};
use crate::data::Dataset;
use crate::stats::{logit_percent, render_summary, summary_dependent_name, OlsFit, StatsError};

pub const POINTS_TRACE: &str = "counties";
pub const TREND_TRACE: &str = "OLS trendline";

const POINT_COLOR: &str = "#636efa";
const TREND_COLOR: &str = "red";

/// Everything produced by one scatter render
#[derive(Debug, Clone)]
pub struct ScatterOutput {
    pub figure: Figure,
    pub summary: String,
    pub fit: OlsFit,
    /// Counties present in both datasets
    pub joined: usize,
    /// Rows that entered the regression
    pub observations: usize,
    /// Joined rows dropped because the logit of their y value is not finite
    pub excluded: usize,
}

struct Joined {
    x: Vec<f64>,
    y: Vec<f64>,
    names: Vec<String>,
    joined: usize,
    excluded: usize,
}

fn join(
    dataset_x: &Dataset,
    dataset_y: &Dataset,
    column_x: &str,
    column_y: &str,
    use_logit: bool,
) -> ChartResult<Joined> {
    let unknown = |dataset: &Dataset, column: &str| ChartError::UnknownColumn {
        dataset: dataset.name().to_string(),
        column: column.to_string(),
    };
    let ix = dataset_x
        .table
        .column_index(column_x)
        .ok_or_else(|| unknown(dataset_x, column_x))?;
    let iy = dataset_y
        .table
        .column_index(column_y)
        .ok_or_else(|| unknown(dataset_y, column_y))?;

    let mut out = Joined {
        x: Vec::new(),
        y: Vec::new(),
        names: Vec::new(),
        joined: 0,
        excluded: 0,
    };

    for record in dataset_x.table.records() {
        let Some(other) = dataset_y.table.get(&record.fips) else {
            continue;
        };
        out.joined += 1;

        let (Some(x), Some(raw_y)) = (record.values[ix], other.values[iy]) else {
            continue;
        };
        let y = if use_logit {
            match logit_percent(raw_y) {
                Some(y) => y,
                None => {
                    out.excluded += 1;
                    continue;
                }
            }
        } else {
            raw_y
        };

        out.x.push(x);
        out.y.push(y);
        out.names.push(record.place_name.clone());
    }

    Ok(out)
}

/// Build the scatter plot, trendline and regression summary of `column_y`
/// against `column_x`.
///
/// With `use_logit` the y values are percentages mapped through
/// `logit(y / 100)`; values at or beyond 0 and 100 are counted in `excluded`.
pub fn build_scatter(
    dataset_x: &Dataset,
    dataset_y: &Dataset,
    column_x: &str,
    column_y: &str,
    use_logit: bool,
) -> ChartResult<ScatterOutput> {
    let joined = join(dataset_x, dataset_y, column_x, column_y, use_logit)?;
    let observations = joined.x.len();

    let fit = OlsFit::fit(&joined.x, &joined.y).map_err(|e| match e {
        StatsError::InsufficientData { .. } => ChartError::InsufficientData {
            joined: joined.joined,
            observations,
        },
        StatsError::ZeroVariance(axis) => {
            ChartError::Degenerate(format!("no variance in {}", axis))
        }
        other => ChartError::Stats(other),
    })?;

    if joined.excluded > 0 {
        tracing::debug!(
            dataset = %dataset_y.name(),
            excluded = joined.excluded,
            "Rows without a finite logit left out of the fit"
        );
    }

    let mut sorted_x = joined.x.clone();
    sorted_x.sort_by(f64::total_cmp);
    let fitted: Vec<f64> = sorted_x.iter().map(|&x| fit.predict(x)).collect();

    let y_title = if use_logit {
        format!("Logistic {}", column_y)
    } else {
        column_y.to_string()
    };

    let points = ScatterTrace {
        name: POINTS_TRACE.to_string(),
        mode: "markers".to_string(),
        x: joined.x,
        y: joined.y,
        hovertext: Some(joined.names),
        marker: Some(Marker {
            color: POINT_COLOR.to_string(),
        }),
        line: None,
        showlegend: false,
    };
    let trend = ScatterTrace {
        name: TREND_TRACE.to_string(),
        mode: "lines".to_string(),
        x: sorted_x,
        y: fitted,
        hovertext: None,
        marker: None,
        line: Some(Line {
            color: TREND_COLOR.to_string(),
        }),
        showlegend: false,
    };

    let figure = Figure {
        data: vec![Trace::Scatter(points), Trace::Scatter(trend)],
        layout: Layout {
            margin: Margin::new(10, 30, 5, 15),
            xaxis: Some(Axis {
                title: Title::new(column_x),
            }),
            yaxis: Some(Axis {
                title: Title::new(y_title),
            }),
            ..Default::default()
        },
    };

    let summary = render_summary(&fit, &summary_dependent_name(column_y));

    Ok(ScatterOutput {
        figure,
        summary,
        fit,
        joined: joined.joined,
        observations,
        excluded: joined.excluded,
    })
}
