//! Map Chart Builder
//!
//! One choropleth per dataset. The color range is clamped to the
//! `q`/`1 - q` quantiles of the column so a few extreme counties do not wash
//! out the rest of the map.

use super::error::{ChartError, ChartResult};
use super::figure::{
    ChoroplethTrace, ColorAxis, ColorBar, Figure, GeoLayout, GeoReference, Layout, Margin, Title,
    Trace,
};
use crate::data::{Dataset, DatasetMeta, GeoBoundary, TickFormat, DEFAULT_CLAMP_QUANTILE};
use crate::stats::quantile_range;

/// Route serving the boundary document
pub const DEFAULT_GEO_ROUTE: &str = "/api/v1/geo/counties";

const COLOR_SCALE: &str = "Viridis";

/// How map figures carry the boundary document
#[derive(Debug, Clone, PartialEq)]
pub enum GeoEmbed {
    /// Copy the document into the figure
    Inline,
    /// Reference the document by URL
    Url(String),
}

impl Default for GeoEmbed {
    fn default() -> Self {
        GeoEmbed::Url(DEFAULT_GEO_ROUTE.to_string())
    }
}

/// Rendering options for [`build_map`]
#[derive(Debug, Clone)]
pub struct MapOptions {
    pub title: Option<String>,
    /// Fraction clipped from each end of the color scale
    pub clamp_quantile: f64,
    pub tick_format: TickFormat,
    pub geo: GeoEmbed,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            title: None,
            clamp_quantile: DEFAULT_CLAMP_QUANTILE,
            tick_format: TickFormat::default(),
            geo: GeoEmbed::default(),
        }
    }
}

impl MapOptions {
    /// Options from a dataset's metadata, titled with its display name
    pub fn for_dataset(meta: &DatasetMeta, geo: GeoEmbed) -> Self {
        Self {
            title: Some(meta.display_name.clone()),
            clamp_quantile: meta.clamp_quantile,
            tick_format: meta.tick_format.clone(),
            geo,
        }
    }
}

/// Build a county choropleth of `column`.
///
/// Records without a boundary polygon or without a value are left off the
/// map; the color range is computed over every value in the column.
pub fn build_map(
    dataset: &Dataset,
    column: &str,
    options: &MapOptions,
    boundary: &GeoBoundary,
) -> ChartResult<Figure> {
    if !(0.0..0.5).contains(&options.clamp_quantile) {
        return Err(ChartError::InvalidQuantile(options.clamp_quantile));
    }

    let idx = dataset
        .table
        .column_index(column)
        .ok_or_else(|| ChartError::UnknownColumn {
            dataset: dataset.name().to_string(),
            column: column.to_string(),
        })?;

    let values = dataset.table.column_values(column).unwrap_or_default();
    let (cmin, cmax) =
        quantile_range(&values, options.clamp_quantile).ok_or_else(|| ChartError::EmptyColumn {
            dataset: dataset.name().to_string(),
            column: column.to_string(),
        })?;

    let mut locations = Vec::new();
    let mut z = Vec::new();
    let mut hovertext = Vec::new();
    let mut unmatched = 0usize;

    for record in dataset.table.records() {
        let Some(value) = record.values[idx] else {
            continue;
        };
        if !boundary.contains(&record.fips) {
            unmatched += 1;
            continue;
        }
        locations.push(record.fips.to_string());
        z.push(value);
        hovertext.push(record.place_name.clone());
    }

    if unmatched > 0 {
        tracing::debug!(
            dataset = %dataset.name(),
            unmatched,
            "Counties without a boundary polygon left off the map"
        );
    }

    let geojson = match &options.geo {
        GeoEmbed::Inline => GeoReference::Inline(boundary.collection()),
        GeoEmbed::Url(url) => GeoReference::Url(url.clone()),
    };

    let trace = ChoroplethTrace {
        name: String::new(),
        geojson,
        featureidkey: "id".to_string(),
        locations,
        z,
        hovertext,
        hovertemplate: format!("<b>%{{hovertext}}</b><br><br>{}=%{{z}}<extra></extra>", column),
        coloraxis: "coloraxis".to_string(),
    };

    let layout = Layout {
        title: options.title.as_ref().map(Title::new),
        margin: Margin::new(0, 0, 33, 20),
        geo: Some(GeoLayout {
            scope: "usa".to_string(),
        }),
        coloraxis: Some(ColorAxis {
            colorscale: COLOR_SCALE.to_string(),
            cmin,
            cmax,
            colorbar: ColorBar {
                orientation: "h".to_string(),
                thickness: 10,
                y: -0.1,
                len: 0.7,
                title: Title::new(""),
                tickprefix: options.tick_format.prefix.clone(),
                ticksuffix: options.tick_format.suffix.clone(),
            },
        }),
        xaxis: None,
        yaxis: None,
    };

    Ok(Figure {
        data: vec![Trace::Choropleth(trace)],
        layout,
    })
}
