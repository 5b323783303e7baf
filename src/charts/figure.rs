//! Figure model
//!
//! A serializable subset of the Plotly figure schema: enough to describe a
//! county choropleth and a scatter plot with a trendline. The browser page
//! hands these documents straight to plotly.js.

use geojson::FeatureCollection;
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// A complete, self-contained chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    /// Color range of the figure's color axis, if it has one
    pub fn color_range(&self) -> Option<(f64, f64)> {
        self.layout
            .coloraxis
            .as_ref()
            .map(|axis| (axis.cmin, axis.cmax))
    }

    /// Locations of the first choropleth trace
    pub fn locations(&self) -> Option<&[String]> {
        self.data.iter().find_map(|trace| match trace {
            Trace::Choropleth(choropleth) => Some(choropleth.locations.as_slice()),
            Trace::Scatter(_) => None,
        })
    }

    /// The trace with the given name
    pub fn scatter_trace(&self, name: &str) -> Option<&ScatterTrace> {
        self.data.iter().find_map(|trace| match trace {
            Trace::Scatter(scatter) if scatter.name == name => Some(scatter),
            _ => None,
        })
    }
}

/// One trace; serialized with Plotly's `type` discriminator
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Choropleth(ChoroplethTrace),
    Scatter(ScatterTrace),
}

/// How a choropleth refers to its boundary document
#[derive(Debug, Clone, PartialEq)]
pub enum GeoReference {
    /// URL plotly.js fetches the document from
    Url(String),
    /// The document itself
    Inline(Arc<FeatureCollection>),
}

impl Serialize for GeoReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GeoReference::Url(url) => serializer.serialize_str(url),
            GeoReference::Inline(collection) => collection.as_ref().serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethTrace {
    pub name: String,
    pub geojson: GeoReference,
    pub featureidkey: String,
    pub locations: Vec<String>,
    pub z: Vec<f64>,
    pub hovertext: Vec<String>,
    pub hovertemplate: String,
    pub coloraxis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTrace {
    pub name: String,
    /// "markers" or "lines"
    pub mode: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertext: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    pub showlegend: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    pub margin: Margin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coloraxis: Option<ColorAxis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

impl Margin {
    pub fn new(l: u32, r: u32, t: u32, b: u32) -> Self {
        Self { l, r, t, b }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoLayout {
    pub scope: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorAxis {
    pub colorscale: String,
    pub cmin: f64,
    pub cmax: f64,
    pub colorbar: ColorBar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
    /// "h" for a horizontal bar under the map
    pub orientation: String,
    pub thickness: u32,
    pub y: f64,
    pub len: f64,
    pub title: Title,
    pub tickprefix: String,
    pub ticksuffix: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
}
