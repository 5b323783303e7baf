//! Chart builders
//!
//! Pure functions from datasets to Plotly-compatible figures.

pub mod choropleth;
pub mod error;
pub mod figure;
pub mod scatter;

pub use choropleth::{build_map, GeoEmbed, MapOptions, DEFAULT_GEO_ROUTE};
pub use error::{ChartError, ChartResult};
pub use figure::{Figure, GeoReference, Layout, Trace};
pub use scatter::{build_scatter, ScatterOutput, POINTS_TRACE, TREND_TRACE};
