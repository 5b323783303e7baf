//! # County Atlas
//!
//! An interactive dashboard over county-level US datasets: instruction
//! spending per student, diabetes prevalence, heavy drinking and life
//! expectancy.
//!
//! ## Features
//!
//! - **Maps**: a choropleth per dataset, color range clamped to quantiles
//! - **Regression**: scatter of spending against an outcome with an OLS
//!   trendline and a fixed-width summary, optionally on a logit scale
//! - **Reactive view**: a WebSocket session re-runs only the handlers bound
//!   to the control that changed
//!
//! ## Modules
//!
//! - [`data`]: Dataset, boundary and insight loading
//! - [`stats`]: Quantiles, logit, OLS and the Student-t distribution
//! - [`charts`]: Map and scatter figure builders
//! - [`dashboard`]: Context, controls, layout and dispatch table
//! - [`api`]: HTTP server with Axum
//! - [`websocket`]: View sessions
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use county_atlas::config::Config;
//! use county_atlas::dashboard::{load_context, DispatchTable};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default()?;
//!     let context = load_context(&config).await?;
//!
//!     let outputs = DispatchTable::default().initial(&context, context.default_state())?;
//!     println!("Rendered {} outputs", outputs.len());
//!
//!     let scatter = context.scatter("Diabetes Percentage, 2019", true)?;
//!     println!("{}", scatter.summary);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod logging;
pub mod stats;
pub mod websocket;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{build_router, serve, ApiError, AppState};
pub use charts::{build_map, build_scatter, ChartError, Figure, MapOptions, ScatterOutput};
pub use config::{Config, ConfigError, LoggingConfig};
pub use dashboard::{
    load_context, ControlId, ControlState, DashboardContext, DispatchTable, OutputId, ViewError,
};
pub use data::{DataError, Dataset, DatasetCatalog, Fips, GeoBoundary, InsightBook};
pub use stats::{OlsFit, StatsError};
pub use websocket::{websocket_handler, ClientMessage, ServerMessage};
