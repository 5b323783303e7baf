//! County Data
//!
//! Loading and in-memory representation of the dashboard's inputs:
//!
//! - [`CountyTable`]: county records keyed by [`Fips`] code
//! - [`Dataset`] / [`DatasetCatalog`]: tables with display metadata
//! - [`GeoBoundary`]: the county boundary document
//! - [`InsightBook`]: narrative text keyed by dataset name
//!
//! Everything here is read once at startup and never mutated afterwards.

mod dataset;
mod error;
mod fips;
mod geo;
mod insights;
mod loader;
mod table;

pub use dataset::{
    Dataset, DatasetCatalog, DatasetMeta, DatasetRole, TickFormat, DEFAULT_CLAMP_QUANTILE,
};
pub use error::{DataError, DataResult};
pub use fips::{Fips, FIPS_WIDTH};
pub use geo::{BoundarySource, FileBoundarySource, GeoBoundary, RemoteBoundarySource};
pub use insights::{InsightBook, SEGMENT_DELIMITER, TOPIC_PREFIX};
pub use loader::{boundary_source, load_all, load_catalog, load_insights, LoadedData};
pub use table::{CountyRecord, CountyTable, TableLayout, DEFAULT_FIPS_COLUMN, DEFAULT_NAME_COLUMN};
