//! Dataset Loader
//!
//! Reads everything the dashboard needs, once, at startup. Any failure is
//! fatal: there is no degraded mode with a subset of the datasets.

use std::time::{Duration, Instant};

use super::dataset::{Dataset, DatasetCatalog};
use super::error::DataResult;
use super::geo::{BoundarySource, FileBoundarySource, GeoBoundary, RemoteBoundarySource};
use super::insights::InsightBook;
use super::table::{CountyTable, TableLayout};
use crate::config::{Config, DataConfig, DatasetConfig};

/// Everything read at startup
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub catalog: DatasetCatalog,
    pub geo: GeoBoundary,
    pub insights: InsightBook,
}

/// Read every configured dataset into a catalog
pub fn load_catalog(data: &DataConfig, datasets: &[DatasetConfig]) -> DataResult<DatasetCatalog> {
    let layout = TableLayout {
        fips_column: data.fips_column.clone(),
        name_column: data.name_column.clone(),
    };

    let mut loaded = Vec::with_capacity(datasets.len());
    for entry in datasets {
        let path = entry.resolve_file(&data.dir);
        let table = CountyTable::from_path(&path, &layout)?;
        tracing::info!(
            dataset = %entry.name,
            path = %path.display(),
            records = table.len(),
            "Loaded dataset"
        );
        loaded.push(Dataset::new(entry.meta(), table)?);
    }

    DatasetCatalog::new(loaded)
}

/// Read the insight file and check it covers every comparison dataset
pub fn load_insights(data: &DataConfig, catalog: &DatasetCatalog) -> DataResult<InsightBook> {
    let names = catalog.comparison_names();
    let insights = InsightBook::from_path(&data.insights_file, &names)?;
    insights.ensure_covers(&names)?;
    tracing::info!(
        path = %data.insights_file.display(),
        segments = insights.len(),
        "Loaded insights"
    );
    Ok(insights)
}

/// The boundary source selected by configuration: a local path if set,
/// otherwise the remote URL
pub fn boundary_source(data: &DataConfig) -> DataResult<Box<dyn BoundarySource>> {
    match &data.geojson_path {
        Some(path) => Ok(Box::new(FileBoundarySource::new(path))),
        None => Ok(Box::new(RemoteBoundarySource::new(
            data.geojson_url.clone(),
            Duration::from_secs(data.geojson_timeout_secs),
            data.geojson_attempts,
        )?)),
    }
}

/// Load datasets, insights and boundaries
pub async fn load_all(config: &Config) -> DataResult<LoadedData> {
    let started = Instant::now();

    let catalog = load_catalog(&config.data, &config.datasets)?;
    let insights = load_insights(&config.data, &catalog)?;

    let source = boundary_source(&config.data)?;
    tracing::info!(source = %source.describe(), "Loading county boundaries");
    let geo = source.load().await?;
    tracing::info!(features = geo.feature_count(), "Loaded county boundaries");

    tracing::info!(
        datasets = catalog.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Data loading complete"
    );

    Ok(LoadedData {
        catalog,
        geo,
        insights,
    })
}
