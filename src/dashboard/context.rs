//! Dashboard Context
//!
//! Everything the view reads, built once at startup and shared read-only
//! across requests and sessions. Map figures are rendered here and cached
//! for the life of the process; scatter figures are built on demand.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use super::controls::ControlState;
use super::error::{ViewError, ViewResult};
use crate::charts::{build_map, build_scatter, Figure, GeoEmbed, MapOptions, ScatterOutput};
use crate::config::Config;
use crate::data::{
    load_all, DataError, Dataset, DatasetCatalog, GeoBoundary, InsightBook, LoadedData,
};

#[derive(Debug)]
pub struct DashboardContext {
    catalog: DatasetCatalog,
    /// Baseline restricted to its scatter range
    scatter_base: Dataset,
    geo: GeoBoundary,
    /// Serialized boundary document served to the browser
    geo_document: Arc<String>,
    maps: HashMap<String, Arc<Figure>>,
    insights: InsightBook,
    defaults: ControlState,
    loaded_at: DateTime<Utc>,
}

/// Load every input and build the context
pub async fn load_context(config: &Config) -> ViewResult<DashboardContext> {
    let loaded = load_all(config).await?;
    DashboardContext::new(loaded, config)
}

impl DashboardContext {
    /// Build the context from loaded data, rendering every map up front
    pub fn new(loaded: LoadedData, config: &Config) -> ViewResult<Self> {
        let started = Instant::now();
        let LoadedData {
            catalog,
            geo,
            insights,
        } = loaded;

        let embed = if config.data.embed_geojson {
            GeoEmbed::Inline
        } else {
            GeoEmbed::default()
        };

        let mut maps = HashMap::with_capacity(catalog.len());
        for dataset in catalog.iter() {
            let options = MapOptions::for_dataset(&dataset.meta, embed.clone());
            let figure = build_map(dataset, dataset.column(), &options, &geo)?;
            maps.insert(dataset.name().to_string(), Arc::new(figure));
        }

        let geo_document =
            serde_json::to_string(geo.collection().as_ref()).map_err(|e| {
                DataError::BoundaryFormat {
                    source_name: "boundary document".to_string(),
                    message: e.to_string(),
                }
            })?;

        let scatter_base = catalog.baseline().scatter_view();
        let defaults = ControlState::initial(&config.view, &catalog)?;

        tracing::info!(
            maps = maps.len(),
            scatter_rows = scatter_base.table.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Dashboard context ready"
        );

        Ok(Self {
            catalog,
            scatter_base,
            geo,
            geo_document: Arc::new(geo_document),
            maps,
            insights,
            defaults,
            loaded_at: Utc::now(),
        })
    }

    pub fn catalog(&self) -> &DatasetCatalog {
        &self.catalog
    }

    pub fn geo(&self) -> &GeoBoundary {
        &self.geo
    }

    pub fn geo_document(&self) -> Arc<String> {
        Arc::clone(&self.geo_document)
    }

    pub fn default_state(&self) -> &ControlState {
        &self.defaults
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Datasets offered by the map dropdowns
    pub fn map_options(&self) -> Vec<String> {
        self.catalog.names()
    }

    /// Datasets offered by the scatter dropdown
    pub fn scatter_options(&self) -> Vec<String> {
        self.catalog.comparison_names()
    }

    pub fn map_count(&self) -> usize {
        self.maps.len()
    }

    /// Cached map figure for a dataset
    pub fn map(&self, name: &str) -> ViewResult<Arc<Figure>> {
        self.maps
            .get(name)
            .cloned()
            .ok_or_else(|| ViewError::UnknownDataset(name.to_string()))
    }

    /// Scatter of a comparison dataset against the limited baseline
    pub fn scatter(&self, name: &str, use_logit: bool) -> ViewResult<ScatterOutput> {
        let dataset = self
            .catalog
            .get(name)
            .filter(|d| !d.is_baseline())
            .ok_or_else(|| ViewError::UnknownDataset(name.to_string()))?;

        Ok(build_scatter(
            &self.scatter_base,
            dataset,
            self.scatter_base.column(),
            dataset.column(),
            use_logit,
        )?)
    }

    /// Narrative text for a dataset, looked up by exact name
    pub fn insight(&self, name: &str) -> ViewResult<&str> {
        self.insights
            .get(name)
            .ok_or_else(|| ViewError::MissingInsight(name.to_string()))
    }
}
