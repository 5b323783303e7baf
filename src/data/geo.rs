//! County Boundaries
//!
//! The GeoJSON feature collection that maps FIPS codes to county polygons,
//! and the sources it can be loaded from. The document is fetched once at
//! startup and shared read-only by every map render.

use async_trait::async_trait;
use geojson::{feature::Id, FeatureCollection, GeoJson};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::error::{DataError, DataResult};
use super::fips::Fips;

/// Parsed boundary document plus the set of FIPS codes it covers
#[derive(Debug, Clone)]
pub struct GeoBoundary {
    collection: Arc<FeatureCollection>,
    ids: HashSet<Fips>,
}

impl GeoBoundary {
    /// Parse a GeoJSON feature collection whose feature ids are FIPS codes
    pub fn from_geojson_str(text: &str, source_name: &str) -> DataResult<Self> {
        let format_error = |message: String| DataError::BoundaryFormat {
            source_name: source_name.to_string(),
            message,
        };

        let geojson: GeoJson = text
            .parse()
            .map_err(|e: geojson::Error| format_error(e.to_string()))?;
        let collection = match geojson {
            GeoJson::FeatureCollection(collection) => collection,
            _ => return Err(format_error("expected a FeatureCollection".to_string())),
        };

        Ok(Self::from_collection(collection))
    }

    pub fn from_collection(collection: FeatureCollection) -> Self {
        let ids = collection
            .features
            .iter()
            .filter_map(|feature| match &feature.id {
                Some(Id::String(id)) => Fips::parse(id),
                Some(Id::Number(id)) => Fips::parse(&id.to_string()),
                None => None,
            })
            .collect();

        Self {
            collection: Arc::new(collection),
            ids,
        }
    }

    /// Whether a polygon exists for `fips`
    pub fn contains(&self, fips: &Fips) -> bool {
        self.ids.contains(fips)
    }

    pub fn feature_count(&self) -> usize {
        self.collection.features.len()
    }

    /// Shared handle to the underlying document
    pub fn collection(&self) -> Arc<FeatureCollection> {
        Arc::clone(&self.collection)
    }
}

/// Somewhere a boundary document can be loaded from
#[async_trait]
pub trait BoundarySource: Send + Sync {
    /// Human-readable location, for logs
    fn describe(&self) -> String;

    /// Load and parse the document
    async fn load(&self) -> DataResult<GeoBoundary>;
}

/// Boundary document on the local filesystem
pub struct FileBoundarySource {
    path: PathBuf,
}

impl FileBoundarySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BoundarySource for FileBoundarySource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> DataResult<GeoBoundary> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| DataError::io(&self.path, e))?;
        GeoBoundary::from_geojson_str(&text, &self.describe())
    }
}

/// Base unit of the retry backoff; attempt `n` waits `n²` units
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Boundary document fetched over HTTP with a timeout and retries
pub struct RemoteBoundarySource {
    url: String,
    client: reqwest::Client,
    max_attempts: u32,
    backoff: Duration,
}

impl RemoteBoundarySource {
    pub fn new(url: impl Into<String>, timeout: Duration, max_attempts: u32) -> DataResult<Self> {
        let url = url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DataError::BoundaryFetch {
                url: url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            url,
            client,
            max_attempts: max_attempts.max(1),
            backoff: DEFAULT_RETRY_BACKOFF,
        })
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Wait before retry number `attempt` (1-based)
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        self.backoff * attempt.saturating_mul(attempt)
    }

    async fn fetch_once(&self) -> Result<String, String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    "request timed out".to_string()
                } else {
                    e.to_string()
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status));
        }

        response.text().await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl BoundarySource for RemoteBoundarySource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn load(&self) -> DataResult<GeoBoundary> {
        let mut last_error = String::new();

        for attempt in 0..self.max_attempts {
            if attempt > 0 {
                let delay = self.retry_delay(attempt);
                tracing::warn!(
                    url = %self.url,
                    attempt,
                    error = %last_error,
                    "Retrying boundary document fetch in {:?}",
                    delay
                );
                tokio::time::sleep(delay).await;
            }

            match self.fetch_once().await {
                Ok(text) => return GeoBoundary::from_geojson_str(&text, &self.url),
                Err(e) => last_error = e,
            }
        }

        Err(DataError::BoundaryFetch {
            url: self.url.clone(),
            message: last_error,
        })
    }
}
