//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::charts::Figure;
use crate::dashboard::{ControlId, ControlState, ControlValue, OutputUpdate};
use crate::data::{Dataset, DatasetRole};
use crate::stats::OlsFit;

// ============================================
// DATASET DTOs
// ============================================

/// One dataset as listed by the catalog endpoint
#[derive(Debug, Serialize)]
pub struct DatasetSummary {
    pub name: String,
    pub column: String,
    pub role: DatasetRole,
    pub records: usize,
    pub tick_prefix: String,
    pub tick_suffix: String,
    pub clamp_quantile: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scatter_max: Option<f64>,
}

impl From<&Dataset> for DatasetSummary {
    fn from(dataset: &Dataset) -> Self {
        Self {
            name: dataset.name().to_string(),
            column: dataset.column().to_string(),
            role: dataset.meta.role,
            records: dataset.table.len(),
            tick_prefix: dataset.meta.tick_format.prefix.clone(),
            tick_suffix: dataset.meta.tick_format.suffix.clone(),
            clamp_quantile: dataset.meta.clamp_quantile,
            scatter_max: dataset.meta.scatter_max,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DatasetsResponse {
    pub datasets: Vec<DatasetSummary>,
    pub boundary_features: usize,
    pub loaded_at: DateTime<Utc>,
}

// ============================================
// FIGURE DTOs
// ============================================

/// Query string for the scatter endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ScatterQuery {
    /// Comparison dataset on the y axis, defaults to the initial selection
    #[serde(default)]
    pub y: Option<String>,
    /// Logit-transform y, defaults to the initial toggle
    #[serde(default)]
    pub logit: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ScatterResponse {
    pub dataset: String,
    pub logit: bool,
    pub figure: Figure,
    pub summary: String,
    pub joined: usize,
    pub observations: usize,
    pub excluded: usize,
    pub fit: OlsFit,
}

#[derive(Debug, Serialize)]
pub struct InsightResponse {
    pub dataset: String,
    pub text: String,
}

// ============================================
// UPDATE DTOs
// ============================================

/// Stateless control update: the client sends its state and the change
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRequest {
    /// Current control state, defaults to the initial state
    #[serde(default)]
    pub state: Option<ControlState>,
    /// Changed control; without one every handler runs
    #[serde(default)]
    pub control: Option<ControlId>,
    #[serde(default)]
    pub value: Option<ControlValue>,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub state: ControlState,
    pub outputs: Vec<OutputUpdate>,
}

// ============================================
// HEALTH DTOs
// ============================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub datasets: usize,
    pub maps: usize,
    pub boundary_features: usize,
    pub active_sessions: usize,
    pub uptime_seconds: u64,
    pub version: String,
}
