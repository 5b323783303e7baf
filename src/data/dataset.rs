//! Datasets and the dataset catalog
//!
//! A [`Dataset`] is a county table plus the display metadata the charts
//! need. The [`DatasetCatalog`] keeps datasets in configuration order and
//! looks them up by display name.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use super::error::{DataError, DataResult};
use super::table::CountyTable;

/// Default fraction clipped from each end of a map color scale
pub const DEFAULT_CLAMP_QUANTILE: f64 = 0.01;

/// Prefix and suffix for color-bar tick labels (e.g. `$` or `%`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickFormat {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
}

impl TickFormat {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }
}

/// Role of a dataset in the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetRole {
    /// The scatter plot's x axis
    Baseline,
    /// Selectable as the scatter plot's y axis
    #[default]
    Comparison,
}

/// Display metadata for a dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetMeta {
    /// Name shown in dropdowns and map titles
    pub display_name: String,
    /// Metric column plotted for this dataset
    pub column: String,
    pub tick_format: TickFormat,
    pub clamp_quantile: f64,
    pub role: DatasetRole,
    /// Exclusive upper bound applied before the dataset is used as a
    /// scatter x axis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scatter_max: Option<f64>,
}

impl DatasetMeta {
    /// Metadata whose plotted column is the display name itself
    pub fn new(display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        Self {
            column: display_name.clone(),
            display_name,
            tick_format: TickFormat::default(),
            clamp_quantile: DEFAULT_CLAMP_QUANTILE,
            role: DatasetRole::Comparison,
            scatter_max: None,
        }
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    pub fn tick_format(mut self, prefix: &str, suffix: &str) -> Self {
        self.tick_format = TickFormat::new(prefix, suffix);
        self
    }

    pub fn clamp_quantile(mut self, quantile: f64) -> Self {
        self.clamp_quantile = quantile;
        self
    }

    pub fn baseline(mut self) -> Self {
        self.role = DatasetRole::Baseline;
        self
    }

    pub fn scatter_max(mut self, max: f64) -> Self {
        self.scatter_max = Some(max);
        self
    }
}

/// A named county table with display metadata. Immutable after load.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub meta: DatasetMeta,
    pub table: CountyTable,
}

impl Dataset {
    /// Pair metadata with a table, checking the plotted column exists
    pub fn new(meta: DatasetMeta, table: CountyTable) -> DataResult<Self> {
        if table.column_index(&meta.column).is_none() {
            return Err(DataError::MissingColumn {
                source_name: meta.display_name.clone(),
                column: meta.column.clone(),
            });
        }
        Ok(Self { meta, table })
    }

    pub fn name(&self) -> &str {
        &self.meta.display_name
    }

    pub fn column(&self) -> &str {
        &self.meta.column
    }

    pub fn is_baseline(&self) -> bool {
        self.meta.role == DatasetRole::Baseline
    }

    /// The table restricted to rows below `scatter_max`, if one is set
    pub fn scatter_view(&self) -> Dataset {
        let Some(max) = self.meta.scatter_max else {
            return self.clone();
        };
        let idx = self.table.column_index(&self.meta.column);
        let table = self
            .table
            .filtered(|r| idx.and_then(|i| r.values[i]).map_or(false, |v| v < max));
        Dataset {
            meta: self.meta.clone(),
            table,
        }
    }
}

/// Ordered, name-keyed collection of datasets with exactly one baseline
#[derive(Debug, Clone)]
pub struct DatasetCatalog {
    datasets: Vec<Arc<Dataset>>,
    by_name: HashMap<String, usize>,
    baseline: usize,
}

impl DatasetCatalog {
    pub fn new(datasets: Vec<Dataset>) -> DataResult<Self> {
        let mut by_name = HashMap::with_capacity(datasets.len());
        for (idx, dataset) in datasets.iter().enumerate() {
            if by_name.insert(dataset.name().to_string(), idx).is_some() {
                return Err(DataError::Catalog(format!(
                    "duplicate dataset name {:?}",
                    dataset.name()
                )));
            }
        }

        let baselines: Vec<usize> = datasets
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_baseline())
            .map(|(idx, _)| idx)
            .collect();
        let baseline = match baselines.as_slice() {
            [idx] => *idx,
            [] => return Err(DataError::Catalog("no baseline dataset".to_string())),
            _ => {
                return Err(DataError::Catalog(format!(
                    "{} baseline datasets, expected one",
                    baselines.len()
                )))
            }
        };
        if datasets.len() < 2 {
            return Err(DataError::Catalog(
                "no comparison dataset besides the baseline".to_string(),
            ));
        }

        Ok(Self {
            datasets: datasets.into_iter().map(Arc::new).collect(),
            by_name,
            baseline,
        })
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Dataset>> {
        self.by_name.get(name).map(|&idx| &self.datasets[idx])
    }

    pub fn baseline(&self) -> &Arc<Dataset> {
        &self.datasets[self.baseline]
    }

    /// All datasets in configuration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Dataset>> {
        self.datasets.iter()
    }

    /// Non-baseline datasets in configuration order
    pub fn comparisons(&self) -> impl Iterator<Item = &Arc<Dataset>> {
        self.datasets.iter().filter(|d| !d.is_baseline())
    }

    pub fn names(&self) -> Vec<String> {
        self.datasets.iter().map(|d| d.name().to_string()).collect()
    }

    pub fn comparison_names(&self) -> Vec<String> {
        self.comparisons().map(|d| d.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::TableLayout;

    fn table(csv: &str) -> CountyTable {
        CountyTable::from_reader(csv.as_bytes(), "test", &TableLayout::default()).unwrap()
    }

    fn spending() -> Dataset {
        Dataset::new(
            DatasetMeta::new("Spending")
                .tick_format("$", "")
                .baseline()
                .scatter_max(15000.0),
            table("FIPS,PlaceName,Spending\n01001,A,9000\n01003,B,16000\n01005,C,\n"),
        )
        .unwrap()
    }

    fn diabetes() -> Dataset {
        Dataset::new(
            DatasetMeta::new("Diabetes").tick_format("", "%"),
            table("FIPS,PlaceName,Diabetes\n01001,A,9.5\n01003,B,11.0\n"),
        )
        .unwrap()
    }

    #[test]
    fn test_meta_defaults() {
        let meta = DatasetMeta::new("Life expectancy, 2014");
        assert_eq!(meta.column, "Life expectancy, 2014");
        assert_eq!(meta.clamp_quantile, DEFAULT_CLAMP_QUANTILE);
        assert_eq!(meta.role, DatasetRole::Comparison);
        assert_eq!(meta.tick_format, TickFormat::default());
    }

    #[test]
    fn test_dataset_requires_column() {
        let err = Dataset::new(
            DatasetMeta::new("Missing"),
            table("FIPS,PlaceName,Other\n01001,A,1\n"),
        )
        .unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { .. }));
    }

    #[test]
    fn test_scatter_view_applies_max() {
        let view = spending().scatter_view();
        assert_eq!(view.table.len(), 1);
        assert_eq!(view.table.records()[0].place_name, "A");

        // No max configured: unchanged
        assert_eq!(diabetes().scatter_view().table.len(), 2);
    }

    #[test]
    fn test_catalog_lookup_and_order() {
        let catalog = DatasetCatalog::new(vec![spending(), diabetes()]).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.names(), vec!["Spending", "Diabetes"]);
        assert_eq!(catalog.comparison_names(), vec!["Diabetes"]);
        assert_eq!(catalog.baseline().name(), "Spending");
        assert!(catalog.get("Diabetes").is_some());
        assert!(catalog.get("diabetes").is_none());
    }

    #[test]
    fn test_catalog_requires_single_baseline() {
        let err = DatasetCatalog::new(vec![diabetes()]).unwrap_err();
        assert!(matches!(err, DataError::Catalog(_)));

        let err = DatasetCatalog::new(vec![spending(), spending()]).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_catalog_requires_comparison() {
        let err = DatasetCatalog::new(vec![spending()]).unwrap_err();
        assert!(matches!(err, DataError::Catalog(_)));
        assert!(err.to_string().contains("comparison"));
    }
}
