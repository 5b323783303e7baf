//! Controls, outputs and the per-session control state

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{ViewError, ViewResult};
use crate::config::ViewConfig;
use crate::data::{DataError, DatasetCatalog};

/// Interactive inputs on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlId {
    #[serde(rename = "map-1-dropdown")]
    Map1Dropdown,
    #[serde(rename = "map-2-dropdown")]
    Map2Dropdown,
    #[serde(rename = "scatter-dropdown")]
    ScatterDropdown,
    #[serde(rename = "logit-radio")]
    LogitRadio,
}

impl ControlId {
    pub const ALL: [ControlId; 4] = [
        ControlId::Map1Dropdown,
        ControlId::Map2Dropdown,
        ControlId::ScatterDropdown,
        ControlId::LogitRadio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ControlId::Map1Dropdown => "map-1-dropdown",
            ControlId::Map2Dropdown => "map-2-dropdown",
            ControlId::ScatterDropdown => "scatter-dropdown",
            ControlId::LogitRadio => "logit-radio",
        }
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page elements updated by handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputId {
    #[serde(rename = "map-1")]
    Map1,
    #[serde(rename = "map-2")]
    Map2,
    #[serde(rename = "scatter")]
    Scatter,
    #[serde(rename = "summary")]
    Summary,
    #[serde(rename = "data-insights")]
    DataInsights,
}

impl OutputId {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputId::Map1 => "map-1",
            OutputId::Map2 => "map-2",
            OutputId::Scatter => "scatter",
            OutputId::Summary => "summary",
            OutputId::DataInsights => "data-insights",
        }
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value sent by a control: a dataset name or the logit toggle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlValue {
    Bool(bool),
    Text(String),
}

impl ControlValue {
    fn as_bool(&self) -> Option<bool> {
        match self {
            ControlValue::Bool(b) => Some(*b),
            ControlValue::Text(s) if s.eq_ignore_ascii_case("true") => Some(true),
            ControlValue::Text(s) if s.eq_ignore_ascii_case("false") => Some(false),
            ControlValue::Text(_) => None,
        }
    }

    fn as_text(&self) -> Option<&str> {
        match self {
            ControlValue::Text(s) => Some(s),
            ControlValue::Bool(_) => None,
        }
    }
}

impl From<bool> for ControlValue {
    fn from(value: bool) -> Self {
        ControlValue::Bool(value)
    }
}

impl From<&str> for ControlValue {
    fn from(value: &str) -> Self {
        ControlValue::Text(value.to_string())
    }
}

/// Current value of every control in one view session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlState {
    pub map_1: String,
    pub map_2: String,
    pub scatter_y: String,
    pub logit: bool,
}

impl ControlState {
    /// Initial state: configured values where given, else the baseline on
    /// the first map and the first comparison dataset elsewhere
    pub fn initial(view: &ViewConfig, catalog: &DatasetCatalog) -> ViewResult<Self> {
        let baseline = catalog.baseline().name().to_string();
        let first_comparison = catalog
            .comparisons()
            .next()
            .map(|d| d.name().to_string())
            .ok_or_else(|| {
                ViewError::Data(DataError::Catalog(
                    "no comparison dataset to plot".to_string(),
                ))
            })?;

        let mut state = Self {
            map_1: baseline,
            map_2: first_comparison.clone(),
            scatter_y: first_comparison,
            logit: view.logit,
        };

        let overrides = [
            (ControlId::Map1Dropdown, &view.map_1),
            (ControlId::Map2Dropdown, &view.map_2),
            (ControlId::ScatterDropdown, &view.scatter_y),
        ];
        for (control, value) in overrides {
            if let Some(name) = value {
                state.apply(control, &ControlValue::Text(name.clone()), catalog)?;
            }
        }

        Ok(state)
    }

    /// Set one control, rejecting values it cannot hold
    pub fn apply(
        &mut self,
        control: ControlId,
        value: &ControlValue,
        catalog: &DatasetCatalog,
    ) -> ViewResult<()> {
        match control {
            ControlId::LogitRadio => {
                self.logit = value.as_bool().ok_or_else(|| ViewError::InvalidControl {
                    control: control.to_string(),
                    message: "expected true or false".to_string(),
                })?;
            }
            ControlId::Map1Dropdown => self.map_1 = dataset_name(control, value, catalog)?,
            ControlId::Map2Dropdown => self.map_2 = dataset_name(control, value, catalog)?,
            ControlId::ScatterDropdown => {
                let name = dataset_name(control, value, catalog)?;
                if catalog.baseline().name() == name {
                    return Err(ViewError::InvalidControl {
                        control: control.to_string(),
                        message: format!("{} cannot be plotted against itself", name),
                    });
                }
                self.scatter_y = name;
            }
        }
        Ok(())
    }
}

fn dataset_name(
    control: ControlId,
    value: &ControlValue,
    catalog: &DatasetCatalog,
) -> ViewResult<String> {
    let name = value.as_text().ok_or_else(|| ViewError::InvalidControl {
        control: control.to_string(),
        message: "expected a dataset name".to_string(),
    })?;
    if catalog.get(name).is_none() {
        return Err(ViewError::UnknownDataset(name.to_string()));
    }
    Ok(name.to_string())
}
