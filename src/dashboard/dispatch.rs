//! Dispatch Table
//!
//! Explicit mapping from each control to the update handlers whose outputs
//! depend on it. Handlers are pure functions of the context and the control
//! state; a control change runs only the handlers bound to it.

use serde::Serialize;
use std::sync::Arc;

use super::context::DashboardContext;
use super::controls::{ControlId, ControlState, OutputId};
use super::error::{ViewError, ViewResult};
use crate::charts::Figure;

/// New content for one page element
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum OutputContent {
    Figure(Arc<Figure>),
    Text(String),
    /// Shown in place of a chart or text the data cannot support
    Notice(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputUpdate {
    pub output: OutputId,
    pub content: OutputContent,
}

impl OutputUpdate {
    pub fn figure(output: OutputId, figure: Arc<Figure>) -> Self {
        Self {
            output,
            content: OutputContent::Figure(figure),
        }
    }

    pub fn text(output: OutputId, text: impl Into<String>) -> Self {
        Self {
            output,
            content: OutputContent::Text(text.into()),
        }
    }

    pub fn notice(output: OutputId, message: impl Into<String>) -> Self {
        Self {
            output,
            content: OutputContent::Notice(message.into()),
        }
    }
}

pub type Handler = fn(&DashboardContext, &ControlState) -> ViewResult<Vec<OutputUpdate>>;

/// One handler with the controls it reads and the outputs it writes
#[derive(Clone, Copy)]
pub struct Binding {
    pub name: &'static str,
    pub inputs: &'static [ControlId],
    pub outputs: &'static [OutputId],
    pub handler: Handler,
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("name", &self.name)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish()
    }
}

fn update_map_1(ctx: &DashboardContext, state: &ControlState) -> ViewResult<Vec<OutputUpdate>> {
    Ok(vec![OutputUpdate::figure(OutputId::Map1, ctx.map(&state.map_1)?)])
}

fn update_map_2(ctx: &DashboardContext, state: &ControlState) -> ViewResult<Vec<OutputUpdate>> {
    Ok(vec![OutputUpdate::figure(OutputId::Map2, ctx.map(&state.map_2)?)])
}

fn update_scatter(ctx: &DashboardContext, state: &ControlState) -> ViewResult<Vec<OutputUpdate>> {
    match ctx.scatter(&state.scatter_y, state.logit) {
        Ok(output) => Ok(vec![
            OutputUpdate::figure(OutputId::Scatter, Arc::new(output.figure)),
            OutputUpdate::text(OutputId::Summary, output.summary),
        ]),
        Err(ViewError::Chart(e)) if e.is_data_shortfall() => {
            tracing::info!(dataset = %state.scatter_y, error = %e, "Scatter replaced by notice");
            let message = format!("Not enough data to plot {}: {}", state.scatter_y, e);
            Ok(vec![
                OutputUpdate::notice(OutputId::Scatter, message.clone()),
                OutputUpdate::notice(OutputId::Summary, message),
            ])
        }
        Err(e) => Err(e),
    }
}

fn update_insights(ctx: &DashboardContext, state: &ControlState) -> ViewResult<Vec<OutputUpdate>> {
    let text = ctx.insight(&state.scatter_y)?;
    Ok(vec![OutputUpdate::text(OutputId::DataInsights, text)])
}

const BINDINGS: [Binding; 4] = [
    Binding {
        name: "map-1",
        inputs: &[ControlId::Map1Dropdown],
        outputs: &[OutputId::Map1],
        handler: update_map_1,
    },
    Binding {
        name: "map-2",
        inputs: &[ControlId::Map2Dropdown],
        outputs: &[OutputId::Map2],
        handler: update_map_2,
    },
    Binding {
        name: "scatter",
        inputs: &[ControlId::ScatterDropdown, ControlId::LogitRadio],
        outputs: &[OutputId::Scatter, OutputId::Summary],
        handler: update_scatter,
    },
    Binding {
        name: "insights",
        inputs: &[ControlId::ScatterDropdown],
        outputs: &[OutputId::DataInsights],
        handler: update_insights,
    },
];

#[derive(Debug, Clone)]
pub struct DispatchTable {
    bindings: Vec<Binding>,
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self {
            bindings: BINDINGS.to_vec(),
        }
    }
}

impl DispatchTable {
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Handlers that read `control`
    pub fn bindings_for(&self, control: ControlId) -> impl Iterator<Item = &Binding> {
        self.bindings
            .iter()
            .filter(move |binding| binding.inputs.contains(&control))
    }

    /// Run every handler, as on page load
    pub fn initial(
        &self,
        ctx: &DashboardContext,
        state: &ControlState,
    ) -> ViewResult<Vec<OutputUpdate>> {
        run(self.bindings.iter(), ctx, state)
    }

    /// Run the handlers bound to a changed control
    pub fn dispatch(
        &self,
        ctx: &DashboardContext,
        state: &ControlState,
        control: ControlId,
    ) -> ViewResult<Vec<OutputUpdate>> {
        run(self.bindings_for(control), ctx, state)
    }
}

fn run<'a>(
    bindings: impl Iterator<Item = &'a Binding>,
    ctx: &DashboardContext,
    state: &ControlState,
) -> ViewResult<Vec<OutputUpdate>> {
    let mut updates = Vec::new();
    for binding in bindings {
        tracing::debug!(binding = binding.name, "Running update handler");
        updates.extend((binding.handler)(ctx, state)?);
    }
    Ok(updates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::data::{
        CountyTable, Dataset, DatasetCatalog, DatasetMeta, InsightBook, LoadedData, TableLayout,
    };
    use crate::testing::{sample_geo, sample_loaded, DIABETES, DRINKING, LIFE};

    fn context() -> DashboardContext {
        DashboardContext::new(sample_loaded(), &Config::default()).unwrap()
    }

    fn outputs(updates: &[OutputUpdate]) -> Vec<OutputId> {
        updates.iter().map(|u| u.output).collect()
    }

    #[test]
    fn test_bindings_for() {
        let table = DispatchTable::default();
        let names = |control| {
            table
                .bindings_for(control)
                .map(|b| b.name)
                .collect::<Vec<_>>()
        };
        assert_eq!(names(ControlId::Map1Dropdown), ["map-1"]);
        assert_eq!(names(ControlId::Map2Dropdown), ["map-2"]);
        assert_eq!(names(ControlId::ScatterDropdown), ["scatter", "insights"]);
        assert_eq!(names(ControlId::LogitRadio), ["scatter"]);
    }

    #[test]
    fn test_every_output_has_one_writer() {
        let table = DispatchTable::default();
        let mut written: Vec<OutputId> = table
            .bindings()
            .iter()
            .flat_map(|b| b.outputs.iter().copied())
            .collect();
        let total = written.len();
        written.sort_by_key(|o| o.as_str());
        written.dedup();
        assert_eq!(written.len(), total);
        assert_eq!(total, 5);
    }

    #[test]
    fn test_initial_runs_all_handlers() {
        let ctx = context();
        let updates = DispatchTable::default()
            .initial(&ctx, ctx.default_state())
            .unwrap();
        assert_eq!(
            outputs(&updates),
            [
                OutputId::Map1,
                OutputId::Map2,
                OutputId::Scatter,
                OutputId::Summary,
                OutputId::DataInsights
            ]
        );
    }

    #[test]
    fn test_dispatch_runs_only_bound_handlers() {
        let ctx = context();
        let table = DispatchTable::default();
        let state = ctx.default_state();

        let updates = table.dispatch(&ctx, state, ControlId::LogitRadio).unwrap();
        assert_eq!(outputs(&updates), [OutputId::Scatter, OutputId::Summary]);

        let updates = table.dispatch(&ctx, state, ControlId::Map2Dropdown).unwrap();
        assert_eq!(outputs(&updates), [OutputId::Map2]);
        assert_eq!(
            updates[0].content,
            OutputContent::Figure(ctx.map(DIABETES).unwrap())
        );
    }

    #[test]
    fn test_insights_follow_scatter_selection() {
        let ctx = context();
        let mut state = ctx.default_state().clone();
        state
            .apply(ControlId::ScatterDropdown, &DRINKING.into(), ctx.catalog())
            .unwrap();

        let updates = DispatchTable::default()
            .dispatch(&ctx, &state, ControlId::ScatterDropdown)
            .unwrap();
        assert_eq!(
            updates[2],
            OutputUpdate::text(OutputId::DataInsights, "Drinking shows no clear pattern.")
        );
    }

    #[test]
    fn test_missing_insight_is_error() {
        let mut loaded = sample_loaded();
        loaded.insights = InsightBook::parse(
            "TOPIC: Diabetes Percentage, 2019\nOnly one topic.",
            &[],
        )
        .unwrap();
        let ctx = DashboardContext::new(loaded, &Config::default()).unwrap();
        let mut state = ctx.default_state().clone();
        state
            .apply(ControlId::ScatterDropdown, &LIFE.into(), ctx.catalog())
            .unwrap();

        let err = DispatchTable::default()
            .dispatch(&ctx, &state, ControlId::ScatterDropdown)
            .unwrap_err();
        assert!(matches!(err, ViewError::MissingInsight(name) if name == LIFE));
    }

    #[test]
    fn test_insufficient_data_becomes_notice() {
        let dataset = |meta: DatasetMeta, csv: &str| {
            let layout = TableLayout::default();
            let table =
                CountyTable::from_reader(csv.as_bytes(), &meta.display_name, &layout).unwrap();
            Dataset::new(meta, table).unwrap()
        };
        let base = dataset(
            DatasetMeta::new("base").baseline(),
            "FIPS,PlaceName,base\n01001,A,1\n01003,B,2\n01005,C,3\n",
        );
        let sparse = dataset(
            DatasetMeta::new("sparse"),
            "FIPS,PlaceName,sparse\n01001,A,4\n02001,X,5\n",
        );
        let loaded = LoadedData {
            catalog: DatasetCatalog::new(vec![base, sparse]).unwrap(),
            geo: sample_geo(),
            insights: InsightBook::parse("Too few counties.", &["sparse".to_string()]).unwrap(),
        };
        let ctx = DashboardContext::new(loaded, &Config::default()).unwrap();

        let updates = DispatchTable::default()
            .initial(&ctx, ctx.default_state())
            .unwrap();
        assert!(matches!(updates[2].content, OutputContent::Notice(_)));
        assert!(matches!(updates[3].content, OutputContent::Notice(_)));
        assert_eq!(
            updates[4],
            OutputUpdate::text(OutputId::DataInsights, "Too few counties.")
        );
    }

    #[test]
    fn test_output_serialization() {
        let update = OutputUpdate::text(OutputId::Summary, "OLS");
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["output"], "summary");
        assert_eq!(json["content"]["kind"], "text");
        assert_eq!(json["content"]["value"], "OLS");
    }
}
