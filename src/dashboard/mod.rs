//! Reactive dashboard view
//!
//! The read-only [`DashboardContext`], the controls and outputs on the page,
//! the layout tree, and the dispatch table connecting them.

pub mod context;
pub mod controls;
pub mod dispatch;
pub mod error;
pub mod layout;

pub use context::{load_context, DashboardContext};
pub use controls::{ControlId, ControlState, ControlValue, OutputId};
pub use dispatch::{Binding, DispatchTable, OutputContent, OutputUpdate};
pub use error::{ViewError, ViewResult};
pub use layout::{build_layout, render_page, Element};
