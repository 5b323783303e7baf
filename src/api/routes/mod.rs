//! API Routes
//!
//! Route handlers organized by functionality.

pub mod datasets;
pub mod figures;
pub mod health;
pub mod page;
pub mod update;
