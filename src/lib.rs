//! Reactant stock projection
//!
//! This library provides:
//! - Loading of stock snapshots and supply-event logs from CSV
//! - Day-by-day stock projection under forecast/actual supply and
//!   planned/actual consumption
//! - Re-order threshold flags and first zero-stock dates per scenario
//! - CSV and JSON report writers

pub mod error;
pub mod material;
pub mod projection;
pub mod report;
pub mod scenario;

// Re-export commonly used types
pub use error::{InputError, LoadError, ReportError};
pub use material::{MaterialStockRecord, SupplyEvent};
pub use projection::{DailyTrajectoryRow, ProjectionConfig, ProjectionEngine, ProjectionResult, ZeroStockDays};
pub use scenario::{ConsumptionBasis, Scenario, ScenarioTable, SupplyBasis};
