//! Daily stock projection engine

mod engine;
mod schedule;
mod state;
mod trajectory;

pub use engine::{ProjectionConfig, ProjectionEngine};
pub use schedule::{SupplyIndex, SupplySchedule};
pub use state::StockState;
pub use trajectory::{DailyTrajectoryRow, MaterialProjection, MaterialSummary, ProjectionResult, ZeroStockDays};
