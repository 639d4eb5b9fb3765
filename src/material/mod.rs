//! Material stock snapshots, supply events and their CSV loaders

mod data;
pub mod loader;

pub use data::{MaterialStockRecord, SupplyEvent};
pub use loader::{load_materials, load_materials_from_reader, load_supply_events, load_supply_events_from_reader};
