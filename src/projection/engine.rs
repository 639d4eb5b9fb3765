//! Core projection engine for daily stock trajectories

use super::schedule::{SupplyIndex, SupplySchedule};
use super::state::StockState;
use super::trajectory::{DailyTrajectoryRow, MaterialProjection, ProjectionResult};
use crate::material::{MaterialStockRecord, SupplyEvent};
use crate::scenario::{ScenarioTable, SupplyBasis};
use log::{debug, info};
use rayon::prelude::*;
use std::collections::{BTreeSet, HashSet};

/// Configuration for a projection run
#[derive(Debug, Clone, Default)]
pub struct ProjectionConfig {
    /// Project materials on the rayon thread pool
    ///
    /// Output is identical to a sequential run.
    pub parallel: bool,
}

/// Main projection engine
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    /// Project every material over its horizon
    ///
    /// Supply events for codes not present in `materials` are ignored.
    pub fn project(&self, materials: &[MaterialStockRecord], supply_events: &[SupplyEvent]) -> ProjectionResult {
        let index = SupplyIndex::new(supply_events);
        log_orphan_events(materials, &index);

        let project_one = |material: &MaterialStockRecord| {
            let schedule = index.schedule_for(&material.material_code);
            self.project_material(material, &schedule)
        };

        let projections: Vec<MaterialProjection> = if self.config.parallel {
            materials.par_iter().map(project_one).collect()
        } else {
            materials.iter().map(project_one).collect()
        };

        let mut result = ProjectionResult::new();
        for projection in projections {
            result.add_material(projection);
        }

        info!(
            "Projected {} materials into {} daily rows",
            result.materials.len(),
            result.row_count()
        );
        result
    }

    /// Run the day-by-day projection for a single material
    pub fn project_material(&self, material: &MaterialStockRecord, schedule: &SupplySchedule) -> MaterialProjection {
        let mut state = StockState::from_material(material);
        let rates = ScenarioTable::from_fn(|scenario| material.consumption_rate(scenario.consumption));
        let reorder_levels = ScenarioTable::from_fn(|scenario| material.reorder_level(scenario.consumption));

        let rows = material
            .stock_update_date
            .iter_days()
            .take(material.horizon_days as usize)
            .map(|date| {
                let forecast_supply = schedule.supply_on(SupplyBasis::Forecast, date);
                let actual_supply = schedule.supply_on(SupplyBasis::Actual, date);

                state.apply_day(date, forecast_supply, actual_supply, &rates);

                let remaining = state.balances;
                let reorder_needed = ScenarioTable::from_fn(|scenario| remaining[scenario] <= reorder_levels[scenario]);

                DailyTrajectoryRow {
                    material_code: material.material_code.clone(),
                    material_name: material.material_name.clone(),
                    unit_of_measure: material.unit_of_measure.clone(),
                    date,
                    remaining,
                    forecast_supply,
                    actual_supply,
                    planned_consumption: material.consumption_rate_plan,
                    actual_consumption: material.consumption_rate_actual,
                    reorder_needed,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            "{}: {} days projected, first stock-out {:?}",
            material.material_code,
            state.days_elapsed,
            state.zero_stock.earliest()
        );

        MaterialProjection {
            material_code: material.material_code.clone(),
            opening_stock: material.stock_amount,
            rows,
            zero_stock: state.zero_stock,
        }
    }
}

fn log_orphan_events(materials: &[MaterialStockRecord], index: &SupplyIndex<'_>) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    for code in orphan_codes(materials, index) {
        debug!("Supply events for unknown material {} are ignored", code);
    }
}

/// Codes with supply events but no stock record, sorted
fn orphan_codes<'a>(materials: &[MaterialStockRecord], index: &SupplyIndex<'a>) -> BTreeSet<&'a str> {
    let known: HashSet<&str> = materials.iter().map(|m| m.material_code.as_str()).collect();
    index.material_codes().filter(|code| !known.contains(code)).collect()
}
