//! Running stock state for a single material

use super::trajectory::ZeroStockDays;
use crate::material::MaterialStockRecord;
use crate::scenario::{Scenario, ScenarioTable, SupplyBasis};
use chrono::NaiveDate;

/// Balances carried from one simulated day to the next
#[derive(Debug, Clone)]
pub struct StockState {
    /// Days simulated so far
    pub days_elapsed: u32,

    /// End-of-day balance per scenario, floored at zero
    pub balances: ScenarioTable<f64>,

    /// First zero-stock date per scenario
    pub zero_stock: ZeroStockDays,
}

impl StockState {
    /// Initialize state from a material's stock snapshot
    pub fn from_material(material: &MaterialStockRecord) -> Self {
        Self {
            days_elapsed: 0,
            balances: ScenarioTable::splat(material.stock_amount),
            zero_stock: ZeroStockDays::default(),
        }
    }

    /// Apply one day of supply and consumption
    ///
    /// Supply arrives before the day's usage is drawn. A balance that lands on
    /// exactly zero marks the scenario's stock-out date (first one wins).
    pub fn apply_day(
        &mut self,
        date: NaiveDate,
        forecast_supply: f64,
        actual_supply: f64,
        rates: &ScenarioTable<f64>,
    ) {
        for scenario in Scenario::ALL {
            let supply = match scenario.supply {
                SupplyBasis::Forecast => forecast_supply,
                SupplyBasis::Actual => actual_supply,
            };
            let stocked = self.balances[scenario] + supply;
            let remaining = (stocked - rates[scenario]).max(0.0);
            self.balances[scenario] = remaining;

            if remaining == 0.0 {
                self.zero_stock.record(scenario, date);
            }
        }
        self.days_elapsed += 1;
    }
}
