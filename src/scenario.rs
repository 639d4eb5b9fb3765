//! Supply/consumption assumption combinations
//!
//! Every material is projected under four scenarios: forecast or actual
//! supply, crossed with planned or actual consumption. Per-scenario values
//! are kept in a fixed-size [`ScenarioTable`] indexed by [`Scenario`].

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Which deliveries count as incoming supply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupplyBasis {
    /// Deliveries on their forecast date
    Forecast,
    /// Deliveries on their confirmed (actual) date
    Actual,
}

/// Which daily usage rate drains the stock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsumptionBasis {
    Planned,
    Actual,
}

/// One supply/consumption combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scenario {
    pub supply: SupplyBasis,
    pub consumption: ConsumptionBasis,
}

impl Scenario {
    pub const COUNT: usize = 4;

    /// All scenarios in output column order
    pub const ALL: [Scenario; Scenario::COUNT] = [
        Scenario::new(SupplyBasis::Forecast, ConsumptionBasis::Planned),
        Scenario::new(SupplyBasis::Forecast, ConsumptionBasis::Actual),
        Scenario::new(SupplyBasis::Actual, ConsumptionBasis::Planned),
        Scenario::new(SupplyBasis::Actual, ConsumptionBasis::Actual),
    ];

    pub const fn new(supply: SupplyBasis, consumption: ConsumptionBasis) -> Self {
        Self { supply, consumption }
    }

    /// Position of this scenario in [`Scenario::ALL`]
    pub const fn index(&self) -> usize {
        let supply = match self.supply {
            SupplyBasis::Forecast => 0,
            SupplyBasis::Actual => 2,
        };
        let consumption = match self.consumption {
            ConsumptionBasis::Planned => 0,
            ConsumptionBasis::Actual => 1,
        };
        supply + consumption
    }

    /// Stable snake_case key used in JSON output
    pub fn key(&self) -> &'static str {
        match (self.supply, self.consumption) {
            (SupplyBasis::Forecast, ConsumptionBasis::Planned) => "forecast_supply_planned_consumption",
            (SupplyBasis::Forecast, ConsumptionBasis::Actual) => "forecast_supply_actual_consumption",
            (SupplyBasis::Actual, ConsumptionBasis::Planned) => "actual_supply_planned_consumption",
            (SupplyBasis::Actual, ConsumptionBasis::Actual) => "actual_supply_actual_consumption",
        }
    }

    /// Header of the remaining-stock column in the trajectory table
    pub fn stock_column(&self) -> String {
        format!(
            "Stock and {} supply using {} consumption",
            self.supply_word(),
            self.consumption_word()
        )
    }

    /// Header of the re-order flag column in the trajectory table
    pub fn reorder_column(&self) -> String {
        format!(
            "Day when new contracting should start using {} supply and {} consumption",
            self.supply_word(),
            self.consumption_word()
        )
    }

    fn supply_word(&self) -> &'static str {
        match self.supply {
            SupplyBasis::Forecast => "future",
            SupplyBasis::Actual => "actual",
        }
    }

    fn consumption_word(&self) -> &'static str {
        match self.consumption {
            ConsumptionBasis::Planned => "planned",
            ConsumptionBasis::Actual => "actual",
        }
    }
}

/// Fixed-size table holding one value per [`Scenario`]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScenarioTable<T>([T; Scenario::COUNT]);

impl<T: Copy> ScenarioTable<T> {
    /// Table with the same value in every slot
    pub fn splat(value: T) -> Self {
        Self([value; Scenario::COUNT])
    }
}

impl<T> ScenarioTable<T> {
    /// Build a table by evaluating `f` for every scenario
    pub fn from_fn(mut f: impl FnMut(Scenario) -> T) -> Self {
        Self(Scenario::ALL.map(|scenario| f(scenario)))
    }

    /// Iterate `(scenario, value)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (Scenario, &T)> {
        Scenario::ALL.into_iter().zip(self.0.iter())
    }

    pub fn values(&self) -> &[T; Scenario::COUNT] {
        &self.0
    }
}

impl<T> Index<Scenario> for ScenarioTable<T> {
    type Output = T;

    fn index(&self, scenario: Scenario) -> &T {
        &self.0[scenario.index()]
    }
}

impl<T> IndexMut<Scenario> for ScenarioTable<T> {
    fn index_mut(&mut self, scenario: Scenario) -> &mut T {
        &mut self.0[scenario.index()]
    }
}
