//! Material stock snapshot and supply event records

use crate::scenario::ConsumptionBasis;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stock snapshot and consumption profile for one reactant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialStockRecord {
    /// Unique material code
    pub material_code: String,

    pub material_name: String,

    pub unit_of_measure: String,

    /// Date the snapshot was taken; day 0 of the horizon
    pub stock_update_date: NaiveDate,

    /// Quantity on hand at `stock_update_date`
    pub stock_amount: f64,

    /// Planned usage per day
    pub consumption_rate_plan: f64,

    /// Observed usage per day
    pub consumption_rate_actual: f64,

    /// Procurement lead time in days
    pub threshold_days: f64,

    /// Number of days to simulate (accounting period)
    pub horizon_days: u32,
}

impl MaterialStockRecord {
    pub fn new(
        material_code: impl Into<String>,
        stock_update_date: NaiveDate,
        stock_amount: f64,
        consumption_rate_plan: f64,
        consumption_rate_actual: f64,
        threshold_days: f64,
        horizon_days: u32,
    ) -> Self {
        Self {
            material_code: material_code.into(),
            material_name: String::new(),
            unit_of_measure: String::new(),
            stock_update_date,
            stock_amount,
            consumption_rate_plan,
            consumption_rate_actual,
            threshold_days,
            horizon_days,
        }
    }

    /// Builder: set the descriptive name and unit
    pub fn with_description(mut self, name: impl Into<String>, unit: impl Into<String>) -> Self {
        self.material_name = name.into();
        self.unit_of_measure = unit.into();
        self
    }

    /// Daily usage under the given consumption assumption
    pub fn consumption_rate(&self, basis: ConsumptionBasis) -> f64 {
        match basis {
            ConsumptionBasis::Planned => self.consumption_rate_plan,
            ConsumptionBasis::Actual => self.consumption_rate_actual,
        }
    }

    /// Remaining stock at or below which procurement should start
    pub fn reorder_level(&self, basis: ConsumptionBasis) -> f64 {
        self.threshold_days * self.consumption_rate(basis)
    }
}

/// A delivery of one material, scheduled and/or received
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyEvent {
    pub material_code: String,

    pub quantity: f64,

    /// Date the delivery is forecast to arrive
    #[serde(default)]
    pub forecast_delivery_date: Option<NaiveDate>,

    /// Date the delivery actually arrived
    #[serde(default)]
    pub actual_delivery_date: Option<NaiveDate>,
}

impl SupplyEvent {
    pub fn new(material_code: impl Into<String>, quantity: f64) -> Self {
        Self {
            material_code: material_code.into(),
            quantity,
            forecast_delivery_date: None,
            actual_delivery_date: None,
        }
    }

    pub fn forecast_on(mut self, date: NaiveDate) -> Self {
        self.forecast_delivery_date = Some(date);
        self
    }

    pub fn delivered_on(mut self, date: NaiveDate) -> Self {
        self.actual_delivery_date = Some(date);
        self
    }
}
