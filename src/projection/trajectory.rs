//! Projection output: daily trajectory rows, zero-stock dates and summaries

use crate::scenario::{Scenario, ScenarioTable};
use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// One simulated day of one material
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTrajectoryRow {
    // Identity
    pub material_code: String,
    pub material_name: String,
    pub unit_of_measure: String,
    pub date: NaiveDate,

    /// Stock left at end of day, floored at zero
    pub remaining: ScenarioTable<f64>,

    // Inputs applied this day
    pub forecast_supply: f64,
    pub actual_supply: f64,
    pub planned_consumption: f64,
    pub actual_consumption: f64,

    /// Remaining stock is at or below the re-order level
    pub reorder_needed: ScenarioTable<bool>,
}

/// First date each scenario's stock reached exactly zero
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZeroStockDays(ScenarioTable<Option<NaiveDate>>);

impl ZeroStockDays {
    /// Record `date` unless a date is already set for the scenario
    pub fn record(&mut self, scenario: Scenario, date: NaiveDate) {
        self.0[scenario].get_or_insert(date);
    }

    pub fn get(&self, scenario: Scenario) -> Option<NaiveDate> {
        self.0[scenario]
    }

    /// Earliest stock-out over all scenarios
    pub fn earliest(&self) -> Option<NaiveDate> {
        self.0.values().iter().flatten().min().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Scenario, Option<NaiveDate>)> + '_ {
        self.0.iter().map(|(scenario, date)| (scenario, *date))
    }
}

impl Serialize for ZeroStockDays {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Scenario::COUNT))?;
        for (scenario, date) in self.iter() {
            map.serialize_entry(scenario.key(), &date)?;
        }
        map.end()
    }
}

/// Trajectory of a single material
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialProjection {
    pub material_code: String,

    /// Stock on hand before day 1
    pub opening_stock: f64,

    /// Daily rows in date order
    pub rows: Vec<DailyTrajectoryRow>,

    pub zero_stock: ZeroStockDays,
}

impl MaterialProjection {
    /// Summarize the trajectory
    pub fn summary(&self) -> MaterialSummary {
        let first_reorder = ScenarioTable::from_fn(|scenario| {
            self.rows
                .iter()
                .find(|row| row.reorder_needed[scenario])
                .map(|row| row.date)
        });
        let closing_stock = match self.rows.last() {
            Some(row) => row.remaining,
            None => ScenarioTable::splat(self.opening_stock),
        };

        MaterialSummary {
            material_code: self.material_code.clone(),
            days_projected: self.rows.len(),
            zero_stock: self.zero_stock,
            first_reorder,
            closing_stock,
        }
    }
}

/// Key figures for one material's projection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialSummary {
    pub material_code: String,
    pub days_projected: usize,
    pub zero_stock: ZeroStockDays,

    /// First date the re-order flag was raised, per scenario
    pub first_reorder: ScenarioTable<Option<NaiveDate>>,

    /// Stock left after the last simulated day
    pub closing_stock: ScenarioTable<f64>,
}

/// Complete result of a projection run, materials in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectionResult {
    pub materials: Vec<MaterialProjection>,
}

impl ProjectionResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_material(&mut self, projection: MaterialProjection) {
        self.materials.push(projection);
    }

    pub fn row_count(&self) -> usize {
        self.materials.iter().map(|m| m.rows.len()).sum()
    }

    /// Zero-stock dates keyed by material code
    pub fn zero_stock_days(&self) -> BTreeMap<String, ZeroStockDays> {
        self.materials
            .iter()
            .map(|m| (m.material_code.clone(), m.zero_stock))
            .collect()
    }

    pub fn summaries(&self) -> Vec<MaterialSummary> {
        self.materials.iter().map(MaterialProjection::summary).collect()
    }

    /// Split into the flat trajectory table and the zero-stock lookup
    pub fn into_parts(self) -> (Vec<DailyTrajectoryRow>, BTreeMap<String, ZeroStockDays>) {
        let zero_stock = self.zero_stock_days();
        let rows = self.materials.into_iter().flat_map(|m| m.rows).collect();
        (rows, zero_stock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{ConsumptionBasis, SupplyBasis};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    #[test]
    fn test_zero_stock_keeps_first_date() {
        let scenario = Scenario::new(SupplyBasis::Actual, ConsumptionBasis::Actual);
        let mut days = ZeroStockDays::default();

        days.record(scenario, date(4));
        days.record(scenario, date(2));

        assert_eq!(days.get(scenario), Some(date(4)));
        assert_eq!(days.earliest(), Some(date(4)));
        assert!(days.get(Scenario::ALL[0]).is_none());
    }

    #[test]
    fn test_zero_stock_json_keys() {
        let mut days = ZeroStockDays::default();
        days.record(Scenario::new(SupplyBasis::Forecast, ConsumptionBasis::Actual), date(9));

        let json = serde_json::to_value(days).unwrap();
        assert_eq!(json["forecast_supply_actual_consumption"], "2024-07-09");
        assert!(json["forecast_supply_planned_consumption"].is_null());
        assert_eq!(json.as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_empty_projection_summary_keeps_opening_stock() {
        let projection = MaterialProjection {
            material_code: "R1".into(),
            opening_stock: 42.0,
            rows: Vec::new(),
            zero_stock: ZeroStockDays::default(),
        };
        let summary = projection.summary();

        assert_eq!(summary.days_projected, 0);
        assert_eq!(summary.closing_stock.values(), &[42.0; 4]);
        assert!(summary.first_reorder.values().iter().all(Option::is_none));
    }
}
