//! Per-date supply lookups built from the supply-event log

use crate::material::SupplyEvent;
use crate::scenario::SupplyBasis;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Supply events grouped by material code
///
/// Built once per run so each material only scans its own events.
#[derive(Debug, Default)]
pub struct SupplyIndex<'a> {
    by_material: HashMap<&'a str, Vec<&'a SupplyEvent>>,
}

impl<'a> SupplyIndex<'a> {
    pub fn new(events: &'a [SupplyEvent]) -> Self {
        let mut by_material: HashMap<&'a str, Vec<&'a SupplyEvent>> = HashMap::new();
        for event in events {
            by_material.entry(event.material_code.as_str()).or_default().push(event);
        }
        Self { by_material }
    }

    /// Delivery schedule for one material (empty if it has no events)
    pub fn schedule_for(&self, material_code: &str) -> SupplySchedule {
        match self.by_material.get(material_code) {
            Some(events) => SupplySchedule::from_events(events.iter().copied()),
            None => SupplySchedule::default(),
        }
    }

    /// Material codes that have supply events
    pub fn material_codes(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.by_material.keys().copied()
    }
}

/// Forecast and actual delivery totals by date for one material
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupplySchedule {
    forecast: HashMap<NaiveDate, f64>,
    actual: HashMap<NaiveDate, f64>,
}

impl SupplySchedule {
    /// Sum event quantities per forecast date and per actual date
    ///
    /// An event without a date for an assumption contributes nothing to it.
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a SupplyEvent>) -> Self {
        let mut schedule = Self::default();
        for event in events {
            if let Some(date) = event.forecast_delivery_date {
                *schedule.forecast.entry(date).or_insert(0.0) += event.quantity;
            }
            if let Some(date) = event.actual_delivery_date {
                *schedule.actual.entry(date).or_insert(0.0) += event.quantity;
            }
        }
        schedule
    }

    /// Total arriving on `date` under the given supply assumption
    pub fn supply_on(&self, basis: SupplyBasis, date: NaiveDate) -> f64 {
        let lookup = match basis {
            SupplyBasis::Forecast => &self.forecast,
            SupplyBasis::Actual => &self.actual,
        };
        lookup.get(&date).copied().unwrap_or(0.0)
    }
}
