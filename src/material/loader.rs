//! Load stock snapshots and supply events from CSV
//!
//! Every field is read as text first so that a missing or malformed value can
//! be reported against the material code (or supply row) it belongs to.

use super::{MaterialStockRecord, SupplyEvent};
use crate::error::{InputError, LoadError};
use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, Trim};
use log::info;
use std::collections::HashSet;
use std::path::Path;

/// Raw CSV row of the stock table
#[derive(Debug, serde::Deserialize)]
struct StockCsvRow {
    reactant_code: Option<String>,
    reactant_name: Option<String>,
    unit_of_measure: Option<String>,
    stock_update_date: Option<String>,
    stock_amount: Option<String>,
    consumption_rate_plan: Option<String>,
    consumption_rate_actual: Option<String>,
    threshold_days: Option<String>,
    accounting_period: Option<String>,
}

impl StockCsvRow {
    fn to_material(self, row: usize) -> Result<MaterialStockRecord, InputError> {
        let material_code = self.reactant_code.ok_or(InputError::MissingStockCode { row })?;
        let field = FieldReader { material_code: &material_code };

        let stock_update_date = field.date("stock_update_date", self.stock_update_date)?;
        let stock_amount = field.quantity("stock_amount", self.stock_amount)?;
        let consumption_rate_plan = field.quantity("consumption_rate_plan", self.consumption_rate_plan)?;
        let consumption_rate_actual = field.quantity("consumption_rate_actual", self.consumption_rate_actual)?;
        let threshold_days = field.quantity("threshold_days", self.threshold_days)?;
        let horizon_days = field.day_count("accounting_period", self.accounting_period)?;

        Ok(MaterialStockRecord {
            material_code,
            material_name: self.reactant_name.unwrap_or_default(),
            unit_of_measure: self.unit_of_measure.unwrap_or_default(),
            stock_update_date,
            stock_amount,
            consumption_rate_plan,
            consumption_rate_actual,
            threshold_days,
            horizon_days,
        })
    }
}

/// Raw CSV row of the supply table
#[derive(Debug, serde::Deserialize)]
struct SupplyCsvRow {
    reactant_code: Option<String>,
    quantity: Option<String>,
    date_of_delivery_forecast: Option<String>,
    date_of_delivery_actual: Option<String>,
}

impl SupplyCsvRow {
    fn to_event(self, row: usize) -> Result<SupplyEvent, InputError> {
        let material_code = self
            .reactant_code
            .ok_or(InputError::MissingSupplyField { row, field: "reactant_code" })?;

        let raw_quantity = self
            .quantity
            .ok_or(InputError::MissingSupplyField { row, field: "quantity" })?;
        let quantity = parse_quantity(&raw_quantity).map_err(|reason| InputError::InvalidSupplyField {
            row,
            field: "quantity",
            reason,
        })?;

        let optional_date = |field: &'static str, raw: Option<String>| -> Result<Option<NaiveDate>, InputError> {
            raw.map(|value| {
                parse_date(&value).map_err(|reason| InputError::InvalidSupplyField { row, field, reason })
            })
            .transpose()
        };

        Ok(SupplyEvent {
            material_code,
            quantity,
            forecast_delivery_date: optional_date("date_of_delivery_forecast", self.date_of_delivery_forecast)?,
            actual_delivery_date: optional_date("date_of_delivery_actual", self.date_of_delivery_actual)?,
        })
    }
}

/// Parses required stock fields, tagging errors with the material code
struct FieldReader<'a> {
    material_code: &'a str,
}

impl FieldReader<'_> {
    fn required(&self, field: &'static str, raw: Option<String>) -> Result<String, InputError> {
        raw.ok_or_else(|| InputError::MissingField {
            material_code: self.material_code.to_string(),
            field,
        })
    }

    fn invalid(&self, field: &'static str, reason: String) -> InputError {
        InputError::InvalidField {
            material_code: self.material_code.to_string(),
            field,
            reason,
        }
    }

    fn date(&self, field: &'static str, raw: Option<String>) -> Result<NaiveDate, InputError> {
        let value = self.required(field, raw)?;
        parse_date(&value).map_err(|reason| self.invalid(field, reason))
    }

    fn quantity(&self, field: &'static str, raw: Option<String>) -> Result<f64, InputError> {
        let value = self.required(field, raw)?;
        parse_quantity(&value).map_err(|reason| self.invalid(field, reason))
    }

    fn day_count(&self, field: &'static str, raw: Option<String>) -> Result<u32, InputError> {
        let value = self.required(field, raw)?;
        let days = parse_quantity(&value).map_err(|reason| self.invalid(field, reason))?;
        if days.fract() != 0.0 || days > u32::MAX as f64 {
            return Err(self.invalid(field, format!("expected a whole number of days, got {}", value)));
        }
        Ok(days as u32)
    }
}

/// Parse a non-negative finite number
fn parse_quantity(value: &str) -> Result<f64, String> {
    let parsed: f64 = value
        .parse()
        .map_err(|_| format!("`{}` is not a number", value))?;
    if !parsed.is_finite() {
        return Err(format!("`{}` is not finite", value));
    }
    if parsed < 0.0 {
        return Err(format!("{} is negative", value));
    }
    Ok(parsed)
}

/// Parse a calendar date; a trailing time of day (spreadsheet exports) is dropped
fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .map_err(|_| format!("`{}` is not a YYYY-MM-DD date", value))
}

fn csv_reader<R: std::io::Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new().trim(Trim::All).from_reader(reader)
}

/// Load the stock table from a CSV file
pub fn load_materials<P: AsRef<Path>>(path: P) -> Result<Vec<MaterialStockRecord>, LoadError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|err| LoadError::Open {
        path: path.to_path_buf(),
        source: err,
    })?;
    load_materials_from_reader(file)
}

/// Load the stock table from any reader, preserving row order
///
/// Material codes must be unique; a repeated code is rejected.
pub fn load_materials_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<MaterialStockRecord>, LoadError> {
    let mut csv_reader = csv_reader(reader);
    let mut materials = Vec::new();
    let mut seen = HashSet::new();

    for (index, result) in csv_reader.deserialize().enumerate() {
        let row: StockCsvRow = result?;
        let material = row.to_material(index + 1)?;
        if !seen.insert(material.material_code.clone()) {
            return Err(InputError::DuplicateMaterial(material.material_code).into());
        }
        materials.push(material);
    }

    info!("Loaded {} materials", materials.len());
    Ok(materials)
}

/// Load the supply-event table from a CSV file
pub fn load_supply_events<P: AsRef<Path>>(path: P) -> Result<Vec<SupplyEvent>, LoadError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|err| LoadError::Open {
        path: path.to_path_buf(),
        source: err,
    })?;
    load_supply_events_from_reader(file)
}

/// Load the supply-event table from any reader
pub fn load_supply_events_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<SupplyEvent>, LoadError> {
    let mut csv_reader = csv_reader(reader);
    let mut events = Vec::new();

    for (index, result) in csv_reader.deserialize().enumerate() {
        let row: SupplyCsvRow = result?;
        events.push(row.to_event(index + 1)?);
    }

    info!("Loaded {} supply events", events.len());
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const STOCK_HEADER: &str = "reactant_code,reactant_name,unit_of_measure,stock_update_date,stock_amount,consumption_rate_plan,consumption_rate_actual,threshold_days,accounting_period\n";
    const SUPPLY_HEADER: &str = "reactant_code,quantity,date_of_delivery_forecast,date_of_delivery_actual\n";

    #[test]
    fn test_load_materials() {
        let data = format!(
            "{}R1,Sulfuric acid,L,2024-03-01,100,10,15,2,30\nR2,Ethanol,kg,2024-03-01 00:00:00,20.5,1.5,2,0,0\n",
            STOCK_HEADER
        );
        let materials = load_materials_from_reader(data.as_bytes()).unwrap();

        assert_eq!(materials.len(), 2);
        let r1 = &materials[0];
        assert_eq!(r1.material_code, "R1");
        assert_eq!(r1.material_name, "Sulfuric acid");
        assert_eq!(r1.stock_update_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(r1.horizon_days, 30);

        let r2 = &materials[1];
        assert_relative_eq!(r2.stock_amount, 20.5);
        assert_relative_eq!(r2.consumption_rate_plan, 1.5);
        assert_eq!(r2.horizon_days, 0);
    }

    #[test]
    fn test_missing_consumption_rate_names_field_and_code() {
        let data = format!("{}R7,Acetone,L,2024-03-01,100,,15,2,30\n", STOCK_HEADER);
        let err = load_materials_from_reader(data.as_bytes()).unwrap_err();

        match err {
            LoadError::Input(InputError::MissingField { material_code, field }) => {
                assert_eq!(material_code, "R7");
                assert_eq!(field, "consumption_rate_plan");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_code_reports_row() {
        let data = format!(
            "{}R1,Acid,L,2024-03-01,100,10,15,2,30\n,Ethanol,kg,2024-03-01,20,1,2,0,5\n",
            STOCK_HEADER
        );
        let err = load_materials_from_reader(data.as_bytes()).unwrap_err();

        assert!(matches!(err, LoadError::Input(InputError::MissingStockCode { row: 2 })));
    }

    #[test]
    fn test_negative_horizon_rejected() {
        let data = format!("{}R1,Acid,L,2024-03-01,100,10,15,2,-5\n", STOCK_HEADER);
        let err = load_materials_from_reader(data.as_bytes()).unwrap_err();

        assert!(matches!(
            err,
            LoadError::Input(InputError::InvalidField { field: "accounting_period", .. })
        ));
    }

    #[test]
    fn test_duplicate_material_rejected() {
        let data = format!(
            "{}R1,Acid,L,2024-03-01,100,10,15,2,30\nR1,Acid,L,2024-03-02,90,10,15,2,30\n",
            STOCK_HEADER
        );
        let err = load_materials_from_reader(data.as_bytes()).unwrap_err();

        assert!(matches!(err, LoadError::Input(InputError::DuplicateMaterial(code)) if code == "R1"));
    }

    #[test]
    fn test_load_supply_events_with_unset_dates() {
        let data = format!(
            "{}R1,50,2024-03-05,\nR1,25,,2024-03-06\nR2,10,,\n",
            SUPPLY_HEADER
        );
        let events = load_supply_events_from_reader(data.as_bytes()).unwrap();

        assert_eq!(events.len(), 3);
        assert_eq!(events[0].forecast_delivery_date, NaiveDate::from_ymd_opt(2024, 3, 5));
        assert!(events[0].actual_delivery_date.is_none());
        assert!(events[1].forecast_delivery_date.is_none());
        assert_eq!(events[1].actual_delivery_date, NaiveDate::from_ymd_opt(2024, 3, 6));
        assert!(events[2].forecast_delivery_date.is_none() && events[2].actual_delivery_date.is_none());
    }

    #[test]
    fn test_bad_supply_date_reports_row() {
        let data = format!("{}R1,50,2024-03-05,\nR1,25,soon,\n", SUPPLY_HEADER);
        let err = load_supply_events_from_reader(data.as_bytes()).unwrap_err();

        assert!(matches!(
            err,
            LoadError::Input(InputError::InvalidSupplyField { row: 2, field: "date_of_delivery_forecast", .. })
        ));
    }
}
