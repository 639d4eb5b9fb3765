//! Report writers for the trajectory table and zero-stock dates
//!
//! Files are written to a temporary sibling and renamed into place, so a
//! failed run never leaves a half-written report behind.

use crate::error::ReportError;
use crate::projection::{DailyTrajectoryRow, ZeroStockDays};
use crate::scenario::Scenario;
use log::info;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const IDENTITY_COLUMNS: [&str; 4] = ["Reactant code", "Reactant name", "Unit of measure", "Day"];
const INPUT_COLUMNS: [&str; 4] = [
    "Forecast supply",
    "Actual supply",
    "Daily planned consumption",
    "Daily actual consumption",
];

/// Column headers of the trajectory table, in output order
pub fn trajectory_header() -> Vec<String> {
    IDENTITY_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(Scenario::ALL.iter().map(Scenario::stock_column))
        .chain(INPUT_COLUMNS.iter().map(|c| c.to_string()))
        .chain(Scenario::ALL.iter().map(Scenario::reorder_column))
        .collect()
}

fn trajectory_record(row: &DailyTrajectoryRow) -> Vec<String> {
    let mut record = vec![
        row.material_code.clone(),
        row.material_name.clone(),
        row.unit_of_measure.clone(),
        row.date.format("%Y-%m-%d").to_string(),
    ];
    record.extend(row.remaining.values().iter().map(|v| v.to_string()));
    record.extend(
        [row.forecast_supply, row.actual_supply, row.planned_consumption, row.actual_consumption]
            .iter()
            .map(|v| v.to_string()),
    );
    record.extend(row.reorder_needed.values().iter().map(|flag| flag.to_string()));
    record
}

/// Write trajectory rows as CSV to any writer, preserving row order
pub fn write_trajectory_to<'a, W, I>(writer: W, rows: I) -> Result<usize, ReportError>
where
    W: Write,
    I: IntoIterator<Item = &'a DailyTrajectoryRow>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(trajectory_header())?;

    let mut count = 0;
    for row in rows {
        csv_writer.write_record(trajectory_record(row))?;
        count += 1;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(count)
}

/// Write the trajectory table to `path`
pub fn write_trajectory_csv<'a, I>(path: &Path, rows: I) -> Result<usize, ReportError>
where
    I: IntoIterator<Item = &'a DailyTrajectoryRow>,
{
    let count = write_atomically(path, |file| write_trajectory_to(file, rows))?;
    info!("Trajectory table ({} rows) saved to {}", count, path.display());
    Ok(count)
}

/// Write zero-stock dates keyed by material code as pretty JSON
pub fn write_zero_stock_json(path: &Path, zero_stock: &BTreeMap<String, ZeroStockDays>) -> Result<(), ReportError> {
    write_atomically(path, |file| write_zero_stock_to(file, path, zero_stock))?;
    info!("Zero-stock days for {} materials saved to {}", zero_stock.len(), path.display());
    Ok(())
}

fn write_zero_stock_to<W: Write>(
    mut writer: W,
    path: &Path,
    zero_stock: &BTreeMap<String, ZeroStockDays>,
) -> Result<(), ReportError> {
    let io_err = |source: std::io::Error| ReportError::Io { path: path.to_path_buf(), source };

    serde_json::to_writer_pretty(&mut writer, zero_stock).map_err(|err| {
        if err.is_io() {
            io_err(err.into())
        } else {
            ReportError::Json(err)
        }
    })?;
    writer.write_all(b"\n").map_err(io_err)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Run `write` against a temporary file, then move it over `path`
fn write_atomically<T>(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> Result<T, ReportError>,
) -> Result<T, ReportError> {
    let tmp = temp_path(path);
    let io_err = |source: std::io::Error| ReportError::Io { path: path.to_path_buf(), source };

    let file = File::create(&tmp).map_err(io_err)?;
    let mut buffered = BufWriter::new(file);

    let outcome = write(&mut buffered).and_then(|value| {
        buffered.flush().map_err(io_err)?;
        buffered.get_ref().sync_all().map_err(io_err)?;
        Ok(value)
    });
    drop(buffered);

    match outcome {
        Ok(value) => match fs::rename(&tmp, path) {
            Ok(()) => Ok(value),
            Err(source) => {
                let _ = fs::remove_file(&tmp);
                Err(io_err(source))
            }
        },
        Err(err) => {
            let _ = fs::remove_file(&tmp);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::MaterialStockRecord;
    use crate::projection::ProjectionEngine;
    use chrono::NaiveDate;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("reactant_stock_{}_{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sample_rows() -> Vec<DailyTrajectoryRow> {
        let material = MaterialStockRecord::new("R1", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 20.0, 10.0, 15.0, 1.0, 2)
            .with_description("Acetone", "L");
        ProjectionEngine::default().project(&[material], &[]).into_parts().0
    }

    #[test]
    fn test_header_layout() {
        let header = trajectory_header();
        assert_eq!(header.len(), 16);
        assert_eq!(header[3], "Day");
        assert_eq!(header[4], "Stock and future supply using planned consumption");
        assert_eq!(header[8], "Forecast supply");
        assert_eq!(
            header[15],
            "Day when new contracting should start using actual supply and actual consumption"
        );
    }

    #[test]
    fn test_write_trajectory_to_buffer() {
        let rows = sample_rows();
        let mut buffer = Vec::new();
        let count = write_trajectory_to(&mut buffer, &rows).unwrap();

        assert_eq!(count, 2);
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "R1,Acetone,L,2024-01-01,10,5,10,5,0,0,10,15,true,true,true,true");
        assert_eq!(lines[2], "R1,Acetone,L,2024-01-02,0,0,0,0,0,0,10,15,true,true,true,true");
    }

    #[test]
    fn test_write_files_leave_no_temp() {
        let dir = scratch_dir("report");
        let csv_path = dir.join("trajectory.csv");
        let json_path = dir.join("zero_stock.json");
        let rows = sample_rows();

        write_trajectory_csv(&csv_path, &rows).unwrap();
        let mut zero_stock = BTreeMap::new();
        zero_stock.insert("R1".to_string(), ZeroStockDays::default());
        write_zero_stock_json(&json_path, &zero_stock).unwrap();

        assert!(csv_path.exists());
        assert!(!temp_path(&csv_path).exists());
        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert!(json["R1"]["actual_supply_actual_consumption"].is_null());

        fs::remove_dir_all(&dir).unwrap();
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "no space left on device"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_json_disk_error_is_io_error() {
        let mut zero_stock = BTreeMap::new();
        zero_stock.insert("R1".to_string(), ZeroStockDays::default());
        let path = Path::new("zero_stock.json");

        let err = write_zero_stock_to(FullDisk, path, &zero_stock).unwrap_err();
        match err {
            ReportError::Io { path: failed, source } => {
                assert_eq!(failed, path);
                assert_eq!(source.to_string(), "no space left on device");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = scratch_dir("rename");
        // a non-empty directory cannot be replaced by a file
        let path = dir.join("trajectory.csv");
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("keep.txt"), "x").unwrap();

        let err = write_trajectory_csv(&path, &sample_rows()).unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
        assert!(!temp_path(&path).exists());
        assert!(path.join("keep.txt").exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = scratch_dir("missing");
        let path = dir.join("no_such_dir").join("trajectory.csv");

        let err = write_trajectory_csv(&path, &sample_rows()).unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
        assert!(!path.exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
