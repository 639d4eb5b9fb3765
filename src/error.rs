//! Error types for loading inputs and writing reports

use std::path::PathBuf;
use thiserror::Error;

/// Input rejected before any projection runs
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("material {material_code}: missing required field `{field}`")]
    MissingField { material_code: String, field: &'static str },

    #[error("material {material_code}: field `{field}` is invalid ({reason})")]
    InvalidField {
        material_code: String,
        field: &'static str,
        reason: String,
    },

    #[error("stock row {row}: missing required field `reactant_code`")]
    MissingStockCode { row: usize },

    #[error("material {0} appears more than once in the stock table")]
    DuplicateMaterial(String),

    #[error("supply row {row}: missing required field `{field}`")]
    MissingSupplyField { row: usize, field: &'static str },

    #[error("supply row {row}: field `{field}` is invalid ({reason})")]
    InvalidSupplyField {
        row: usize,
        field: &'static str,
        reason: String,
    },
}

/// Failure while reading an input table
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Input(#[from] InputError),
}

/// Failure while writing an output artifact
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot serialize zero-stock days: {0}")]
    Json(#[from] serde_json::Error),
}
