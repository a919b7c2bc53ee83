//! File exports for admin lists (activity history, badges).
//!
//! Exports are generated in memory from rows the caller already loaded.
//! Each exportable row type implements [`Tabular`]; the format-specific
//! writers live in [`csv`] and [`pdf`].

pub mod csv;
pub mod pdf;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Errors raised while producing an export file.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Row has {found} fields, expected {expected}")]
    RowShape { expected: usize, found: usize },
}

impl From<ExportError> for CoreError {
    fn from(err: ExportError) -> Self {
        CoreError::Internal(format!("Export failed: {err}"))
    }
}

/// A row that can be written as a table.
pub trait Tabular {
    /// Column headers, in output order.
    fn headers() -> &'static [&'static str];

    /// Cell values for this row, same order and length as [`Tabular::headers`].
    fn cells(&self) -> Vec<String>;
}

/// Supported export file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(CoreError::Validation(format!(
                "Invalid export format '{other}'. Must be one of: csv, pdf"
            ))),
        }
    }
}

/// A generated file ready to be sent as a download.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Render `rows` in the requested format.
///
/// `stem` becomes the filename prefix and `date_tag` (e.g. `2024-03-01`) its
/// suffix. The PDF variant uses `title` as the report heading.
pub fn export_rows<T: Tabular>(
    format: ExportFormat,
    stem: &str,
    title: &str,
    date_tag: &str,
    rows: &[T],
) -> Result<ExportFile, ExportError> {
    let bytes = match format {
        ExportFormat::Csv => csv::write_table(rows, true)?,
        ExportFormat::Pdf => pdf::write_table(title, date_tag, rows)?,
    };
    Ok(ExportFile {
        filename: format!("{stem}_{date_tag}.{}", format.as_str()),
        content_type: format.content_type(),
        bytes,
    })
}

/// Check that a row's cell count matches the header count.
pub(crate) fn check_shape<T: Tabular>(cells: &[String]) -> Result<(), ExportError> {
    let expected = T::headers().len();
    if cells.len() != expected {
        return Err(ExportError::RowShape {
            expected,
            found: cells.len(),
        });
    }
    Ok(())
}
