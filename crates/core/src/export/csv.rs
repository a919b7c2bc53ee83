//! CSV writer.
//!
//! Quoting follows RFC 4180 (handled by the `csv` crate): any field holding a
//! comma, a double quote or a line break is wrapped in quotes, and embedded
//! quotes are doubled.

use super::{check_shape, ExportError, Tabular};

/// UTF-8 byte order mark. Excel needs it to detect the encoding of accented
/// French text.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Write a header line followed by one line per row.
pub fn write_table<T: Tabular>(rows: &[T], with_bom: bool) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    if with_bom {
        buf.extend_from_slice(UTF8_BOM);
    }

    let mut writer = ::csv::WriterBuilder::new()
        .terminator(::csv::Terminator::CRLF)
        .from_writer(buf);

    writer.write_record(T::headers())?;
    for row in rows {
        let cells = row.cells();
        check_shape::<T>(&cells)?;
        writer.write_record(&cells)?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}
