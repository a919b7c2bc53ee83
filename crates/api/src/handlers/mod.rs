//! HTTP handlers, one module per resource.

pub mod activity_logs;
pub mod auth;
pub mod badges;
pub mod contacts;
pub mod content;
pub mod email_templates;
pub mod formations;
pub mod gamification;
pub mod notifications;
pub mod profile;
pub mod referrals;
pub mod satisfaction;

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use masterclass_core::export::{export_rows, ExportFormat, Tabular};

use crate::error::{AppError, AppResult};

/// Render rows as a downloadable file.
///
/// Export failures are logged and surface as a plain 500.
pub(crate) fn export_download<T: Tabular>(
    format: ExportFormat,
    stem: &str,
    title: &str,
    rows: &[T],
) -> AppResult<Response> {
    let date_tag = Utc::now().format("%Y-%m-%d").to_string();
    let file = export_rows(format, stem, title, &date_tag, rows).map_err(|e| {
        tracing::error!(error = %e, stem, format = %format, "Export failed");
        AppError::InternalError(format!("Export failed: {e}"))
    })?;

    tracing::info!(
        filename = %file.filename,
        rows = rows.len(),
        bytes = file.bytes.len(),
        "Export generated"
    );

    Ok((
        [
            (CONTENT_TYPE, file.content_type.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.filename),
            ),
        ],
        file.bytes,
    )
        .into_response())
}
