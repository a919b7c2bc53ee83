//! Shared query parameter types for API handlers.

use serde::Deserialize;

use masterclass_core::export::ExportFormat;
use masterclass_core::filtering::{DateRange, TextQuery};
use masterclass_core::search::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

use crate::error::AppResult;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// `(limit, offset)` clamped to the admin page bounds.
    pub fn resolve(&self) -> (i64, i64) {
        (
            clamp_limit(self.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
            clamp_offset(self.offset),
        )
    }
}

/// Parameters common to the filterable admin lists:
/// `?q=&status=&from=&to=&limit=&offset=`.
///
/// `status` is kept raw here; each handler parses it into its own enum.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub status: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListParams {
    pub fn text(&self) -> TextQuery {
        TextQuery::new(self.q.as_deref())
    }

    pub fn range(&self) -> AppResult<DateRange> {
        Ok(DateRange::parse(self.from.as_deref(), self.to.as_deref())?)
    }

    pub fn page(&self) -> (i64, i64) {
        PaginationParams {
            limit: self.limit,
            offset: self.offset,
        }
        .resolve()
    }

    /// Parse `status` with the given enum's `FromStr`.
    pub fn parsed_status<S>(&self) -> AppResult<Option<S>>
    where
        S: std::str::FromStr<Err = masterclass_core::error::CoreError>,
    {
        Ok(self
            .status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<S>)
            .transpose()?)
    }
}

/// `?format=csv|pdf`, CSV when absent.
#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
    pub format: Option<String>,
}

impl ExportParams {
    pub fn format(&self) -> AppResult<ExportFormat> {
        match self.format.as_deref() {
            None | Some("") => Ok(ExportFormat::default()),
            Some(raw) => Ok(raw.parse()?),
        }
    }
}
