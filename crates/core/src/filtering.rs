//! In-memory filtering for admin lists.
//!
//! Filters run over the page of rows already fetched from the database: a row
//! passes when it satisfies every active predicate (AND semantics). Inactive
//! criteria (empty search text, unset status, open date range) match
//! everything.

use chrono::NaiveDate;

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Free-text query
// ---------------------------------------------------------------------------

/// Case-insensitive substring query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextQuery {
    needle: Option<String>,
}

impl TextQuery {
    /// Build a query from raw user input. Whitespace-only input is inactive.
    pub fn new(raw: Option<&str>) -> Self {
        let needle = raw
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        Self { needle }
    }

    pub fn is_active(&self) -> bool {
        self.needle.is_some()
    }

    /// True when any of `fields` contains the query, ignoring case.
    pub fn matches_any<'f, I>(&self, fields: I) -> bool
    where
        I: IntoIterator<Item = &'f str>,
    {
        match &self.needle {
            None => true,
            Some(needle) => fields
                .into_iter()
                .any(|field| field.to_lowercase().contains(needle.as_str())),
        }
    }
}

// ---------------------------------------------------------------------------
// Date range
// ---------------------------------------------------------------------------

/// Inclusive date range; either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
}

impl DateRange {
    /// Build a range from optional RFC 3339 timestamps or `YYYY-MM-DD` dates.
    ///
    /// A bare `to` date covers the whole day.
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Result<Self, CoreError> {
        let from = from
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_bound(s, false))
            .transpose()?;
        let to = to
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_bound(s, true))
            .transpose()?;

        if let (Some(f), Some(t)) = (from, to) {
            if f > t {
                return Err(CoreError::Validation(
                    "Date range start must not be after its end".to_string(),
                ));
            }
        }
        Ok(Self { from, to })
    }

    pub fn is_active(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    pub fn contains(&self, ts: Timestamp) -> bool {
        self.from.map_or(true, |f| ts >= f) && self.to.map_or(true, |t| ts <= t)
    }
}

fn parse_bound(raw: &str, end_of_day: bool) -> Result<Timestamp, CoreError> {
    let raw = raw.trim();
    if let Ok(ts) = raw.parse::<Timestamp>() {
        return Ok(ts);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| CoreError::Validation(format!("Invalid date '{raw}'")))?;
    let time = if end_of_day {
        date.and_hms_opt(23, 59, 59)
    } else {
        date.and_hms_opt(0, 0, 0)
    };
    time.map(|t| t.and_utc())
        .ok_or_else(|| CoreError::Validation(format!("Invalid date '{raw}'")))
}

// ---------------------------------------------------------------------------
// Predicate conjunction
// ---------------------------------------------------------------------------

type Predicate<'a, T> = Box<dyn Fn(&T) -> bool + Send + Sync + 'a>;

/// Conjunction of row predicates.
///
/// ```
/// use masterclass_core::filtering::Filter;
///
/// let filter = Filter::new()
///     .with(|n: &i32| *n > 2)
///     .with(|n: &i32| n % 2 == 0);
/// assert_eq!(filter.apply(vec![1, 2, 3, 4, 6]), vec![4, 6]);
/// ```
pub struct Filter<'a, T> {
    predicates: Vec<Predicate<'a, T>>,
}

impl<'a, T> Default for Filter<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> Filter<'a, T> {
    pub fn new() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }

    /// Add an unconditional predicate.
    pub fn with<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'a,
    {
        self.predicates.push(Box::new(predicate));
        self
    }

    /// Add a free-text predicate over the fields returned by `fields`.
    /// No-op when the query is inactive.
    pub fn with_text<F>(self, query: &'a TextQuery, fields: F) -> Self
    where
        F: Fn(&T) -> Vec<&str> + Send + Sync + 'a,
    {
        if !query.is_active() {
            return self;
        }
        self.with(move |row| query.matches_any(fields(row)))
    }

    /// Add an exact-match predicate. No-op when `expected` is `None`.
    pub fn with_eq<V, F>(self, expected: Option<V>, extract: F) -> Self
    where
        V: PartialEq + Send + Sync + 'a,
        F: Fn(&T) -> V + Send + Sync + 'a,
    {
        match expected {
            None => self,
            Some(value) => self.with(move |row| extract(row) == value),
        }
    }

    /// Add an exact string-match predicate over a borrowed field. No-op when
    /// `expected` is `None`.
    pub fn with_str_eq<F>(self, expected: Option<&'a str>, extract: F) -> Self
    where
        F: Fn(&T) -> &str + Send + Sync + 'a,
    {
        match expected {
            None => self,
            Some(value) => self.with(move |row| extract(row) == value),
        }
    }

    /// Add a date-range predicate. No-op when the range is open on both sides.
    pub fn with_date_range<F>(self, range: DateRange, extract: F) -> Self
    where
        F: Fn(&T) -> Timestamp + Send + Sync + 'a,
    {
        if !range.is_active() {
            return self;
        }
        self.with(move |row| range.contains(extract(row)))
    }

    pub fn active_count(&self) -> usize {
        self.predicates.len()
    }

    pub fn matches(&self, row: &T) -> bool {
        self.predicates.iter().all(|p| p(row))
    }

    /// Keep only matching rows, preserving order.
    pub fn apply(&self, rows: Vec<T>) -> Vec<T> {
        rows.into_iter().filter(|row| self.matches(row)).collect()
    }
}
