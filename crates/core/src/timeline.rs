//! Month-based grouping for timelines and activity history.
//!
//! Used by the member timeline and the admin activity history. Grouping is a
//! single pass over already-fetched rows; dates are interpreted in UTC.

use std::collections::BTreeMap;
use std::fmt;

use chrono::Datelike;
use serde::{Serialize, Serializer};

use crate::types::Timestamp;

/// French month names, January first.
const MONTHS_FR: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// Kind of entry on a member's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEventKind {
    Formation,
    Badge,
    Referral,
    Milestone,
    Event,
}

impl TimelineEventKind {
    pub const ALL: [TimelineEventKind; 5] = [
        TimelineEventKind::Formation,
        TimelineEventKind::Badge,
        TimelineEventKind::Referral,
        TimelineEventKind::Milestone,
        TimelineEventKind::Event,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TimelineEventKind::Formation => "formation",
            TimelineEventKind::Badge => "badge",
            TimelineEventKind::Referral => "referral",
            TimelineEventKind::Milestone => "milestone",
            TimelineEventKind::Event => "event",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            TimelineEventKind::Formation => "book-open",
            TimelineEventKind::Badge => "award",
            TimelineEventKind::Referral => "user-plus",
            TimelineEventKind::Milestone => "flag",
            TimelineEventKind::Event => "calendar",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            TimelineEventKind::Formation => "blue",
            TimelineEventKind::Badge => "amber",
            TimelineEventKind::Referral => "green",
            TimelineEventKind::Milestone => "purple",
            TimelineEventKind::Event => "gray",
        }
    }

    /// Parse a stored kind, falling back to [`TimelineEventKind::Event`]
    /// for values written by older clients.
    pub fn parse_lenient(s: &str) -> Self {
        TimelineEventKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .unwrap_or(TimelineEventKind::Event)
    }
}

/// Anything that can be placed on a timeline.
pub trait Dated {
    fn occurred_at(&self) -> Timestamp;
}

impl Dated for Timestamp {
    fn occurred_at(&self) -> Timestamp {
        *self
    }
}

/// Calendar month key. Orders chronologically (year, then month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    /// 1-based month number.
    pub month: u32,
}

impl MonthKey {
    pub fn of(ts: Timestamp) -> Self {
        Self {
            year: ts.year(),
            month: ts.month(),
        }
    }

    /// French label, e.g. `"janvier 2024"`.
    pub fn label(&self) -> String {
        let name = MONTHS_FR
            .get(self.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("?");
        format!("{name} {}", self.year)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One month of events, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct MonthGroup<T> {
    pub key: MonthKey,
    pub label: String,
    pub items: Vec<T>,
}

/// Group items by calendar month.
///
/// Groups come out newest month first; inside a group items are sorted by
/// date descending. Items with identical timestamps keep their input order,
/// so grouping the same list twice yields identical output.
pub fn group_by_month<T: Dated>(items: Vec<T>) -> Vec<MonthGroup<T>> {
    let mut buckets: BTreeMap<MonthKey, Vec<T>> = BTreeMap::new();
    for item in items {
        buckets
            .entry(MonthKey::of(item.occurred_at()))
            .or_default()
            .push(item);
    }

    buckets
        .into_iter()
        .rev()
        .map(|(key, mut items)| {
            items.sort_by(|a, b| b.occurred_at().cmp(&a.occurred_at()));
            MonthGroup {
                key,
                label: key.label(),
                items,
            }
        })
        .collect()
}
