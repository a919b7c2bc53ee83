//! Level, badge and learning-path progress computations.
//!
//! Everything here is recomputed from the authoritative point total on every
//! request; nothing is persisted.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::badge::BadgeCategory;
use crate::types::DbId;

/// Points needed to go from one level to the next.
pub const POINTS_PER_LEVEL: i64 = 100;

// ---------------------------------------------------------------------------
// Level arithmetic
// ---------------------------------------------------------------------------

/// Level reached with `points` cumulative points. Levels start at 1.
///
/// Negative totals (possible after manual point corrections) count as zero.
pub fn level_for_points(points: i64) -> i64 {
    points.max(0) / POINTS_PER_LEVEL + 1
}

/// Experience accumulated inside the current level.
pub fn xp_in_level(points: i64) -> i64 {
    points.max(0) % POINTS_PER_LEVEL
}

/// Level summary rendered in the member header and profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelProgress {
    pub total_points: i64,
    pub level: i64,
    pub xp_in_level: i64,
    pub xp_to_next: i64,
    pub next_level_threshold: i64,
    pub progress_percent: i64,
}

impl LevelProgress {
    pub fn from_points(total_points: i64) -> Self {
        let xp = xp_in_level(total_points);
        Self {
            total_points,
            level: level_for_points(total_points),
            xp_in_level: xp,
            xp_to_next: POINTS_PER_LEVEL - xp,
            next_level_threshold: POINTS_PER_LEVEL,
            progress_percent: xp * 100 / POINTS_PER_LEVEL,
        }
    }
}

// ---------------------------------------------------------------------------
// Badge collection
// ---------------------------------------------------------------------------

/// Minimal view of a badge needed for collection statistics.
#[derive(Debug, Clone, Copy)]
pub struct BadgeTally {
    pub category: BadgeCategory,
    pub points: i32,
    pub earned: bool,
}

/// Per-category counts for the badge wall.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub earned: i64,
    pub total: i64,
}

/// Aggregate statistics over a member's badge collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeCollectionStats {
    pub earned: i64,
    pub total: i64,
    pub completion_percent: i64,
    pub points_from_badges: i64,
    pub by_category: BTreeMap<String, CategoryCount>,
}

/// Compute collection statistics in a single pass.
pub fn badge_collection_stats<I>(badges: I) -> BadgeCollectionStats
where
    I: IntoIterator<Item = BadgeTally>,
{
    let mut earned = 0i64;
    let mut total = 0i64;
    let mut points = 0i64;
    let mut by_category: BTreeMap<String, CategoryCount> = BTreeMap::new();

    for badge in badges {
        total += 1;
        let entry = by_category
            .entry(badge.category.as_str().to_string())
            .or_default();
        entry.total += 1;
        if badge.earned {
            earned += 1;
            entry.earned += 1;
            points += i64::from(badge.points);
        }
    }

    let completion_percent = if total == 0 { 0 } else { earned * 100 / total };

    BadgeCollectionStats {
        earned,
        total,
        completion_percent,
        points_from_badges: points,
        by_category,
    }
}

// ---------------------------------------------------------------------------
// Learning path
// ---------------------------------------------------------------------------

/// A learning-path milestone as far as progress computation is concerned.
#[derive(Debug, Clone, Copy)]
pub struct MilestoneSpec {
    pub id: DbId,
    pub position: i32,
    pub points_required: i64,
}

/// Progress towards one milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MilestoneProgress {
    pub milestone_id: DbId,
    pub position: i32,
    pub points_required: i64,
    pub unlocked: bool,
    pub progress_percent: i64,
}

/// Whole-path summary returned to the member dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LearningPathProgress {
    pub milestones: Vec<MilestoneProgress>,
    pub unlocked_count: usize,
    /// Highest unlocked milestone, if any.
    pub current_milestone_id: Option<DbId>,
    /// First locked milestone, if any.
    pub next_milestone_id: Option<DbId>,
    pub points_to_next: Option<i64>,
}

/// Compute learning-path progress for a point total.
///
/// Milestones are ordered by `position` (ties broken by threshold) before
/// evaluation, so callers may pass them in any order.
pub fn learning_path_progress(milestones: &[MilestoneSpec], total_points: i64) -> LearningPathProgress {
    let mut ordered: Vec<MilestoneSpec> = milestones.to_vec();
    ordered.sort_by_key(|m| (m.position, m.points_required));

    let points = total_points.max(0);
    let mut current = None;
    let mut next: Option<&MilestoneSpec> = None;

    let progress: Vec<MilestoneProgress> = ordered
        .iter()
        .map(|m| {
            let unlocked = points >= m.points_required;
            if unlocked {
                current = Some(m.id);
            } else if next.is_none() {
                next = Some(m);
            }
            let progress_percent = if m.points_required <= 0 || unlocked {
                100
            } else {
                points * 100 / m.points_required
            };
            MilestoneProgress {
                milestone_id: m.id,
                position: m.position,
                points_required: m.points_required,
                unlocked,
                progress_percent,
            }
        })
        .collect();

    let unlocked_count = progress.iter().filter(|p| p.unlocked).count();

    LearningPathProgress {
        unlocked_count,
        current_milestone_id: current,
        next_milestone_id: next.map(|m| m.id),
        points_to_next: next.map(|m| m.points_required - points),
        milestones: progress,
    }
}
