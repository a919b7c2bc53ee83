//! Satisfaction survey validation and statistics.

use serde::Serialize;

use crate::error::CoreError;

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;
pub const MAX_RECOMMENDATION: i16 = 10;
pub const MAX_COMMENT_LENGTH: usize = 2000;

/// Validate one survey answer set.
pub fn validate_response(rating: i16, recommendation: Option<i16>, comment: Option<&str>) -> Result<(), CoreError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CoreError::Validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING} (got {rating})"
        )));
    }
    if let Some(score) = recommendation {
        if !(0..=MAX_RECOMMENDATION).contains(&score) {
            return Err(CoreError::Validation(format!(
                "Recommendation score must be between 0 and {MAX_RECOMMENDATION} (got {score})"
            )));
        }
    }
    if let Some(comment) = comment {
        if comment.chars().count() > MAX_COMMENT_LENGTH {
            return Err(CoreError::Validation(format!(
                "Comment exceeds maximum length of {MAX_COMMENT_LENGTH} characters"
            )));
        }
    }
    Ok(())
}

/// Aggregate view shown at the top of the satisfaction page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatisfactionStats {
    pub responses: i64,
    /// Mean rating rounded to two decimals; `None` without responses.
    pub average_rating: Option<f64>,
    /// Count per rating, index 0 is one star.
    pub distribution: [i64; 5],
    /// Net Promoter Score in [-100, 100]; `None` without scored responses.
    pub nps: Option<i64>,
    pub promoters: i64,
    pub passives: i64,
    pub detractors: i64,
}

/// Compute statistics from `(rating, recommendation)` pairs.
///
/// Out-of-range ratings are ignored rather than skewing the average.
pub fn compute_stats<I>(answers: I) -> SatisfactionStats
where
    I: IntoIterator<Item = (i16, Option<i16>)>,
{
    let mut distribution = [0i64; 5];
    let mut rating_sum = 0i64;
    let mut responses = 0i64;
    let (mut promoters, mut passives, mut detractors) = (0i64, 0i64, 0i64);

    for (rating, recommendation) in answers {
        if (MIN_RATING..=MAX_RATING).contains(&rating) {
            responses += 1;
            rating_sum += i64::from(rating);
            distribution[(rating - MIN_RATING) as usize] += 1;
        }
        match recommendation {
            Some(9..=10) => promoters += 1,
            Some(7..=8) => passives += 1,
            Some(0..=6) => detractors += 1,
            _ => {}
        }
    }

    let average_rating = (responses > 0)
        .then(|| (rating_sum as f64 / responses as f64 * 100.0).round() / 100.0);
    let scored = promoters + passives + detractors;
    let nps = (scored > 0).then(|| ((promoters - detractors) as f64 * 100.0 / scored as f64).round() as i64);

    SatisfactionStats {
        responses,
        average_rating,
        distribution,
        nps,
        promoters,
        passives,
        detractors,
    }
}
