//! Point ledger rows.

use serde::Serialize;
use sqlx::FromRow;

use masterclass_core::types::{DbId, Timestamp};

/// One credit or debit on a member's point balance.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PointTransaction {
    pub id: DbId,
    pub user_id: DbId,
    pub points: i32,
    pub reason: String,
    pub source_type: Option<String>,
    pub source_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreatePointTransaction {
    pub user_id: DbId,
    pub points: i32,
    pub reason: String,
    pub source_type: Option<String>,
    pub source_id: Option<DbId>,
}
