//! Admin activity history and its export.

use axum::extract::{Query, State};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use masterclass_core::activity::{action_types, entity_types};
use masterclass_core::filtering::{DateRange, TextQuery};
use masterclass_core::search::MAX_EXPORT_ROWS;
use masterclass_core::timeline::{group_by_month, MonthGroup};
use masterclass_core::types::DbId;
use masterclass_db::models::activity_log::{ActivityLogEntry, ActivityLogFilter};
use masterclass_db::repositories::ActivityLogRepo;

use crate::activity;
use crate::error::{AppError, AppResult};
use crate::handlers::export_download;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{ExportParams, PaginationParams};
use crate::response::{DataResponse, Page};
use crate::state::AppState;

/// `?q=&action_type=&entity_type=&admin_id=&from=&to=&group_by=month&limit=&offset=`
#[derive(Debug, Default, Deserialize)]
pub struct ActivityLogParams {
    pub q: Option<String>,
    pub action_type: Option<String>,
    pub entity_type: Option<String>,
    pub admin_id: Option<DbId>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub group_by: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ActivityLogParams {
    fn filter(&self) -> AppResult<ActivityLogFilter> {
        let non_empty = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(String::from);
        Ok(ActivityLogFilter {
            query: TextQuery::new(self.q.as_deref()),
            action_type: non_empty(&self.action_type),
            entity_type: non_empty(&self.entity_type),
            admin_id: self.admin_id,
            range: DateRange::parse(self.from.as_deref(), self.to.as_deref())?,
        })
    }

    fn by_month(&self) -> AppResult<bool> {
        match self.group_by.as_deref() {
            None | Some("") => Ok(false),
            Some("month") => Ok(true),
            Some(other) => Err(AppError::BadRequest(format!(
                "Unsupported group_by '{other}' (expected 'month')"
            ))),
        }
    }
}

/// History page, flat or grouped by calendar month.
///
/// When grouped, `total` and `page_count` still count entries.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ActivityHistory {
    Flat(Page<ActivityLogEntry>),
    ByMonth(Page<MonthGroup<ActivityLogEntry>>),
}

/// GET /api/v1/admin/activity-logs
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ActivityLogParams>,
) -> AppResult<Json<DataResponse<ActivityHistory>>> {
    let filter = params.filter()?;
    let by_month = params.by_month()?;
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();

    let rows = ActivityLogRepo::list_page(&state.pool, limit, offset).await?;
    let total = ActivityLogRepo::count(&state.pool).await?;
    let entries: Vec<ActivityLogEntry> = filter.apply(rows).into_iter().map(Into::into).collect();

    let history = if by_month {
        ActivityHistory::ByMonth(Page::new(group_by_month(entries), total, limit, offset))
    } else {
        ActivityHistory::Flat(Page::new(entries, total, limit, offset))
    };

    Ok(Json(DataResponse { data: history }))
}

/// GET /api/v1/admin/activity-logs/export?format=csv|pdf
///
/// The export itself is logged, after the file is built.
pub async fn export(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ActivityLogParams>,
    Query(export): Query<ExportParams>,
) -> AppResult<Response> {
    let format = export.format()?;
    let filter = params.filter()?;

    let rows = ActivityLogRepo::list_page(&state.pool, MAX_EXPORT_ROWS, 0).await?;
    let rows = filter.apply(rows);
    let response = export_download(
        format,
        "historique_activites",
        "Historique des activités",
        &rows,
    )?;

    activity::record(
        &state.pool,
        &admin,
        action_types::EXPORT,
        entity_types::ACTIVITY_LOG,
        None,
        &json!({ "format": format, "rows": rows.len() }),
    )
    .await;

    Ok(response)
}
