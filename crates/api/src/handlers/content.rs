//! Public articles and podcasts.

use axum::extract::{Path, State};
use axum::Json;

use masterclass_db::models::content::{Article, Podcast};
use masterclass_db::repositories::{ArticleRepo, PodcastRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/articles
pub async fn list_articles(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Article>>>> {
    let articles = ArticleRepo::list_published(&state.pool).await?;
    Ok(Json(DataResponse { data: articles }))
}

/// GET /api/v1/articles/{slug}
pub async fn get_article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<Article>>> {
    let article = ArticleRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Article '{slug}' not found")))?;
    Ok(Json(DataResponse { data: article }))
}

/// GET /api/v1/podcasts
pub async fn list_podcasts(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Podcast>>>> {
    let podcasts = PodcastRepo::list_published(&state.pool).await?;
    Ok(Json(DataResponse { data: podcasts }))
}
