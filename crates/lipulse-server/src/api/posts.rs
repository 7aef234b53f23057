//! Post snapshot history: read and manual write.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use lipulse_core::PostMetrics;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{
    map_db_error, normalize_limit, validate_counts, ApiError, ApiResponse, AppState, LimitQuery,
    ResponseMeta,
};

#[derive(Debug, Serialize)]
pub(super) struct PostStatItem {
    id: i64,
    captured_at: DateTime<Utc>,
    content: Option<String>,
    impressions_count: i64,
    unique_views_count: i64,
    reactions_count: i64,
    comments_count: i64,
    reposts_count: i64,
}

impl From<lipulse_db::PostStateRow> for PostStatItem {
    fn from(row: lipulse_db::PostStateRow) -> Self {
        Self {
            id: row.id,
            captured_at: row.created_at,
            content: row.content,
            impressions_count: row.impressions_count,
            unique_views_count: row.unique_views_count,
            reactions_count: row.reactions_count,
            comments_count: row.comments_count,
            reposts_count: row.reposts_count,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CreatePostStatRequest {
    pub impressions_count: i64,
    #[serde(default)]
    pub unique_views_count: i64,
    pub reactions_count: i64,
    pub comments_count: i64,
    pub reposts_count: i64,
    pub content: Option<String>,
}

/// GET /api/v1/posts/{post_id}/stats — post snapshots, newest first.
pub(super) async fn list_post_stats(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(post_id): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<PostStatItem>>>, ApiError> {
    let post = lipulse_db::get_post(&state.pool, &post_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    if post.is_none() {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("post '{post_id}' is not tracked"),
        ));
    }

    let rows = lipulse_db::list_post_states(&state.pool, &post_id, normalize_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(PostStatItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/posts/{post_id}/stats — record a post snapshot by hand.
pub(super) async fn create_post_stat(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(post_id): Path<String>,
    Json(body): Json<CreatePostStatRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PostStatItem>>), ApiError> {
    let rid = &req_id.0;
    validate_counts(
        rid,
        &[
            ("impressions_count", Some(body.impressions_count)),
            ("unique_views_count", Some(body.unique_views_count)),
            ("reactions_count", Some(body.reactions_count)),
            ("comments_count", Some(body.comments_count)),
            ("reposts_count", Some(body.reposts_count)),
        ],
    )?;

    let metrics = PostMetrics {
        content: body.content,
        impressions_count: body.impressions_count,
        unique_views_count: body.unique_views_count,
        reactions_count: body.reactions_count,
        comments_count: body.comments_count,
        reposts_count: body.reposts_count,
    };
    // Manual rows are always stamped on receipt.
    let captured_at = Utc::now();

    let row = match lipulse_db::insert_post_state(&state.pool, &post_id, &metrics, captured_at)
        .await
    {
        Ok(row) => row,
        Err(lipulse_db::DbError::NotFound) => {
            return Err(ApiError::new(
                rid,
                "not_found",
                format!("post '{post_id}' is not tracked"),
            ));
        }
        Err(e) => return Err(map_db_error(rid.clone(), &e)),
    };

    tracing::info!(post = %post_id, state_id = row.id, "recorded manual post snapshot");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: PostStatItem::from(row),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}
