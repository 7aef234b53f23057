//! Account snapshot history: read and manual write.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use lipulse_core::AccountMetrics;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{
    map_db_error, normalize_limit, validate_counts, ApiError, ApiResponse, AppState, LimitQuery,
    ResponseMeta,
};

#[derive(Debug, Serialize)]
pub(super) struct UserStatItem {
    id: i64,
    captured_at: DateTime<Utc>,
    followers_count: i64,
    connections_count: Option<i64>,
    profile_views_count: i64,
    post_impressions_count: i64,
    search_appears_count: i64,
}

impl From<lipulse_db::UserStateRow> for UserStatItem {
    fn from(row: lipulse_db::UserStateRow) -> Self {
        Self {
            id: row.id,
            captured_at: row.created_at,
            followers_count: row.followers_count,
            connections_count: row.connections_count,
            profile_views_count: row.profile_views_count,
            post_impressions_count: row.post_impressions_count,
            search_appears_count: row.search_appears_count,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateUserStatRequest {
    pub followers_count: i64,
    pub connections_count: Option<i64>,
    pub profile_views_count: i64,
    pub post_impressions_count: i64,
    pub search_appears_count: i64,
}

/// GET /api/v1/users/{username}/stats — account snapshots, newest first.
pub(super) async fn list_user_stats(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(username): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<UserStatItem>>>, ApiError> {
    let user = lipulse_db::get_user(&state.pool, &username)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    if user.is_none() {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("user '{username}' is not tracked"),
        ));
    }

    let rows = lipulse_db::list_user_states(&state.pool, &username, normalize_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(UserStatItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/users/{username}/stats — record an account snapshot by hand.
pub(super) async fn create_user_stat(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(username): Path<String>,
    Json(body): Json<CreateUserStatRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserStatItem>>), ApiError> {
    let rid = &req_id.0;
    validate_counts(
        rid,
        &[
            ("followers_count", Some(body.followers_count)),
            ("connections_count", body.connections_count),
            ("profile_views_count", Some(body.profile_views_count)),
            ("post_impressions_count", Some(body.post_impressions_count)),
            ("search_appears_count", Some(body.search_appears_count)),
        ],
    )?;

    let metrics = AccountMetrics {
        followers_count: body.followers_count,
        connections_count: body.connections_count,
        profile_views_count: body.profile_views_count,
        post_impressions_count: body.post_impressions_count,
        search_appears_count: body.search_appears_count,
    };
    // Manual rows are always stamped on receipt.
    let captured_at = Utc::now();

    let row = match lipulse_db::insert_user_state(&state.pool, &username, &metrics, captured_at)
        .await
    {
        Ok(row) => row,
        Err(lipulse_db::DbError::NotFound) => {
            return Err(ApiError::new(
                rid,
                "not_found",
                format!("user '{username}' is not tracked"),
            ));
        }
        Err(e) => return Err(map_db_error(rid.clone(), &e)),
    };

    tracing::info!(user = %username, state_id = row.id, "recorded manual account snapshot");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: UserStatItem::from(row),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}
