use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::info;

use jm_common::api::RecommendationsResponse;
use jm_common::db::{fetch_active_jobs, fetch_profile};

use crate::SharedState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::pagination::{DEFAULT_LIMIT, clamp_limit};

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    #[serde(default)]
    pub limit: Option<i64>,
}

pub async fn list_recommendations(
    State(state): State<SharedState>,
    Path(profile_id): Path<i64>,
    Query(query): Query<LimitQuery>,
    auth: AuthUser,
) -> Result<Json<RecommendationsResponse>, ApiError> {
    auth.require_seeker(profile_id)?;
    let limit = clamp_limit(query.limit, DEFAULT_LIMIT);

    let profile = fetch_profile(&state.pool, profile_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("job seeker {profile_id} not found")))?;
    let jobs = fetch_active_jobs(&state.pool, state.config.matching.candidate_limit).await?;

    let ranked = state.service.recommend_jobs(&profile, &jobs, 0)?;
    let response = RecommendationsResponse::from_ranked(ranked, limit);
    info!(
        profile_id,
        subject = %auth.subject,
        candidates = jobs.len(),
        matched = response.total,
        returned = response.recommendations.len(),
        "job recommendations computed"
    );

    Ok(Json(response))
}
