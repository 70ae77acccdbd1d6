use axum::{
    Json,
    extract::{Path, Query, State},
};

use jm_common::api::UpskillingResponse;
use jm_common::db::{fetch_active_jobs, fetch_profile};
use jm_common::matching::{DEFAULT_UPSKILLING_LIMIT, recommend_upskilling};
use jm_common::skill_catalog::SkillCatalog;

use crate::SharedState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::pagination::clamp_limit;
use crate::handlers::recommendations::LimitQuery;

pub async fn list_upskilling(
    State(state): State<SharedState>,
    Path(profile_id): Path<i64>,
    Query(query): Query<LimitQuery>,
    auth: AuthUser,
) -> Result<Json<UpskillingResponse>, ApiError> {
    auth.require_seeker(profile_id)?;
    let limit = clamp_limit(query.limit, DEFAULT_UPSKILLING_LIMIT as i64);

    let profile = fetch_profile(&state.pool, profile_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("job seeker {profile_id} not found")))?;
    let jobs = fetch_active_jobs(&state.pool, state.config.matching.candidate_limit).await?;

    let recommendations = recommend_upskilling(
        state.service.normalizer(),
        &SkillCatalog,
        &profile,
        &jobs,
        usize::try_from(limit).unwrap_or(DEFAULT_UPSKILLING_LIMIT),
    )?;

    Ok(Json(UpskillingResponse {
        profile_id,
        total: recommendations.len(),
        recommendations,
    }))
}
