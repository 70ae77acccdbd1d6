use axum::{Json, extract::State};

use jm_common::api::{MatchRequest, RecommendationsResponse};

use crate::SharedState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::pagination::{DEFAULT_LIMIT, clamp_limit};

/// Scores the posted profile against the posted jobs without touching storage.
pub async fn run_match(
    State(state): State<SharedState>,
    _auth: AuthUser,
    Json(request): Json<MatchRequest>,
) -> Result<Json<RecommendationsResponse>, ApiError> {
    let limit = clamp_limit(request.limit, DEFAULT_LIMIT);
    let ranked = state
        .service
        .recommend_jobs(&request.profile, &request.jobs, 0)?;

    Ok(Json(RecommendationsResponse::from_ranked(ranked, limit)))
}
