use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::info;

use jm_common::api::CandidatesResponse;
use jm_common::db::{fetch_applicant_profiles, fetch_job, update_skill_match_percentages};
use jm_common::matching::MatchResult;

use crate::SharedState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::pagination::{DEFAULT_LIMIT, clamp_limit};
use crate::handlers::recommendations::LimitQuery;

/// Every applicant of `job_id`, ranked. Callers must own the job unless they are admins.
async fn rank_applicants(
    state: &SharedState,
    auth: &AuthUser,
    job_id: i64,
) -> Result<Vec<MatchResult>, ApiError> {
    auth.require_recruiter()?;

    let job = fetch_job(&state.pool, job_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("job {job_id} not found")))?;
    auth.require_job_owner(&job)?;

    let applicants = fetch_applicant_profiles(&state.pool, job_id).await?;
    Ok(state.service.match_candidates(&job, &applicants, 0)?)
}

pub async fn list_candidates(
    State(state): State<SharedState>,
    Path(job_id): Path<i64>,
    Query(query): Query<LimitQuery>,
    auth: AuthUser,
) -> Result<Json<CandidatesResponse>, ApiError> {
    let limit = clamp_limit(query.limit, DEFAULT_LIMIT);
    let ranked = rank_applicants(&state, &auth, job_id).await?;

    let response = CandidatesResponse::from_ranked(job_id, ranked, limit, None);
    info!(
        job_id,
        subject = %auth.subject,
        applicants = response.total,
        returned = response.candidates.len(),
        "candidate matches computed"
    );

    Ok(Json(response))
}

/// Rescores every applicant and writes the scores to
/// `applications.skill_match_percentage`.
pub async fn refresh_candidate_scores(
    State(state): State<SharedState>,
    Path(job_id): Path<i64>,
    Query(query): Query<LimitQuery>,
    auth: AuthUser,
) -> Result<Json<CandidatesResponse>, ApiError> {
    let limit = clamp_limit(query.limit, DEFAULT_LIMIT);
    let ranked = rank_applicants(&state, &auth, job_id).await?;

    let persisted = update_skill_match_percentages(&state.pool, job_id, &ranked).await?;
    info!(
        job_id,
        subject = %auth.subject,
        applicants = ranked.len(),
        persisted,
        "candidate scores persisted"
    );

    Ok(Json(CandidatesResponse::from_ranked(
        job_id,
        ranked,
        limit,
        Some(persisted),
    )))
}
