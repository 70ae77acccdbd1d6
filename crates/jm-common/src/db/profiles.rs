use deadpool_postgres::PoolError;
use serde_json::Value;
use tokio_postgres::{Error as PgError, Row};
use tracing::{instrument, warn};

use crate::db::PgPool;
use crate::db::util::{TimedClientExt, parse_skill_list};
use crate::{Preferences, Profile};

#[derive(Debug, thiserror::Error)]
pub enum ProfileFetchError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("postgres error: {0}")]
    Postgres(#[from] PgError),
    #[error("failed to map profile {profile_id}: {reason}")]
    Mapping { profile_id: i64, reason: String },
}

/// Unreadable preferences degrade to "no preference" instead of failing the profile.
fn parse_preferences(profile_id: i64, value: Option<Value>) -> Preferences {
    match value {
        None | Some(Value::Null) => Preferences::default(),
        Some(value) => serde_json::from_value(value).unwrap_or_else(|err| {
            warn!(profile_id, error = %err, "ignoring malformed preferences");
            Preferences::default()
        }),
    }
}

fn profile_from_row(row: &Row) -> Result<Profile, ProfileFetchError> {
    let id: i64 = row.get("id");
    let skills = parse_skill_list(row.get("skills"))
        .map_err(|reason| ProfileFetchError::Mapping { profile_id: id, reason })?;

    Ok(Profile {
        id,
        skills,
        preferences: parse_preferences(id, row.get("preferences")),
    })
}

#[instrument(skip(pool))]
pub async fn fetch_profile(
    pool: &PgPool,
    profile_id: i64,
) -> Result<Option<Profile>, ProfileFetchError> {
    let client = pool.get().await?;

    client
        .timed_query_opt(
            "SELECT id, skills, preferences FROM jobboard.job_seekers WHERE id = $1",
            &[&profile_id],
            "fetch_profile",
        )
        .await?
        .as_ref()
        .map(profile_from_row)
        .transpose()
}

/// Profiles of everyone who applied to `job_id`, in profile id order.
#[instrument(skip(pool))]
pub async fn fetch_applicant_profiles(
    pool: &PgPool,
    job_id: i64,
) -> Result<Vec<Profile>, ProfileFetchError> {
    let client = pool.get().await?;

    let rows = client
        .timed_query(
            "SELECT js.id, js.skills, js.preferences \
             FROM jobboard.applications a \
             JOIN jobboard.job_seekers js ON js.id = a.job_seeker_id \
             WHERE a.job_id = $1 \
             ORDER BY js.id",
            &[&job_id],
            "fetch_applicant_profiles",
        )
        .await?;

    rows.iter().map(profile_from_row).collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::SalaryRange;

    #[test]
    fn parses_stored_preferences() {
        let prefs = parse_preferences(
            1,
            Some(json!({
                "job_types": ["Contract"],
                "locations": ["Berlin"],
                "salary_range": {"min": 50000, "max": 70000},
                "remote_work": true
            })),
        );
        assert_eq!(prefs.job_types, vec!["Contract".to_string()]);
        assert_eq!(prefs.salary_range, SalaryRange::new(50_000, 70_000));
        assert!(prefs.remote_ok);
    }

    #[test]
    fn malformed_preferences_fall_back_to_default() {
        assert_eq!(parse_preferences(1, Some(json!("remote please"))), Preferences::default());
        assert_eq!(parse_preferences(1, None), Preferences::default());
    }
}
