use deadpool_postgres::PoolError;
use tokio_postgres::Error as PgError;
use tracing::{info, instrument};

use crate::db::PgPool;
use crate::db::util::TimedClientExt;
use crate::matching::MatchResult;

#[derive(Debug, thiserror::Error)]
pub enum ApplicationStorageError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("postgres error: {0}")]
    Postgres(#[from] PgError),
    #[error("match result for job {found} cannot be stored on job {expected}")]
    JobMismatch { expected: i64, found: i64 },
}

const UPDATE_MATCH_PERCENTAGE: &str = "UPDATE jobboard.applications \
     SET skill_match_percentage = $3 \
     WHERE job_id = $1 AND job_seeker_id = $2";

/// Caches scores on the matching application rows in one transaction.
///
/// Returns the number of rows updated; results without an application are skipped.
#[instrument(skip(pool, results), fields(results = results.len()))]
pub async fn update_skill_match_percentages(
    pool: &PgPool,
    job_id: i64,
    results: &[MatchResult],
) -> Result<u64, ApplicationStorageError> {
    if let Some(foreign) = results.iter().find(|result| result.job_id != job_id) {
        return Err(ApplicationStorageError::JobMismatch {
            expected: job_id,
            found: foreign.job_id,
        });
    }
    if results.is_empty() {
        return Ok(0);
    }

    let mut client = pool.get().await?;
    let tx = client.transaction().await?;

    let mut updated = 0;
    for result in results {
        updated += tx
            .timed_execute_cached(
                UPDATE_MATCH_PERCENTAGE,
                &[&job_id, &result.profile_id, &result.score],
                "update_skill_match_percentage",
            )
            .await?;
    }
    tx.commit().await?;

    info!(job_id, updated, "stored skill match percentages");
    Ok(updated)
}
