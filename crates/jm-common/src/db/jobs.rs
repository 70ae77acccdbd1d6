use std::str::FromStr;

use chrono::{DateTime, Utc};
use deadpool_postgres::PoolError;
use tokio_postgres::{Error as PgError, Row};
use tracing::instrument;

use crate::db::PgPool;
use crate::db::util::{TimedClientExt, count_to_u32, parse_skill_list};
use crate::{JobPosting, JobType, SalaryRange};

#[derive(Debug, thiserror::Error)]
pub enum JobFetchError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("postgres error: {0}")]
    Postgres(#[from] PgError),
    #[error("failed to map job {job_id}: {reason}")]
    Mapping { job_id: i64, reason: String },
}

const JOB_COLUMNS: &str = "id, title, company, required_skills, job_type, location, \
     salary_min, salary_max, is_active, applications_count, views_count, recruiter_id, \
     created_at";

fn job_from_row(row: &Row) -> Result<JobPosting, JobFetchError> {
    let id: i64 = row.get("id");
    let mapping = |reason: String| JobFetchError::Mapping { job_id: id, reason };

    let job_type_label: String = row.get("job_type");
    let job_type = JobType::from_str(job_type_label.trim())
        .map_err(|_| mapping(format!("unknown job_type {job_type_label:?}")))?;

    Ok(JobPosting {
        id,
        title: row.get("title"),
        company: row.get("company"),
        required_skills: parse_skill_list(row.get("required_skills")).map_err(mapping)?,
        job_type,
        location: row.get("location"),
        salary_range: SalaryRange::new(
            count_to_u32(row.get("salary_min")),
            count_to_u32(row.get("salary_max")),
        ),
        is_active: row.get("is_active"),
        created_at: row.get::<_, DateTime<Utc>>("created_at"),
        applications_count: count_to_u32(row.get("applications_count")),
        views_count: count_to_u32(row.get("views_count")),
        recruiter_id: row.get("recruiter_id"),
    })
}

/// Active postings, newest first. `limit <= 0` returns all of them.
#[instrument(skip(pool))]
pub async fn fetch_active_jobs(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<JobPosting>, JobFetchError> {
    let client = pool.get().await?;
    let limit = (limit > 0).then_some(limit);

    let query = format!(
        "SELECT {JOB_COLUMNS} FROM jobboard.jobs \
         WHERE is_active \
         ORDER BY created_at DESC, id ASC \
         LIMIT $1"
    );
    let rows = client
        .timed_query(query.as_str(), &[&limit], "fetch_active_jobs")
        .await?;

    rows.iter().map(job_from_row).collect()
}

#[instrument(skip(pool))]
pub async fn fetch_job(pool: &PgPool, job_id: i64) -> Result<Option<JobPosting>, JobFetchError> {
    let client = pool.get().await?;
    let query = format!("SELECT {JOB_COLUMNS} FROM jobboard.jobs WHERE id = $1");

    client
        .timed_query_opt(query.as_str(), &[&job_id], "fetch_job")
        .await?
        .as_ref()
        .map(job_from_row)
        .transpose()
}
