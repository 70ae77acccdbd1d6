use deadpool_postgres::PoolError;
use thiserror::Error;
use tokio_postgres::Error as PgError;
use tracing::{info, instrument};

use crate::db::PgPool;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("failed to run migration: {0}")]
    Postgres(#[from] PgError),
}

struct Migration {
    id: i32,
    description: &'static str,
    sql: &'static str,
}

const BOOTSTRAP_SQL: &str = "
CREATE SCHEMA IF NOT EXISTS jobboard;
CREATE TABLE IF NOT EXISTS jobboard.schema_migrations (
    id INTEGER PRIMARY KEY,
    description TEXT NOT NULL,
    applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);";

const MIGRATIONS: &[Migration] = &[
    Migration {
        id: 1,
        description: "jobs, job seekers and applications",
        sql: r#"
CREATE TABLE IF NOT EXISTS jobboard.jobs (
    id BIGSERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    company TEXT NOT NULL DEFAULT '',
    required_skills JSONB,
    job_type TEXT NOT NULL DEFAULT 'Full-time',
    location TEXT NOT NULL DEFAULT '',
    salary_min INTEGER NOT NULL DEFAULT 0,
    salary_max INTEGER NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    applications_count INTEGER NOT NULL DEFAULT 0,
    views_count INTEGER NOT NULL DEFAULT 0,
    recruiter_id BIGINT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS jobboard.job_seekers (
    id BIGSERIAL PRIMARY KEY,
    skills JSONB,
    preferences JSONB NOT NULL DEFAULT '{}'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS jobboard.applications (
    id BIGSERIAL PRIMARY KEY,
    job_id BIGINT NOT NULL REFERENCES jobboard.jobs(id) ON DELETE CASCADE,
    job_seeker_id BIGINT NOT NULL REFERENCES jobboard.job_seekers(id) ON DELETE CASCADE,
    status TEXT NOT NULL DEFAULT 'pending',
    skill_match_percentage DOUBLE PRECISION,
    applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (job_id, job_seeker_id)
);
"#,
    },
    Migration {
        id: 2,
        description: "active job index + match percentage range",
        sql: r#"
CREATE INDEX IF NOT EXISTS idx_jobs_active_created
    ON jobboard.jobs(created_at DESC, id)
    WHERE is_active;
CREATE INDEX IF NOT EXISTS idx_applications_job
    ON jobboard.applications(job_id);
CREATE INDEX IF NOT EXISTS idx_jobs_recruiter
    ON jobboard.jobs(recruiter_id);

DO $$
BEGIN
    IF NOT EXISTS (
        SELECT 1 FROM pg_constraint WHERE conname = 'chk_skill_match_percentage_range'
    ) THEN
        ALTER TABLE jobboard.applications
            ADD CONSTRAINT chk_skill_match_percentage_range
            CHECK (skill_match_percentage IS NULL
                OR (skill_match_percentage >= 0.0 AND skill_match_percentage <= 100.0));
    END IF;
END $$;
"#,
    },
];

/// Applies pending migrations in id order. Each runs in its own transaction and is
/// recorded in `jobboard.schema_migrations`, so reruns are no-ops.
#[instrument(skip(pool))]
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrationError> {
    let mut client = pool.get().await?;
    client.batch_execute(BOOTSTRAP_SQL).await?;

    for migration in MIGRATIONS {
        let already_applied: bool = client
            .query_one(
                "SELECT EXISTS (SELECT 1 FROM jobboard.schema_migrations WHERE id = $1)",
                &[&migration.id],
            )
            .await?
            .get(0);

        if already_applied {
            continue;
        }

        let tx = client.transaction().await?;
        tx.batch_execute(migration.sql).await?;
        tx.execute(
            "INSERT INTO jobboard.schema_migrations (id, description) VALUES ($1, $2)",
            &[&migration.id, &migration.description],
        )
        .await?;
        tx.commit().await?;

        info!(
            id = migration.id,
            description = migration.description,
            "applied migration"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migration_ids_are_strictly_increasing() {
        let ids: Vec<i32> = MIGRATIONS.iter().map(|m| m.id).collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(ids.first(), Some(&1));
    }

    #[test]
    fn jobs_record_their_recruiter() {
        let initial = MIGRATIONS[0].sql;
        let jobs = &initial[initial.find("jobboard.jobs").unwrap()..];
        let jobs = &jobs[..jobs.find(");").unwrap()];
        assert!(jobs.contains("recruiter_id BIGINT"));
    }

    #[test]
    fn migrations_stay_inside_jobboard_schema() {
        for migration in MIGRATIONS {
            for line in migration.sql.lines() {
                let line = line.trim_start();
                if line.starts_with("CREATE TABLE") || line.starts_with("ALTER TABLE") {
                    assert!(line.contains("jobboard."), "unqualified table in: {line}");
                }
            }
        }
    }
}
