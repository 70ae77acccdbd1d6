pub mod applications;
pub mod jobs;
pub mod migrations;
pub mod pool;
pub mod profiles;
pub mod util;

pub use applications::{ApplicationStorageError, update_skill_match_percentages};
pub use jobs::{JobFetchError, fetch_active_jobs, fetch_job};
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPoolError, PgPool, create_pool_from_url, create_pool_from_url_checked};
pub use profiles::{ProfileFetchError, fetch_applicant_profiles, fetch_profile};
