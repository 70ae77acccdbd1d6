pub mod api;
pub mod db;
pub mod logging;
pub mod matching;
pub mod skill_catalog;
pub mod skill_normalizer;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

// Commonly used data models for matching functions.

/// Salary bounds as stored on postings and seeker preferences. `0/0` means unspecified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRange {
    #[serde(default)]
    pub min: u32,
    #[serde(default)]
    pub max: u32,
}

impl SalaryRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn is_unspecified(&self) -> bool {
        self.min == 0 && self.max == 0
    }

    /// Overlap check; an open upper bound (`max == 0`) extends to infinity.
    pub fn overlaps(&self, other: &SalaryRange) -> bool {
        let self_max = if self.max == 0 { u32::MAX } else { self.max };
        let other_max = if other.max == 0 { u32::MAX } else { other.max };
        self.min <= other_max && other.min <= self_max
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString,
)]
pub enum JobType {
    #[default]
    #[serde(rename = "Full-time")]
    #[strum(serialize = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    #[strum(serialize = "Part-time")]
    PartTime,
    Contract,
    Internship,
    Remote,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub job_types: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub salary_range: SalaryRange,
    #[serde(default, alias = "remote_work")]
    pub remote_ok: bool,
}

/// Job seeker profile snapshot. `skills` is `None` when the stored document has no
/// skill collection at all, which the matching service rejects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub preferences: Preferences,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub required_skills: Option<Vec<String>>,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary_range: SalaryRange,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub applications_count: u32,
    #[serde(default)]
    pub views_count: u32,
    /// Posting owner; `None` for imported or unowned postings.
    #[serde(default)]
    pub recruiter_id: Option<i64>,
}

const fn default_active() -> bool {
    true
}

impl Default for JobPosting {
    fn default() -> Self {
        Self {
            id: 0,
            title: String::new(),
            company: String::new(),
            required_skills: Some(Vec::new()),
            job_type: JobType::default(),
            location: String::new(),
            salary_range: SalaryRange::default(),
            is_active: true,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            applications_count: 0,
            views_count: 0,
            recruiter_id: None,
        }
    }
}
