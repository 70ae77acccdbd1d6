use serde::{Deserialize, Serialize};

use crate::{JobPosting, JobType, Preferences};

/// Per-dimension fit between seeker preferences and a posting.
///
/// `None` means the dimension could not be judged (no stated preference or no data
/// on the posting). Informational only: it never feeds the match score or ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceFit {
    pub job_type: Option<bool>,
    pub location: Option<bool>,
    pub salary: Option<bool>,
}

impl PreferenceFit {
    /// True when no judged dimension is a mismatch.
    pub fn is_compatible(&self) -> bool {
        [self.job_type, self.location, self.salary]
            .iter()
            .all(|fit| fit.unwrap_or(true))
    }
}

fn is_remote(job: &JobPosting) -> bool {
    job.job_type == JobType::Remote || job.location.to_lowercase().contains("remote")
}

fn job_type_fit(preferences: &Preferences, job: &JobPosting) -> Option<bool> {
    if preferences.job_types.is_empty() {
        return None;
    }
    let label = job.job_type.as_ref();
    Some(
        preferences
            .job_types
            .iter()
            .any(|wanted| wanted.trim().eq_ignore_ascii_case(label)),
    )
}

fn location_fit(preferences: &Preferences, job: &JobPosting) -> Option<bool> {
    let wanted: Vec<String> = preferences
        .locations
        .iter()
        .map(|location| location.trim().to_lowercase())
        .filter(|location| !location.is_empty())
        .collect();
    if wanted.is_empty() {
        return None;
    }

    if preferences.remote_ok && is_remote(job) {
        return Some(true);
    }

    let job_location = job.location.to_lowercase();
    Some(wanted.iter().any(|location| job_location.contains(location.as_str())))
}

fn salary_fit(preferences: &Preferences, job: &JobPosting) -> Option<bool> {
    if preferences.salary_range.is_unspecified() || job.salary_range.is_unspecified() {
        return None;
    }
    Some(preferences.salary_range.overlaps(&job.salary_range))
}

pub fn evaluate_preferences(preferences: &Preferences, job: &JobPosting) -> PreferenceFit {
    PreferenceFit {
        job_type: job_type_fit(preferences, job),
        location: location_fit(preferences, job),
        salary: salary_fit(preferences, job),
    }
}
