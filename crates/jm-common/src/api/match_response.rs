use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    JobPosting, JobType, SalaryRange,
    matching::{MatchResult, PreferenceFit, UpskillingRecommendation},
    skill_normalizer::SkillSet,
};

/// Listing-card fields of a posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub job_type: JobType,
    pub location: String,
    pub salary_range: SalaryRange,
    pub created_at: DateTime<Utc>,
    pub applications_count: u32,
    pub views_count: u32,
}

impl From<&JobPosting> for JobSummary {
    fn from(job: &JobPosting) -> Self {
        Self {
            id: job.id,
            title: job.title.clone(),
            company: job.company.clone(),
            job_type: job.job_type,
            location: job.location.clone(),
            salary_range: job.salary_range,
            created_at: job.created_at,
            applications_count: job.applications_count,
            views_count: job.views_count,
        }
    }
}

/// One recommended posting for a job seeker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecommendation {
    #[serde(flatten)]
    pub job: JobSummary,
    /// 0.0 to 100.0
    pub match_percentage: f64,
    pub matched_skills: SkillSet,
    pub missing_skills: SkillSet,
    pub preference_fit: PreferenceFit,
}

impl JobRecommendation {
    pub fn new(job: &JobPosting, result: MatchResult) -> Self {
        Self {
            job: JobSummary::from(job),
            match_percentage: result.score,
            matched_skills: result.matched_skills,
            missing_skills: result.missing_skills,
            preference_fit: result.preference_fit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<JobRecommendation>,
    pub total: usize,
}

/// Number of items a page keeps; `limit <= 0` keeps everything.
fn page_len(limit: i64) -> usize {
    if limit > 0 {
        usize::try_from(limit).unwrap_or(usize::MAX)
    } else {
        usize::MAX
    }
}

impl RecommendationsResponse {
    /// Pages an unlimited ranking. `total` counts every ranked match, not just the page.
    pub fn from_ranked(ranked: Vec<(&JobPosting, MatchResult)>, limit: i64) -> Self {
        let total = ranked.len();
        let recommendations = ranked
            .into_iter()
            .take(page_len(limit))
            .map(|(job, result)| JobRecommendation::new(job, result))
            .collect();
        Self {
            recommendations,
            total,
        }
    }
}

/// One applicant match for a recruiter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMatch {
    pub profile_id: i64,
    pub skill_match_percentage: f64,
    pub matched_skills: SkillSet,
    pub missing_skills: SkillSet,
    pub preference_fit: PreferenceFit,
}

impl From<MatchResult> for CandidateMatch {
    fn from(result: MatchResult) -> Self {
        Self {
            profile_id: result.profile_id,
            skill_match_percentage: result.score,
            matched_skills: result.matched_skills,
            missing_skills: result.missing_skills,
            preference_fit: result.preference_fit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidatesResponse {
    pub job_id: i64,
    pub candidates: Vec<CandidateMatch>,
    pub total: usize,
    /// Application rows updated; only set by a score refresh.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persisted: Option<u64>,
}

impl CandidatesResponse {
    /// Pages an unlimited applicant ranking; `total` counts every scored applicant.
    pub fn from_ranked(
        job_id: i64,
        ranked: Vec<MatchResult>,
        limit: i64,
        persisted: Option<u64>,
    ) -> Self {
        let total = ranked.len();
        let candidates = ranked
            .into_iter()
            .take(page_len(limit))
            .map(CandidateMatch::from)
            .collect();
        Self {
            job_id,
            candidates,
            total,
            persisted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpskillingResponse {
    pub profile_id: i64,
    pub recommendations: Vec<UpskillingRecommendation>,
    pub total: usize,
}
