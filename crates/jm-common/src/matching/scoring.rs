use serde::{Deserialize, Serialize};

use super::preferences::PreferenceFit;
use crate::skill_normalizer::SkillSet;

pub const MAX_SCORE: f64 = 100.0;

/// Skill overlap between one profile and one posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    /// 0.0 to 100.0, one decimal place
    pub score: f64,
    pub matched_skills: SkillSet,
    pub missing_skills: SkillSet,
}

/// Derived view over `Profile × JobPosting`; recomputed on demand and never the
/// source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub job_id: i64,
    pub profile_id: i64,
    pub score: f64,
    pub matched_skills: SkillSet,
    pub missing_skills: SkillSet,
    #[serde(default)]
    pub preference_fit: PreferenceFit,
}

impl MatchResult {
    pub fn from_skill_match(
        job_id: i64,
        profile_id: i64,
        skill_match: SkillMatch,
        preference_fit: PreferenceFit,
    ) -> Self {
        Self {
            job_id,
            profile_id,
            score: skill_match.score,
            matched_skills: skill_match.matched_skills,
            missing_skills: skill_match.missing_skills,
            preference_fit,
        }
    }
}

/// Clamp to `[0, 100]` and round to one decimal.
pub fn round_score(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    (raw.clamp(0.0, MAX_SCORE) * 10.0).round() / 10.0
}

/// Percentage of the posting's required skills present in the profile.
///
/// Both sets must already be normalized. A posting without requirements scores `0`.
pub fn score_skills(profile_skills: &SkillSet, job_skills: &SkillSet) -> SkillMatch {
    let matched_skills: SkillSet = job_skills.intersection(profile_skills).cloned().collect();
    let missing_skills: SkillSet = job_skills.difference(profile_skills).cloned().collect();

    let score = if job_skills.is_empty() {
        0.0
    } else {
        round_score(MAX_SCORE * matched_skills.len() as f64 / job_skills.len() as f64)
    };

    SkillMatch {
        score,
        matched_skills,
        missing_skills,
    }
}
