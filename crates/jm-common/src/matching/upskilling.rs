use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::AsRefStr;

use super::error::MatchError;
use crate::{
    JobPosting, Profile,
    skill_catalog::{SkillCatalog, SkillCategory},
    skill_normalizer::SkillNormalizer,
};

pub const DEFAULT_UPSKILLING_LIMIT: usize = 10;

/// Ordered so that `High < Medium < Low`, i.e. ascending sort puts urgent skills first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn from_weight(weight: f64) -> Self {
        if weight >= 0.9 {
            Priority::High
        } else if weight >= 0.7 {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpskillingRecommendation {
    pub skill: String,
    pub category: SkillCategory,
    pub weight: f64,
    /// Number of active postings that require the skill.
    pub demand: usize,
    pub priority: Priority,
}

/// Skills the seeker lacks across the active postings, most valuable first.
///
/// Ordered by priority, then demand (desc), then catalog weight (desc), then name.
pub fn recommend_upskilling(
    normalizer: &SkillNormalizer,
    catalog: &SkillCatalog,
    profile: &Profile,
    candidate_jobs: &[JobPosting],
    limit: usize,
) -> Result<Vec<UpskillingRecommendation>, MatchError> {
    let profile_raw = profile.skills.as_deref().ok_or_else(|| {
        MatchError::InvalidInput(format!("profile {} has no skill collection", profile.id))
    })?;
    let owned = normalizer.normalize(profile_raw);

    let mut demand: BTreeMap<String, usize> = BTreeMap::new();
    for job in candidate_jobs.iter().filter(|job| job.is_active) {
        let raw = job.required_skills.as_deref().ok_or_else(|| {
            MatchError::InvalidInput(format!("job {} has no skill collection", job.id))
        })?;
        for skill in normalizer.normalize(raw).difference(&owned) {
            *demand.entry(skill.clone()).or_default() += 1;
        }
    }

    let mut recommendations: Vec<UpskillingRecommendation> = demand
        .into_iter()
        .map(|(skill, demand)| {
            let entry = catalog.entry_or_default(&skill);
            UpskillingRecommendation {
                priority: Priority::from_weight(entry.weight),
                category: entry.category,
                weight: entry.weight,
                demand,
                skill,
            }
        })
        .collect();

    recommendations.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| b.demand.cmp(&a.demand))
            .then_with(|| b.weight.total_cmp(&a.weight))
            .then_with(|| a.skill.cmp(&b.skill))
    });
    if limit > 0 {
        recommendations.truncate(limit);
    }

    Ok(recommendations)
}
