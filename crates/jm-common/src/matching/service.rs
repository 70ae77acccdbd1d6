use std::collections::HashMap;

use super::{
    error::MatchError,
    preferences::evaluate_preferences,
    ranking::rank,
    scoring::{MatchResult, score_skills},
};
use crate::{
    JobPosting, Profile,
    skill_normalizer::{SkillNormalizer, SkillSet},
};

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationConfig {
    /// Results scoring below this are dropped before ranking. `0.0` keeps everything.
    pub min_score: f64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self { min_score: 0.0 }
    }
}

/// Normalizes each distinct raw skill list once per call.
struct SkillSetCache<'a> {
    normalizer: &'a SkillNormalizer,
    sets: HashMap<&'a [String], SkillSet>,
}

impl<'a> SkillSetCache<'a> {
    fn new(normalizer: &'a SkillNormalizer) -> Self {
        Self {
            normalizer,
            sets: HashMap::new(),
        }
    }

    fn get(&mut self, raw: &'a [String]) -> &SkillSet {
        let normalizer = self.normalizer;
        self.sets
            .entry(raw)
            .or_insert_with(|| normalizer.normalize(raw))
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.sets.len()
    }
}

fn require_skills<'a>(
    kind: &str,
    id: i64,
    skills: &'a Option<Vec<String>>,
) -> Result<&'a [String], MatchError> {
    skills
        .as_deref()
        .ok_or_else(|| MatchError::InvalidInput(format!("{kind} {id} has no skill collection")))
}

/// Entry point used by the API layer: normalization, scoring and ranking over
/// caller-supplied snapshots. Holds no per-request state.
#[derive(Debug, Clone, Default)]
pub struct RecommendationService {
    normalizer: SkillNormalizer,
    config: RecommendationConfig,
}

impl RecommendationService {
    pub fn new(normalizer: SkillNormalizer, config: RecommendationConfig) -> Self {
        Self { normalizer, config }
    }

    pub fn normalizer(&self) -> &SkillNormalizer {
        &self.normalizer
    }

    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    /// Personalized job recommendations for a seeker, best match first.
    pub fn recommend(
        &self,
        profile: &Profile,
        candidate_jobs: &[JobPosting],
        limit: i64,
    ) -> Result<Vec<MatchResult>, MatchError> {
        Ok(self
            .recommend_jobs(profile, candidate_jobs, limit)?
            .into_iter()
            .map(|(_, result)| result)
            .collect())
    }

    /// Same as [`recommend`](Self::recommend) but keeps the posting next to its result.
    pub fn recommend_jobs<'a>(
        &self,
        profile: &Profile,
        candidate_jobs: &'a [JobPosting],
        limit: i64,
    ) -> Result<Vec<(&'a JobPosting, MatchResult)>, MatchError> {
        let profile_raw = require_skills("profile", profile.id, &profile.skills)?;
        let active: Vec<&'a JobPosting> =
            candidate_jobs.iter().filter(|job| job.is_active).collect();
        let job_raw = active
            .iter()
            .map(|&job| require_skills("job", job.id, &job.required_skills))
            .collect::<Result<Vec<_>, _>>()?;

        let profile_skills = self.normalizer.normalize(profile_raw);
        let mut cache = SkillSetCache::new(&self.normalizer);

        let scored: Vec<_> = active
            .into_iter()
            .zip(job_raw)
            .map(|(job, raw)| {
                let skill_match = score_skills(&profile_skills, cache.get(raw));
                let fit = evaluate_preferences(&profile.preferences, job);
                (
                    job,
                    MatchResult::from_skill_match(job.id, profile.id, skill_match, fit),
                )
            })
            .filter(|(_, result)| result.score >= self.config.min_score)
            .collect();

        Ok(rank(scored, limit))
    }

    /// Recruiter-side candidate discovery for one posting, best match first.
    pub fn match_candidates(
        &self,
        job: &JobPosting,
        candidate_profiles: &[Profile],
        limit: i64,
    ) -> Result<Vec<MatchResult>, MatchError> {
        Ok(self
            .match_candidate_profiles(job, candidate_profiles, limit)?
            .into_iter()
            .map(|(_, result)| result)
            .collect())
    }

    pub fn match_candidate_profiles<'a>(
        &self,
        job: &JobPosting,
        candidate_profiles: &'a [Profile],
        limit: i64,
    ) -> Result<Vec<(&'a Profile, MatchResult)>, MatchError> {
        let job_raw = require_skills("job", job.id, &job.required_skills)?;
        let profile_raw = candidate_profiles
            .iter()
            .map(|profile| require_skills("profile", profile.id, &profile.skills))
            .collect::<Result<Vec<_>, _>>()?;

        let job_skills = self.normalizer.normalize(job_raw);
        let mut cache = SkillSetCache::new(&self.normalizer);

        let scored: Vec<_> = candidate_profiles
            .iter()
            .zip(profile_raw)
            .map(|(profile, raw)| {
                let skill_match = score_skills(cache.get(raw), &job_skills);
                let fit = evaluate_preferences(&profile.preferences, job);
                (
                    profile,
                    MatchResult::from_skill_match(job.id, profile.id, skill_match, fit),
                )
            })
            .filter(|(_, result)| result.score >= self.config.min_score)
            .collect();

        Ok(rank(scored, limit))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn skills(values: &[&str]) -> Option<Vec<String>> {
        Some(values.iter().map(|v| v.to_string()).collect())
    }

    fn profile(id: i64, values: &[&str]) -> Profile {
        Profile {
            id,
            skills: skills(values),
            ..Profile::default()
        }
    }

    fn job(id: i64, values: &[&str], day: u32) -> JobPosting {
        JobPosting {
            id,
            required_skills: skills(values),
            created_at: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            ..JobPosting::default()
        }
    }

    #[test]
    fn recommends_with_normalized_skills() {
        let service = RecommendationService::default();
        let seeker = profile(1, &["Python", "ReactJS", "Amazon Web Services"]);
        let jobs = vec![job(10, &["python", "react", "Node.js", "AWS"], 1)];

        let results = service.recommend(&seeker, &jobs, 0).unwrap();

        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert_eq!(result.job_id, 10);
        assert_eq!(result.profile_id, 1);
        assert_eq!(result.score, 75.0);
        assert_eq!(
            result.matched_skills,
            SkillSet::from(["aws".into(), "python".into(), "react".into()])
        );
        assert_eq!(result.missing_skills, SkillSet::from(["node.js".into()]));
    }

    #[test]
    fn orders_and_truncates_recommendations() {
        let service = RecommendationService::default();
        let seeker = profile(1, &["rust", "go", "sql", "docker"]);
        let jobs = vec![
            job(1, &["rust", "kotlin"], 1),
            job(2, &["rust", "go", "sql", "docker"], 2),
            job(3, &["java"], 3),
            job(4, &["rust", "go", "sql", "java"], 4),
            job(5, &["rust", "go", "sql", "java"], 5),
        ];

        let results = service.recommend(&seeker, &jobs, 2).unwrap();
        let order: Vec<i64> = results.iter().map(|r| r.job_id).collect();
        assert_eq!(order, vec![2, 5]);
    }

    #[test]
    fn skips_inactive_postings() {
        let service = RecommendationService::default();
        let seeker = profile(1, &["sql"]);
        let mut closed = job(1, &["sql"], 1);
        closed.is_active = false;
        // Inactive postings are not candidates, so their missing skills are irrelevant.
        closed.required_skills = None;
        let open = job(2, &["sql", "excel"], 2);

        let results = service.recommend(&seeker, &[closed, open], 0).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].job_id, 2);
    }

    #[test]
    fn rejects_missing_skill_collections() {
        let service = RecommendationService::default();
        let seeker = Profile {
            id: 4,
            skills: None,
            ..Profile::default()
        };
        let err = service
            .recommend(&seeker, &[job(1, &["sql"], 1)], 0)
            .unwrap_err();
        assert_eq!(
            err,
            MatchError::InvalidInput("profile 4 has no skill collection".into())
        );

        let mut broken = job(9, &[], 1);
        broken.required_skills = None;
        let err = service
            .recommend(&profile(1, &["sql"]), &[job(1, &["sql"], 1), broken], 0)
            .unwrap_err();
        assert!(matches!(err, MatchError::InvalidInput(msg) if msg.contains("job 9")));
    }

    #[test]
    fn empty_profile_and_empty_candidates_are_valid() {
        let service = RecommendationService::default();
        let results = service
            .recommend(&profile(1, &[]), &[job(1, &["sql"], 1)], 0)
            .unwrap();
        assert_eq!(results[0].score, 0.0);
        assert_eq!(results[0].missing_skills, SkillSet::from(["sql".into()]));

        assert!(service.recommend(&profile(1, &["sql"]), &[], 10).unwrap().is_empty());
    }

    #[test]
    fn min_score_floor_drops_weak_matches() {
        let service = RecommendationService::new(
            SkillNormalizer::default(),
            RecommendationConfig { min_score: 30.0 },
        );
        let seeker = profile(1, &["sql"]);
        let jobs = vec![job(1, &["sql", "a", "b", "c"], 1), job(2, &["sql"], 2)];

        let results = service.recommend(&seeker, &jobs, 0).unwrap();
        assert_eq!(results.iter().map(|r| r.job_id).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn matches_candidates_for_a_posting() {
        let service = RecommendationService::default();
        let posting = job(7, &["python", "sql"], 1);
        let candidates = vec![
            profile(3, &["python"]),
            profile(1, &["Python", "SQL"]),
            profile(2, &["python"]),
        ];

        let results = service.match_candidates(&posting, &candidates, 0).unwrap();
        let order: Vec<(i64, f64)> = results.iter().map(|r| (r.profile_id, r.score)).collect();
        assert_eq!(order, vec![(1, 100.0), (2, 50.0), (3, 50.0)]);
        assert!(results.iter().all(|r| r.job_id == 7));

        let mut no_skills = profile(5, &[]);
        no_skills.skills = None;
        assert!(service.match_candidates(&posting, &[no_skills], 0).is_err());
    }

    #[test]
    fn normalizes_each_distinct_skill_list_once() {
        let normalizer = SkillNormalizer::default();
        let shared = vec!["Rust".to_string(), "SQL".to_string()];
        let same_content = shared.clone();
        let other = vec!["Go".to_string()];
        let mut cache = SkillSetCache::new(&normalizer);

        let first = cache.get(&shared).clone();
        cache.get(&shared);
        cache.get(&other);
        cache.get(&same_content);

        assert_eq!(cache.len(), 2);
        assert_eq!(first, SkillSet::from(["rust".into(), "sql".into()]));
    }

    #[test]
    fn recommendation_is_repeatable() {
        let service = RecommendationService::default();
        let seeker = profile(1, &["python", "sql"]);
        let jobs: Vec<JobPosting> = (1..=6)
            .map(|id| job(id, &["python", "sql", "go"], (id % 2 + 1) as u32))
            .collect();

        assert_eq!(
            service.recommend(&seeker, &jobs, 0).unwrap(),
            service.recommend(&seeker, &jobs, 0).unwrap()
        );
    }
}
