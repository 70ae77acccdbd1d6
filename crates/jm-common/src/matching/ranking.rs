use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use super::scoring::MatchResult;
use crate::{JobPosting, Profile};

/// Ranking keys an entity contributes beyond its score.
///
/// Entities without recency or saturation data (profiles) return `None` and skip
/// those tie-breaks.
pub trait Rankable {
    fn rank_id(&self) -> i64;

    fn is_active(&self) -> bool {
        true
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        None
    }

    fn applications_count(&self) -> Option<u32> {
        None
    }
}

impl Rankable for JobPosting {
    fn rank_id(&self) -> i64 {
        self.id
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }

    fn applications_count(&self) -> Option<u32> {
        Some(self.applications_count)
    }
}

impl Rankable for Profile {
    fn rank_id(&self) -> i64 {
        self.id
    }
}

impl<T: Rankable + ?Sized> Rankable for &T {
    fn rank_id(&self) -> i64 {
        (**self).rank_id()
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        (**self).created_at()
    }

    fn applications_count(&self) -> Option<u32> {
        (**self).applications_count()
    }
}

/// score desc → newer posting → fewer applications → id asc
fn compare<E: Rankable>(a: &(E, MatchResult), b: &(E, MatchResult)) -> Ordering {
    let (left, left_result) = a;
    let (right, right_result) = b;

    right_result
        .score
        .total_cmp(&left_result.score)
        .then_with(|| right.created_at().cmp(&left.created_at()))
        .then_with(|| left.applications_count().cmp(&right.applications_count()))
        .then_with(|| left.rank_id().cmp(&right.rank_id()))
}

/// Orders scored entities and truncates to `limit` (`limit <= 0` keeps everything).
/// Inactive entities are dropped.
pub fn rank<E: Rankable>(scored: Vec<(E, MatchResult)>, limit: i64) -> Vec<(E, MatchResult)> {
    let mut ranked: Vec<_> = scored
        .into_iter()
        .filter(|(entity, _)| entity.is_active())
        .collect();

    ranked.sort_by(compare::<E>);

    if limit > 0 {
        ranked.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    }
    ranked
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::matching::preferences::PreferenceFit;
    use crate::skill_normalizer::SkillSet;

    fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    fn job(id: i64, created_at: DateTime<Utc>, applications_count: u32) -> JobPosting {
        JobPosting {
            id,
            created_at,
            applications_count,
            ..JobPosting::default()
        }
    }

    fn result(job_id: i64, score: f64) -> MatchResult {
        MatchResult {
            job_id,
            profile_id: 1,
            score,
            matched_skills: SkillSet::new(),
            missing_skills: SkillSet::new(),
            preference_fit: PreferenceFit::default(),
        }
    }

    fn scored(jobs: &[(i64, f64, DateTime<Utc>, u32)]) -> Vec<(JobPosting, MatchResult)> {
        jobs.iter()
            .map(|(id, score, created_at, apps)| {
                (job(*id, *created_at, *apps), result(*id, *score))
            })
            .collect()
    }

    fn ids(ranked: &[(JobPosting, MatchResult)]) -> Vec<i64> {
        ranked.iter().map(|(job, _)| job.id).collect()
    }

    #[test]
    fn newer_posting_wins_equal_scores() {
        let ranked = rank(
            scored(&[
                (1, 80.0, date(2024, 1, 1), 0),
                (2, 80.0, date(2024, 2, 1), 0),
            ]),
            0,
        );
        assert_eq!(ids(&ranked), vec![2, 1]);
    }

    #[test]
    fn less_contested_posting_wins_after_recency() {
        let same_day = date(2024, 3, 1);
        let ranked = rank(
            scored(&[(1, 50.0, same_day, 12), (2, 50.0, same_day, 3), (3, 50.0, same_day, 3)]),
            0,
        );
        assert_eq!(ids(&ranked), vec![2, 3, 1]);
    }

    #[test]
    fn score_dominates_tie_breaks() {
        let ranked = rank(
            scored(&[
                (1, 40.0, date(2024, 6, 1), 0),
                (2, 90.0, date(2023, 1, 1), 100),
            ]),
            0,
        );
        assert_eq!(ids(&ranked), vec![2, 1]);
    }

    #[test]
    fn limit_truncates_to_highest_ranked() {
        let day = date(2024, 1, 1);
        let input = scored(&[
            (1, 20.0, day, 0),
            (2, 90.0, day, 0),
            (3, 55.0, day, 0),
            (4, 70.0, day, 0),
            (5, 10.0, day, 0),
        ]);

        assert_eq!(ids(&rank(input.clone(), 2)), vec![2, 4]);
        assert_eq!(rank(input.clone(), 0).len(), 5);
        assert_eq!(rank(input.clone(), -1).len(), 5);
        assert_eq!(rank(input, 50).len(), 5);
    }

    #[test]
    fn inactive_entities_are_excluded() {
        let mut input = scored(&[(1, 99.0, date(2024, 1, 1), 0), (2, 10.0, date(2024, 1, 1), 0)]);
        input[0].0.is_active = false;

        let ranked = rank(input, 0);
        assert_eq!(ids(&ranked), vec![2]);
    }

    #[test]
    fn output_is_permutation_of_active_input() {
        let day = date(2024, 5, 5);
        let input = scored(&[
            (9, 50.0, day, 1),
            (3, 50.0, day, 1),
            (7, 75.0, date(2024, 5, 6), 0),
            (1, 0.0, day, 0),
        ]);

        let mut ranked_ids = ids(&rank(input.clone(), 0));
        let mut input_ids = ids(&input);
        ranked_ids.sort();
        input_ids.sort();
        assert_eq!(ranked_ids, input_ids);
    }

    #[test]
    fn ranking_is_deterministic_with_identical_keys() {
        let day = date(2024, 1, 1);
        let input = scored(&[(5, 60.0, day, 2), (2, 60.0, day, 2), (8, 60.0, day, 2)]);
        let mut reversed = input.clone();
        reversed.reverse();

        assert_eq!(ids(&rank(input.clone(), 0)), vec![2, 5, 8]);
        assert_eq!(ids(&rank(input, 0)), ids(&rank(reversed, 0)));
    }

    #[test]
    fn profiles_fall_back_to_id_order() {
        let profiles = vec![
            (Profile { id: 30, ..Profile::default() }, result(1, 50.0)),
            (Profile { id: 10, ..Profile::default() }, result(1, 50.0)),
            (Profile { id: 20, ..Profile::default() }, result(1, 75.0)),
        ];

        let ranked = rank(profiles, 0);
        let order: Vec<i64> = ranked.iter().map(|(p, _)| p.id).collect();
        assert_eq!(order, vec![20, 10, 30]);
    }
}
