use serde::Deserialize;

use crate::{JobPosting, Profile};

/// Ad-hoc matching over caller-supplied snapshots; nothing is read from storage.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchRequest {
    pub profile: Profile,
    #[serde(default)]
    pub jobs: Vec<JobPosting>,
    #[serde(default)]
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_minimal_body() {
        let request: MatchRequest = serde_json::from_str(
            r#"{
                "profile": {"id": 1, "skills": ["Python"]},
                "jobs": [{"id": 2, "required_skills": ["python"], "created_at": "2024-01-01T00:00:00Z"}]
            }"#,
        )
        .unwrap();

        assert_eq!(request.profile.skills, Some(vec!["Python".to_string()]));
        assert_eq!(request.jobs.len(), 1);
        assert!(request.jobs[0].is_active);
        assert_eq!(request.limit, None);
    }

    #[test]
    fn jobs_default_to_empty() {
        let request: MatchRequest =
            serde_json::from_str(r#"{"profile": {"id": 1}, "limit": 5}"#).unwrap();
        assert!(request.jobs.is_empty());
        assert_eq!(request.limit, Some(5));
        assert!(request.profile.skills.is_none());
    }
}
