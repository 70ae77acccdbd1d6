pub mod error;
pub mod preferences;
pub mod ranking;
pub mod scoring;
pub mod service;
pub mod upskilling;

pub use error::MatchError;
pub use preferences::{PreferenceFit, evaluate_preferences};
pub use ranking::{Rankable, rank};
pub use scoring::{MatchResult, SkillMatch, round_score, score_skills};
pub use service::{RecommendationConfig, RecommendationService};
pub use upskilling::{
    DEFAULT_UPSKILLING_LIMIT, Priority, UpskillingRecommendation, recommend_upskilling,
};
