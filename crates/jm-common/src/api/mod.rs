pub mod match_request;
pub mod match_response;

pub use match_request::MatchRequest;
pub use match_response::{
    CandidateMatch, CandidatesResponse, JobRecommendation, JobSummary, RecommendationsResponse,
    UpskillingResponse,
};
