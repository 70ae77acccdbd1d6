use thiserror::Error;

/// Failure signalled by the matching core. Only malformed caller data reaches here;
/// there is no transient failure class.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
