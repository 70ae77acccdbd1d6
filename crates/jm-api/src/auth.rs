use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use clap::ValueEnum;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use jm_common::JobPosting;
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum AuthMode {
    ApiKey,
    Jwt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lower")]
pub enum JwtAlgorithm {
    Hs256,
    Hs384,
    Hs512,
    Rs256,
    Rs384,
    Rs512,
    Es256,
    Es384,
}

/// Which kind of verification key an algorithm needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JwtKeyKind {
    Secret,
    RsaPem,
    EcPem,
}

impl JwtAlgorithm {
    pub fn key_kind(self) -> JwtKeyKind {
        match self {
            JwtAlgorithm::Hs256 | JwtAlgorithm::Hs384 | JwtAlgorithm::Hs512 => JwtKeyKind::Secret,
            JwtAlgorithm::Rs256 | JwtAlgorithm::Rs384 | JwtAlgorithm::Rs512 => JwtKeyKind::RsaPem,
            JwtAlgorithm::Es256 | JwtAlgorithm::Es384 => JwtKeyKind::EcPem,
        }
    }

    fn algorithm(self) -> Algorithm {
        match self {
            JwtAlgorithm::Hs256 => Algorithm::HS256,
            JwtAlgorithm::Hs384 => Algorithm::HS384,
            JwtAlgorithm::Hs512 => Algorithm::HS512,
            JwtAlgorithm::Rs256 => Algorithm::RS256,
            JwtAlgorithm::Rs384 => Algorithm::RS384,
            JwtAlgorithm::Rs512 => Algorithm::RS512,
            JwtAlgorithm::Es256 => Algorithm::ES256,
            JwtAlgorithm::Es384 => Algorithm::ES384,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub mode: AuthMode,
    pub api_key: Option<String>,
    pub jwt_secret: Option<String>,
    pub jwt_public_key: Option<String>,
    pub jwt_algorithm: JwtAlgorithm,
}

impl AuthConfig {
    pub fn api_key(key: impl Into<String>) -> Self {
        Self {
            mode: AuthMode::ApiKey,
            api_key: Some(key.into()),
            jwt_secret: None,
            jwt_public_key: None,
            jwt_algorithm: JwtAlgorithm::Hs512,
        }
    }

    fn decoding_key(&self) -> Result<DecodingKey, ApiError> {
        match self.jwt_algorithm.key_kind() {
            JwtKeyKind::Secret => self
                .jwt_secret
                .as_deref()
                .map(|secret| DecodingKey::from_secret(secret.as_bytes()))
                .ok_or_else(|| ApiError::Unauthorized("missing JWT_SECRET".into())),
            kind => {
                let pem = self
                    .jwt_public_key
                    .as_deref()
                    .ok_or_else(|| ApiError::Unauthorized("missing JWT_PUBLIC_KEY".into()))?;
                let key = if kind == JwtKeyKind::RsaPem {
                    DecodingKey::from_rsa_pem(pem.as_bytes())
                } else {
                    DecodingKey::from_ec_pem(pem.as_bytes())
                };
                key.map_err(|err| ApiError::Internal(format!("invalid JWT_PUBLIC_KEY: {err}")))
            }
        }
    }
}

/// What a caller may see. Tokens carry it in the `role` claim; the API key acts as an
/// internal service and is treated as `Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    JobSeeker,
    Recruiter,
    Admin,
}

/// Authenticated caller. Handlers never see raw credentials.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub subject: String,
    pub role: Role,
    /// Job seeker id for seekers, recruiter id for recruiters.
    pub user_id: Option<i64>,
}

impl AuthUser {
    /// Seekers reach only their own profile.
    pub fn require_seeker(&self, profile_id: i64) -> Result<(), ApiError> {
        match self.role {
            Role::Admin => Ok(()),
            Role::JobSeeker if self.user_id == Some(profile_id) => Ok(()),
            role => Err(ApiError::Forbidden(format!(
                "{} ({role:?}) may not read job seeker {profile_id}",
                self.subject
            ))),
        }
    }

    pub fn require_recruiter(&self) -> Result<(), ApiError> {
        match self.role {
            Role::Admin | Role::Recruiter => Ok(()),
            Role::JobSeeker => Err(ApiError::Forbidden(format!(
                "{} is not a recruiter",
                self.subject
            ))),
        }
    }

    /// Recruiters reach only the applicants of postings they own.
    pub fn require_job_owner(&self, job: &JobPosting) -> Result<(), ApiError> {
        self.require_recruiter()?;
        if self.role == Role::Admin
            || (self.user_id.is_some() && job.recruiter_id == self.user_id)
        {
            return Ok(());
        }
        Err(ApiError::Forbidden(format!("{} does not own job {}", self.subject, job.id)))
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    role: Role,
    #[serde(default)]
    user_id: Option<i64>,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AuthConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AuthConfig::from_ref(state);

        match config.mode {
            AuthMode::ApiKey => authorize_api_key(parts, &config),
            AuthMode::Jwt => authorize_jwt(parts, &config),
        }
    }
}

fn authorize_api_key(parts: &Parts, config: &AuthConfig) -> Result<AuthUser, ApiError> {
    let expected = config
        .api_key
        .as_deref()
        .ok_or_else(|| ApiError::Unauthorized("missing JM_API_KEY".into()))?;

    let provided = parts
        .headers
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("missing X-API-Key header".into()))?;

    if provided != expected {
        return Err(ApiError::Unauthorized("invalid API key".into()));
    }

    Ok(AuthUser {
        subject: "api_key".to_string(),
        role: Role::Admin,
        user_id: None,
    })
}

fn authorize_jwt(parts: &Parts, config: &AuthConfig) -> Result<AuthUser, ApiError> {
    let token = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("missing Authorization header".into()))?
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("expected Bearer token".into()))?;

    let validation = Validation::new(config.jwt_algorithm.algorithm());
    let claims = decode::<Claims>(token, &config.decoding_key()?, &validation)
        .map_err(|err| ApiError::Unauthorized(format!("invalid token: {err}")))?
        .claims;

    // Tokens without a `user_id` claim identify the user by a numeric subject.
    let user_id = claims.user_id.or_else(|| claims.sub.parse().ok());

    Ok(AuthUser {
        subject: claims.sub,
        role: claims.role,
        user_id,
    })
}

#[cfg(test)]
mod tests {
    use axum::http::Request;
    use jsonwebtoken::{EncodingKey, Header, encode, get_current_timestamp};
    use serde_json::{Value, json};

    use super::*;

    fn parts(header: Option<(&str, &str)>) -> Parts {
        let mut builder = Request::builder().uri("/api/match");
        if let Some((name, value)) = header {
            builder = builder.header(name, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn jwt_config(secret: &str) -> AuthConfig {
        AuthConfig {
            mode: AuthMode::Jwt,
            api_key: None,
            jwt_secret: Some(secret.into()),
            jwt_public_key: None,
            jwt_algorithm: JwtAlgorithm::Hs256,
        }
    }

    fn token(secret: &str, claims: Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn recruiter_claims(exp: u64) -> Value {
        json!({"sub": "recruiter-7", "role": "recruiter", "user_id": 7, "exp": exp})
    }

    fn user(role: Role, user_id: Option<i64>) -> AuthUser {
        AuthUser {
            subject: "caller".into(),
            role,
            user_id,
        }
    }

    fn owned_job(recruiter_id: Option<i64>) -> JobPosting {
        JobPosting {
            id: 9,
            recruiter_id,
            ..JobPosting::default()
        }
    }

    #[tokio::test]
    async fn api_key_must_match() {
        let config = AuthConfig::api_key("secret-key");

        let mut ok = parts(Some(("x-api-key", "secret-key")));
        let user = AuthUser::from_request_parts(&mut ok, &config).await.unwrap();
        assert_eq!(user.subject, "api_key");
        assert_eq!(user.role, Role::Admin);

        let mut wrong = parts(Some(("x-api-key", "nope")));
        assert!(matches!(
            AuthUser::from_request_parts(&mut wrong, &config).await,
            Err(ApiError::Unauthorized(_))
        ));

        let mut missing = parts(None);
        assert!(AuthUser::from_request_parts(&mut missing, &config).await.is_err());
    }

    #[tokio::test]
    async fn accepts_valid_bearer_token() {
        let config = jwt_config("jwt-secret");
        let claims = recruiter_claims(get_current_timestamp() + 600);
        let bearer = format!("Bearer {}", token("jwt-secret", claims));

        let mut request = parts(Some(("authorization", bearer.as_str())));
        let user = AuthUser::from_request_parts(&mut request, &config).await.unwrap();
        assert_eq!(user.subject, "recruiter-7");
        assert_eq!(user.role, Role::Recruiter);
        assert_eq!(user.user_id, Some(7));
    }

    #[tokio::test]
    async fn numeric_subject_stands_in_for_user_id() {
        let config = jwt_config("jwt-secret");
        let exp = get_current_timestamp() + 600;
        let claims = json!({"sub": "12", "role": "job_seeker", "exp": exp});
        let bearer = format!("Bearer {}", token("jwt-secret", claims));

        let mut request = parts(Some(("authorization", bearer.as_str())));
        let user = AuthUser::from_request_parts(&mut request, &config).await.unwrap();
        assert_eq!(user.role, Role::JobSeeker);
        assert_eq!(user.user_id, Some(12));
    }

    #[tokio::test]
    async fn rejects_bad_signature_expired_and_roleless_tokens() {
        let config = jwt_config("jwt-secret");
        let now = get_current_timestamp();

        let forged = format!("Bearer {}", token("other-secret", recruiter_claims(now + 600)));
        let mut request = parts(Some(("authorization", forged.as_str())));
        assert!(AuthUser::from_request_parts(&mut request, &config).await.is_err());

        let expired = format!("Bearer {}", token("jwt-secret", recruiter_claims(now - 3600)));
        let mut request = parts(Some(("authorization", expired.as_str())));
        assert!(AuthUser::from_request_parts(&mut request, &config).await.is_err());

        let roleless = json!({"sub": "5", "exp": now + 600});
        let roleless = format!("Bearer {}", token("jwt-secret", roleless));
        let mut request = parts(Some(("authorization", roleless.as_str())));
        assert!(matches!(
            AuthUser::from_request_parts(&mut request, &config).await,
            Err(ApiError::Unauthorized(_))
        ));

        let mut request = parts(Some(("authorization", "Token abc")));
        assert!(AuthUser::from_request_parts(&mut request, &config).await.is_err());
    }

    #[test]
    fn seekers_only_reach_their_own_profile() {
        assert!(user(Role::JobSeeker, Some(4)).require_seeker(4).is_ok());
        assert!(user(Role::Admin, None).require_seeker(4).is_ok());

        assert!(matches!(
            user(Role::JobSeeker, Some(5)).require_seeker(4),
            Err(ApiError::Forbidden(_))
        ));
        assert!(matches!(
            user(Role::JobSeeker, None).require_seeker(4),
            Err(ApiError::Forbidden(_))
        ));
        assert!(matches!(
            user(Role::Recruiter, Some(4)).require_seeker(4),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn applicants_need_recruiter_role() {
        assert!(user(Role::Recruiter, Some(7)).require_recruiter().is_ok());
        assert!(user(Role::Admin, None).require_recruiter().is_ok());
        assert!(matches!(
            user(Role::JobSeeker, Some(7)).require_recruiter(),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn recruiters_only_reach_jobs_they_own() {
        assert!(user(Role::Recruiter, Some(7)).require_job_owner(&owned_job(Some(7))).is_ok());
        assert!(user(Role::Admin, None).require_job_owner(&owned_job(Some(7))).is_ok());
        assert!(user(Role::Admin, None).require_job_owner(&owned_job(None)).is_ok());

        for (caller, job) in [
            (user(Role::Recruiter, Some(8)), owned_job(Some(7))),
            (user(Role::Recruiter, Some(7)), owned_job(None)),
            (user(Role::Recruiter, None), owned_job(None)),
            (user(Role::JobSeeker, Some(7)), owned_job(Some(7))),
        ] {
            assert!(
                matches!(caller.require_job_owner(&job), Err(ApiError::Forbidden(_))),
                "{caller:?}"
            );
        }
    }

    #[test]
    fn key_kinds_follow_algorithm_family() {
        assert_eq!(JwtAlgorithm::Hs512.key_kind(), JwtKeyKind::Secret);
        assert_eq!(JwtAlgorithm::Rs256.key_kind(), JwtKeyKind::RsaPem);
        assert_eq!(JwtAlgorithm::Es384.key_kind(), JwtKeyKind::EcPem);
    }
}
