//! Recruiter authentication for the candidate routes.
//!
//! Portal sessions arrive as HS256 bearer tokens minted by the portal backend
//! and carry the user's role; only recruiters and admins may browse candidate
//! profiles. Back-office integrations use the shared `X-API-Key` instead and
//! act as the portal service account.

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use clap::ValueEnum;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

use crate::error::ApiError;

pub const API_KEY_HEADER: &str = "x-api-key";
/// Recruiter id reported for requests authorized by the shared API key.
pub const SERVICE_ACCOUNT: &str = "portal-service";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum AuthMode {
    ApiKey,
    Jwt,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub mode: AuthMode,
    pub api_key: Option<String>,
    pub jwt_secret: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalRole {
    Recruiter,
    Admin,
    Candidate,
    #[serde(other)]
    Unknown,
}

impl PortalRole {
    pub fn can_search_candidates(self) -> bool {
        matches!(self, Self::Recruiter | Self::Admin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recruiter => "recruiter",
            Self::Admin => "admin",
            Self::Candidate => "candidate",
            Self::Unknown => "unknown",
        }
    }
}

/// Caller allowed to search candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recruiter {
    pub id: String,
    pub role: PortalRole,
}

impl Recruiter {
    fn service_account() -> Self {
        Self {
            id: SERVICE_ACCOUNT.to_string(),
            role: PortalRole::Admin,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PortalClaims {
    sub: String,
    role: PortalRole,
}

#[async_trait]
impl<S> FromRequestParts<S> for Recruiter
where
    AuthConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AuthConfig::from_ref(state);
        let recruiter = match config.mode {
            AuthMode::ApiKey => check_api_key(parts, &config)?,
            AuthMode::Jwt => verify_portal_token(parts, &config)?,
        };

        if !recruiter.role.can_search_candidates() {
            return Err(ApiError::Forbidden(format!(
                "role {} cannot search candidates",
                recruiter.role.as_str()
            )));
        }
        Ok(recruiter)
    }
}

fn check_api_key(parts: &Parts, config: &AuthConfig) -> Result<Recruiter, ApiError> {
    let expected = config
        .api_key
        .as_deref()
        .ok_or_else(|| ApiError::Unauthorized("missing CS_API_KEY".into()))?;

    match parts.headers.get(API_KEY_HEADER).and_then(|value| value.to_str().ok()) {
        Some(provided) if provided == expected => Ok(Recruiter::service_account()),
        Some(_) => Err(ApiError::Unauthorized("invalid API key".into())),
        None => Err(ApiError::Unauthorized("missing X-API-Key header".into())),
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("missing Authorization header".into()))?;

    match header.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(ApiError::Unauthorized("expected Bearer token".into())),
    }
}

fn verify_portal_token(parts: &Parts, config: &AuthConfig) -> Result<Recruiter, ApiError> {
    let secret = config
        .jwt_secret
        .as_deref()
        .ok_or_else(|| ApiError::Unauthorized("missing JWT_SECRET".into()))?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims(&["exp", "sub"]);

    let claims = decode::<PortalClaims>(
        bearer_token(parts)?,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|err| ApiError::Unauthorized(format!("invalid portal token: {err}")))?
    .claims;

    Ok(Recruiter {
        id: claims.sub,
        role: claims.role,
    })
}
