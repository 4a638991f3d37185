//! Bearer token resolution.
//!
//! When an auth service URL is configured every token is validated remotely
//! first. Only a transport failure (connect error, timeout) falls back to local
//! HS256 verification with the shared secret; any HTTP answer from the auth
//! service is final. Results are never cached.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, get_current_timestamp};
use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

use crate::domain::auth::{Principal, Role};
use crate::models::config::AuthConfig;
use crate::services::{ServiceError, ServiceResult};

const BEARER_PREFIX: &str = "Bearer ";
const INVALID_TOKEN: &str = "Invalid token";
const EXPIRED_TOKEN: &str = "Token expired";
const FORBIDDEN_ROLE: &str = "Access denied. Sales or admin role required.";

fn id_to_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(de::Error::custom(format!("unsupported user id: {other}"))),
    }
}

/// User object returned by the remote auth service.
#[derive(Debug, Deserialize)]
pub struct RemoteUser {
    #[serde(deserialize_with = "id_to_string")]
    pub id: String,
    #[serde(default)]
    pub email: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
struct RemoteValidation {
    user: RemoteUser,
}

#[derive(Debug, Default, Deserialize)]
struct RemoteError {
    message: Option<String>,
    error: Option<String>,
}

/// Claims carried by locally verifiable tokens.
#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(alias = "userId", deserialize_with = "id_to_string")]
    id: String,
    #[serde(default)]
    email: String,
    role: String,
}

#[derive(Debug, Deserialize)]
struct Expiry {
    exp: Option<Value>,
}

/// Classified result of a call to the remote auth service.
#[derive(Debug)]
pub enum RemoteOutcome {
    Ok(RemoteUser),
    /// The service answered with an error; its status and message are final.
    Rejected { status: u16, message: String },
    /// The service could not be reached.
    Unavailable(String),
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> ServiceResult<&str> {
    let header = header.ok_or_else(|| {
        ServiceError::Unauthorized("Access denied. No token provided.".to_string())
    })?;

    header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ServiceError::Unauthorized(INVALID_TOKEN.to_string()))
}

/// Rejects JWTs whose `exp` already passed. Opaque tokens are left to the validators.
fn reject_expired(token: &str) -> ServiceResult<()> {
    let Ok(data) = jsonwebtoken::dangerous::insecure_decode::<Expiry>(token) else {
        return Ok(());
    };

    let exp = data.claims.exp.as_ref().and_then(Value::as_f64);
    match exp {
        Some(exp) if exp < get_current_timestamp() as f64 => {
            Err(ServiceError::Unauthorized(EXPIRED_TOKEN.to_string()))
        }
        _ => Ok(()),
    }
}

fn principal_from(id: String, email: String, role: &str) -> ServiceResult<Principal> {
    let role = role
        .parse::<Role>()
        .map_err(|_| ServiceError::Forbidden(FORBIDDEN_ROLE.to_string()))?;

    if id.trim().is_empty() {
        return Err(ServiceError::Unauthorized(INVALID_TOKEN.to_string()));
    }

    Ok(Principal { id, email, role })
}

/// Resolves bearer tokens into principals. Built once at startup and shared
/// between workers.
#[derive(Clone)]
pub struct AuthResolver {
    http: reqwest::Client,
    service_url: Option<String>,
    secret: Option<String>,
}

impl AuthResolver {
    pub fn new(config: &AuthConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            service_url: config
                .service_url
                .clone()
                .filter(|url| !url.trim().is_empty()),
            secret: config.jwt_secret.clone().filter(|secret| !secret.is_empty()),
        })
    }

    /// Resolves the raw `Authorization` header value.
    pub async fn resolve(&self, authorization: Option<&str>) -> ServiceResult<Principal> {
        let token = bearer_token(authorization)?;
        reject_expired(token)?;

        if let Some(url) = &self.service_url {
            match self.validate_remote(url, token).await {
                RemoteOutcome::Ok(user) => return principal_from(user.id, user.email, &user.role),
                RemoteOutcome::Rejected { status, message } => {
                    return Err(ServiceError::Upstream { status, message });
                }
                RemoteOutcome::Unavailable(reason) => {
                    log::warn!("Auth service unavailable, verifying token locally: {reason}");
                }
            }
        }

        self.verify_local(token)
    }

    /// Asks the auth service to validate `token`.
    pub async fn validate_remote(&self, url: &str, token: &str) -> RemoteOutcome {
        let response = match self.http.get(url).bearer_auth(token).send().await {
            Ok(response) => response,
            Err(err) => return RemoteOutcome::Unavailable(err.to_string()),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<RemoteError>().await.unwrap_or_default();
            let message = body
                .message
                .or(body.error)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "Authentication failed".to_string());
            return RemoteOutcome::Rejected {
                status: status.as_u16(),
                message,
            };
        }

        match response.json::<RemoteValidation>().await {
            Ok(body) => RemoteOutcome::Ok(body.user),
            Err(err) if err.is_timeout() => RemoteOutcome::Unavailable(err.to_string()),
            Err(err) => {
                log::error!("Malformed auth service response: {err}");
                RemoteOutcome::Rejected {
                    status: 401,
                    message: INVALID_TOKEN.to_string(),
                }
            }
        }
    }

    /// Verifies the token signature with the shared secret.
    pub fn verify_local(&self, token: &str) -> ServiceResult<Principal> {
        let Some(secret) = &self.secret else {
            log::error!("Local token verification requested but no JWT secret is configured");
            return Err(ServiceError::Unauthorized(INVALID_TOKEN.to_string()));
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map_err(|err| match err.kind() {
            ErrorKind::ExpiredSignature => ServiceError::Unauthorized(EXPIRED_TOKEN.to_string()),
            _ => ServiceError::Unauthorized(INVALID_TOKEN.to_string()),
        })?;

        let claims = data.claims;
        principal_from(claims.id, claims.email, &claims.role)
    }
}

impl FromRequest for Principal {
    type Error = ServiceError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let resolver = req.app_data::<web::Data<AuthResolver>>().cloned();
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        Box::pin(async move {
            let resolver = resolver.ok_or_else(|| {
                ServiceError::Internal("auth resolver is not registered".to_string())
            })?;
            resolver.resolve(header.as_deref()).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    const SECRET: &str = "local-secret";

    fn resolver(secret: Option<&str>) -> AuthResolver {
        AuthResolver::new(&AuthConfig {
            service_url: None,
            jwt_secret: secret.map(str::to_string),
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn token(claims: serde_json::Value, secret: &str) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn bearer_token_requires_scheme_and_value() {
        assert!(matches!(bearer_token(None), Err(ServiceError::Unauthorized(_))));
        assert!(matches!(
            bearer_token(Some("Basic abc")),
            Err(ServiceError::Unauthorized(_))
        ));
        assert!(matches!(
            bearer_token(Some("Bearer   ")),
            Err(ServiceError::Unauthorized(_))
        ));
        assert_eq!(bearer_token(Some("Bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn local_verification_accepts_numeric_ids() {
        let exp = get_current_timestamp() + 3600;
        let token = token(
            json!({ "id": 42, "email": "rep@example.com", "role": "sales", "exp": exp }),
            SECRET,
        );
        let principal = resolver(Some(SECRET)).verify_local(&token).unwrap();
        assert_eq!(principal.id, "42");
        assert_eq!(principal.role, Role::Sales);
    }

    #[test]
    fn local_verification_accepts_user_id_alias_without_exp() {
        let token = token(
            json!({ "userId": "u-1", "email": "admin@example.com", "role": "admin" }),
            SECRET,
        );
        let principal = resolver(Some(SECRET)).verify_local(&token).unwrap();
        assert_eq!(principal.id, "u-1");
        assert_eq!(principal.role, Role::Admin);
    }

    #[test]
    fn local_verification_rejects_bad_signature_and_missing_secret() {
        let token = token(json!({ "id": 1, "role": "sales" }), "other-secret");
        assert!(matches!(
            resolver(Some(SECRET)).verify_local(&token),
            Err(ServiceError::Unauthorized(_))
        ));
        assert!(matches!(
            resolver(None).verify_local(&token),
            Err(ServiceError::Unauthorized(_))
        ));
    }

    #[test]
    fn viewer_role_is_forbidden() {
        let token = token(json!({ "id": 1, "role": "viewer" }), SECRET);
        assert!(matches!(
            resolver(Some(SECRET)).verify_local(&token),
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[test]
    fn expired_tokens_are_rejected_without_leeway() {
        let exp = get_current_timestamp() - 5;
        let token = token(json!({ "id": 1, "role": "sales", "exp": exp }), SECRET);
        assert!(matches!(
            resolver(Some(SECRET)).verify_local(&token),
            Err(ServiceError::Unauthorized(message)) if message == EXPIRED_TOKEN
        ));
        assert!(matches!(
            reject_expired(&token),
            Err(ServiceError::Unauthorized(_))
        ));
    }

    #[test]
    fn opaque_tokens_pass_expiry_precheck() {
        assert!(reject_expired("not-a-jwt").is_ok());
    }
}
