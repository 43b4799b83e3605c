use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Extension, Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use caixinha_core::users::{RegistrationForm, User, UserSession};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::main_lib::AppState;

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Vec<u8>,
    pub access_token_ttl: Duration,
}

impl AuthConfig {
    /// Uses `secret` when given, otherwise a random key that only lives as
    /// long as the process.
    pub fn from_secret(secret: Option<&str>, access_token_ttl: Duration) -> anyhow::Result<Self> {
        let jwt_secret = match secret {
            Some(raw) => decode_secret_key(raw)?,
            None => {
                tracing::warn!(
                    "CX_JWT_SECRET is not set; using a random key, sessions end on restart"
                );
                let mut bytes = vec![0u8; 32];
                OsRng.fill_bytes(&mut bytes);
                bytes
            }
        };
        Ok(Self {
            jwt_secret,
            access_token_ttl,
        })
    }
}

/// Live sessions by id. A token is only honoured while its session is here.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, u64>>,
}

impl SessionRegistry {
    fn insert(&self, sid: String, expires_at: u64, now: u64) -> Result<(), AuthError> {
        let mut sessions = self.sessions.write().map_err(|_| poisoned())?;
        sessions.retain(|_, exp| *exp > now);
        sessions.insert(sid, expires_at);
        Ok(())
    }

    fn is_live(&self, sid: &str, now: u64) -> Result<bool, AuthError> {
        let sessions = self.sessions.read().map_err(|_| poisoned())?;
        Ok(sessions.get(sid).is_some_and(|exp| *exp > now))
    }

    fn revoke(&self, sid: &str) -> Result<bool, AuthError> {
        let mut sessions = self.sessions.write().map_err(|_| poisoned())?;
        Ok(sessions.remove(sid).is_some())
    }
}

fn poisoned() -> AuthError {
    AuthError::Internal("Session registry lock poisoned".into())
}

pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
    sessions: SessionRegistry,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Session expired or revoked")]
    SessionEnded,
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    code: u16,
    message: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    sid: String,
    name: String,
    acct: String,
    exp: usize,
    iat: usize,
}

/// Identity attached to every authenticated request.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub session_id: String,
    pub username: String,
    pub display_name: String,
    pub account_number: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub account_number: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserSession,
}

impl AuthManager {
    pub fn new(config: &AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(&config.jwt_secret);
        let decoding_key = DecodingKey::from_secret(&config.jwt_secret);
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            encoding_key,
            decoding_key,
            validation,
            token_ttl: config.access_token_ttl,
            sessions: SessionRegistry::default(),
        }
    }

    /// Opens a session for `user` and returns its signed token.
    pub fn issue_token(&self, user: &UserSession) -> Result<String, AuthError> {
        let now = now_since_epoch()?;
        let exp = now + self.token_ttl;
        let sid = Uuid::new_v4().to_string();
        let claims = Claims {
            sub: user.username.clone(),
            sid: sid.clone(),
            name: user.display_name.clone(),
            acct: user.account_number.clone(),
            iat: now.as_secs() as usize,
            exp: exp.as_secs() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))?;
        self.sessions.insert(sid, exp.as_secs(), now.as_secs())?;
        Ok(token)
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthSession, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature
                | jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::Base64(_)
                | jsonwebtoken::errors::ErrorKind::Json(_)
                | jsonwebtoken::errors::ErrorKind::Utf8(_)
                | jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(_) => {
                    AuthError::Unauthorized
                }
                other => AuthError::Internal(format!("Failed to validate token: {other:?}")),
            })?;

        if !self.sessions.is_live(&claims.sid, now_since_epoch()?.as_secs())? {
            return Err(AuthError::SessionEnded);
        }
        Ok(AuthSession {
            session_id: claims.sid,
            username: claims.sub,
            display_name: claims.name,
            account_number: claims.acct,
        })
    }

    pub fn revoke(&self, session_id: &str) -> Result<bool, AuthError> {
        self.sessions.revoke(session_id)
    }

    pub fn expires_in(&self) -> Duration {
        self.token_ttl
    }
}

fn now_since_epoch() -> Result<Duration, AuthError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AuthError::Internal("System clock is before UNIX_EPOCH".into()))
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::Unauthorized | AuthError::SessionEnded => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            AuthError::Internal(msg) => {
                tracing::error!("Authentication failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        let body = Json(AuthErrorBody {
            code: status.as_u16(),
            message,
        });
        (status, body).into_response()
    }
}

pub fn decode_secret_key(raw: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("JWT secret cannot be empty");
    }
    let decoded = match BASE64.decode(trimmed) {
        Ok(bytes) => bytes,
        Err(_) if trimmed.len() == 32 => trimmed.as_bytes().to_vec(),
        Err(_) => {
            anyhow::bail!("JWT secret must be base64 encoded or a 32-byte ASCII string")
        }
    };

    if decoded.len() != 32 {
        anyhow::bail!("JWT secret must decode to exactly 32 bytes");
    }

    Ok(decoded)
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(form): Json<RegistrationForm>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state.user_service.register(form).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let session = state
        .user_service
        .login(&payload.account_number, &payload.password)
        .await?;
    let token = state.auth.issue_token(&session)?;
    tracing::info!("User '{}' logged in", session.username);
    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.auth.expires_in().as_secs(),
        user: session,
    }))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
) -> ApiResult<StatusCode> {
    state.auth.revoke(&session.session_id)?;
    tracing::info!("User '{}' logged out", session.username);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::Unauthorized)?;

    let mut parts = header.splitn(2, ' ');
    let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
        return Err(AuthError::Unauthorized);
    };

    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AuthError::Unauthorized);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::Unauthorized);
    }

    let session = state.auth.validate_token(token)?;
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(ttl: Duration) -> AuthManager {
        AuthManager::new(&AuthConfig {
            jwt_secret: vec![7u8; 32],
            access_token_ttl: ttl,
        })
    }

    fn session() -> UserSession {
        UserSession {
            username: "ana_souza".to_string(),
            display_name: "Ana Souza".to_string(),
            account_number: "123456-7".to_string(),
        }
    }

    #[test]
    fn issued_token_round_trips_identity() {
        let auth = manager(Duration::from_secs(60));
        let token = auth.issue_token(&session()).unwrap();
        let validated = auth.validate_token(&token).unwrap();
        assert_eq!(validated.username, "ana_souza");
        assert_eq!(validated.display_name, "Ana Souza");
        assert_eq!(validated.account_number, "123456-7");
    }

    #[test]
    fn revoked_session_is_rejected() {
        let auth = manager(Duration::from_secs(60));
        let token = auth.issue_token(&session()).unwrap();
        let validated = auth.validate_token(&token).unwrap();
        assert!(auth.revoke(&validated.session_id).unwrap());
        assert!(matches!(
            auth.validate_token(&token),
            Err(AuthError::SessionEnded)
        ));
    }

    #[test]
    fn token_from_other_key_is_rejected() {
        let auth = manager(Duration::from_secs(60));
        let other = AuthManager::new(&AuthConfig {
            jwt_secret: vec![9u8; 32],
            access_token_ttl: Duration::from_secs(60),
        });
        let token = other.issue_token(&session()).unwrap();
        assert!(matches!(
            auth.validate_token(&token),
            Err(AuthError::Unauthorized)
        ));
        assert!(matches!(
            auth.validate_token("garbage"),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn secret_key_formats() {
        assert_eq!(decode_secret_key(&BASE64.encode([1u8; 32])).unwrap(), vec![1u8; 32]);
        assert_eq!(
            decode_secret_key("abcdefghijklmnopqrstuvwxyz01234!").unwrap().len(),
            32
        );
        assert!(decode_secret_key("short").is_err());
        assert!(decode_secret_key("  ").is_err());
    }
}
