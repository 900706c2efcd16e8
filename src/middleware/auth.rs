// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{common::error::AppError, config::AppState};

// Audiência dos tokens de usuários logados no Auth do BaaS
const AUTHENTICATED_AUDIENCE: &str = "authenticated";

// Claims do access token emitido pelo Auth (HS256)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub aud: String,
    pub exp: usize,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[AUTHENTICATED_AUDIENCE]);

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("Token rejeitado: {}", e);
            AppError::InvalidToken
        })
}

// Usuário autenticado, disponível nos handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl AuthenticatedUser {
    pub fn id(&self) -> Uuid {
        self.0.sub
    }

    pub fn email(&self) -> &str {
        self.0.email.as_deref().unwrap_or_default()
    }

    pub fn full_name(&self) -> Option<&str> {
        self.0
            .user_metadata
            .get("full_name")
            .and_then(|v| v.as_str())
    }
}

// O middleware em si: valida o Bearer e guarda o usuário nas extensions
pub async fn auth_guard(
    State(app_state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = request.into_parts();

    let TypedHeader(Authorization(bearer)) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(&mut parts, &app_state)
            .await
            .map_err(|_| AppError::InvalidToken)?;

    let claims = decode_token(bearer.token(), &app_state.jwt_secret)?;
    parts.extensions.insert(AuthenticatedUser(claims));

    Ok(next.run(Request::from_parts(parts, body)).await)
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::InvalidToken)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    pub(crate) const SECRET: &str = "super-secret-jwt-token-for-tests";

    pub(crate) fn mint_token(sub: Uuid, aud: &str, expires_in: Duration, secret: &str) -> String {
        let claims = json!({
            "sub": sub,
            "aud": aud,
            "exp": (Utc::now() + expires_in).timestamp(),
            "email": "caja1@tienda.com",
            "role": "authenticated",
            "user_metadata": { "full_name": "Caja Uno" },
        });
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn test_valid_token() {
        let id = Uuid::new_v4();
        let token = mint_token(id, "authenticated", Duration::minutes(5), SECRET);

        let user = AuthenticatedUser(decode_token(&token, SECRET).unwrap());
        assert_eq!(user.id(), id);
        assert_eq!(user.email(), "caja1@tienda.com");
        assert_eq!(user.full_name(), Some("Caja Uno"));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = mint_token(Uuid::new_v4(), "authenticated", Duration::minutes(5), "outro-segredo");
        assert!(matches!(decode_token(&token, SECRET), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_wrong_audience_is_rejected() {
        let token = mint_token(Uuid::new_v4(), "anon", Duration::minutes(5), SECRET);
        assert!(matches!(decode_token(&token, SECRET), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = mint_token(Uuid::new_v4(), "authenticated", Duration::minutes(-10), SECRET);
        assert!(matches!(decode_token(&token, SECRET), Err(AppError::InvalidToken)));
    }
}
