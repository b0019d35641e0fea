use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::auth::claims::Claims;
use crate::auth::jwt::{JwtKeys, TokenError};
use crate::error::AppError;

/// Authenticated principal: the decoded claims of a verified bearer token.
/// Adding this extractor to a handler makes the route protected. No database
/// lookup happens here; signature and expiry are trusted alone, so a deleted
/// user's token stays valid until it expires.
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);

        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let claims = keys.verify(token).map_err(|e| {
            match e {
                TokenError::Expired => warn!("request with expired token"),
                TokenError::Invalid => warn!("request with invalid token"),
            }
            AppError::Unauthorized("Invalid or expired token".into())
        })?;

        Ok(AuthUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo::User;
    use crate::state::AppState;
    use axum::http::{header, Request};
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn make_keys() -> JwtKeys {
        JwtKeys::from_ref(&AppState::fake())
    }

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/auth/users");
        if let Some(v) = value {
            builder = builder.header(header::AUTHORIZATION, v);
        }
        let (parts, ()) = builder.body(()).expect("build request").into_parts();
        parts
    }

    fn signed_token(keys: &JwtKeys) -> (User, String) {
        let user = User {
            id: Uuid::new_v4(),
            email: "ada@example.com".into(),
            name: "Ada".into(),
            password_hash: "unused".into(),
            created_at: OffsetDateTime::now_utc(),
        };
        let token = keys.sign(&user).expect("sign");
        (user, token)
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let keys = make_keys();
        let mut parts = parts_with_auth(None);
        let err = AuthUser::from_request_parts(&mut parts, &keys)
            .await
            .err()
            .expect("should reject");
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_rejected() {
        let keys = make_keys();
        let mut parts = parts_with_auth(Some("Token abcdef"));
        let err = AuthUser::from_request_parts(&mut parts, &keys)
            .await
            .err()
            .expect("should reject");
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn garbage_bearer_token_is_rejected() {
        let keys = make_keys();
        let mut parts = parts_with_auth(Some("Bearer garbage"));
        let err = AuthUser::from_request_parts(&mut parts, &keys)
            .await
            .err()
            .expect("should reject");
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn valid_bearer_token_yields_the_claims() {
        let keys = make_keys();
        let (user, token) = signed_token(&keys);
        let mut parts = parts_with_auth(Some(&format!("Bearer {token}")));
        let AuthUser(claims) = AuthUser::from_request_parts(&mut parts, &keys)
            .await
            .expect("should accept");
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.name, "Ada");
    }
}
