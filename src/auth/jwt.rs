use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::auth::claims::Claims;
use crate::auth::repo::User;
use crate::config::JwtConfig;
use crate::state::AppState;

/// Verification failures. Both collapse to a generic unauthorized response at
/// the guard; the distinction exists for logging.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is not valid")]
    Invalid,
    #[error("token has expired")]
    Expired,
}

/// Signing and verification keys derived from the startup config.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig { secret, ttl_minutes } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::from_secs((ttl_minutes as u64) * 60),
        }
    }
}

impl JwtKeys {
    /// Issue a token for the user, expiring exactly one TTL from now.
    pub fn sign(&self, user: &User) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user.id, "jwt signed");
        Ok(token)
    }

    /// Decode and validate a token. Structurally malformed input is rejected
    /// before any signature work.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        if token.split('.').count() != 3 {
            return Err(TokenError::Invalid);
        }
        match decode::<Claims>(token, &self.decoding, &Validation::default()) {
            Ok(data) => {
                debug!(user_id = %data.claims.sub, "jwt verified");
                Ok(data.claims)
            }
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => Err(TokenError::Expired),
            Err(_) => Err(TokenError::Invalid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn make_keys() -> JwtKeys {
        JwtKeys::from_ref(&AppState::fake())
    }

    fn make_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "ada@example.com".into(),
            name: "Ada".into(),
            password_hash: "unused".into(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[tokio::test]
    async fn sign_then_verify_round_trips_the_claims() {
        let keys = make_keys();
        let user = make_user();
        let token = keys.sign(&user).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.name, user.name);
    }

    #[tokio::test]
    async fn expiry_is_exactly_the_configured_ttl() {
        let keys = make_keys();
        let token = keys.sign(&make_user()).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.exp - claims.iat, 60 * 60);
    }

    #[tokio::test]
    async fn expired_token_is_rejected_as_expired() {
        let keys = make_keys();
        let now = OffsetDateTime::now_utc().unix_timestamp();
        // Expired beyond jsonwebtoken's default leeway.
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "ada@example.com".into(),
            name: "Ada".into(),
            iat: (now - 7200) as usize,
            exp: (now - 3600) as usize,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).expect("encode");
        assert_eq!(keys.verify(&token), Err(TokenError::Expired));
    }

    #[tokio::test]
    async fn tampered_signature_is_rejected_as_invalid() {
        let keys = make_keys();
        let token = keys.sign(&make_user()).expect("sign");
        let dot = token.rfind('.').expect("jwt has a signature segment");
        let mut tampered: Vec<char> = token.chars().collect();
        // Flip the first signature character to a different base64url symbol.
        tampered[dot + 1] = if tampered[dot + 1] == 'A' { 'B' } else { 'A' };
        let tampered: String = tampered.into_iter().collect();
        assert_eq!(keys.verify(&tampered), Err(TokenError::Invalid));
    }

    #[tokio::test]
    async fn token_signed_with_another_secret_is_rejected() {
        let keys = make_keys();
        let other = JwtKeys {
            encoding: EncodingKey::from_secret(b"some-other-secret"),
            decoding: DecodingKey::from_secret(b"some-other-secret"),
            ttl: Duration::from_secs(3600),
        };
        let token = other.sign(&make_user()).expect("sign");
        assert_eq!(keys.verify(&token), Err(TokenError::Invalid));
    }

    #[tokio::test]
    async fn malformed_structure_is_rejected_before_signature_checks() {
        let keys = make_keys();
        assert_eq!(keys.verify("garbage"), Err(TokenError::Invalid));
        assert_eq!(keys.verify("only.two"), Err(TokenError::Invalid));
        assert_eq!(keys.verify(""), Err(TokenError::Invalid));
    }
}
