use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

use bookshelf_kernel::settings::AuthSettings;

/// Claims carried by the session token. The `userId` claim is the only
/// identity source for ownership-sensitive operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("missing token credential")]
    MissingToken,

    #[error("invalid token credential")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

/// Verifies (and, for the issuing party, signs) HS256 session tokens.
#[derive(Clone)]
pub struct TokenVerifier {
    inner: Arc<Inner>,
}

struct Inner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    cookie_name: String,
}

impl TokenVerifier {
    pub fn new(settings: &AuthSettings) -> Self {
        let secret = settings.jwt_secret.as_bytes();

        Self {
            inner: Arc::new(Inner {
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
                validation: Validation::default(),
                cookie_name: settings.token_cookie.clone(),
            }),
        }
    }

    /// Name of the cookie the token is carried in.
    pub fn cookie_name(&self) -> &str {
        &self.inner.cookie_name
    }

    /// Sign a token for the given user, valid for `ttl` from now.
    pub fn sign(&self, user_id: i64, ttl: Duration) -> Result<String, AuthError> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            user_id,
            iat: now,
            exp: now + ttl.as_secs() as i64,
        };

        Ok(encode(&Header::default(), &claims, &self.inner.encoding)?)
    }

    /// Verify signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.inner.decoding, &self.inner.validation)?;
        Ok(data.claims)
    }
}
