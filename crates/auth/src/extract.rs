use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header, request::Parts};

use bookshelf_http::error::AppError;

use crate::token::TokenVerifier;

/// Authenticated user id, extracted from the signed session token.
///
/// Looks for the token in the session cookie first, then falls back to an
/// `Authorization: Bearer` header. Any failure (missing token, bad signature,
/// expired) rejects with a 401 and the handler never runs.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i64,
}

impl<S> FromRequestParts<S> for AuthUser
where
    TokenVerifier: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verifier = TokenVerifier::from_ref(state);

        let token = token_from_cookie(parts, verifier.cookie_name())
            .or_else(|| token_from_bearer(parts))
            .ok_or_else(|| AppError::unauthorized("Unauthorized"))?;

        let claims = verifier.verify(&token).map_err(|err| {
            tracing::debug!(error = %err, "token verification failed");
            AppError::unauthorized("Unauthorized")
        })?;

        Ok(AuthUser {
            user_id: claims.user_id,
        })
    }
}

fn token_from_cookie(parts: &Parts, cookie_name: &str) -> Option<String> {
    let header = parts.headers.get(header::COOKIE)?.to_str().ok()?;

    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == cookie_name).then(|| value.to_string())
    })
}

fn token_from_bearer(parts: &Parts) -> Option<String> {
    let header = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?;
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::Request;

    use bookshelf_kernel::settings::AuthSettings;

    use super::*;

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(&AuthSettings {
            jwt_secret: "test-secret".to_string(),
            ..AuthSettings::default()
        })
    }

    fn parts_with_header(name: header::HeaderName, value: String) -> Parts {
        let (parts, _) = Request::builder()
            .header(name, value)
            .body(Body::empty())
            .unwrap()
            .into_parts();
        parts
    }

    #[tokio::test]
    async fn valid_cookie_token_yields_user_id() {
        let verifier = verifier();
        let token = verifier.sign(42, Duration::from_secs(3600)).unwrap();
        let mut parts = parts_with_header(header::COOKIE, format!("token={token}"));

        let user = AuthUser::from_request_parts(&mut parts, &verifier)
            .await
            .unwrap();
        assert_eq!(user.user_id, 42);
    }

    #[tokio::test]
    async fn cookie_is_found_among_other_cookies() {
        let verifier = verifier();
        let token = verifier.sign(7, Duration::from_secs(3600)).unwrap();
        let mut parts = parts_with_header(
            header::COOKIE,
            format!("theme=dark; token={token}; lang=en"),
        );

        let user = AuthUser::from_request_parts(&mut parts, &verifier)
            .await
            .unwrap();
        assert_eq!(user.user_id, 7);
    }

    #[tokio::test]
    async fn bearer_header_is_a_fallback() {
        let verifier = verifier();
        let token = verifier.sign(9, Duration::from_secs(3600)).unwrap();
        let mut parts = parts_with_header(header::AUTHORIZATION, format!("Bearer {token}"));

        let user = AuthUser::from_request_parts(&mut parts, &verifier)
            .await
            .unwrap();
        assert_eq!(user.user_id, 9);
    }

    #[tokio::test]
    async fn missing_token_is_rejected() {
        let verifier = verifier();
        let (mut parts, _) = Request::builder().body(Body::empty()).unwrap().into_parts();

        let result = AuthUser::from_request_parts(&mut parts, &verifier).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn garbage_cookie_token_is_rejected() {
        let verifier = verifier();
        let mut parts = parts_with_header(header::COOKIE, "token=not-a-token".to_string());

        let result = AuthUser::from_request_parts(&mut parts, &verifier).await;
        assert!(result.is_err());
    }
}
