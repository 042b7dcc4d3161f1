//! Request extractor for the authenticated user.

use super::jwt::JwtAuth;
use crate::errors::AppError;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, request::Parts},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// The authenticated caller, extracted from a `Bearer` access token.
///
/// Handlers that take an `AuthUser` reject unauthenticated requests with 401
/// before the handler body runs. The user id always comes from the verified
/// token, never from the request body.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

/// Extract a bearer token from the Authorization header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
}

impl<S> FromRequestParts<S> for AuthUser
where
    JwtAuth: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = JwtAuth::from_ref(state);

        let token = bearer_token(&parts.headers).ok_or_else(|| {
            AppError::Unauthorized("No token provided".to_string()).into_response()
        })?;

        let claims = auth.verify_access_token(token).map_err(|e| {
            tracing::debug!("Access token verification failed: {}", e);
            AppError::Unauthorized("Invalid token".to_string()).into_response()
        })?;

        let id = Uuid::parse_str(&claims.sub).map_err(|_| {
            AppError::Unauthorized("Invalid token subject".to_string()).into_response()
        })?;

        Ok(AuthUser {
            id,
            email: claims.email,
            name: claims.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_missing_and_malformed_headers() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Basic dXNlcg==".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }

    #[tokio::test]
    async fn test_rejects_request_without_token() {
        let auth = JwtAuth::new(&core_config::jwt::JwtConfig {
            access_secret: "access".to_string(),
            refresh_secret: "refresh".to_string(),
        });

        let request = Request::builder().uri("/api/tasks").body(()).unwrap();
        let (mut parts, _) = request.into_parts();

        let result = AuthUser::from_request_parts(&mut parts, &auth).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_accepts_valid_access_token() {
        let auth = JwtAuth::new(&core_config::jwt::JwtConfig {
            access_secret: "access".to_string(),
            refresh_secret: "refresh".to_string(),
        });
        let user_id = Uuid::new_v4();
        let pair = auth
            .create_token_pair(&user_id.to_string(), "a@example.com", "Alice")
            .unwrap();

        let request = Request::builder()
            .uri("/api/tasks")
            .header("authorization", format!("Bearer {}", pair.access_token))
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let user = AuthUser::from_request_parts(&mut parts, &auth)
            .await
            .unwrap();
        assert_eq!(user.id, user_id);
        assert_eq!(user.email, "a@example.com");
    }
}
