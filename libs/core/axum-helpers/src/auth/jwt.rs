use chrono::{Duration, Utc};
use core_config::jwt::JwtConfig;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// JWT token time-to-live constants
pub const ACCESS_TOKEN_TTL: i64 = 900; // 15 minutes
pub const REFRESH_TOKEN_TTL: i64 = 604800; // 7 days

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,   // Subject (user ID)
    pub email: String, // User email
    pub name: String,  // User name
    pub exp: i64,      // Expiration time
    pub iat: i64,      // Issued at
    pub jti: String,   // JWT ID
}

/// Access + refresh token pair returned by login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Stateless JWT authentication.
///
/// Access and refresh tokens are signed with separate secrets, so a refresh
/// token can never be presented as an access token or vice versa. Verification
/// needs no shared state, which lets the gateway validate tokens locally.
#[derive(Clone)]
pub struct JwtAuth {
    access_secret: String,
    refresh_secret: String,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            access_secret: config.access_secret.clone(),
            refresh_secret: config.refresh_secret.clone(),
        }
    }

    /// Create an access + refresh token pair for a user
    pub fn create_token_pair(
        &self,
        user_id: &str,
        email: &str,
        name: &str,
    ) -> eyre::Result<TokenPair> {
        Ok(TokenPair {
            access_token: self.create_token(
                user_id,
                email,
                name,
                ACCESS_TOKEN_TTL,
                &self.access_secret,
            )?,
            refresh_token: self.create_token(
                user_id,
                email,
                name,
                REFRESH_TOKEN_TTL,
                &self.refresh_secret,
            )?,
        })
    }

    /// Create a fresh access token, used when honoring a refresh token
    pub fn create_access_token(
        &self,
        user_id: &str,
        email: &str,
        name: &str,
    ) -> eyre::Result<String> {
        self.create_token(user_id, email, name, ACCESS_TOKEN_TTL, &self.access_secret)
    }

    /// Verify an access token signature and decode claims
    pub fn verify_access_token(&self, token: &str) -> eyre::Result<JwtClaims> {
        Self::verify(token, &self.access_secret)
    }

    /// Verify a refresh token signature and decode claims
    pub fn verify_refresh_token(&self, token: &str) -> eyre::Result<JwtClaims> {
        Self::verify(token, &self.refresh_secret)
    }

    fn create_token(
        &self,
        user_id: &str,
        email: &str,
        name: &str,
        ttl_seconds: i64,
        secret: &str,
    ) -> eyre::Result<String> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let header = Header {
            alg: jsonwebtoken::Algorithm::HS256,
            ..Default::default()
        };

        let token = encode(&header, &claims, &EncodingKey::from_secret(secret.as_bytes()))?;
        Ok(token)
    }

    fn verify(token: &str, secret: &str) -> eyre::Result<JwtClaims> {
        let token_data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> JwtAuth {
        JwtAuth {
            access_secret: "access-secret-for-tests".to_string(),
            refresh_secret: "refresh-secret-for-tests".to_string(),
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let auth = auth();
        let pair = auth
            .create_token_pair("user-1", "a@example.com", "Alice")
            .unwrap();

        let claims = auth.verify_access_token(&pair.access_token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.name, "Alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let auth = auth();
        let pair = auth
            .create_token_pair("user-1", "a@example.com", "Alice")
            .unwrap();

        assert!(auth.verify_access_token(&pair.refresh_token).is_err());
        assert!(auth.verify_refresh_token(&pair.access_token).is_err());
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let auth = auth();
        let pair = auth
            .create_token_pair("user-1", "a@example.com", "Alice")
            .unwrap();

        let mut tampered = pair.access_token.clone();
        tampered.pop();
        tampered.push('x');

        assert!(auth.verify_access_token(&tampered).is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issuer = auth();
        let pair = issuer
            .create_token_pair("user-1", "a@example.com", "Alice")
            .unwrap();

        let verifier = JwtAuth {
            access_secret: "some-other-secret".to_string(),
            refresh_secret: "another-secret".to_string(),
        };

        assert!(verifier.verify_access_token(&pair.access_token).is_err());
    }
}
