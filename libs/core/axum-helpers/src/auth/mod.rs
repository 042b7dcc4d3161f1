pub mod extractor;
pub mod jwt;

pub use extractor::AuthUser;
pub use jwt::{ACCESS_TOKEN_TTL, JwtAuth, JwtClaims, REFRESH_TOKEN_TTL, TokenPair};
