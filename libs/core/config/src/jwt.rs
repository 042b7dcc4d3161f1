use crate::{ConfigError, FromEnv, env_required};

/// JWT signing configuration.
///
/// Access and refresh tokens are signed with distinct secrets so a leaked
/// refresh secret cannot be used to mint access tokens and vice versa.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
}

impl FromEnv for JwtConfig {
    /// Requires JWT_ACCESS_SECRET and JWT_REFRESH_SECRET to be set
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            access_secret: env_required("JWT_ACCESS_SECRET")?,
            refresh_secret: env_required("JWT_REFRESH_SECRET")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_from_env() {
        temp_env::with_vars(
            [
                ("JWT_ACCESS_SECRET", Some("access-secret")),
                ("JWT_REFRESH_SECRET", Some("refresh-secret")),
            ],
            || {
                let config = JwtConfig::from_env().unwrap();
                assert_eq!(config.access_secret, "access-secret");
                assert_eq!(config.refresh_secret, "refresh-secret");
            },
        );
    }

    #[test]
    fn test_jwt_config_missing_secret() {
        temp_env::with_vars(
            [
                ("JWT_ACCESS_SECRET", Some("access-secret")),
                ("JWT_REFRESH_SECRET", None),
            ],
            || {
                let config = JwtConfig::from_env();
                assert!(config.is_err());
            },
        );
    }
}
