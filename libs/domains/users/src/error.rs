use messaging::RpcError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("Username or email already registered")]
    Duplicate,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired refresh token")]
    InvalidRefreshToken,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        UserError::Database(err.to_string())
    }
}

/// Convert UserError to the wire error envelope at the responder boundary
impl From<UserError> for RpcError {
    fn from(err: UserError) -> Self {
        match &err {
            UserError::NotFound(id) => RpcError::not_found(format!("User {} not found", id)),
            UserError::Duplicate => {
                RpcError::conflict("Username or email already registered".to_string())
            }
            UserError::InvalidCredentials => {
                RpcError::unauthorized("Invalid email or password".to_string())
            }
            UserError::InvalidRefreshToken => {
                RpcError::unauthorized("Invalid or expired refresh token".to_string())
            }
            UserError::Validation(msg) => RpcError::validation(msg.clone()),
            UserError::PasswordHash(msg) => {
                tracing::error!("Password hash error: {}", msg);
                RpcError::internal("An internal error occurred".to_string())
            }
            UserError::Token(msg) => {
                tracing::error!("Token error: {}", msg);
                RpcError::internal("An internal error occurred".to_string())
            }
            UserError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                RpcError::internal("An internal error occurred".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use messaging::ErrorKind;

    #[test]
    fn test_internal_errors_never_leak_detail() {
        let err: RpcError = UserError::Database("password=hunter2".to_string()).into();
        assert_eq!(err.kind, ErrorKind::Internal);
        assert!(!err.message.contains("hunter2"));
    }

    #[test]
    fn test_credential_errors_map_to_unauthorized() {
        let err: RpcError = UserError::InvalidCredentials.into();
        assert_eq!(err.kind, ErrorKind::Unauthorized);

        let err: RpcError = UserError::InvalidRefreshToken.into();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let err: RpcError = UserError::Duplicate.into();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }
}
