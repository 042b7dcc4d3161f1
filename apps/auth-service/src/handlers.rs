//! Broker command dispatch for the auth service.

use async_trait::async_trait;
use domain_users::{
    LoginRequest, RefreshRequest, RegisterRequest, UserRepository, UserService,
};
use messaging::{CommandHandler, RpcError, subjects};
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Routes auth command subjects to the user service.
pub struct AuthCommandHandler<R: UserRepository> {
    service: UserService<R>,
}

impl<R: UserRepository> AuthCommandHandler<R> {
    pub fn new(service: UserService<R>) -> Self {
        Self { service }
    }
}

/// Decode a JSON command payload, reporting malformed input as a
/// validation error.
fn decode<T: DeserializeOwned>(payload: &[u8]) -> Result<T, RpcError> {
    serde_json::from_slice(payload).map_err(|e| RpcError::validation(format!("Invalid payload: {e}")))
}

/// `get_user_by_id` carries the id as a bare JSON string, not an object.
fn decode_id(payload: &[u8]) -> Result<Uuid, RpcError> {
    decode::<Uuid>(payload)
}

#[async_trait]
impl<R: UserRepository + 'static> CommandHandler for AuthCommandHandler<R> {
    async fn handle(&self, subject: &str, payload: &[u8]) -> Result<serde_json::Value, RpcError> {
        let reply = match subject {
            subjects::REGISTER => {
                let request: RegisterRequest = decode(payload)?;
                serde_json::to_value(self.service.register(request).await?)
            }
            subjects::LOGIN => {
                let request: LoginRequest = decode(payload)?;
                serde_json::to_value(self.service.login(request).await?)
            }
            subjects::REFRESH_TOKEN => {
                let request: RefreshRequest = decode(payload)?;
                serde_json::to_value(self.service.refresh_token(request).await?)
            }
            subjects::GET_USER_BY_ID => {
                let id = decode_id(payload)?;
                serde_json::to_value(self.service.get_user(id).await?)
            }
            subjects::GET_ALL_USERS => serde_json::to_value(self.service.list_users().await?),
            other => {
                return Err(RpcError::internal(format!("Unhandled command: {other}")));
            }
        };

        reply.map_err(|e| RpcError::internal(format!("Failed to encode reply: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_id_accepts_bare_json_string() {
        let id = Uuid::new_v4();
        let payload = serde_json::to_vec(&id.to_string()).unwrap();
        assert_eq!(decode_id(&payload).unwrap(), id);
    }

    #[test]
    fn test_decode_id_rejects_non_uuid() {
        let payload = br#""not-a-uuid""#;
        let err = decode_id(payload).unwrap_err();
        assert_eq!(err.kind, messaging::ErrorKind::Validation);
    }

    #[test]
    fn test_decode_reports_malformed_json_as_validation() {
        let err = decode::<RegisterRequest>(b"{not json").unwrap_err();
        assert_eq!(err.kind, messaging::ErrorKind::Validation);
    }
}
