//! Translation of broker call failures into HTTP errors.

use axum_helpers::AppError;
use messaging::{ErrorKind, RpcFailure};

/// Map a request/reply failure to the HTTP error the client sees.
///
/// Domain errors carry their own kind and message; transport problems
/// (timeout, broker down, undecodable reply) never leak detail and surface
/// as a generic 5xx.
pub fn map_rpc_failure(failure: RpcFailure) -> AppError {
    match failure {
        RpcFailure::Domain(err) => match err.kind {
            ErrorKind::Validation => AppError::BadRequest(err.message),
            ErrorKind::Unauthorized => AppError::Unauthorized(err.message),
            ErrorKind::Conflict => AppError::Conflict(err.message),
            ErrorKind::NotFound => AppError::NotFound(err.message),
            ErrorKind::Internal => AppError::InternalServerError(err.message),
        },
        RpcFailure::Timeout { subject, timeout } => {
            tracing::error!(subject = %subject, ?timeout, "Service call timed out");
            AppError::ServiceUnavailable("Service did not respond in time".to_string())
        }
        RpcFailure::Transport(detail) => {
            tracing::error!(detail = %detail, "Broker transport failure");
            AppError::ServiceUnavailable("Service temporarily unavailable".to_string())
        }
        RpcFailure::Decode(detail) => {
            tracing::error!(detail = %detail, "Undecodable service reply");
            AppError::InternalServerError("Invalid service reply".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use messaging::RpcError;
    use std::time::Duration;

    fn status_of(failure: RpcFailure) -> StatusCode {
        map_rpc_failure(failure).into_response().status()
    }

    #[test]
    fn test_domain_kinds_map_to_their_statuses() {
        let cases = [
            (RpcError::validation("bad input"), StatusCode::BAD_REQUEST),
            (
                RpcError::unauthorized("invalid credentials"),
                StatusCode::UNAUTHORIZED,
            ),
            (RpcError::conflict("duplicate"), StatusCode::CONFLICT),
            (RpcError::not_found("missing"), StatusCode::NOT_FOUND),
            (
                RpcError::internal("boom"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(status_of(RpcFailure::Domain(err)), expected);
        }
    }

    #[test]
    fn test_timeout_maps_to_service_unavailable() {
        let failure = RpcFailure::Timeout {
            subject: "find_all_tasks".to_string(),
            timeout: Duration::from_secs(5),
        };
        assert_eq!(status_of(failure), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_transport_failure_maps_to_service_unavailable() {
        let failure = RpcFailure::Transport("connection reset".to_string());
        assert_eq!(status_of(failure), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_decode_failure_maps_to_internal_error() {
        let failure = RpcFailure::Decode("unexpected shape".to_string());
        assert_eq!(status_of(failure), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
