//! Gateway-originated error responses.
//!
//! Every error the gateway itself produces uses one JSON envelope:
//! `{"success": false, "error": {"code": ..., "message": ...}}` with a
//! machine-stable code, regardless of which stage rejected the request.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::routing::ServiceName;

/// Errors the gateway answers on behalf of the pipeline.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("Rate limit exceeded. Please try again later.")]
    TooManyRequests,

    #[error("Service {0} is unavailable")]
    BadGateway(ServiceName),

    #[error("Service {0} is temporarily unavailable")]
    ServiceUnavailable(ServiceName),

    #[error("No matching route found")]
    NotFound,

    #[error("An unexpected error occurred")]
    Internal,
}

impl GatewayError {
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Unauthorized(_) => "UNAUTHORIZED",
            GatewayError::TooManyRequests => "TOO_MANY_REQUESTS",
            GatewayError::BadGateway(_) => "BAD_GATEWAY",
            GatewayError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            GatewayError::NotFound => "NOT_FOUND",
            GatewayError::Internal => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            GatewayError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            GatewayError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::NotFound => StatusCode::NOT_FOUND,
            GatewayError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: ErrorDetail {
                code: self.code(),
                message: self.to_string(),
            },
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(GatewayError::Unauthorized("x").code(), "UNAUTHORIZED");
        assert_eq!(GatewayError::TooManyRequests.code(), "TOO_MANY_REQUESTS");
        assert_eq!(GatewayError::BadGateway(ServiceName::User).code(), "BAD_GATEWAY");
        assert_eq!(
            GatewayError::ServiceUnavailable(ServiceName::Content).code(),
            "SERVICE_UNAVAILABLE"
        );
        assert_eq!(GatewayError::Internal.code(), "INTERNAL_SERVER_ERROR");
    }

    #[test]
    fn statuses_match_codes() {
        assert_eq!(GatewayError::TooManyRequests.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            GatewayError::BadGateway(ServiceName::User).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(GatewayError::Internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn messages_name_the_service() {
        let err = GatewayError::BadGateway(ServiceName::Notification);
        assert_eq!(err.to_string(), "Service notification-service is unavailable");
    }
}
