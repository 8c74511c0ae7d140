use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use scout::errors::BridgeError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A bridge failure on its way out as an HTTP response
#[derive(Debug)]
pub struct ApiError(pub BridgeError);

impl From<BridgeError> for ApiError {
    fn from(err: BridgeError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            BridgeError::NotInitialized | BridgeError::Initialization(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            BridgeError::Invocation(_) => StatusCode::BAD_GATEWAY,
            BridgeError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(%status, "{}", self.0);
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (BridgeError::NotInitialized, StatusCode::SERVICE_UNAVAILABLE),
            (
                BridgeError::Initialization("bad key".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                BridgeError::Invocation("stream closed".to_string()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                BridgeError::Timeout(Duration::from_secs(30)),
                StatusCode::GATEWAY_TIMEOUT,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }
}
