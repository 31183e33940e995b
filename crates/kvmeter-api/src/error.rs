use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use kvmeter_common::error::KvmeterError;

pub struct ApiError(pub KvmeterError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            KvmeterError::KeyNotFound(_) => (StatusCode::NOT_FOUND, "Key not found".to_string()),
            KvmeterError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()),
        };

        (
            status,
            Json(serde_json::json!({
                "code": self.0.error_code(),
                "error": message,
            })),
        )
            .into_response()
    }
}

impl From<KvmeterError> for ApiError {
    fn from(err: KvmeterError) -> Self {
        ApiError(err)
    }
}
