use crate::errors::AppError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// `AppError` as an HTTP response with a `{ "error": message }` body.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::InspectionClosed(_) | AppError::InvalidTransition { .. } => {
                StatusCode::CONFLICT
            }
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, status = status.as_u16(), "request rejected");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_status_codes() {
        assert_eq!(
            ApiError(AppError::not_found("Inspection", "1")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(AppError::Validation("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(AppError::InspectionClosed("1".into())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError(AppError::Other("boom".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
