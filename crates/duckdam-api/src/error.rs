//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.
//! 서비스 에러 분류는 고정된 HTTP 상태 코드로 변환됩니다:
//! Unauthorized(401), Forbidden(403), NotFound(404), Conflict(409),
//! 나머지는 모두 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use duckdam_core::error::DuckdamError;

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "statusCode": "401",
///   "statusMessage": "Unauthorized",
///   "message": "Failed when refresh token."
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// HTTP 상태 코드 문자열 (예: "401")
    pub status_code: String,
    /// HTTP 상태 메시지 (예: "Unauthorized")
    pub status_message: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
}

impl ErrorResponse {
    /// 상태 코드와 메시지로 에러 응답 생성.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16().to_string(),
            status_message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message: message.into(),
        }
    }
}

/// 서비스 에러를 HTTP 응답으로 변환하는 래퍼.
///
/// 핸들러는 `?` 연산자로 [`DuckdamError`]를 그대로 흘려보내고,
/// 변환은 이 타입의 [`IntoResponse`] 구현 한 곳에서만 일어납니다.
#[derive(Debug)]
pub struct ApiError(pub DuckdamError);

impl ApiError {
    /// 에러 분류에 대응하는 HTTP 상태 코드.
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DuckdamError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DuckdamError::Forbidden(_) => StatusCode::FORBIDDEN,
            DuckdamError::NotFound(_) => StatusCode::NOT_FOUND,
            DuckdamError::Conflict(_) => StatusCode::CONFLICT,
            DuckdamError::Config(_)
            | DuckdamError::Serialization(_)
            | DuckdamError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DuckdamError> for ApiError {
    fn from(err: DuckdamError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(status = %status, error = %self.0, "Request rejected");
        }

        let body = Json(ErrorResponse::new(status, self.0.message()));
        (status, body).into_response()
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;
