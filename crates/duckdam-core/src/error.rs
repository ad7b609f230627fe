//! 덕담 서비스의 에러 타입.
//!
//! 이 모듈은 서비스 전반에서 사용되는 에러 타입을 정의합니다.
//! 각 에러 분류는 API 경계에서 고정된 HTTP 상태 코드로 변환됩니다.

use thiserror::Error;

/// 핵심 서비스 에러.
#[derive(Debug, Error)]
pub enum DuckdamError {
    /// 인증 실패 (401)
    #[error("인증 에러: {0}")]
    Unauthorized(String),

    /// 권한 부족 (403)
    #[error("권한 에러: {0}")]
    Forbidden(String),

    /// 리소스 없음 (404)
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 중복 리소스 (409)
    #[error("중복 에러: {0}")]
    Conflict(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 서비스 작업을 위한 Result 타입.
pub type DuckdamResult<T> = Result<T, DuckdamError>;

impl DuckdamError {
    /// 분류 접두사를 제외한 원본 메시지를 반환합니다.
    pub fn message(&self) -> &str {
        match self {
            DuckdamError::Unauthorized(msg)
            | DuckdamError::Forbidden(msg)
            | DuckdamError::NotFound(msg)
            | DuckdamError::Conflict(msg)
            | DuckdamError::Config(msg)
            | DuckdamError::Serialization(msg)
            | DuckdamError::Internal(msg) => msg,
        }
    }

    /// 클라이언트 측 에러인지 확인합니다.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DuckdamError::Unauthorized(_)
                | DuckdamError::Forbidden(_)
                | DuckdamError::NotFound(_)
                | DuckdamError::Conflict(_)
        )
    }
}

impl From<serde_json::Error> for DuckdamError {
    fn from(err: serde_json::Error) -> Self {
        DuckdamError::Serialization(err.to_string())
    }
}
