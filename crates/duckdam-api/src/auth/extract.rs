//! Authorization 헤더에서 Bearer 토큰 추출.
//!
//! `Authorization: Bearer <token>` 규약을 적용합니다. 헤더 이름
//! 조회는 항상 대소문자를 구분하지 않습니다.

use axum::http::HeaderMap;

use duckdam_core::error::{DuckdamError, DuckdamResult};

/// 토큰을 담는 요청 헤더 이름.
pub const AUTH_HEADER: &str = "authorization";
/// Bearer 스킴 접두사 (대소문자 구분).
pub const TOKEN_PREFIX: &str = "Bearer";

/// 요청 헤더에서 Bearer 토큰을 추출합니다.
///
/// 헤더가 없거나 값이 `Bearer`로 시작하지 않으면 동일한
/// Unauthorized 에러로 실패합니다. 접두사를 제거한 뒤 양쪽
/// 공백을 정리한 토큰 본문을 반환합니다.
pub fn bearer_token(headers: &HeaderMap) -> DuckdamResult<String> {
    let value = headers
        .get(AUTH_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(missing_token_error)?;

    match value.strip_prefix(TOKEN_PREFIX) {
        Some(body) => Ok(body.trim().to_string()),
        None => Err(missing_token_error()),
    }
}

/// 요청 헤더에서 Bearer 토큰을 추출하되 실패를 `None`으로 돌려줍니다.
///
/// 토큰이 없어도 요청을 거절하지 않는 미들웨어 경로에서 사용합니다.
pub fn maybe_bearer_token(headers: &HeaderMap) -> Option<String> {
    bearer_token(headers).ok()
}

fn missing_token_error() -> DuckdamError {
    DuckdamError::Unauthorized(format!(
        "JWT Token must be included in header {AUTH_HEADER}"
    ))
}
