//! REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API
//! - JWT 기반 무상태 인증 (Access + Refresh 토큰 쌍)
//! - 역할 기반 접근 제어
//! - 메모리 기반 사용자 저장소
//! - 헬스 체크 엔드포인트
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: JWT 발급/검증, 인증 미들웨어, 역할 검사
//! - [`repository`]: 사용자 저장소
//! - [`error`]: HTTP 에러 경계

pub mod auth;
pub mod error;
pub mod repository;
pub mod routes;
pub mod state;

pub use auth::{
    authenticate, hash_password, require_role, verify_password, AuthenticatedUser, Claims,
    CurrentUser, PrincipalResolver, TokenPair, TokenProvider,
};
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use repository::{NewUser, UserRepository};
pub use routes::*;
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::create_test_state;
