//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `POST /user/register` - 회원 가입
//! - `POST /user/login` - 로그인 (토큰 쌍 발급)
//! - `POST /user/refresh` - 토큰 재발급
//! - `GET /user/me` - 내 정보 조회 (인증 필요)
//! - `GET /users/{query}` - 사용자 검색 (ROLE_USER 필요)

pub mod health;
pub mod users;

pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use users::{
    users_router, LoginRequest, LoginResponse, RefreshRequest, RegisterRequest, UserResponse,
};

use axum::Router;

use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
/// 인증 미들웨어와 trace/timeout/cors 계층은 호출 측에서
/// 상태와 함께 적용합니다.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/health", health_router())
        .merge(users_router())
}
