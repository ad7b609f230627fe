//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 모든 API 핸들러에서 공유되는 상태를 관리합니다.
//! 내부 리소스는 Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다.

use std::sync::Arc;

use duckdam_core::config::AuthConfig;

use crate::auth::{PrincipalResolver, TokenProvider};
use crate::repository::UserRepository;

/// 애플리케이션 공유 상태.
///
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 토큰 발급/검증기
    pub tokens: TokenProvider,

    /// 사용자 저장소
    pub users: Arc<UserRepository>,

    /// 주체 해석기.
    ///
    /// 기본 구현은 사용자 저장소 자신이지만, 외부 저장소를 쓰는
    /// 배포에서는 이 필드만 교체하면 됩니다.
    pub resolver: Arc<dyn PrincipalResolver>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    ///
    /// # Arguments
    ///
    /// * `config` - 토큰 발급에 사용할 인증 설정
    pub fn new(config: &AuthConfig) -> Self {
        let users = Arc::new(UserRepository::new());
        let resolver: Arc<dyn PrincipalResolver> = users.clone();

        Self {
            tokens: TokenProvider::from_config(config),
            users,
            resolver,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 주체 해석기 교체.
    pub fn with_resolver(mut self, resolver: Arc<dyn PrincipalResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }
}

/// 테스트용 AppState 생성 헬퍼.
///
/// 고정된 서명 키와 기본 TTL로 상태를 생성합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    let config = AuthConfig {
        secret: "test-secret-key-for-jwt-testing-minimum-32-chars".to_string(),
        access_ttl_secs: 600,
        refresh_ttl_secs: 7_776_000,
    };

    AppState::new(&config)
}
