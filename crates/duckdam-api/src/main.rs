//! duckdam 인증 API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다.
//! 회원 가입, 로그인, 토큰 재발급, 사용자 검색 등의 엔드포인트를 제공합니다.

use std::time::Duration;

use axum::{http::StatusCode, middleware, Router};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use duckdam_api::auth::authenticate;
use duckdam_api::routes::create_api_router;
use duckdam_api::state::AppState;
use duckdam_core::config::AppConfig;
use duckdam_core::logging::{init_logging, LogConfig};

/// 설정 로드.
///
/// `config/default.toml`이 있으면 파일 + 환경 변수로, 없으면
/// 환경 변수(`DUCKDAM__` 접두사)만으로 로드합니다.
fn load_config() -> Result<AppConfig, config::ConfigError> {
    match AppConfig::load_default() {
        Ok(config) => Ok(config),
        Err(_) => AppConfig::from_env(),
    }
}

/// CORS 미들웨어 구성.
///
/// CORS_ORIGINS 환경변수가 설정되어 있으면 해당 origin만 허용합니다.
/// 설정되지 않으면 개발 모드로 간주하여 모든 origin을 허용합니다.
///
/// # 환경변수
///
/// - `CORS_ORIGINS`: 쉼표로 구분된 허용 origin 목록
///   예: `https://app.example.com,https://admin.example.com`
fn cors_layer() -> CorsLayer {
    let allow_origin = match std::env::var("CORS_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                warn!("CORS_ORIGINS is set but contains no valid origins, allowing any");
                AllowOrigin::any()
            } else {
                info!("CORS configured with {} allowed origins", origins.len());
                AllowOrigin::list(origins)
            }
        }
        _ => {
            warn!("CORS_ORIGINS not set, allowing any origin (development mode)");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(std::env::var("CORS_ORIGINS").is_ok())
        .max_age(Duration::from_secs(3600))
}

/// 전체 라우터 생성.
///
/// API 라우터에 인증 미들웨어와 trace/timeout/cors 계층을 적용합니다.
fn create_router(state: AppState) -> Router {
    create_api_router()
        // 인증 미들웨어 (모든 요청에 적용, 거절하지 않음)
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초) - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(cors_layer())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    // 설정 로드
    let mut config = load_config()?;

    // tracing 초기화
    init_logging(LogConfig::from_settings(&config.logging))?;

    info!("Starting Duckdam API server...");

    // 서명 키 확인
    if config.auth.secret.is_empty() {
        warn!("DUCKDAM__AUTH__SECRET not set, using default (INSECURE for development only)");
        config.auth.secret = "dev-secret-key-change-in-production".to_string();
    }

    // AppState 생성
    let state = AppState::new(&config.auth);
    info!(version = %state.version, "Application state initialized");

    // 라우터 생성
    let app = create_router(state);

    // 서버 시작
    let addr = config.server.bind_addr();
    info!(%addr, "API server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 종료를 시작합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
