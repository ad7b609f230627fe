//! 사용자 API.
//!
//! 회원 가입, 로그인, 토큰 재발급, 사용자 검색, 내 정보 조회
//! 엔드포인트. 인증 코어의 모든 연산이 이 라우트들을 통해
//! 실행됩니다.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use duckdam_core::domain::{User, ROLE_USER};
use duckdam_core::error::DuckdamError;

use crate::auth::{hash_password, require_role, verify_password, CurrentUser, TokenPair};
use crate::error::{ApiError, ApiResult};
use crate::repository::NewUser;
use crate::state::AppState;

// =============================================================================
// 요청/응답 타입
// =============================================================================

/// 회원 가입 요청.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// 표시 이름
    pub name: String,
    /// 로그인 이메일
    pub email: String,
    /// 평문 비밀번호 (저장 전에 해시됨)
    pub password: String,
    /// 프로필 이미지 URL (선택적)
    pub profile: Option<String>,
}

/// 로그인 요청.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// 로그인 이메일
    pub email: String,
    /// 평문 비밀번호
    pub password: String,
}

/// 로그인 응답.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Access Token
    pub token: String,
    /// Refresh Token
    pub refresh_token: String,
    /// 사용자 ID
    pub uid: u64,
    /// 표시 이름
    pub name: String,
    /// 프로필 이미지 URL
    pub profile: Option<String>,
}

/// 토큰 재발급 요청.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// 로그인 시 발급받은 Refresh Token
    pub refresh_token: String,
}

/// 사용자 공개 정보 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    /// 사용자 ID
    pub uid: u64,
    /// 표시 이름
    pub name: String,
    /// 프로필 이미지 URL
    pub profile: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            uid: user.id,
            name: user.name,
            profile: user.profile,
        }
    }
}

// =============================================================================
// 핸들러 구현
// =============================================================================

/// 회원 가입.
///
/// 이메일과 이름의 중복을 검사한 뒤 비밀번호를 해시하여 저장합니다.
/// 신규 사용자는 `ROLE_USER` 역할로 시작합니다.
///
/// `POST /user/register`
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<StatusCode> {
    let password_hash =
        hash_password(&request.password).map_err(|e| DuckdamError::Internal(e.to_string()))?;

    let user = state
        .users
        .register(NewUser {
            name: request.name,
            email: request.email,
            password_hash,
            profile: request.profile,
        })
        .await?;

    info!(uid = user.id, "User registered");
    Ok(StatusCode::NO_CONTENT)
}

/// 로그인.
///
/// 이메일로 사용자를 찾고 비밀번호를 검증한 뒤 토큰 쌍을
/// 발급합니다. 미등록 이메일과 잘못된 비밀번호는 모두 404로
/// 응답합니다.
///
/// `POST /user/login`
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state
        .users
        .find_by_email(&request.email)
        .await
        .ok_or_else(|| {
            DuckdamError::NotFound(format!("User [{}] was not registered.", request.email))
        })?;

    if verify_password(&request.password, &user.password).is_err() {
        return Err(ApiError::from(DuckdamError::NotFound(
            "User email or password was wrong.".to_string(),
        )));
    }

    let pair = state
        .tokens
        .issue(&user.id.to_string(), user.roles.clone())
        .map_err(|e| DuckdamError::Internal(e.to_string()))?;

    info!(uid = user.id, "User logged in");

    Ok(Json(LoginResponse {
        token: pair.token,
        refresh_token: pair.refresh_token,
        uid: user.id,
        name: user.name,
        profile: user.profile,
    }))
}

/// 토큰 재발급.
///
/// Refresh Token의 서명과 만료를 검증한 뒤 토큰에 내장된 subject와
/// 역할로 새 쌍을 발급합니다. 저장소 조회는 하지 않습니다.
///
/// `POST /user/refresh`
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> ApiResult<Json<TokenPair>> {
    let pair = state.tokens.refresh(&request.refresh_token)?;
    Ok(Json(pair))
}

/// 이름으로 사용자 검색.
///
/// 이름에 질의 문자열이 포함된 사용자 목록을 반환합니다.
/// `ROLE_USER` 역할이 필요합니다.
///
/// `GET /users/{query}`
pub async fn search_users(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Json<Vec<UserResponse>> {
    let users = state.users.search_by_name(&query).await;
    Json(users.into_iter().map(UserResponse::from).collect())
}

/// 내 정보 조회.
///
/// 토큰에서 해석된 호출자 본인의 저장된 프로필을 반환합니다.
///
/// `GET /user/me`
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<UserResponse>> {
    let stored = state
        .users
        .find_by_id(user.id)
        .await
        .ok_or_else(|| DuckdamError::NotFound(format!("User [{}] was not registered.", user.id)))?;

    Ok(Json(UserResponse::from(stored)))
}

/// 사용자 라우터 생성.
///
/// `/users/{query}`에는 역할 검사 계층이 적용됩니다.
pub fn users_router() -> Router<AppState> {
    let protected = Router::new()
        .route("/users/{query}", get(search_users))
        .route_layer(middleware::from_fn(|request, next| {
            require_role(ROLE_USER, request, next)
        }));

    Router::new()
        .route("/user/register", post(register))
        .route("/user/login", post(login))
        .route("/user/refresh", post(refresh))
        .route("/user/me", get(me))
        .merge(protected)
}
