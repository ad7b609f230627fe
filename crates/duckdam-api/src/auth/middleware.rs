//! Axum용 JWT 인증 미들웨어.
//!
//! 요청마다 Bearer 토큰을 검증하고 인증된 사용자를 요청 확장에
//! 부착합니다. 미들웨어 자신은 요청을 거절하지 않습니다. 거절은
//! [`CurrentUser`] 추출기와 [`require_role`] 계층의 몫입니다.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use duckdam_core::error::DuckdamError;

use crate::auth::extract::{bearer_token, maybe_bearer_token};
use crate::auth::principal::AuthenticatedUser;
use crate::error::ApiError;
use crate::state::AppState;

/// 요청 인증 미들웨어.
///
/// Bearer 토큰 추출 → 검증 → 주체 해석 → 요청 확장 부착 순서로
/// 진행합니다. 어느 단계가 실패해도 요청은 비인증 상태로 계속
/// 진행됩니다.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match maybe_bearer_token(request.headers()) {
        Some(token) => token,
        None => return next.run(request).await,
    };

    if !state.tokens.verify(&token) {
        tracing::debug!("Token verification failed; continuing unauthenticated");
        return next.run(request).await;
    }

    // verify를 통과한 토큰이므로 추출은 실패하지 않는다
    let subject = match state.tokens.extract_subject(&token) {
        Ok(subject) => subject,
        Err(_) => return next.run(request).await,
    };

    match state.resolver.resolve(&subject).await {
        Ok(user) => {
            tracing::debug!(user_id = user.id, "Request authenticated");
            request.extensions_mut().insert(user);
        }
        Err(e) => {
            tracing::debug!(error = %e, "Principal resolution failed; continuing unauthenticated");
        }
    }

    next.run(request).await
}

/// 인증된 사용자 추출기.
///
/// 미들웨어가 부착한 사용자를 꺼냅니다. 부착된 사용자가 없으면
/// Unauthorized로 거절합니다. 헤더 자체가 없거나 형식이 잘못된
/// 경우에는 헤더 추출기의 메시지를 그대로 사용합니다.
///
/// # 사용 예시
///
/// ```rust,ignore
/// async fn me_handler(CurrentUser(user): CurrentUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(CurrentUser(user.clone()));
        }

        bearer_token(&parts.headers)?;

        Err(ApiError::from(DuckdamError::Unauthorized(
            "Invalid or expired token.".to_string(),
        )))
    }
}

/// 역할 기반 접근 제어 미들웨어.
///
/// 부착된 사용자가 없거나 요구 역할이 없으면 Forbidden으로 요청을
/// 종료합니다. 라우터에서 `from_fn` 클로저로 감싸 사용합니다:
///
/// ```rust,ignore
/// Router::new()
///     .route("/users/{query}", get(search_users))
///     .route_layer(middleware::from_fn(|request, next| {
///         require_role(ROLE_USER, request, next)
///     }))
/// ```
pub async fn require_role(
    role: &'static str,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match request.extensions().get::<AuthenticatedUser>() {
        Some(user) if user.has_role(role) => Ok(next.run(request).await),
        _ => Err(ApiError::from(DuckdamError::Forbidden(
            "Access is denied".to_string(),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::NewUser;
    use crate::state::create_test_state;
    use axum::{
        body::Body,
        http::{header::AUTHORIZATION, Request, StatusCode},
        middleware,
        routing::get,
        Extension, Router,
    };
    use duckdam_core::domain::{ROLE_ADMIN, ROLE_USER};
    use tower::ServiceExt;

    fn test_user() -> AuthenticatedUser {
        AuthenticatedUser {
            id: 1,
            name: "duck".to_string(),
            roles: vec![ROLE_USER.to_string()],
        }
    }

    async fn probe(user: Option<Extension<AuthenticatedUser>>) -> &'static str {
        match user {
            Some(_) => "authenticated",
            None => "anonymous",
        }
    }

    fn probe_router() -> (crate::state::AppState, Router) {
        let state = create_test_state();
        let app = Router::new()
            .route("/probe", get(probe))
            .layer(middleware::from_fn_with_state(state.clone(), authenticate));
        (state, app)
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_authenticate_attaches_identity() {
        let (state, app) = probe_router();
        let user = state
            .users
            .register(NewUser {
                name: "duck".to_string(),
                email: "duck@example.com".to_string(),
                password_hash: "hashed".to_string(),
                profile: None,
            })
            .await
            .unwrap();
        let pair = state
            .tokens
            .issue(&user.id.to_string(), user.roles.clone())
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/probe")
                    .header(AUTHORIZATION, format!("Bearer {}", pair.token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "authenticated");
    }

    #[tokio::test]
    async fn test_authenticate_never_rejects() {
        let (_, app) = probe_router();

        // 토큰 없음
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/probe").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "anonymous");

        // 위조 토큰
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/probe")
                    .header(AUTHORIZATION, "Bearer garbage.token.here")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "anonymous");
    }

    #[tokio::test]
    async fn test_authenticate_skips_unknown_subject() {
        let (state, app) = probe_router();
        // 저장소에 없는 사용자의 토큰
        let pair = state
            .tokens
            .issue("999", vec![ROLE_USER.to_string()])
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/probe")
                    .header(AUTHORIZATION, format!("Bearer {}", pair.token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "anonymous");
    }

    #[tokio::test]
    async fn test_current_user_present() {
        let request = Request::builder().uri("/").body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        parts.extensions.insert(test_user());

        let CurrentUser(user) = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(user.id, 1);
    }

    #[tokio::test]
    async fn test_current_user_missing() {
        let request = Request::builder().uri("/").body(()).unwrap();
        let (mut parts, _) = request.into_parts();

        let err = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            err.0.message(),
            "JWT Token must be included in header authorization"
        );
    }

    #[tokio::test]
    async fn test_current_user_invalid_token() {
        let request = Request::builder()
            .uri("/")
            .header(AUTHORIZATION, "Bearer not-verifiable")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let err = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.0.message(), "Invalid or expired token.");
    }

    #[tokio::test]
    async fn test_require_role_layer() {
        let protected = || {
            Router::new()
                .route("/protected", get(|| async { "ok" }))
                .route_layer(middleware::from_fn(|request, next| {
                    require_role(ROLE_ADMIN, request, next)
                }))
        };

        // 신원 없음 → 403
        let response = protected()
            .oneshot(
                Request::builder()
                    .uri("/protected")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // 역할 부족 → 403
        let app = protected().route_layer(middleware::from_fn(
            |mut request: Request<Body>, next: Next| async move {
                request.extensions_mut().insert(test_user());
                next.run(request).await
            },
        ));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/protected")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // 역할 충족 → 200
        let app = protected().route_layer(middleware::from_fn(
            |mut request: Request<Body>, next: Next| async move {
                let mut user = test_user();
                user.roles.push(ROLE_ADMIN.to_string());
                request.extensions_mut().insert(user);
                next.run(request).await
            },
        ));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/protected")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
