//! 인증 및 권한 부여.
//!
//! JWT 기반 무상태 인증 및 역할 기반 접근 제어를 제공합니다.
//!
//! # 구성 요소
//!
//! - [`Claims`]: JWT 페이로드 구조체
//! - [`TokenProvider`]: 토큰 발급/검증/갱신 제공자
//! - [`CurrentUser`]: 보호된 핸들러용 인증 주체 추출기
//! - [`authenticate`]: 요청에 인증 주체를 부착하는 미들웨어
//! - [`require_role`]: 역할 검사 미들웨어
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! // 보호된 라우트에서 CurrentUser 추출기 사용
//! async fn protected_handler(
//!     CurrentUser(user): CurrentUser,
//! ) -> impl IntoResponse {
//!     format!("Hello, {}!", user.name)
//! }
//! ```

mod extract;
mod jwt;
mod middleware;
mod password;
mod principal;

pub use extract::{bearer_token, maybe_bearer_token, AUTH_HEADER, TOKEN_PREFIX};
pub use jwt::{Claims, JwtError, TokenPair, TokenProvider, REFRESH_FAILED_MESSAGE};
pub use middleware::{authenticate, require_role, CurrentUser};
pub use password::{hash_password, verify_password, PasswordError};
pub use principal::{AuthenticatedUser, PrincipalResolver};
