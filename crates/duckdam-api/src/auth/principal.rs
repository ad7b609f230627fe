//! 요청 주체(principal) 해석 추상화.
//!
//! 토큰에서 추출한 subject를 저장소의 실제 사용자로 변환하는
//! 경계입니다. 미들웨어는 이 trait 뒤의 구현이 메모리 저장소인지
//! 외부 데이터베이스인지 알지 못합니다.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use duckdam_core::error::DuckdamResult;

/// 요청 컨텍스트에 부착되는 인증된 사용자.
///
/// 저장소 엔티티에서 인증에 필요한 필드만 추려낸 뷰입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// 사용자 ID
    pub id: u64,
    /// 표시 이름
    pub name: String,
    /// 부여된 역할 목록
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    /// 해당 역할을 보유하는지 확인합니다.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// 주체 해석기 trait.
///
/// 토큰 subject 문자열을 인증된 사용자로 변환합니다.
///
/// # Errors
///
/// - `DuckdamError::Unauthorized`: subject가 사용자 ID 형식이 아님
/// - `DuckdamError::NotFound`: 해당 ID의 사용자가 존재하지 않음
#[async_trait]
pub trait PrincipalResolver: Send + Sync {
    /// subject를 인증된 사용자로 해석.
    async fn resolve(&self, subject: &str) -> DuckdamResult<AuthenticatedUser>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use duckdam_core::domain::{ROLE_ADMIN, ROLE_USER};

    #[test]
    fn test_has_role() {
        let user = AuthenticatedUser {
            id: 1,
            name: "duck".to_string(),
            roles: vec![ROLE_USER.to_string()],
        };

        assert!(user.has_role(ROLE_USER));
        assert!(!user.has_role(ROLE_ADMIN));
    }
}
