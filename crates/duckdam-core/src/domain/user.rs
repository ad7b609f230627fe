//! 사용자 계정 엔티티.
//!
//! 이 모듈은 사용자 관련 타입을 정의합니다:
//! - `User` - 저장되는 사용자 엔티티
//! - 역할 문자열 상수 (`ROLE_USER`, `ROLE_ADMIN`)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 일반 사용자 역할.
pub const ROLE_USER: &str = "ROLE_USER";
/// 관리자 역할.
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// 서비스에 등록된 사용자.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// 내부 사용자 ID
    pub id: u64,
    /// 표시 이름
    pub name: String,
    /// 로그인 이메일
    pub email: String,
    /// 해시된 비밀번호
    #[serde(skip_serializing)]
    pub password: String,
    /// 프로필 이미지 URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    /// 부여된 역할 목록
    pub roles: Vec<String>,
    /// 가입 타임스탬프
    pub created_at: DateTime<Utc>,
}

impl User {
    /// 새 사용자를 생성합니다.
    ///
    /// 기본 역할로 `ROLE_USER`가 부여됩니다.
    pub fn new(
        id: u64,
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            password: password_hash.into(),
            profile: None,
            roles: vec![ROLE_USER.to_string()],
            created_at: Utc::now(),
        }
    }

    /// 프로필 이미지 URL을 설정합니다.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// 역할 목록을 교체합니다.
    pub fn with_roles(mut self, roles: Vec<String>) -> Self {
        self.roles = roles;
        self
    }

    /// 해당 역할을 보유하는지 확인합니다.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new(1, "duck", "duck@example.com", "hashed");
        assert_eq!(user.roles, vec![ROLE_USER.to_string()]);
        assert!(user.profile.is_none());
        assert!(user.has_role(ROLE_USER));
        assert!(!user.has_role(ROLE_ADMIN));
    }

    #[test]
    fn test_user_builders() {
        let user = User::new(2, "admin", "admin@example.com", "hashed")
            .with_profile("https://cdn.example.com/p/2.png")
            .with_roles(vec![ROLE_USER.to_string(), ROLE_ADMIN.to_string()]);

        assert_eq!(user.profile.as_deref(), Some("https://cdn.example.com/p/2.png"));
        assert!(user.has_role(ROLE_ADMIN));
    }

    #[test]
    fn test_password_not_serialized() {
        let user = User::new(3, "duck", "duck@example.com", "secret-hash");
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "duck@example.com");
    }
}
