//! 메모리 기반 사용자 저장소.
//!
//! 외부 데이터베이스 없이 동작하는 기본 구현입니다. 인증 코어는
//! [`PrincipalResolver`] 경계만 바라보므로 저장소 교체가 인증
//! 로직에 영향을 주지 않습니다.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use duckdam_core::domain::User;
use duckdam_core::error::{DuckdamError, DuckdamResult};

use crate::auth::{AuthenticatedUser, PrincipalResolver};

/// 등록할 새 사용자 정보.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// 표시 이름
    pub name: String,
    /// 로그인 이메일
    pub email: String,
    /// 이미 해시된 비밀번호
    pub password_hash: String,
    /// 프로필 이미지 URL
    pub profile: Option<String>,
}

/// 메모리 기반 사용자 저장소.
pub struct UserRepository {
    users: RwLock<HashMap<u64, User>>,
    next_id: AtomicU64,
}

impl UserRepository {
    /// 빈 저장소를 생성합니다.
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// 중복 검사 후 새 사용자를 저장합니다.
    ///
    /// 이메일 중복을 먼저 검사하고 그 다음 이름 중복을 검사합니다.
    /// 검사와 삽입은 같은 쓰기 잠금 안에서 수행됩니다.
    pub async fn register(&self, new_user: NewUser) -> DuckdamResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == new_user.email) {
            return Err(DuckdamError::Conflict(format!(
                "User email [{}] is already registered.",
                new_user.email
            )));
        }
        if users.values().any(|u| u.name == new_user.name) {
            return Err(DuckdamError::Conflict(format!(
                "User name [{}] is already registered.",
                new_user.name
            )));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut user = User::new(id, new_user.name, new_user.email, new_user.password_hash);
        if let Some(profile) = new_user.profile {
            user = user.with_profile(profile);
        }

        users.insert(id, user.clone());
        Ok(user)
    }

    /// 이메일로 사용자를 조회합니다.
    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        self.users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned()
    }

    /// ID로 사용자를 조회합니다.
    pub async fn find_by_id(&self, id: u64) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }

    /// 이름에 질의 문자열이 포함된 사용자를 검색합니다.
    ///
    /// 결과는 ID 오름차순으로 정렬됩니다.
    pub async fn search_by_name(&self, query: &str) -> Vec<User> {
        let mut result: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.name.contains(query))
            .cloned()
            .collect();

        result.sort_by_key(|u| u.id);
        result
    }

    /// 저장된 사용자 수를 반환합니다.
    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }
}

impl Default for UserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PrincipalResolver for UserRepository {
    async fn resolve(&self, subject: &str) -> DuckdamResult<AuthenticatedUser> {
        let id: u64 = subject
            .parse()
            .map_err(|_| DuckdamError::Unauthorized(format!("Invalid subject [{subject}].")))?;

        let user = self
            .find_by_id(id)
            .await
            .ok_or_else(|| DuckdamError::NotFound(format!("User [{id}] was not registered.")))?;

        Ok(AuthenticatedUser {
            id: user.id,
            name: user.name,
            roles: user.roles,
        })
    }
}
