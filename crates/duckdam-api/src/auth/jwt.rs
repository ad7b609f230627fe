//! JWT 토큰 처리.
//!
//! Access Token 및 Refresh Token 발급/검증/재발급 로직.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use duckdam_core::config::AuthConfig;
use duckdam_core::error::{DuckdamError, DuckdamResult};

/// 재발급 실패 시 클라이언트에 내려가는 메시지.
pub const REFRESH_FAILED_MESSAGE: &str = "Failed when refresh token.";

/// JWT 토큰 페이로드.
///
/// Access Token과 Refresh Token 모두 동일한 형태를 사용하며,
/// 만료 시간만 다릅니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 사용자 식별자
    pub sub: String,
    /// 사용자 역할 목록
    pub roles: Vec<String>,
    /// Issued At - 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// Expiration - 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// 새로운 Claims 생성.
    ///
    /// # Arguments
    ///
    /// * `subject` - 사용자 식별자
    /// * `roles` - 사용자 역할 목록
    /// * `issued_at` - 발급 시간
    /// * `ttl_secs` - 만료까지의 시간 (초)
    pub fn new(
        subject: impl Into<String>,
        roles: Vec<String>,
        issued_at: DateTime<Utc>,
        ttl_secs: u64,
    ) -> Self {
        Self {
            sub: subject.into(),
            roles,
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::seconds(ttl_secs as i64)).timestamp(),
        }
    }

    /// 토큰이 만료되었는지 확인.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// 특정 역할을 보유하는지 확인.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Access Token + Refresh Token 페어.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Access Token
    pub token: String,
    /// Refresh Token
    pub refresh_token: String,
}

/// JWT 토큰 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("토큰 인코딩 실패: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),
    #[error("토큰 디코딩 실패")]
    DecodingError,
    #[error("잘못된 토큰 형식")]
    InvalidToken,
}

/// 대칭키(HS256) 기반 토큰 발급기.
///
/// 상태를 저장하지 않으며 모든 판단은 토큰 자체의 서명과
/// 클레임만으로 이루어집니다.
#[derive(Clone)]
pub struct TokenProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl_secs: u64,
    refresh_ttl_secs: u64,
}

impl TokenProvider {
    /// 새로운 TokenProvider 생성.
    ///
    /// # Arguments
    ///
    /// * `secret` - HS256 서명 비밀키
    /// * `access_ttl_secs` - Access Token 유효기간 (초)
    /// * `refresh_ttl_secs` - Refresh Token 유효기간 (초)
    pub fn new(secret: &str, access_ttl_secs: u64, refresh_ttl_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    /// 인증 설정에서 TokenProvider 생성.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            &config.secret,
            config.access_ttl_secs,
            config.refresh_ttl_secs,
        )
    }

    /// Access Token + Refresh Token 쌍 발급.
    ///
    /// 두 토큰은 같은 발급 시간과 클레임을 공유하며 만료 시간만 다릅니다.
    pub fn issue(&self, subject: &str, roles: Vec<String>) -> Result<TokenPair, JwtError> {
        let now = Utc::now();
        let access_claims = Claims::new(subject, roles.clone(), now, self.access_ttl_secs);
        let refresh_claims = Claims::new(subject, roles, now, self.refresh_ttl_secs);

        let token = encode(&Header::default(), &access_claims, &self.encoding_key)?;
        let refresh_token = encode(&Header::default(), &refresh_claims, &self.encoding_key)?;

        Ok(TokenPair {
            token,
            refresh_token,
        })
    }

    /// 토큰이 서명이 유효하고 만료되지 않았는지 확인.
    ///
    /// 디코딩 실패와 만료를 구분하지 않고 모두 `false`로 반환합니다.
    pub fn verify(&self, token: &str) -> bool {
        match self.extract_claims(token) {
            Ok(claims) => !claims.is_expired(),
            Err(_) => false,
        }
    }

    /// 토큰에서 클레임 추출.
    ///
    /// 서명은 검증하지만 만료 여부는 확인하지 않으므로
    /// 만료된 토큰에서도 클레임을 읽을 수 있습니다.
    pub fn extract_claims(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::default();
        // 만료는 leeway 없이 is_expired()로 직접 비교한다
        validation.validate_exp = false;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidToken => JwtError::InvalidToken,
                _ => JwtError::DecodingError,
            })
    }

    /// 토큰에서 subject 추출.
    ///
    /// 만료된 토큰에서도 subject를 읽을 수 있습니다.
    pub fn extract_subject(&self, token: &str) -> Result<String, JwtError> {
        self.extract_claims(token).map(|claims| claims.sub)
    }

    /// Refresh Token으로 새 토큰 쌍 재발급.
    ///
    /// 서명이 유효하고 만료되지 않은 토큰이면 내장된 subject와
    /// 역할을 그대로 사용하여 새 쌍을 발급합니다. 이전 Refresh
    /// Token은 무효화되지 않고 자체 만료 시점까지 유효합니다.
    pub fn refresh(&self, refresh_token: &str) -> DuckdamResult<TokenPair> {
        if !self.verify(refresh_token) {
            return Err(DuckdamError::Unauthorized(
                REFRESH_FAILED_MESSAGE.to_string(),
            ));
        }

        let claims = self
            .extract_claims(refresh_token)
            .map_err(|_| DuckdamError::Unauthorized(REFRESH_FAILED_MESSAGE.to_string()))?;

        self.issue(&claims.sub, claims.roles)
            .map_err(|e| DuckdamError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duckdam_core::domain::{ROLE_ADMIN, ROLE_USER};

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    fn test_provider() -> TokenProvider {
        TokenProvider::new(TEST_SECRET, 600, 7_776_000)
    }

    #[test]
    fn test_issue_and_extract() {
        let provider = test_provider();
        let pair = provider
            .issue("7", vec![ROLE_USER.to_string(), ROLE_ADMIN.to_string()])
            .unwrap();

        assert!(!pair.token.is_empty());
        assert!(!pair.refresh_token.is_empty());

        let access = provider.extract_claims(&pair.token).unwrap();
        let refresh = provider.extract_claims(&pair.refresh_token).unwrap();

        assert_eq!(access.sub, "7");
        assert_eq!(access.roles, vec![ROLE_USER, ROLE_ADMIN]);
        assert_eq!(refresh.sub, "7");
        assert_eq!(refresh.roles, access.roles);

        // 같은 시점에 발급되고 만료만 다르다
        assert_eq!(access.iat, refresh.iat);
        assert!(refresh.exp > access.exp);
    }

    #[test]
    fn test_verify_valid_token() {
        let provider = test_provider();
        let pair = provider.issue("1", vec![ROLE_USER.to_string()]).unwrap();

        assert!(provider.verify(&pair.token));
        assert!(provider.verify(&pair.refresh_token));
        assert!(!provider.verify("invalid.token.here"));
        assert!(!provider.verify(""));
    }

    #[test]
    fn test_verify_wrong_secret() {
        let provider = test_provider();
        let other = TokenProvider::new("wrong-secret-key-for-testing-minimum-32-chars", 600, 600);

        let pair = provider.issue("1", vec![ROLE_USER.to_string()]).unwrap();
        assert!(!other.verify(&pair.token));
        assert!(other.extract_claims(&pair.token).is_err());
    }

    #[test]
    fn test_expired_token() {
        let provider = test_provider();

        // 2분 전에 발급되어 1분 전에 만료된 토큰
        let issued = Utc::now() - Duration::seconds(180);
        let claims = Claims::new("5", vec![ROLE_USER.to_string()], issued, 60);
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        assert!(!provider.verify(&token));

        // 만료된 토큰에서도 클레임과 subject는 읽을 수 있다
        let extracted = provider.extract_claims(&token).unwrap();
        assert_eq!(extracted.sub, "5");
        assert!(extracted.is_expired());
        assert_eq!(provider.extract_subject(&token).unwrap(), "5");
    }

    #[test]
    fn test_refresh_reissues_pair() {
        let provider = test_provider();
        let pair = provider.issue("3", vec![ROLE_USER.to_string()]).unwrap();
        let old_claims = provider.extract_claims(&pair.refresh_token).unwrap();

        // iat는 초 단위이므로 다음 발급이 늦게 찍히도록 대기
        std::thread::sleep(std::time::Duration::from_millis(1100));

        let renewed = provider.refresh(&pair.refresh_token).unwrap();
        let new_claims = provider.extract_claims(&renewed.token).unwrap();

        assert!(provider.verify(&renewed.token));
        assert!(provider.verify(&renewed.refresh_token));
        assert_eq!(new_claims.sub, "3");
        assert_eq!(new_claims.roles, old_claims.roles);
        assert!(new_claims.iat > old_claims.iat);

        // 이전 Refresh Token은 여전히 유효하다
        assert!(provider.verify(&pair.refresh_token));
    }

    #[test]
    fn test_refresh_rejects_invalid_token() {
        let provider = test_provider();

        let err = provider.refresh("not-a-token").unwrap_err();
        match err {
            DuckdamError::Unauthorized(msg) => assert_eq!(msg, REFRESH_FAILED_MESSAGE),
            other => panic!("unexpected error: {other:?}"),
        }

        // 만료된 Refresh Token도 동일하게 거부된다
        let issued = Utc::now() - Duration::seconds(180);
        let claims = Claims::new("5", vec![ROLE_USER.to_string()], issued, 60);
        let expired = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        let err = provider.refresh(&expired).unwrap_err();
        match err {
            DuckdamError::Unauthorized(msg) => assert_eq!(msg, REFRESH_FAILED_MESSAGE),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_token_pair_wire_format() {
        let provider = test_provider();
        let pair = provider.issue("1", vec![ROLE_USER.to_string()]).unwrap();

        let json = serde_json::to_value(&pair).unwrap();
        assert!(json.get("token").is_some());
        assert!(json.get("refreshToken").is_some());
        assert!(json.get("refresh_token").is_none());
    }

    #[tokio::test]
    async fn test_shared_provider_across_tasks() {
        let provider = test_provider();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let provider = provider.clone();
                tokio::spawn(async move {
                    let pair = provider
                        .issue(&i.to_string(), vec![ROLE_USER.to_string()])
                        .unwrap();
                    assert!(provider.verify(&pair.token));
                    provider.extract_subject(&pair.token).unwrap()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.await.unwrap(), i.to_string());
        }
    }
}
