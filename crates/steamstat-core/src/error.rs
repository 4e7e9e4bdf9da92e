//! SteamStat 핵심 에러 타입.
//!
//! 게이트웨이 호출 경로의 에러는 그대로 사용자 표시 문자열이 되므로
//! `Display` 메시지를 고정한다 (`Invalid API key` 등).

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 게이트웨이 URL/API 키 미설정 등 설정 오류 (설정 변경 전까지 재시도 무의미)
    #[error("{0}")]
    Config(String),

    /// 인증 실패 (401/403)
    #[error("Invalid API key")]
    Auth {
        /// 응답 상태 코드
        status: u16,
    },

    /// Rate Limit 초과 (429)
    #[error("Rate limited, try again later")]
    RateLimit,

    /// 그 외 2xx가 아닌 응답
    #[error("Server error: {status}")]
    Http {
        /// 응답 상태 코드
        status: u16,
    },

    /// 네트워크 에러 (연결 실패, 타임아웃, 응답 본문 파싱 실패)
    #[error("{0}")]
    Network(String),

    /// 로컬 캐시 읽기/쓰기 실패 (항상 내부에서 삼킨다)
    #[error("캐시 에러: {0}")]
    Cache(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 — {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}

impl CoreError {
    /// 다음 예약/수동 갱신에서 재시도할 가치가 있는 에러인지
    ///
    /// 설정/인증 에러는 설정이 바뀌기 전까지 같은 결과를 낸다.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CoreError::Network(_) | CoreError::RateLimit | CoreError::Http { .. }
        )
    }
}
