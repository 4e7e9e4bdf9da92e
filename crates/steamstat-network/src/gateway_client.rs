//! 게이트웨이 상태 클라이언트.
//!
//! `StatusSource` 포트 구현. 요청마다 호출 시점의 URL/키를 사용한다.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use steamstat_core::error::CoreError;
use steamstat_core::models::status::StatusSnapshot;
use steamstat_core::ports::status_source::StatusSource;
use tracing::{debug, warn};

/// 상태 엔드포인트 경로
pub const STATUS_PATH: &str = "/api/v1/status";

/// API 키 헤더
pub const API_KEY_HEADER: &str = "X-API-Key";

/// 게이트웨이 HTTP 클라이언트
pub struct GatewayClient {
    client: reqwest::Client,
}

impl GatewayClient {
    /// 새 게이트웨이 클라이언트 생성
    pub fn new(timeout: Duration) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP client build failed: {e}")))?;

        Ok(Self { client })
    }

    /// 상태 엔드포인트 전체 URL
    pub fn status_url(gateway_url: &str) -> String {
        format!("{}{STATUS_PATH}", gateway_url.trim().trim_end_matches('/'))
    }

    /// 응답 상태 코드 → 에러 분류
    fn check_status(status: reqwest::StatusCode) -> Result<(), CoreError> {
        if status.is_success() {
            return Ok(());
        }

        match status.as_u16() {
            code @ (401 | 403) => Err(CoreError::Auth { status: code }),
            429 => Err(CoreError::RateLimit),
            code => Err(CoreError::Http { status: code }),
        }
    }
}

#[async_trait]
impl StatusSource for GatewayClient {
    async fn fetch_status(
        &self,
        gateway_url: &str,
        api_key: &str,
    ) -> Result<StatusSnapshot, CoreError> {
        let url = Self::status_url(gateway_url);
        debug!("게이트웨이 상태 요청: {url}");

        let resp = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, api_key)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("Network error: {e}")))?;

        let status = resp.status();
        if let Err(e) = Self::check_status(status) {
            warn!("게이트웨이 응답 에러 ({status}): {e}");
            return Err(e);
        }

        let snapshot: StatusSnapshot = resp
            .json()
            .await
            .map_err(|e| CoreError::Network(format!("Invalid response: {e}")))?;

        debug!("게이트웨이 상태 수신: 서비스 {}개", snapshot.services.len());
        Ok(snapshot)
    }
}
