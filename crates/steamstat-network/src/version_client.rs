//! 최신 버전 마커 클라이언트.
//!
//! 저장소에 올라간 `LATEST_VERSION` 텍스트 파일을 캐시 없이 조회한다.

use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use std::time::Duration;
use steamstat_core::error::CoreError;
use steamstat_core::ports::version_source::VersionSource;
use tracing::debug;

/// 기본 버전 마커 URL
pub const LATEST_VERSION_URL: &str =
    "https://raw.githubusercontent.com/bschelst/steamstatus-decky/main/LATEST_VERSION";

/// 버전 마커 HTTP 클라이언트
pub struct LatestVersionClient {
    client: reqwest::Client,
    url: String,
}

impl LatestVersionClient {
    /// 기본 URL을 쓰는 클라이언트 생성
    pub fn new(timeout: Duration) -> Result<Self, CoreError> {
        Self::with_url(LATEST_VERSION_URL, timeout)
    }

    /// 마커 URL 지정
    pub fn with_url(url: &str, timeout: Duration) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP client build failed: {e}")))?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl VersionSource for LatestVersionClient {
    async fn fetch_latest_version(&self) -> Result<String, CoreError> {
        debug!("최신 버전 마커 요청: {}", self.url);

        let resp = self
            .client
            .get(&self.url)
            .header(CACHE_CONTROL, "no-cache, no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("Network error: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::Http {
                status: status.as_u16(),
            });
        }

        resp.text()
            .await
            .map_err(|e| CoreError::Network(format!("Invalid response: {e}")))
    }
}
