//! 최신 버전 마커 조회 포트.
//!
//! 구현: `steamstat-network` crate (`LatestVersionClient`, reqwest)

use async_trait::async_trait;

use crate::error::CoreError;

/// 원격 버전 마커 소스
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// 마커 원문 조회 (형식 검증은 호출자 몫)
    ///
    /// 2xx가 아닌 응답은 `CoreError::Http`로 반환한다.
    async fn fetch_latest_version(&self) -> Result<String, CoreError>;
}
