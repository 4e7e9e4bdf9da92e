//! # steamstat-network
//!
//! 네트워크 어댑터.
//! - [`gateway_client::GatewayClient`]: `StatusSource` 포트 구현 (게이트웨이 `/api/v1/status`)
//! - [`version_client::LatestVersionClient`]: `VersionSource` 포트 구현 (최신 버전 마커)

pub mod gateway_client;
pub mod version_client;

/// 기본 요청 타임아웃 (초)
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
