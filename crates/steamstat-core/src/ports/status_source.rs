//! 게이트웨이 상태 조회 포트.
//!
//! 구현: `steamstat-network` crate (`GatewayClient`, reqwest)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::status::StatusSnapshot;

/// 게이트웨이 상태 엔드포인트 클라이언트
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// `GET {gateway_url}/api/v1/status` 조회
    ///
    /// 대상 URL과 키는 호출 시점 값을 그대로 사용한다 (조회 도중 재지정 없음).
    /// 실패는 `CoreError::{Auth, RateLimit, Http, Network}`로 분류한다.
    async fn fetch_status(
        &self,
        gateway_url: &str,
        api_key: &str,
    ) -> Result<StatusSnapshot, CoreError>;
}
