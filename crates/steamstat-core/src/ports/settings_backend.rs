//! 설정 원격 저장소 포트.
//!
//! 호스트가 제공하는 키/값 RPC (`get_settings`, `set_setting`).
//! 구현: `steamstat-storage` crate (`FileSettingsBackend`)

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CoreError;

/// 설정 원격 저장소
///
/// 결과적 일관성, best-effort로 취급한다.
#[async_trait]
pub trait SettingsBackend: Send + Sync {
    /// 전체 설정 객체 조회 (JSON 객체)
    async fn get_settings(&self) -> Result<Value, CoreError>;

    /// 단일 키 저장. 저장소가 키를 거부하거나 기록에 실패하면 `false`.
    async fn set_setting(&self, key: &str, value: Value) -> Result<bool, CoreError>;
}
