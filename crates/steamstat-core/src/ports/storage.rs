//! 로컬 슬롯 저장소 포트.
//!
//! 문자열 키 하나에 문자열 값 하나를 보관하는 내구성 저장소.
//! 구현: `steamstat-storage` crate (`FileSlotStorage`, `MemorySlotStorage`)

use crate::error::CoreError;

/// 로컬 키/값 슬롯 저장소
pub trait SlotStorage: Send + Sync {
    /// 슬롯 읽기. 비어 있으면 `Ok(None)`
    fn read(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// 슬롯 쓰기 (기존 값 덮어쓰기)
    fn write(&self, key: &str, value: &str) -> Result<(), CoreError>;

    /// 슬롯 삭제. 이미 비어 있어도 성공
    fn remove(&self, key: &str) -> Result<(), CoreError>;
}
