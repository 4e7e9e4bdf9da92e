//! # steamstat-storage
//!
//! 로컬 저장소 어댑터.
//! 마지막으로 성공한 상태 스냅샷을 보관하는 단일 슬롯 캐시와,
//! 호스트 키/값 설정 저장소를 JSON 파일로 구현한 백엔드를 제공한다.

pub mod cache_store;
pub mod settings_file;
pub mod slot;
