//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! 어댑터 crate(`steamstat-storage`, `steamstat-network`)가 이 trait들을 구현하며,
//! `steamstat-app`에서 `Arc<dyn T>`로 와이어링한다.
//!
//! 네트워크/원격 저장소 호출만 비동기이고, 로컬 슬롯 저장소는 동기 인터페이스다.

pub mod settings_backend;
pub mod status_source;
pub mod storage;
pub mod version_source;
