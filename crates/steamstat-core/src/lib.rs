//! # steamstat-core
//!
//! SteamStat 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`] — 게이트웨이 상태 스냅샷, 캐시 엔트리, 파생 정보 (serde)
//! - [`ports`] — Hexagonal Architecture 포트 인터페이스 (async_trait)
//! - [`error`] — 핵심 에러 타입 (thiserror)
//! - [`settings`] — 플러그인 설정 구조체와 필드 단위 변경
//! - [`settings_store`] — 설정 컨텍스트 (원격 저장 + 구독자 알림)
//! - [`outage`] — 스냅샷 이력 기반 장애 감지
//! - [`version`] — 버전 마커 검증 및 비교
//! - [`format`] — 표시용 포매터

pub mod error;
pub mod format;
pub mod models;
pub mod outage;
pub mod ports;
pub mod settings;
pub mod settings_store;
pub mod version;
