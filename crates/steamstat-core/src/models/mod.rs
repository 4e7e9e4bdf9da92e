//! SteamStat 도메인 모델.
//!
//! 게이트웨이 응답, 로컬 캐시 엔트리, UI에 노출되는 파생 정보를 정의한다.
//! 직렬화 대상 모델은 `serde` Serialize/Deserialize를 구현한다.

pub mod status;
pub mod version;
