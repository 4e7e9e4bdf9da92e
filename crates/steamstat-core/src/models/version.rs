//! 업데이트 확인 결과 모델.

use serde::Serialize;

/// 최신 버전 확인 상태
///
/// `current_version`만 컴파일 타임 상수이고 나머지는 확인할 때마다 새로 채운다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatestVersionInfo {
    /// 원격 마커에서 읽은 최신 버전
    pub latest_version: Option<String>,
    /// 확인 진행 중 여부
    pub is_loading: bool,
    /// 마지막 확인 실패 사유
    pub error: Option<String>,
    /// 최신 버전이 현재 버전보다 높은지
    pub update_available: bool,
    /// 현재 실행 중인 버전
    pub current_version: String,
}

impl LatestVersionInfo {
    /// 확인 전 초기 상태
    pub fn initial(current_version: impl Into<String>) -> Self {
        Self {
            latest_version: None,
            is_loading: false,
            error: None,
            update_available: false,
            current_version: current_version.into(),
        }
    }
}
