//! 장애 감지.
//!
//! 활성 스냅샷 하나만 보고 표시용 장애 정보를 계산하는 순수 함수.
//! 사용자 알림은 백그라운드 모니터의 몫이며 여기서는 하지 않는다.

use crate::models::status::{OutageInfo, StatusSnapshot};

/// 스냅샷에서 장애 정보 파생
///
/// - 현재 장애: `online`이 아닌 서비스가 하나라도 있음 (`degraded` 포함)
/// - 최근 장애: `all_services_up == false`인 이력 샘플 (입력 순서상 마지막 샘플의 시각)
pub fn detect(snapshot: &StatusSnapshot) -> OutageInfo {
    let has_current_outage = snapshot
        .services
        .values()
        .any(|service| !service.status.is_online());

    let outages: Vec<_> = snapshot
        .history
        .iter()
        .filter(|entry| !entry.all_services_up)
        .collect();

    OutageInfo {
        has_current_outage,
        had_recent_outage: !outages.is_empty(),
        outage_count: outages.len(),
        last_outage_time: outages.last().map(|entry| entry.timestamp.clone()),
    }
}
