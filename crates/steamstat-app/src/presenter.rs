//! 터미널 출력 포맷.
//!
//! 폴러 상태와 업데이트 확인 결과를 사람이 읽을 수 있는 줄 목록으로 만든다.

use chrono::Utc;
use steamstat_core::format::{format_outage_time, format_player_count, format_relative_time};
use steamstat_core::models::version::LatestVersionInfo;
use steamstat_core::settings::PluginSettings;

use crate::status_poller::{PollPhase, PollerState};

/// 인기 상승 게임 최대 표시 개수
const MAX_TRENDING_GAMES: usize = 5;

/// 폴러 상태 렌더링
///
/// `cache_age`는 오프라인 표시 중일 때 캐시 경과 시간(초)이다.
pub fn render_status(
    state: &PollerState,
    settings: &PluginSettings,
    cache_age: Option<u64>,
) -> Vec<String> {
    let mut lines = Vec::new();

    if state.phase == PollPhase::Loading {
        lines.push("Refreshing...".to_string());
    }

    if let Some(error) = &state.error {
        lines.push(format!("Error: {error}"));
    }

    let Some(status) = &state.status else {
        if state.error.is_none() && !state.is_loading {
            lines.push("No status data yet".to_string());
        }
        return lines;
    };

    if state.is_offline {
        match cache_age {
            Some(age) => lines.push(format!("Showing cached data ({})", format_relative_time(age))),
            None => lines.push("Showing cached data".to_string()),
        }
    }

    let outage = &state.outage;
    if outage.has_current_outage {
        lines.push("Steam services: issues detected".to_string());
    } else if outage.had_recent_outage {
        let mut line = format!("Steam services: recovered ({} recent outages", outage.outage_count);
        if let Some(time) = outage.last_outage_time.as_deref().and_then(format_outage_time) {
            line.push_str(&format!(", last at {time}"));
        }
        line.push(')');
        lines.push(line);
    } else {
        lines.push("Steam services: all online".to_string());
    }

    for (name, service) in &status.services {
        lines.push(format!("  {name}: {}", service.status));
    }

    if settings.show_history {
        if let Some(online) = status.latest_online() {
            lines.push(format!("Players online: {}", format_player_count(online)));
        }
    }

    if settings.show_trending_games && !status.trending_games.is_empty() {
        lines.push("Trending games:".to_string());
        for game in status.trending_games.iter().take(MAX_TRENDING_GAMES) {
            let sign = if game.gain_24h >= 0 { '+' } else { '-' };
            lines.push(format!(
                "  {}: {} ({sign}{})",
                game.name,
                format_player_count(game.current_players),
                format_player_count(game.gain_24h.unsigned_abs())
            ));
        }
    }

    if let Some(updated) = state.last_updated {
        let elapsed = (Utc::now() - updated).num_seconds().max(0);
        lines.push(format!(
            "Updated {}",
            format_relative_time(u64::try_from(elapsed).unwrap_or(0))
        ));
    }

    lines
}

/// 업데이트 확인 결과 렌더링
pub fn render_version(info: &LatestVersionInfo) -> String {
    if info.is_loading {
        return "Checking for updates...".to_string();
    }
    if let Some(error) = &info.error {
        return format!("Update check failed: {error}");
    }
    match &info.latest_version {
        Some(latest) if info.update_available => format!(
            "Update available: {latest} (current {})",
            info.current_version
        ),
        Some(_) => format!("Up to date ({})", info.current_version),
        None => format!("Version {}", info.current_version),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use steamstat_core::models::status::{
        HistoryEntry, OutageInfo, ServiceInfo, ServiceState, StatusSnapshot, TrendingGame,
    };

    fn state_with(snapshot: StatusSnapshot, outage: OutageInfo) -> PollerState {
        PollerState {
            phase: PollPhase::Success,
            status: Some(Arc::new(snapshot)),
            outage,
            ..PollerState::default()
        }
    }

    fn sample() -> StatusSnapshot {
        let mut services = BTreeMap::new();
        services.insert("store".to_string(), ServiceInfo::new(ServiceState::Online));
        let mut snapshot = StatusSnapshot::new(
            services,
            vec![HistoryEntry {
                timestamp: "2026-10-19T10:00:00Z".to_string(),
                online: 28_500_000,
                all_services_up: true,
            }],
        );
        snapshot.trending_games = vec![TrendingGame {
            appid: 730,
            name: "Counter-Strike 2".to_string(),
            current_players: 1_200_000,
            gain_24h: -15_000,
        }];
        snapshot
    }

    #[test]
    fn renders_healthy_snapshot() {
        let lines = render_status(
            &state_with(sample(), OutageInfo::default()),
            &PluginSettings::default(),
            None,
        );

        assert!(lines.contains(&"Steam services: all online".to_string()));
        assert!(lines.contains(&"  store: online".to_string()));
        assert!(lines.contains(&"Players online: 28.5M".to_string()));
        assert!(lines.contains(&"  Counter-Strike 2: 1.2M (-15.0K)".to_string()));
    }

    #[test]
    fn hidden_sections_follow_settings() {
        let settings = PluginSettings {
            show_history: false,
            show_trending_games: false,
            ..PluginSettings::default()
        };
        let lines = render_status(&state_with(sample(), OutageInfo::default()), &settings, None);

        assert!(!lines.iter().any(|l| l.starts_with("Players online")));
        assert!(!lines.iter().any(|l| l.starts_with("Trending")));
    }

    #[test]
    fn offline_state_shows_cache_age_and_error() {
        let mut state = state_with(
            sample(),
            OutageInfo {
                had_recent_outage: true,
                outage_count: 2,
                ..OutageInfo::default()
            },
        );
        state.is_offline = true;
        state.error = Some("Offline mode: Invalid API key".to_string());

        let lines = render_status(&state, &PluginSettings::default(), Some(150));

        assert_eq!(lines[0], "Error: Offline mode: Invalid API key");
        assert!(lines.contains(&"Showing cached data (2m ago)".to_string()));
        assert!(lines.contains(&"Steam services: recovered (2 recent outages)".to_string()));
    }

    #[test]
    fn empty_state() {
        let lines = render_status(&PollerState::default(), &PluginSettings::default(), None);
        assert_eq!(lines, vec!["No status data yet".to_string()]);
    }

    #[test]
    fn version_lines() {
        let mut info = LatestVersionInfo::initial("1.2.0");
        assert_eq!(render_version(&info), "Version 1.2.0");

        info.latest_version = Some("1.3.0".to_string());
        info.update_available = true;
        assert_eq!(render_version(&info), "Update available: 1.3.0 (current 1.2.0)");

        info.update_available = false;
        info.latest_version = None;
        info.error = Some("Failed to fetch: 404".to_string());
        assert_eq!(render_version(&info), "Update check failed: Failed to fetch: 404");
    }
}
