//! 표시용 포매터.

use chrono::{DateTime, Local};

/// 접속자 수 축약 (28500000 → "28.5M")
pub fn format_player_count(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

/// 경과 초를 상대 시간으로 ("30s ago", "2m ago", "3h ago")
pub fn format_relative_time(seconds: u64) -> String {
    if seconds < 60 {
        format!("{seconds}s ago")
    } else if seconds < 3_600 {
        format!("{}m ago", seconds / 60)
    } else {
        format!("{}h ago", seconds / 3_600)
    }
}

/// 장애 시각을 로컬 `HH:MM`으로. 해석할 수 없으면 `None`
pub fn format_outage_time(timestamp: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(timestamp)
        .ok()
        .map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_count_abbreviation() {
        assert_eq!(format_player_count(950), "950");
        assert_eq!(format_player_count(1_500), "1.5K");
        assert_eq!(format_player_count(28_500_000), "28.5M");
    }

    #[test]
    fn relative_time_buckets() {
        assert_eq!(format_relative_time(30), "30s ago");
        assert_eq!(format_relative_time(150), "2m ago");
        assert_eq!(format_relative_time(7_200), "2h ago");
    }

    #[test]
    fn outage_time_requires_rfc3339() {
        assert!(format_outage_time("2026-10-19T10:15:00Z").is_some());
        assert!(format_outage_time("yesterday").is_none());
    }
}
