//! 게이트웨이 상태 모델.
//!
//! `GET /api/v1/status` 응답 스냅샷, 이력 샘플, 캐시 엔트리, 장애 파생 정보.
//! 표시용 메타데이터는 해석하지 않고 `extra`에 그대로 보존한다
//! (캐시 왕복 시 데이터 손실 방지).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// 개별 서비스 상태
///
/// 알 수 없는 문자열은 `Other`로 보존하며 장애로 취급한다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceState {
    /// 정상
    Online,
    /// 성능 저하
    Degraded,
    /// 중단
    Offline,
    /// 게이트웨이가 정의한 기타 상태
    Other(String),
}

impl ServiceState {
    /// 정상 상태 여부
    pub fn is_online(&self) -> bool {
        matches!(self, ServiceState::Online)
    }

    /// 직렬화 문자열
    pub fn as_str(&self) -> &str {
        match self {
            ServiceState::Online => "online",
            ServiceState::Degraded => "degraded",
            ServiceState::Offline => "offline",
            ServiceState::Other(raw) => raw,
        }
    }
}

impl From<String> for ServiceState {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "online" => ServiceState::Online,
            "degraded" => ServiceState::Degraded,
            "offline" => ServiceState::Offline,
            _ => ServiceState::Other(raw),
        }
    }
}

impl From<ServiceState> for String {
    fn from(state: ServiceState) -> Self {
        match state {
            ServiceState::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 서비스 항목 (`services` 맵의 값)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// 현재 상태
    pub status: ServiceState,
    /// 표시용 부가 필드 (지역, 응답 시간 등)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServiceInfo {
    /// 부가 필드 없는 서비스 항목
    pub fn new(status: ServiceState) -> Self {
        Self {
            status,
            extra: Map::new(),
        }
    }
}

/// 이력 샘플 (게이트웨이가 생성, 오래된 순)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// ISO-8601 시각 문자열
    pub timestamp: String,
    /// 접속자 수
    #[serde(default)]
    pub online: u64,
    /// 샘플 시점에 모든 서비스가 정상이었는지
    pub all_services_up: bool,
}

/// 인기 상승 게임 항목 (표시 전용)
///
/// 누락된 필드는 기본값으로 채운다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingGame {
    /// Steam 앱 ID
    #[serde(default)]
    pub appid: u64,
    /// 게임 이름
    #[serde(default)]
    pub name: String,
    /// 현재 접속자 수
    #[serde(default)]
    pub current_players: u64,
    /// 24시간 증감
    #[serde(default)]
    pub gain_24h: i64,
}

/// 한 번의 조회 결과 전체
///
/// 수신 후 불변이며, 성공한 조회마다 통째로 교체된다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// 서비스명 → 상태
    pub services: BTreeMap<String, ServiceInfo>,
    /// 이력 (오래된 순)
    #[serde(default, deserialize_with = "null_as_default")]
    pub history: Vec<HistoryEntry>,
    /// 인기 상승 게임 (해석할 수 없는 항목은 버린다)
    #[serde(
        default,
        deserialize_with = "lenient_trending_games",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub trending_games: Vec<TrendingGame>,
    /// 그 외 표시용 메타데이터 (그대로 통과)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StatusSnapshot {
    /// 서비스 목록만으로 스냅샷 생성
    pub fn new(services: BTreeMap<String, ServiceInfo>, history: Vec<HistoryEntry>) -> Self {
        Self {
            services,
            history,
            trending_games: Vec::new(),
            extra: Map::new(),
        }
    }

    /// 가장 최근 이력 샘플의 접속자 수
    pub fn latest_online(&self) -> Option<u64> {
        self.history.last().map(|entry| entry.online)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 표시 전용 목록이므로 형식이 틀려도 스냅샷 전체를 거부하지 않는다
fn lenient_trending_games<'de, D>(deserializer: D) -> Result<Vec<TrendingGame>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items,
        Some(other) => {
            debug!("trending_games 형식 무시: {other}");
            return Ok(Vec::new());
        }
        None => return Ok(Vec::new()),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(game) => Some(game),
            Err(e) => {
                debug!("trending_games 항목 무시: {e}");
                None
            }
        })
        .collect())
}

/// 로컬 캐시 슬롯에 저장되는 엔트리
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedStatus {
    /// 마지막으로 성공한 조회 결과
    pub data: StatusSnapshot,
    /// 저장 시각 (epoch millis)
    #[serde(rename = "cachedAt")]
    pub cached_at: i64,
}

/// 현재 활성 스냅샷에서 파생된 장애 정보 (저장하지 않음)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutageInfo {
    /// 현재 정상이 아닌 서비스가 있는지
    pub has_current_outage: bool,
    /// 이력 구간 내 장애가 있었는지
    pub had_recent_outage: bool,
    /// 장애 샘플 수
    pub outage_count: usize,
    /// 마지막 장애 샘플 시각
    pub last_outage_time: Option<String>,
}
