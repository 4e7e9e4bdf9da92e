//! 플러그인 설정 구조체.
//!
//! 게이트웨이 접속 정보, 갱신 주기, 표시 옵션을 정의한다.
//! 설정은 필드 단위([`SettingUpdate`])로만 변경되며, 원격 저장소에는
//! `(키, JSON 값)` 쌍으로 기록된다.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::warn;

use crate::error::CoreError;

/// 자동 갱신 최소 주기 (초). 0(비활성)은 예외
pub const MIN_REFRESH_INTERVAL_SECS: u64 = 180;

/// 기본 자동 갱신 주기 (초)
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;

/// 기본 상태 페이지 URL
pub const DEFAULT_STATUS_PAGE_URL: &str = "https://store.steampowered.com/charts";

/// 원격 저장소가 받아들이는 설정 키 목록
pub const SETTING_KEYS: [&str; 8] = [
    "gateway_url",
    "gateway_api_key",
    "refresh_interval_seconds",
    "show_history",
    "show_trending_games",
    "check_for_updates",
    "enable_notifications",
    "status_page_url",
];

/// 갱신 주기 정규화: 0은 유지, 1~179는 180으로 올림
pub fn clamp_refresh_interval(secs: u64) -> u64 {
    if secs == 0 {
        0
    } else {
        secs.max(MIN_REFRESH_INTERVAL_SECS)
    }
}

/// 플러그인 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginSettings {
    /// 게이트웨이 기본 URL (예: `https://gateway.example.com`)
    pub gateway_url: String,
    /// 게이트웨이 API 키 (`X-API-Key` 헤더)
    pub gateway_api_key: String,
    /// 자동 갱신 주기 (초, 0 = 비활성)
    pub refresh_interval_seconds: u64,
    /// 접속자 이력 그래프 표시
    pub show_history: bool,
    /// 인기 상승 게임 표시
    pub show_trending_games: bool,
    /// 업데이트 확인 활성화
    pub check_for_updates: bool,
    /// 장애 알림 활성화 (알림 자체는 백그라운드 모니터 담당)
    pub enable_notifications: bool,
    /// 상태 페이지 링크
    pub status_page_url: String,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            gateway_url: String::new(),
            gateway_api_key: String::new(),
            refresh_interval_seconds: DEFAULT_REFRESH_INTERVAL_SECS,
            show_history: true,
            show_trending_games: true,
            check_for_updates: true,
            enable_notifications: false,
            status_page_url: DEFAULT_STATUS_PAGE_URL.to_string(),
        }
    }
}

impl PluginSettings {
    /// 원격 설정 객체를 기본값 위에 병합
    ///
    /// 키 단위로 원격 값이 우선하고, 없는 키는 기본값을 쓴다.
    /// 타입이 맞지 않는 키와 `null`은 건너뛴다 (해당 키만 기본값 유지).
    pub fn merged_over_defaults(remote: &Value) -> Result<Self, CoreError> {
        let Value::Object(remote) = remote else {
            return Err(CoreError::Validation {
                field: "settings".to_string(),
                message: "설정 응답이 JSON 객체가 아닙니다".to_string(),
            });
        };

        let mut merged = Self::default().to_map()?;
        for (key, value) in remote {
            if value.is_null() || !merged.contains_key(key) {
                continue;
            }

            let mut candidate = merged.clone();
            candidate.insert(key.clone(), value.clone());
            if serde_json::from_value::<Self>(Value::Object(candidate.clone())).is_ok() {
                merged = candidate;
            } else {
                warn!("설정 키 타입 불일치, 기본값 유지: {key}={value}");
            }
        }

        let settings: Self = serde_json::from_value(Value::Object(merged))?;
        Ok(settings.normalized())
    }

    /// JSON 객체로 변환
    pub fn to_map(&self) -> Result<Map<String, Value>, CoreError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(CoreError::Internal(format!(
                "설정 직렬화 결과가 객체가 아님: {other}"
            ))),
        }
    }

    /// 게이트웨이 URL과 API 키가 모두 설정되었는지
    pub fn is_gateway_configured(&self) -> bool {
        !self.gateway_url.trim().is_empty() && !self.gateway_api_key.trim().is_empty()
    }

    /// 자동 갱신 주기 (비활성이면 `None`)
    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.refresh_interval_seconds > 0)
            .then(|| Duration::from_secs(self.refresh_interval_seconds))
    }

    /// 필드 단위 변경 적용
    pub fn apply(&mut self, change: &SettingUpdate) {
        match change {
            SettingUpdate::GatewayUrl(v) => self.gateway_url = v.clone(),
            SettingUpdate::GatewayApiKey(v) => self.gateway_api_key = v.clone(),
            SettingUpdate::RefreshIntervalSeconds(v) => {
                self.refresh_interval_seconds = clamp_refresh_interval(*v)
            }
            SettingUpdate::ShowHistory(v) => self.show_history = *v,
            SettingUpdate::ShowTrendingGames(v) => self.show_trending_games = *v,
            SettingUpdate::CheckForUpdates(v) => self.check_for_updates = *v,
            SettingUpdate::EnableNotifications(v) => self.enable_notifications = *v,
            SettingUpdate::StatusPageUrl(v) => self.status_page_url = v.clone(),
        }
    }

    /// 불변식 보정 (갱신 주기 하한)
    pub fn normalized(mut self) -> Self {
        self.refresh_interval_seconds = clamp_refresh_interval(self.refresh_interval_seconds);
        self
    }
}

/// 단일 설정 필드 변경
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingUpdate {
    GatewayUrl(String),
    GatewayApiKey(String),
    RefreshIntervalSeconds(u64),
    ShowHistory(bool),
    ShowTrendingGames(bool),
    CheckForUpdates(bool),
    EnableNotifications(bool),
    StatusPageUrl(String),
}

impl SettingUpdate {
    /// 원격 저장소 키
    pub fn key(&self) -> &'static str {
        match self {
            SettingUpdate::GatewayUrl(_) => "gateway_url",
            SettingUpdate::GatewayApiKey(_) => "gateway_api_key",
            SettingUpdate::RefreshIntervalSeconds(_) => "refresh_interval_seconds",
            SettingUpdate::ShowHistory(_) => "show_history",
            SettingUpdate::ShowTrendingGames(_) => "show_trending_games",
            SettingUpdate::CheckForUpdates(_) => "check_for_updates",
            SettingUpdate::EnableNotifications(_) => "enable_notifications",
            SettingUpdate::StatusPageUrl(_) => "status_page_url",
        }
    }

    /// 원격 저장소에 기록할 값
    pub fn value(&self) -> Value {
        match self {
            SettingUpdate::GatewayUrl(v)
            | SettingUpdate::GatewayApiKey(v)
            | SettingUpdate::StatusPageUrl(v) => Value::String(v.clone()),
            SettingUpdate::RefreshIntervalSeconds(v) => Value::from(*v),
            SettingUpdate::ShowHistory(v)
            | SettingUpdate::ShowTrendingGames(v)
            | SettingUpdate::CheckForUpdates(v)
            | SettingUpdate::EnableNotifications(v) => Value::Bool(*v),
        }
    }

    /// 저장 전 값 정규화 (로컬 상태와 원격 기록값을 일치시킨다)
    pub fn normalized(self) -> Self {
        match self {
            SettingUpdate::RefreshIntervalSeconds(v) => {
                SettingUpdate::RefreshIntervalSeconds(clamp_refresh_interval(v))
            }
            other => other,
        }
    }
}
