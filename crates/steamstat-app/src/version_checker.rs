//! 업데이트 확인.
//!
//! `check_for_updates` 설정이 켜질 때마다 원격 버전 마커를 조회해
//! 현재 버전과 비교한다. 실패는 상태의 `error`에만 남기고 전파하지 않는다.

use std::cmp::Ordering;
use std::sync::Arc;
use steamstat_core::error::CoreError;
use steamstat_core::models::version::LatestVersionInfo;
use steamstat_core::ports::version_source::VersionSource;
use steamstat_core::settings::PluginSettings;
use steamstat_core::version::{compare_versions, is_valid_version_marker};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// 현재 실행 중인 버전 (컴파일 타임)
pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// 최신 버전 확인기
pub struct VersionChecker {
    source: Arc<dyn VersionSource>,
    current_version: String,
    state_tx: watch::Sender<LatestVersionInfo>,
}

impl VersionChecker {
    /// 빌드된 크레이트 버전을 기준으로 하는 확인기 생성
    pub fn new(source: Arc<dyn VersionSource>) -> Self {
        Self::with_current_version(source, CURRENT_VERSION)
    }

    /// 비교 기준 버전 지정
    pub fn with_current_version(
        source: Arc<dyn VersionSource>,
        current_version: impl Into<String>,
    ) -> Self {
        let current_version = current_version.into();
        let (state_tx, _) = watch::channel(LatestVersionInfo::initial(current_version.clone()));
        Self {
            source,
            current_version,
            state_tx,
        }
    }

    /// 현재 확인 결과 (복제본)
    pub fn state(&self) -> LatestVersionInfo {
        self.state_tx.borrow().clone()
    }

    /// 확인 결과 변경 수신기
    pub fn subscribe(&self) -> watch::Receiver<LatestVersionInfo> {
        self.state_tx.subscribe()
    }

    /// 최신 버전 확인
    ///
    /// 비활성이면 조회 없이 초기 상태로 되돌린다.
    pub async fn check(&self, enabled: bool) -> LatestVersionInfo {
        if !enabled {
            self.state_tx
                .send_replace(LatestVersionInfo::initial(self.current_version.clone()));
            return self.state();
        }

        self.state_tx.send_modify(|info| {
            info.is_loading = true;
            info.error = None;
        });

        match self.fetch_latest().await {
            Ok(latest) => {
                let update_available =
                    compare_versions(&latest, &self.current_version) == Ordering::Greater;
                if update_available {
                    info!("새 버전 있음: {} → {latest}", self.current_version);
                } else {
                    debug!("최신 버전 사용 중: {}", self.current_version);
                }
                self.state_tx.send_modify(|info| {
                    info.latest_version = Some(latest);
                    info.update_available = update_available;
                    info.error = None;
                    info.is_loading = false;
                });
            }
            Err(message) => {
                warn!("버전 확인 실패: {message}");
                self.state_tx.send_modify(|info| {
                    info.latest_version = None;
                    info.update_available = false;
                    info.error = Some(message);
                    info.is_loading = false;
                });
            }
        }

        self.state()
    }

    /// 마커 조회 및 형식 검증. 에러는 표시 문구로 변환
    async fn fetch_latest(&self) -> Result<String, String> {
        let raw = self
            .source
            .fetch_latest_version()
            .await
            .map_err(|e| match e {
                CoreError::Http { status } => format!("Failed to fetch: {status}"),
                other => other.to_string(),
            })?;

        let trimmed = raw.trim();
        if !is_valid_version_marker(trimmed) {
            return Err("Invalid version format".to_string());
        }
        Ok(trimmed.to_string())
    }

    /// 설정 감시 루프
    ///
    /// 시작 시 한 번 확인하고, 이후 `check_for_updates` 값이 바뀔 때마다
    /// 다시 확인한다.
    pub async fn run(
        self: Arc<Self>,
        mut settings_rx: watch::Receiver<PluginSettings>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        let mut enabled = settings_rx.borrow_and_update().check_for_updates;
        self.check(enabled).await;

        loop {
            tokio::select! {
                changed = settings_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let now = settings_rx.borrow_and_update().check_for_updates;
                    if now != enabled {
                        enabled = now;
                        self.check(enabled).await;
                    }
                }
                _ = shutdown_rx.changed() => break,
            }
        }
        debug!("버전 확인 루프 종료");
    }
}
