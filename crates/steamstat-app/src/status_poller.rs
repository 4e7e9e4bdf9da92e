//! 상태 폴러.
//!
//! 게이트웨이 상태를 조회하고, 실패하면 로컬 캐시로 대체해 노출한다.
//! 상태는 `watch` 채널([`PollerState`])로 발행하며, 활성 스냅샷이 바뀔 때마다
//! 장애 정보를 다시 계산한다.
//!
//! 자동 갱신 타이머는 설정의 `refresh_interval_seconds`를 따른다.
//! 주기가 바뀌면 기존 타이머를 중단하고 새로 시작하며, 0이면 자동 갱신을 끈다
//! (수동 [`StatusPoller::refresh`]는 계속 동작).

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use steamstat_core::models::status::{OutageInfo, StatusSnapshot};
use steamstat_core::outage;
use steamstat_core::ports::status_source::StatusSource;
use steamstat_core::settings_store::SettingsStore;
use steamstat_storage::cache_store::CacheStore;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// 게이트웨이 미설정 안내 문구
pub const NOT_CONFIGURED_MESSAGE: &str =
    "Gateway not configured. Please set URL and API key in settings.";

/// 폴러 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    /// 아직 조회 전
    Idle,
    /// 조회 중
    Loading,
    /// 최신 데이터 표시 중
    Success,
    /// 조회 실패, 캐시 데이터 표시 중
    ErrorWithCache,
    /// 조회 실패, 대체할 캐시 없음
    ErrorNoCache,
}

/// 폴러가 발행하는 상태
#[derive(Debug, Clone)]
pub struct PollerState {
    pub phase: PollPhase,
    /// 현재 활성 스냅샷 (최신 또는 캐시)
    pub status: Option<Arc<StatusSnapshot>>,
    pub is_loading: bool,
    /// 사용자 표시용 에러 문구
    pub error: Option<String>,
    /// 캐시 데이터를 표시 중인지
    pub is_offline: bool,
    /// 마지막 조회 성공 시각
    pub last_updated: Option<DateTime<Utc>>,
    /// 활성 스냅샷에서 파생된 장애 정보
    pub outage: OutageInfo,
}

impl Default for PollerState {
    fn default() -> Self {
        Self {
            phase: PollPhase::Idle,
            status: None,
            is_loading: false,
            error: None,
            is_offline: false,
            last_updated: None,
            outage: OutageInfo::default(),
        }
    }
}

impl PollerState {
    /// 활성 스냅샷 교체 (장애 정보 재계산 포함)
    fn set_active(&mut self, snapshot: Arc<StatusSnapshot>) {
        self.outage = outage::detect(&snapshot);
        self.status = Some(snapshot);
    }
}

struct PollTimer {
    interval_secs: u64,
    handle: JoinHandle<()>,
}

/// 게이트웨이 상태 폴러
pub struct StatusPoller {
    settings: Arc<SettingsStore>,
    source: Arc<dyn StatusSource>,
    cache: Arc<CacheStore>,
    state_tx: watch::Sender<PollerState>,
    timer: Mutex<Option<PollTimer>>,
    supervisor: Mutex<Option<JoinHandle<()>>>,
}

impl StatusPoller {
    /// 새 폴러 생성
    pub fn new(
        settings: Arc<SettingsStore>,
        source: Arc<dyn StatusSource>,
        cache: Arc<CacheStore>,
    ) -> Arc<Self> {
        let (state_tx, _) = watch::channel(PollerState::default());
        Arc::new(Self {
            settings,
            source,
            cache,
            state_tx,
            timer: Mutex::new(None),
            supervisor: Mutex::new(None),
        })
    }

    /// 현재 상태 (복제본)
    pub fn state(&self) -> PollerState {
        self.state_tx.borrow().clone()
    }

    /// 상태 변경 수신기
    pub fn subscribe(&self) -> watch::Receiver<PollerState> {
        self.state_tx.subscribe()
    }

    /// 폴러 활성화
    ///
    /// 캐시를 즉시 노출하고, 한 번 조회한 뒤, 설정 주기에 맞춰 타이머를 건다.
    pub async fn activate(self: &Arc<Self>) -> PollerState {
        self.surface_cache();
        let state = self.refresh().await;
        self.start_supervisor();
        state
    }

    /// 캐시된 스냅샷이 있으면 오프라인 데이터로 노출
    pub fn surface_cache(&self) -> bool {
        let Some(cached) = self.cache.load() else {
            debug!("노출할 캐시 없음");
            return false;
        };

        self.state_tx.send_modify(|state| {
            state.set_active(Arc::new(cached));
            state.is_offline = true;
        });
        debug!("캐시 스냅샷 노출");
        true
    }

    /// 상태 조회 1회
    ///
    /// 접속 정보는 호출 시점 설정을 캡처해 사용한다.
    /// 겹치는 호출은 취소하지 않으며 나중에 끝난 쪽의 결과가 남는다.
    pub async fn refresh(&self) -> PollerState {
        let settings = self.settings.get();

        if !settings.is_gateway_configured() {
            debug!("게이트웨이 미설정, 조회 생략");
            // 진행 중인 조회가 있으면 로딩 표시는 그 조회가 정리한다
            self.state_tx.send_modify(|state| {
                state.phase = PollPhase::ErrorNoCache;
                state.error = Some(NOT_CONFIGURED_MESSAGE.to_string());
            });
            return self.state();
        }

        self.state_tx.send_modify(|state| {
            state.phase = PollPhase::Loading;
            state.is_loading = true;
            state.error = None;
        });

        let result = self
            .source
            .fetch_status(&settings.gateway_url, &settings.gateway_api_key)
            .await;

        match result {
            Ok(snapshot) => {
                self.cache.save(&snapshot);
                self.state_tx.send_modify(|state| {
                    state.set_active(Arc::new(snapshot));
                    state.phase = PollPhase::Success;
                    state.last_updated = Some(Utc::now());
                    state.is_offline = false;
                    state.error = None;
                    state.is_loading = false;
                });
                debug!("상태 조회 성공");
            }
            Err(e) => {
                let message = e.to_string();
                if e.is_retryable() {
                    warn!("상태 조회 실패, 다음 갱신에서 재시도: {message}");
                } else {
                    warn!("상태 조회 실패, 설정 확인 필요: {message}");
                }

                match self.cache.load() {
                    Some(cached) => {
                        self.state_tx.send_modify(|state| {
                            state.set_active(Arc::new(cached));
                            state.phase = PollPhase::ErrorWithCache;
                            state.is_offline = true;
                            state.error = Some(format!("Offline mode: {message}"));
                            state.is_loading = false;
                        });
                        info!("오프라인 모드: 캐시 데이터 표시");
                    }
                    None => {
                        self.state_tx.send_modify(|state| {
                            state.phase = PollPhase::ErrorNoCache;
                            state.is_offline = false;
                            state.error = Some(message);
                            state.is_loading = false;
                        });
                    }
                }
            }
        }

        self.state()
    }

    /// 현재 자동 갱신 주기 (타이머가 없으면 `None`)
    pub fn timer_interval_secs(&self) -> Option<u64> {
        self.timer.lock().as_ref().map(|timer| timer.interval_secs)
    }

    /// 자동 갱신 타이머 재설정
    ///
    /// 같은 주기로 이미 동작 중이면 아무것도 하지 않는다.
    pub fn reschedule(self: &Arc<Self>, interval_secs: u64) {
        let mut slot = self.timer.lock();

        if let Some(current) = slot.as_ref() {
            if current.interval_secs == interval_secs && !current.handle.is_finished() {
                return;
            }
        }

        if let Some(previous) = slot.take() {
            previous.handle.abort();
        }

        if interval_secs == 0 {
            info!("자동 갱신 비활성화");
            return;
        }

        let handle = spawn_timer(Arc::downgrade(self), Duration::from_secs(interval_secs));
        *slot = Some(PollTimer {
            interval_secs,
            handle,
        });
        info!("자동 갱신 주기 설정: {interval_secs}초");
    }

    /// 설정 변경을 감시해 타이머를 맞추는 태스크 시작
    fn start_supervisor(self: &Arc<Self>) {
        let mut settings_rx = self.settings.watch();
        let interval = settings_rx.borrow_and_update().refresh_interval_seconds;
        self.reschedule(interval);

        let weak = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            while settings_rx.changed().await.is_ok() {
                let interval = settings_rx.borrow_and_update().refresh_interval_seconds;
                let Some(poller) = weak.upgrade() else {
                    break;
                };
                poller.reschedule(interval);
            }
            debug!("타이머 감시 태스크 종료");
        });

        if let Some(previous) = self.supervisor.lock().replace(handle) {
            previous.abort();
        }
    }

    /// 타이머와 감시 태스크 중단
    pub fn shutdown(&self) {
        if let Some(handle) = self.supervisor.lock().take() {
            handle.abort();
        }
        if let Some(timer) = self.timer.lock().take() {
            timer.handle.abort();
        }
        info!("상태 폴러 중단");
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        if let Some(handle) = self.supervisor.get_mut().take() {
            handle.abort();
        }
        if let Some(timer) = self.timer.get_mut().take() {
            timer.handle.abort();
        }
    }
}

/// 주기 타이머 태스크
///
/// 조회는 별도 태스크로 띄우므로 타이머가 중단되어도 진행 중인 조회는 끝까지 간다.
fn spawn_timer(poller: Weak<StatusPoller>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let Some(poller) = poller.upgrade() else {
                break;
            };
            debug!("예약 갱신 실행");
            tokio::spawn(async move {
                poller.refresh().await;
            });
        }
    })
}
