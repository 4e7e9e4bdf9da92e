//! 설정 컨텍스트.
//!
//! 프로세스당 한 번 생성해 `Arc`로 공유하는 설정 저장소.
//! 원격 저장소에서 로드/저장하고, 변경될 때마다 구독자에게 전체 설정을 알린다.
//!
//! - 동기 리스너: [`SettingsStore::subscribe`] / [`SettingsStore::unsubscribe`]
//! - 비동기 소비자: [`SettingsStore::watch`] (`tokio::sync::watch`)

use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::ports::settings_backend::SettingsBackend;
use crate::settings::{PluginSettings, SettingUpdate};

/// 설정 변경 리스너
pub type SettingsListener = Arc<dyn Fn(&PluginSettings) + Send + Sync>;

/// 리스너 등록 핸들
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// 설정 저장소
///
/// 로컬 캐시가 항상 기준이며, 원격 기록 실패 시에도 롤백하지 않는다
/// (last-writer-wins).
pub struct SettingsStore {
    backend: Arc<dyn SettingsBackend>,
    /// 현재 설정 (watch 채널이 곧 캐시)
    state_tx: watch::Sender<PluginSettings>,
    listeners: Mutex<Vec<(SubscriptionId, SettingsListener)>>,
    next_id: AtomicU64,
}

impl SettingsStore {
    /// 기본 설정으로 시작하는 저장소 생성
    pub fn new(backend: Arc<dyn SettingsBackend>) -> Self {
        Self::with_settings(backend, PluginSettings::default())
    }

    /// 초기 설정을 지정해 생성
    pub fn with_settings(backend: Arc<dyn SettingsBackend>, initial: PluginSettings) -> Self {
        let (state_tx, _) = watch::channel(initial.normalized());
        Self {
            backend,
            state_tx,
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// 현재 설정 반환 (복제본)
    pub fn get(&self) -> PluginSettings {
        self.state_tx.borrow().clone()
    }

    /// 원격 저장소에서 전체 설정 로드
    ///
    /// 기본값 위에 병합해 교체하고 구독자에게 알린다.
    /// 원격 실패 시 기존 설정을 그대로 유지하며 에러를 돌려주지 않는다.
    pub async fn load(&self) -> PluginSettings {
        let remote = match self.backend.get_settings().await {
            Ok(remote) => remote,
            Err(e) => {
                warn!("설정 로드 실패, 기존 설정 유지: {e}");
                return self.get();
            }
        };

        let settings = match PluginSettings::merged_over_defaults(&remote) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("설정 응답 해석 실패, 기존 설정 유지: {e}");
                return self.get();
            }
        };

        self.state_tx.send_replace(settings.clone());
        self.notify(&settings);
        info!("설정 로드 완료");
        settings
    }

    /// 단일 필드 변경
    ///
    /// 로컬 설정을 먼저 바꾸고 구독자에게 즉시 알린 뒤 원격에 기록한다.
    /// 원격 기록 실패는 로그만 남긴다.
    pub async fn update(&self, change: SettingUpdate) {
        let change = change.normalized();
        self.state_tx.send_modify(|settings| settings.apply(&change));
        let snapshot = self.get();
        self.notify(&snapshot);

        let key = change.key();
        match self.backend.set_setting(key, change.value()).await {
            Ok(true) => debug!("설정 저장 완료: {key}"),
            Ok(false) => warn!("원격 저장소가 설정 저장을 거부함: {key}"),
            Err(e) => warn!("설정 저장 실패 (로컬 값 유지): {key}: {e}"),
        }
    }

    /// 리스너 등록
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&PluginSettings) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    /// 리스너 해제. 등록되어 있었으면 `true`
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// 비동기 소비자용 변경 수신기
    pub fn watch(&self) -> watch::Receiver<PluginSettings> {
        self.state_tx.subscribe()
    }

    fn notify(&self, settings: &PluginSettings) {
        // 리스너 안에서 구독/해제할 수 있도록 잠금 밖에서 호출
        let listeners: Vec<SettingsListener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            listener(settings);
        }
    }
}

impl fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsStore")
            .field("settings", &*self.state_tx.borrow())
            .field("listeners", &self.listeners.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::AtomicUsize;

    /// 호출 기록용 원격 저장소
    struct RecordingBackend {
        remote: Mutex<Result<Value, String>>,
        writes: Mutex<Vec<(String, Value)>>,
        accept_writes: bool,
    }

    impl RecordingBackend {
        fn new(remote: Value) -> Self {
            Self {
                remote: Mutex::new(Ok(remote)),
                writes: Mutex::new(Vec::new()),
                accept_writes: true,
            }
        }

        fn failing() -> Self {
            Self {
                remote: Mutex::new(Err("rpc unavailable".to_string())),
                writes: Mutex::new(Vec::new()),
                accept_writes: false,
            }
        }
    }

    #[async_trait]
    impl SettingsBackend for RecordingBackend {
        async fn get_settings(&self) -> Result<Value, CoreError> {
            self.remote.lock().clone().map_err(CoreError::Network)
        }

        async fn set_setting(&self, key: &str, value: Value) -> Result<bool, CoreError> {
            self.writes.lock().push((key.to_string(), value));
            if self.accept_writes {
                Ok(true)
            } else {
                Err(CoreError::Network("rpc unavailable".to_string()))
            }
        }
    }

    #[tokio::test]
    async fn load_merges_and_notifies() {
        let backend = Arc::new(RecordingBackend::new(json!({
            "gateway_url": "https://gw.example.com",
            "gateway_api_key": "secret",
        })));
        let store = SettingsStore::new(backend);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        store.subscribe(move |s| seen_clone.lock().push(s.gateway_url.clone()));

        let loaded = store.load().await;
        assert_eq!(loaded.gateway_url, "https://gw.example.com");
        assert!(loaded.show_history);
        assert_eq!(store.get(), loaded);
        assert_eq!(*seen.lock(), vec!["https://gw.example.com".to_string()]);
    }

    #[tokio::test]
    async fn load_failure_keeps_previous_settings() {
        let backend = Arc::new(RecordingBackend::failing());
        let mut initial = PluginSettings::default();
        initial.gateway_url = "https://kept".to_string();
        let store = SettingsStore::with_settings(backend, initial.clone());

        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        store.subscribe(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        let loaded = store.load().await;
        assert_eq!(loaded, initial);
        assert_eq!(store.get(), initial);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn update_is_optimistic_and_persists_single_key() {
        let backend = Arc::new(RecordingBackend::new(json!({})));
        let store = SettingsStore::new(backend.clone());

        store
            .update(SettingUpdate::RefreshIntervalSeconds(60))
            .await;

        assert_eq!(store.get().refresh_interval_seconds, 180);
        let writes = backend.writes.lock().clone();
        assert_eq!(
            writes,
            vec![("refresh_interval_seconds".to_string(), json!(180))]
        );
    }

    #[tokio::test]
    async fn update_without_rollback_on_persist_failure() {
        let backend = Arc::new(RecordingBackend::failing());
        let store = SettingsStore::new(backend.clone());

        let seen = Arc::new(Mutex::new(None));
        let seen_clone = seen.clone();
        store.subscribe(move |s| *seen_clone.lock() = Some(s.check_for_updates));

        store.update(SettingUpdate::CheckForUpdates(false)).await;

        assert!(!store.get().check_for_updates);
        assert_eq!(*seen.lock(), Some(false));
        assert_eq!(backend.writes.lock().len(), 1);
    }

    #[tokio::test]
    async fn unsubscribe_stops_notifications() {
        let store = SettingsStore::new(Arc::new(RecordingBackend::new(json!({}))));
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let id = store.subscribe(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        store.update(SettingUpdate::ShowHistory(false)).await;
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.update(SettingUpdate::ShowHistory(true)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn watch_receives_updates() {
        let store = SettingsStore::new(Arc::new(RecordingBackend::new(json!({}))));
        let mut rx = store.watch();

        store
            .update(SettingUpdate::GatewayUrl("https://new".to_string()))
            .await;

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().gateway_url, "https://new");
    }
}
