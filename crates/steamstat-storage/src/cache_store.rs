//! 오프라인 상태 캐시.
//!
//! 마지막으로 성공한 조회 결과 하나만 고정 키 슬롯에 보관한다.
//! 캐시는 best-effort이며 어떤 실패도 호출자에게 에러로 전파하지 않는다.
//! 만료 정책은 없고, 신선도는 [`CacheStore::age`]로 호출자가 판단한다.

use chrono::Utc;
use std::sync::Arc;
use steamstat_core::models::status::{CachedStatus, StatusSnapshot};
use steamstat_core::ports::storage::SlotStorage;
use tracing::{debug, warn};

/// 캐시 슬롯 키
pub const CACHE_KEY: &str = "steamstat_cache";

/// 단일 슬롯 상태 캐시
pub struct CacheStore {
    storage: Arc<dyn SlotStorage>,
    key: String,
}

impl CacheStore {
    /// [`CACHE_KEY`] 슬롯을 쓰는 캐시 생성
    pub fn new(storage: Arc<dyn SlotStorage>) -> Self {
        Self {
            storage,
            key: CACHE_KEY.to_string(),
        }
    }

    /// 스냅샷 저장 (기존 값을 통째로 덮어쓴다)
    ///
    /// 반드시 네트워크에서 새로 받은 스냅샷만 넘겨야 한다.
    pub fn save(&self, snapshot: &StatusSnapshot) {
        let entry = CachedStatus {
            data: snapshot.clone(),
            cached_at: Utc::now().timestamp_millis(),
        };

        let encoded = match serde_json::to_string(&entry) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!("캐시 직렬화 실패: {e}");
                return;
            }
        };

        match self.storage.write(&self.key, &encoded) {
            Ok(()) => debug!("상태 캐시 저장 완료"),
            Err(e) => warn!("상태 캐시 저장 실패: {e}"),
        }
    }

    /// 캐시 엔트리 전체 조회. 없거나 손상되었으면 `None`
    pub fn load_entry(&self) -> Option<CachedStatus> {
        let raw = match self.storage.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("상태 캐시 읽기 실패: {e}");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("상태 캐시 손상, 캐시 없음으로 처리: {e}");
                None
            }
        }
    }

    /// 캐시된 스냅샷 조회
    pub fn load(&self) -> Option<StatusSnapshot> {
        self.load_entry().map(|entry| entry.data)
    }

    /// 캐시 저장 이후 경과 초 (미래 시각은 0)
    ///
    /// `cachedAt`이 계산 범위를 벗어나면 손상된 값으로 보고 `None`.
    pub fn age(&self) -> Option<u64> {
        let entry = self.load_entry()?;
        let Some(elapsed_ms) = Utc::now().timestamp_millis().checked_sub(entry.cached_at) else {
            warn!("캐시 저장 시각 손상: {}", entry.cached_at);
            return None;
        };
        Some(u64::try_from(elapsed_ms / 1_000).unwrap_or(0))
    }

    /// 캐시 삭제
    pub fn clear(&self) {
        if let Err(e) = self.storage.remove(&self.key) {
            warn!("상태 캐시 삭제 실패: {e}");
        }
    }
}
