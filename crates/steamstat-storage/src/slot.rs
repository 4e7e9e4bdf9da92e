//! 슬롯 저장소 구현.
//!
//! - [`FileSlotStorage`]: 키 하나를 `<dir>/<key>.json` 파일 하나로 보관
//! - [`MemorySlotStorage`]: 프로세스 메모리 (테스트, 임시 실행)

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use steamstat_core::error::CoreError;
use steamstat_core::ports::storage::SlotStorage;
use tracing::debug;

/// 파일 기반 슬롯 저장소
///
/// 쓰기는 임시 파일에 기록한 뒤 rename 하므로 중간에 끊겨도
/// 기존 값이 반쯤 덮어써지지 않는다.
#[derive(Debug, Clone)]
pub struct FileSlotStorage {
    dir: PathBuf,
}

impl FileSlotStorage {
    /// 지정된 디렉토리를 쓰는 저장소 생성 (디렉토리는 첫 쓰기 때 생성)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, CoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(CoreError::Validation {
                field: "key".to_string(),
                message: format!("허용되지 않는 슬롯 키: {key:?}"),
            });
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SlotStorage for FileSlotStorage {
    fn read(&self, key: &str) -> Result<Option<String>, CoreError> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CoreError::Cache(format!(
                "슬롯 읽기 실패: {}: {e}",
                path.display()
            ))),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let path = self.slot_path(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| {
            CoreError::Cache(format!(
                "슬롯 디렉토리 생성 실패: {}: {e}",
                self.dir.display()
            ))
        })?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value)
            .and_then(|()| fs::rename(&tmp_path, &path))
            .map_err(|e| {
                CoreError::Cache(format!("슬롯 쓰기 실패: {}: {e}", path.display()))
            })?;

        debug!("슬롯 저장: {} ({} bytes)", path.display(), value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::Cache(format!(
                "슬롯 삭제 실패: {}: {e}",
                path.display()
            ))),
        }
    }
}

/// 메모리 슬롯 저장소
#[derive(Debug, Default)]
pub struct MemorySlotStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemorySlotStorage {
    /// 빈 저장소 생성
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStorage for MemorySlotStorage {
    fn read(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.slots.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.slots.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.slots.lock().remove(key);
        Ok(())
    }
}
