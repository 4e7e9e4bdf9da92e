//! 설정 파일 백엔드.
//!
//! 호스트 키/값 설정 저장소를 `settings.json` 파일 하나로 구현한다.
//! 파일에는 알려진 설정 키만 기록하며, 읽을 때 누락된 키는 기본값으로 채운다.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use steamstat_core::error::CoreError;
use steamstat_core::ports::settings_backend::SettingsBackend;
use steamstat_core::settings::{PluginSettings, SETTING_KEYS};
use tracing::{debug, error, info, warn};

/// 설정 파일 이름
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// JSON 파일 설정 저장소
#[derive(Debug)]
pub struct FileSettingsBackend {
    path: PathBuf,
    settings: Mutex<Map<String, Value>>,
}

impl FileSettingsBackend {
    /// 설정 파일 열기
    ///
    /// 파일이 없거나 읽을 수 없으면 기본값으로 시작한다 (에러로 실패하지 않음).
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut settings = default_map();

        if path.exists() {
            match Self::load_from_file(&path) {
                Ok(stored) => {
                    for (key, value) in stored {
                        if SETTING_KEYS.contains(&key.as_str()) {
                            settings.insert(key, value);
                        }
                    }
                    debug!("설정 파일 로드: {}", path.display());
                }
                Err(e) => error!("설정 파일 로드 실패, 기본값 사용: {e}"),
            }
        } else {
            info!("설정 파일 없음, 기본값 사용: {}", path.display());
        }

        Self {
            path,
            settings: Mutex::new(settings),
        }
    }

    /// 설정 파일 경로
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 단일 키 조회
    pub fn get_setting(&self, key: &str) -> Option<Value> {
        self.settings.lock().get(key).cloned()
    }

    /// 여러 키를 한 번에 저장. 알 수 없는 키는 무시한다.
    pub fn set_settings(&self, values: Map<String, Value>) -> Result<bool, CoreError> {
        let snapshot = {
            let mut settings = self.settings.lock();
            for (key, value) in values {
                if SETTING_KEYS.contains(&key.as_str()) {
                    settings.insert(key, value);
                } else {
                    warn!("알 수 없는 설정 키 무시: {key}");
                }
            }
            settings.clone()
        };
        self.save_to_file(&snapshot)?;
        Ok(true)
    }

    /// 모든 설정을 기본값으로 되돌리고 저장
    pub fn reset_settings(&self) -> Result<bool, CoreError> {
        let snapshot = {
            let mut settings = self.settings.lock();
            *settings = default_map();
            settings.clone()
        };
        self.save_to_file(&snapshot)?;
        info!("설정 초기화 완료");
        Ok(true)
    }

    fn load_from_file(path: &Path) -> Result<Map<String, Value>, CoreError> {
        let content = fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("설정 파일 읽기 실패: {}: {e}", path.display()))
        })?;

        match serde_json::from_str(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(CoreError::Config(format!(
                "설정 파일이 JSON 객체가 아님: {}",
                path.display()
            ))),
            Err(e) => Err(CoreError::Config(format!(
                "설정 파일 파싱 실패: {}: {e}",
                path.display()
            ))),
        }
    }

    fn save_to_file(&self, settings: &Map<String, Value>) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    CoreError::Config(format!(
                        "설정 디렉토리 생성 실패: {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, content).map_err(|e| {
            CoreError::Config(format!(
                "설정 파일 쓰기 실패: {}: {e}",
                self.path.display()
            ))
        })?;
        debug!("설정 파일 저장: {}", self.path.display());
        Ok(())
    }
}

#[async_trait]
impl SettingsBackend for FileSettingsBackend {
    async fn get_settings(&self) -> Result<Value, CoreError> {
        Ok(Value::Object(self.settings.lock().clone()))
    }

    async fn set_setting(&self, key: &str, value: Value) -> Result<bool, CoreError> {
        if !SETTING_KEYS.contains(&key) {
            warn!("알 수 없는 설정 키 거부: {key}");
            return Ok(false);
        }

        let snapshot = {
            let mut settings = self.settings.lock();
            settings.insert(key.to_string(), value);
            settings.clone()
        };
        self.save_to_file(&snapshot)?;
        Ok(true)
    }
}

fn default_map() -> Map<String, Value> {
    // 기본 설정은 항상 객체로 직렬화된다
    PluginSettings::default().to_map().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileSettingsBackend::open(temp_dir.path().join(SETTINGS_FILE_NAME));

        let value = backend.get_settings().await.unwrap();
        let settings = PluginSettings::merged_over_defaults(&value).unwrap();
        assert_eq!(settings, PluginSettings::default());
        assert!(!backend.path().exists());
    }

    #[tokio::test]
    async fn set_setting_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join(SETTINGS_FILE_NAME);

        let backend = FileSettingsBackend::open(&path);
        assert!(backend
            .set_setting("gateway_url", json!("https://gw.example.com"))
            .await
            .unwrap());
        assert!(path.exists());

        let reopened = FileSettingsBackend::open(&path);
        assert_eq!(
            reopened.get_setting("gateway_url"),
            Some(json!("https://gw.example.com"))
        );
        assert_eq!(
            reopened.get_setting("refresh_interval_seconds"),
            Some(json!(300))
        );
    }

    #[tokio::test]
    async fn unknown_key_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileSettingsBackend::open(temp_dir.path().join(SETTINGS_FILE_NAME));

        assert!(!backend.set_setting("show_regions", json!(true)).await.unwrap());
        assert_eq!(backend.get_setting("show_regions"), None);
    }

    #[test]
    fn bulk_set_ignores_unknown_keys() {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileSettingsBackend::open(temp_dir.path().join(SETTINGS_FILE_NAME));

        let mut values = Map::new();
        values.insert("show_history".to_string(), json!(false));
        values.insert("legacy_option".to_string(), json!(1));
        assert!(backend.set_settings(values).unwrap());

        assert_eq!(backend.get_setting("show_history"), Some(json!(false)));
        assert_eq!(backend.get_setting("legacy_option"), None);
    }

    #[test]
    fn reset_restores_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(SETTINGS_FILE_NAME);
        let backend = FileSettingsBackend::open(&path);

        let mut values = Map::new();
        values.insert("gateway_api_key".to_string(), json!("secret"));
        backend.set_settings(values).unwrap();
        backend.reset_settings().unwrap();

        assert_eq!(backend.get_setting("gateway_api_key"), Some(json!("")));
        let reopened = FileSettingsBackend::open(&path);
        assert_eq!(reopened.get_setting("gateway_api_key"), Some(json!("")));
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(SETTINGS_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        let backend = FileSettingsBackend::open(&path);
        assert_eq!(backend.get_setting("show_history"), Some(json!(true)));
    }

    #[test]
    fn stored_unknown_keys_are_dropped_on_open() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(SETTINGS_FILE_NAME);
        fs::write(&path, r#"{"check_for_updates": false, "theme": "dark"}"#).unwrap();

        let backend = FileSettingsBackend::open(&path);
        assert_eq!(backend.get_setting("check_for_updates"), Some(json!(false)));
        assert_eq!(backend.get_setting("theme"), None);
    }
}
