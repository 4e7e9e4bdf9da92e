//! # steamstat
//!
//! SteamStat 헤드리스 클라이언트 진입점.
//! 설정 저장소, 상태 캐시, 게이트웨이 클라이언트를 와이어링하고
//! 폴러/업데이트 확인기의 라이프사이클을 관리한다.

mod lifecycle;
mod presenter;
mod status_poller;
mod version_checker;

use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use steamstat_core::settings::SettingUpdate;
use steamstat_core::settings_store::SettingsStore;
use steamstat_network::gateway_client::GatewayClient;
use steamstat_network::version_client::LatestVersionClient;
use steamstat_network::DEFAULT_TIMEOUT_SECS;
use steamstat_storage::cache_store::CacheStore;
use steamstat_storage::settings_file::{FileSettingsBackend, SETTINGS_FILE_NAME};
use steamstat_storage::slot::FileSlotStorage;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::lifecycle::LifecycleManager;
use crate::status_poller::{PollerState, StatusPoller};
use crate::version_checker::VersionChecker;

/// 캐시 슬롯 디렉토리 이름
const CACHE_DIR_NAME: &str = "cache";

/// SteamStat 상태 클라이언트
///
/// Steam 서비스 상태 게이트웨이를 주기적으로 조회하고,
/// 연결이 끊기면 마지막 결과를 캐시에서 보여준다.
#[derive(Parser, Debug)]
#[command(name = "steamstat")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 데이터 저장 경로 (설정 파일, 캐시)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// 게이트웨이 URL (설정에 저장됨)
    #[arg(long)]
    gateway_url: Option<String>,

    /// 게이트웨이 API 키 (설정에 저장됨)
    #[arg(long)]
    api_key: Option<String>,

    /// 자동 갱신 주기 (초, 0 = 비활성, 180 미만은 180으로 보정)
    #[arg(long)]
    interval: Option<u64>,

    /// 한 번 조회하고 종료
    #[arg(long)]
    once: bool,

    /// 업데이트 확인만 하고 종료
    #[arg(long)]
    check_update: bool,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,
}

/// 데이터 디렉토리 결정 (CLI 인자 또는 플랫폼별 기본 경로)
///
/// # 플랫폼별 기본 경로:
/// - macOS: `~/Library/Application Support/com.steamstat.steamstat/`
/// - Windows: `%APPDATA%\steamstat\steamstat\data\`
/// - Linux: `~/.local/share/steamstat/`
fn resolve_data_dir(data_dir: Option<&Path>) -> PathBuf {
    data_dir
        .map(Path::to_path_buf)
        .or_else(|| {
            ProjectDirs::from("com", "steamstat", "steamstat").map(|p| p.data_dir().to_path_buf())
        })
        .unwrap_or_else(|| PathBuf::from("./steamstat"))
}

/// CLI로 받은 접속 정보/주기를 설정에 반영
async fn apply_cli_overrides(settings: &SettingsStore, args: &Args) {
    if let Some(url) = &args.gateway_url {
        settings
            .update(SettingUpdate::GatewayUrl(url.trim().to_string()))
            .await;
    }
    if let Some(key) = &args.api_key {
        settings
            .update(SettingUpdate::GatewayApiKey(key.trim().to_string()))
            .await;
    }
    if let Some(interval) = args.interval {
        settings
            .update(SettingUpdate::RefreshIntervalSeconds(interval))
            .await;
    }
}

fn print_state(state: &PollerState, settings: &SettingsStore, cache: &CacheStore) {
    let cache_age = if state.is_offline { cache.age() } else { None };
    for line in presenter::render_status(state, &settings.get(), cache_age) {
        println!("{line}");
    }
    println!();
}

/// 폴러 상태가 바뀔 때마다 출력 (조회 중 중간 상태는 생략)
async fn print_loop(
    poller: Arc<StatusPoller>,
    settings: Arc<SettingsStore>,
    cache: Arc<CacheStore>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut state_rx = poller.subscribe();
    loop {
        tokio::select! {
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = state_rx.borrow_and_update().clone();
                if !state.is_loading {
                    print_state(&state, &settings, &cache);
                }
            }
            _ = shutdown_rx.changed() => break,
        }
    }
}

/// 업데이트 확인 결과 로깅
async fn version_log_loop(checker: Arc<VersionChecker>, mut shutdown_rx: watch::Receiver<bool>) {
    let mut info_rx = checker.subscribe();
    loop {
        tokio::select! {
            changed = info_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let info = info_rx.borrow_and_update().clone();
                if info.update_available {
                    info!("{}", presenter::render_version(&info));
                } else if let Some(error) = &info.error {
                    warn!("업데이트 확인 실패: {error}");
                }
            }
            _ = shutdown_rx.changed() => break,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "steamstat={0},steamstat_core={0},steamstat_storage={0},steamstat_network={0}",
        args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    let data_dir = resolve_data_dir(args.data_dir.as_deref());
    info!("SteamStat v{} 시작", version_checker::CURRENT_VERSION);
    debug!("데이터 디렉토리: {}", data_dir.display());

    // 설정
    let backend = Arc::new(FileSettingsBackend::open(data_dir.join(SETTINGS_FILE_NAME)));
    let settings = Arc::new(SettingsStore::new(backend));
    settings.load().await;
    apply_cli_overrides(&settings, &args).await;

    let timeout = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

    // 업데이트 확인 전용 모드
    if args.check_update {
        let source = LatestVersionClient::new(timeout).context("버전 클라이언트 생성 실패")?;
        let checker = VersionChecker::new(Arc::new(source));
        let info = checker.check(true).await;
        println!("{}", presenter::render_version(&info));
        return Ok(());
    }

    // 캐시 + 게이트웨이
    let cache = Arc::new(CacheStore::new(Arc::new(FileSlotStorage::new(
        data_dir.join(CACHE_DIR_NAME),
    ))));
    let gateway = GatewayClient::new(timeout).context("게이트웨이 클라이언트 생성 실패")?;
    let poller = StatusPoller::new(settings.clone(), Arc::new(gateway), cache.clone());

    // 단발 조회 모드
    if args.once {
        poller.surface_cache();
        let state = poller.refresh().await;
        print_state(&state, &settings, &cache);
        return Ok(());
    }

    // 상주 모드
    let lifecycle = LifecycleManager::new();

    let printer = tokio::spawn(print_loop(
        poller.clone(),
        settings.clone(),
        cache.clone(),
        lifecycle.subscribe(),
    ));

    let source = LatestVersionClient::new(timeout).context("버전 클라이언트 생성 실패")?;
    let checker = Arc::new(VersionChecker::new(Arc::new(source)));
    let version_logger = tokio::spawn(version_log_loop(checker.clone(), lifecycle.subscribe()));
    let version_task = tokio::spawn(checker.run(settings.watch(), lifecycle.subscribe()));

    poller.activate().await;
    match poller.timer_interval_secs() {
        Some(secs) => info!("상주 모드: {secs}초마다 갱신 (Ctrl+C로 종료)"),
        None => info!("상주 모드: 자동 갱신 꺼짐 (Ctrl+C로 종료)"),
    }

    if let Err(e) = lifecycle.wait_for_signal().await {
        warn!("시그널 핸들러 등록 실패, 즉시 종료: {e}");
        if !lifecycle.is_shutting_down() {
            lifecycle.shutdown();
        }
    }

    poller.shutdown();
    for task in [printer, version_logger, version_task] {
        if let Err(e) = task.await {
            warn!("백그라운드 태스크 종료 에러: {e}");
        }
    }

    info!("SteamStat 종료");
    Ok(())
}
