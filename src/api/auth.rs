/// 액세스 토큰 갱신 단일 실행 관리
///
/// 동시에 발생한 401은 첫 번째 갱신이 끝날 때까지 기다린 뒤 그 결과를 함께 사용한다.
/// 갱신이 실패하면 기다리던 요청도 모두 실패하고 자격 증명은 삭제된다.
// region:    --- Imports
use crate::error::AdminError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Credentials
/// 액세스, 리프레시 토큰 쌍
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: String,
}

/// 갱신 진행 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPhase {
    Idle,
    Refreshing,
}

struct Session {
    credentials: Option<Credentials>,
    /// 자격 증명이 바뀔 때마다 증가
    epoch: u64,
}
// endregion: --- Credentials

// region:    --- Refresh Coordinator
pub struct RefreshCoordinator {
    session: RwLock<Session>,
    in_flight: Mutex<()>,
    refreshing: AtomicBool,
}

impl RefreshCoordinator {
    pub fn new(credentials: Option<Credentials>) -> Self {
        Self {
            session: RwLock::new(Session {
                credentials,
                epoch: 0,
            }),
            in_flight: Mutex::new(()),
            refreshing: AtomicBool::new(false),
        }
    }

    /// 현재 세대와 액세스 토큰
    pub async fn current(&self) -> Option<(u64, String)> {
        let session = self.session.read().await;
        session
            .credentials
            .as_ref()
            .map(|c| (session.epoch, c.access_token.clone()))
    }

    /// 자격 증명 교체 (로그인, 로그아웃)
    pub async fn replace(&self, credentials: Option<Credentials>) {
        let mut session = self.session.write().await;
        session.credentials = credentials;
        session.epoch += 1;
    }

    pub fn phase(&self) -> RefreshPhase {
        if self.refreshing.load(Ordering::SeqCst) {
            RefreshPhase::Refreshing
        } else {
            RefreshPhase::Idle
        }
    }

    /// `seen_epoch` 세대의 토큰이 거부된 뒤 호출
    ///
    /// 기다리는 동안 다른 호출이 이미 갱신했다면 `refresh`를 실행하지 않고 그 결과를 돌려준다.
    pub async fn refresh_after<F, Fut>(&self, seen_epoch: u64, refresh: F) -> Result<String, AdminError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<Credentials, AdminError>>,
    {
        let _flight = self.in_flight.lock().await;

        let refresh_token = {
            let session = self.session.read().await;
            if session.epoch != seen_epoch {
                return session
                    .credentials
                    .as_ref()
                    .map(|c| c.access_token.clone())
                    .ok_or(AdminError::SessionExpired);
            }
            match &session.credentials {
                Some(c) => c.refresh_token.clone(),
                None => return Err(AdminError::SessionExpired),
            }
        };

        info!("{:<12} --> 액세스 토큰 갱신 시작", "Auth");
        self.refreshing.store(true, Ordering::SeqCst);
        let result = refresh(refresh_token).await;
        self.refreshing.store(false, Ordering::SeqCst);

        let mut session = self.session.write().await;
        session.epoch += 1;
        match result {
            Ok(credentials) => {
                info!("{:<12} --> 액세스 토큰 갱신 성공", "Auth");
                let access_token = credentials.access_token.clone();
                session.credentials = Some(credentials);
                Ok(access_token)
            }
            Err(e) => {
                warn!(
                    "{:<12} --> 액세스 토큰 갱신 실패, 자격 증명 삭제: {}",
                    "Auth", e
                );
                session.credentials = None;
                Err(AdminError::SessionExpired)
            }
        }
    }
}
// endregion: --- Refresh Coordinator

// endregion: --- Tests
