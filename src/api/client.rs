// region:    --- Imports
use super::auth::{Credentials, RefreshCoordinator};
use super::{endpoints, AuctionApi, AuctionListParams};
use crate::auction::model::{
    Auction, AuctionPage, AuctionUpdate, BidPage, ServerState, StateUpdate,
};
use crate::config::Config;
use crate::error::AdminError;
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

// endregion: --- Imports

// region:    --- Wire Envelopes
#[derive(Deserialize)]
struct AuctionEnvelope {
    data: AuctionData,
}

#[derive(Deserialize)]
struct AuctionData {
    auction: Auction,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
struct RefreshEnvelope {
    data: RefreshData,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshData {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}
// endregion: --- Wire Envelopes

// region:    --- Api Client
/// 경매, 상품 REST 서비스 클라이언트
///
/// 모든 요청에 Bearer 토큰을 붙이고, 401이면 토큰을 한 번 갱신한 뒤 한 번만 다시 보낸다.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth: RefreshCoordinator,
}

impl ApiClient {
    /// 클라이언트 생성
    pub fn new(
        base_url: impl Into<String>,
        credentials: Option<Credentials>,
        timeout: Duration,
    ) -> Result<Self, AdminError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth: RefreshCoordinator::new(credentials),
        })
    }

    /// 설정으로 클라이언트 생성
    pub fn from_config(config: &Config) -> Result<Self, AdminError> {
        Self::new(
            config.api_base_url.clone(),
            Some(config.credentials()),
            config.request_timeout,
        )
    }

    pub fn auth(&self) -> &RefreshCoordinator {
        &self.auth
    }

    /// 새 자격 증명 설정
    pub async fn login_with(&self, credentials: Credentials) {
        self.auth.replace(Some(credentials)).await;
        info!("{:<12} --> 자격 증명 설정", "Client");
    }

    /// 자격 증명 삭제
    pub async fn logout(&self) {
        self.auth.replace(None).await;
        info!("{:<12} --> 자격 증명 삭제", "Client");
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 인증 요청 전송
    ///
    /// `build`는 재전송 시 한 번 더 호출된다.
    async fn send<F>(&self, path: &str, build: F) -> Result<Response, AdminError>
    where
        F: Fn(&reqwest::Client, String) -> RequestBuilder,
    {
        let (epoch, token) = self.auth.current().await.ok_or(AdminError::Unauthenticated)?;
        let url = self.url(path);
        let response = build(&self.http, url.clone())
            .bearer_auth(token)
            .send()
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED || endpoints::is_auth_endpoint(path) {
            return check_status(response).await;
        }

        drop(response);
        warn!(
            "{:<12} --> 401 응답, 토큰 갱신 후 재시도: {}",
            "Client", path
        );
        let token = self
            .auth
            .refresh_after(epoch, |refresh_token| self.request_refresh(refresh_token))
            .await?;

        let response = build(&self.http, url).bearer_auth(token).send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            // 재시도도 거부되면 더 갱신하지 않고 로그아웃
            warn!("{:<12} --> 재시도 후에도 401, 로그아웃: {}", "Client", path);
            self.auth.replace(None).await;
            return Err(AdminError::SessionExpired);
        }
        check_status(response).await
    }

    /// `POST /auth/refresh`
    async fn request_refresh(&self, refresh_token: String) -> Result<Credentials, AdminError> {
        let response = self
            .http
            .post(self.url(endpoints::AUTH_REFRESH))
            .json(&RefreshRequest {
                refresh_token: &refresh_token,
            })
            .send()
            .await?;
        let envelope: RefreshEnvelope = decode(check_status(response).await?).await?;

        Ok(Credentials {
            access_token: envelope.data.access_token,
            refresh_token: envelope.data.refresh_token.unwrap_or(refresh_token),
        })
    }
}

/// 2xx 이외의 응답은 서버 메시지를 담아 에러로 변환
async fn check_status(response: Response) -> Result<Response, AdminError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|body| {
            body.get("message")
                .or_else(|| body.get("error"))
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("요청이 실패했습니다 (HTTP {})", status.as_u16()));

    debug!("{:<12} --> 요청 실패: {} {}", "Client", status, message);
    Err(AdminError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, AdminError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| AdminError::Decode(e.to_string()))
}
// endregion: --- Api Client

// region:    --- Auction Api
#[async_trait]
impl AuctionApi for ApiClient {
    async fn list_auctions(&self, params: &AuctionListParams) -> Result<AuctionPage, AdminError> {
        info!("{:<12} --> 경매 목록 조회: {:?}", "Client", params);
        let response = self
            .send(endpoints::AUCTIONS, |http, url| http.get(url).query(params))
            .await?;
        decode(response).await
    }

    async fn get_auction(&self, id: &str) -> Result<Auction, AdminError> {
        info!("{:<12} --> 경매 조회 id: {}", "Client", id);
        let response = self
            .send(&endpoints::auction(id), |http, url| http.get(url))
            .await?;
        let envelope: AuctionEnvelope = decode(response).await?;
        Ok(envelope.data.auction)
    }

    async fn list_bids(&self, id: &str, page: u32, limit: u32) -> Result<BidPage, AdminError> {
        info!("{:<12} --> 입찰 목록 조회 id: {}", "Client", id);
        let response = self
            .send(&endpoints::auction_bids(id), |http, url| {
                http.get(url).query(&[("page", page), ("limit", limit)])
            })
            .await?;
        decode(response).await
    }

    async fn update_state(&self, id: &str, state: ServerState) -> Result<(), AdminError> {
        info!("{:<12} --> 경매 상태 변경 id: {}, state: {}", "Client", id, state);
        let body = StateUpdate { state };
        self.send(&endpoints::auction_state(id), |http, url| {
            http.patch(url).json(&body)
        })
        .await?;
        Ok(())
    }

    async fn update_auction(&self, id: &str, update: &AuctionUpdate) -> Result<(), AdminError> {
        info!("{:<12} --> 경매 변경 id: {}, {:?}", "Client", id, update);
        self.send(&endpoints::auction(id), |http, url| {
            http.patch(url).json(update)
        })
        .await?;
        Ok(())
    }

    async fn delete_product(&self, product_id: &str) -> Result<(), AdminError> {
        info!("{:<12} --> 상품 삭제 id: {}", "Client", product_id);
        self.send(&endpoints::product(product_id), |http, url| {
            http.delete(url)
        })
        .await?;
        Ok(())
    }
}
// endregion: --- Auction Api
