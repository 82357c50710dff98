// region:    --- Modules
pub mod auth;
pub mod client;
pub mod endpoints;

pub use auth::{Credentials, RefreshCoordinator, RefreshPhase};
pub use client::ApiClient;
// endregion: --- Modules

// region:    --- Imports
use crate::auction::model::{Auction, AuctionPage, AuctionUpdate, BidPage, ServerState};
use crate::error::AdminError;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// endregion: --- Imports

// region:    --- List Params
/// `GET /auctions` 쿼리 파라미터
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionListParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ServerState>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub auction_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub page: u32,
    pub limit: u32,
}

impl AuctionListParams {
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            state: None,
            auction_type: None,
            vendor_id: None,
            start_date: None,
            end_date: None,
            page: page.max(1),
            limit,
        }
    }
}
// endregion: --- List Params

// region:    --- Auction Api Trait
/// 경매, 상품 서비스 호출 경계
#[async_trait]
pub trait AuctionApi: Send + Sync {
    async fn list_auctions(&self, params: &AuctionListParams) -> Result<AuctionPage, AdminError>;

    async fn get_auction(&self, id: &str) -> Result<Auction, AdminError>;

    async fn list_bids(&self, id: &str, page: u32, limit: u32) -> Result<BidPage, AdminError>;

    /// 상태만 변경
    async fn update_state(&self, id: &str, state: ServerState) -> Result<(), AdminError>;

    /// 상태와 일정 변경
    async fn update_auction(&self, id: &str, update: &AuctionUpdate) -> Result<(), AdminError>;

    /// 상품 삭제, 서버에서 소유 경매까지 삭제된다
    async fn delete_product(&self, product_id: &str) -> Result<(), AdminError>;
}
// endregion: --- Auction Api Trait
