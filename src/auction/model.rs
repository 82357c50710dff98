// region:    --- Imports
use crate::error::AdminError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// endregion: --- Imports

// region:    --- Server State
/// 서버가 관리하는 경매 라이프사이클 상태
///
/// 문서화되지 않은 값은 역직렬화 단계에서 실패한다. 기본값으로 대체하지 않는다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ServerState {
    Draft,
    Scheduled,
    Live,
    Ended,
    Settled,
    /// 취소된 경매 (종료 상태)
    Cancelled,
}

impl ServerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerState::Draft => "draft",
            ServerState::Scheduled => "scheduled",
            ServerState::Live => "live",
            ServerState::Ended => "ended",
            ServerState::Settled => "settled",
            ServerState::Cancelled => "cancelled",
        }
    }
}

impl FromStr for ServerState {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ServerState::Draft),
            "scheduled" => Ok(ServerState::Scheduled),
            "live" => Ok(ServerState::Live),
            "ended" => Ok(ServerState::Ended),
            "settled" => Ok(ServerState::Settled),
            "cancelled" => Ok(ServerState::Cancelled),
            other => Err(AdminError::UnknownState(other.to_string())),
        }
    }
}

impl TryFrom<String> for ServerState {
    type Error = AdminError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
// endregion: --- Server State

// region:    --- Auction
/// 경매 레코드 (서버 소유, 읽기 전용)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Auction {
    pub id: String,
    pub product_id: String,
    pub state: ServerState,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub min_increment: i64,
    #[serde(default)]
    pub reserve_price: Option<i64>,
    pub deposit_amount: i64,
    #[serde(default)]
    pub buy_now_price: Option<i64>,
    #[serde(default)]
    pub bids: Vec<AuctionBid>,
    pub product: ProductSnapshot,
}

impl Auction {
    /// 선두 입찰
    ///
    /// 낙찰 표시(`isWinning`)가 있는 입찰을 우선하고, 없으면 가장 높은 금액의 입찰을 사용한다.
    pub fn leading_bid(&self) -> Option<&AuctionBid> {
        self.bids
            .iter()
            .find(|bid| bid.is_winning)
            .or_else(|| self.bids.iter().max_by_key(|bid| bid.amount_minor))
    }
}

/// 입찰 기록
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionBid {
    pub id: String,
    pub amount_minor: i64,
    pub user_id: String,
    pub placed_at: DateTime<Utc>,
    #[serde(default)]
    pub is_winning: bool,
}

/// 경매에 포함된 상품 스냅샷
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price_minor: i64,
    pub currency: String,
    #[serde(default)]
    pub media: Vec<Media>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}
// endregion: --- Auction

// region:    --- Pages
/// 서버 페이지 정보
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

/// `GET /auctions` 응답
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionPage {
    pub data: Vec<Auction>,
    pub pagination: Pagination,
}

/// `GET /auctions/{id}/bids` 응답
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidPage {
    pub data: Vec<AuctionBid>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}
// endregion: --- Pages

// region:    --- Updates
/// 상태 전용 변경 요청 본문 (`PATCH /auctions/{id}/state`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateUpdate {
    pub state: ServerState,
}

/// 상태와 일정을 함께 바꾸는 전체 변경 요청 본문
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionUpdate {
    pub state: ServerState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<DateTime<Utc>>,
}
// endregion: --- Updates

// endregion: --- Tests
