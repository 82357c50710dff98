use crate::auction::status::ClientStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 입찰 상품 뷰 모델
///
/// 경매 레코드에서 매번 새로 만들어지며 저장하거나 필드 단위로 수정하지 않는다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiddingProduct {
    pub id: String,
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub image_url: Option<String>,
    pub currency: String,
    pub starting_price: String,
    pub current_bid: String,
    pub min_increment: String,
    pub buy_now_price: Option<String>,
    pub bids: usize,
    pub time_left: String,
    pub duration: String,
    pub status: ClientStatus,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    /// 투영 시점에 종료된 경매의 종료 시각, 정렬 기준
    pub ended_at: Option<DateTime<Utc>>,
}
