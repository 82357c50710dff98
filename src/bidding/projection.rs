/// 경매 레코드 -> 입찰 상품 뷰 모델
// region:    --- Imports
use super::format::{duration, format_minor, time_left};
use super::model::BiddingProduct;
use crate::auction::model::{Auction, AuctionPage};
use crate::auction::status::classify;
use chrono::{DateTime, Utc};

// endregion: --- Imports

/// 카테고리가 없는 상품의 표시 이름
pub const UNCATEGORIZED: &str = "Uncategorized";

// region:    --- Projection
/// 경매 하나를 뷰 모델로 변환
///
/// 관리자 입찰 목록에서 제외되는 상태(draft, cancelled)는 `None`.
/// 같은 입력과 같은 `now`에 대해 항상 같은 결과를 낸다.
pub fn project(auction: &Auction, now: DateTime<Utc>) -> Option<BiddingProduct> {
    let status = classify(auction.state)?;
    let currency = auction.product.currency.as_str();

    let current_bid = match auction.leading_bid() {
        Some(bid) => format_minor(Some(bid.amount_minor), currency),
        None => format_minor(auction.reserve_price, currency),
    };
    // 최저가가 없으면 보증금을 시작가로 표시
    let starting_price = format_minor(
        Some(auction.reserve_price.unwrap_or(auction.deposit_amount)),
        currency,
    );

    let category = auction
        .product
        .categories
        .first()
        .map(|c| c.name.clone())
        .unwrap_or_else(|| UNCATEGORIZED.to_string());
    let image_url = auction.product.media.first().map(|m| m.url.clone());
    let ended_at = (auction.end_at <= now).then_some(auction.end_at);

    Some(BiddingProduct {
        id: auction.id.clone(),
        product_id: auction.product_id.clone(),
        name: auction.product.title.clone(),
        category,
        description: auction.product.description.clone(),
        image_url,
        currency: currency.to_string(),
        starting_price,
        current_bid,
        min_increment: format_minor(Some(auction.min_increment), currency),
        buy_now_price: auction
            .buy_now_price
            .map(|price| format_minor(Some(price), currency)),
        bids: auction.bids.len(),
        time_left: time_left(auction.end_at, now),
        duration: duration(auction.start_at, auction.end_at),
        status,
        start_at: auction.start_at,
        end_at: auction.end_at,
        ended_at,
    })
}

/// 서버 페이지 전체 변환, 목록 제외 상태는 버린다
pub fn project_page(page: &AuctionPage, now: DateTime<Utc>) -> Vec<BiddingProduct> {
    page.data
        .iter()
        .filter_map(|auction| project(auction, now))
        .collect()
}
// endregion: --- Projection

// endregion: --- Tests
