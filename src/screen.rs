//! 화면 단위 작업 집합과 지난 응답 차단
//!
//! 화면을 떠난 뒤 도착한 응답은 표시 상태에 반영하지 않는다.
// region:    --- Imports
use crate::api::{AuctionApi, AuctionListParams};
use crate::auction::commands::{handle_transition, TransitionCommand, TransitionOutcome};
use crate::auction::model::{Auction, AuctionPage, Pagination};
use crate::auction::status::{classify, AdminAction};
use crate::bidding::model::BiddingProduct;
use crate::bidding::projection::{project, project_page};
use crate::error::AdminError;
use crate::query::list::{apply, ListQuery};
use crate::query::pager::{page_numbers, PageItem};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

// endregion: --- Imports

// region:    --- View Guard
/// 현재 활성 화면 세대
#[derive(Debug, Default, Clone)]
pub struct ActiveView {
    generation: Arc<AtomicU64>,
}

/// 요청 시작 시점의 화면 세대
#[derive(Debug, Clone)]
pub struct ViewTicket {
    generation: u64,
    active: Arc<AtomicU64>,
}

impl ActiveView {
    pub fn new() -> Self {
        Self::default()
    }

    /// 요청을 시작할 때 발급
    pub fn ticket(&self) -> ViewTicket {
        ViewTicket {
            generation: self.generation.load(Ordering::SeqCst),
            active: Arc::clone(&self.generation),
        }
    }

    /// 화면 이탈 또는 새 요청으로 이전 티켓 무효화
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

impl ViewTicket {
    pub fn is_current(&self) -> bool {
        self.active.load(Ordering::SeqCst) == self.generation
    }
}
// endregion: --- View Guard

// region:    --- List Screen
/// 입찰 상품 목록 화면
///
/// 현재 페이지의 원본 경매를 통째로 보관하고, 뷰 모델은 항상 원본에서 다시 만든다.
#[derive(Debug, Default)]
pub struct BiddingListScreen {
    view: ActiveView,
    pub query: ListQuery,
    auctions: Vec<Auction>,
    products: Vec<BiddingProduct>,
    pagination: Option<Pagination>,
}

impl BiddingListScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &ActiveView {
        &self.view
    }

    /// 새 조회 시작, 진행 중이던 이전 조회 결과는 버려진다
    pub fn begin_load(&self) -> ViewTicket {
        self.view.invalidate();
        self.view.ticket()
    }

    /// 화면 이탈
    pub fn leave(&self) {
        self.view.invalidate();
    }

    /// 조회 결과 반영, 지난 티켓이면 `false`
    pub fn apply_page(&mut self, ticket: &ViewTicket, page: AuctionPage, now: DateTime<Utc>) -> bool {
        if !ticket.is_current() {
            debug!("{:<12} --> 지난 목록 응답 무시", "Screen");
            return false;
        }
        self.products = project_page(&page, now);
        self.auctions = page.data;
        self.pagination = Some(page.pagination);
        true
    }

    /// 주기적 갱신, 남은 시간을 포함해 전체를 다시 투영
    pub fn tick(&mut self, now: DateTime<Utc>) {
        self.products = self
            .auctions
            .iter()
            .filter_map(|auction| project(auction, now))
            .collect();
    }

    /// 조회 후 반영
    pub async fn load(
        &mut self,
        api: &impl AuctionApi,
        params: &AuctionListParams,
        now: DateTime<Utc>,
    ) -> Result<bool, AdminError> {
        let ticket = self.begin_load();
        let page = api.list_auctions(params).await?;
        Ok(self.apply_page(&ticket, page, now))
    }

    /// 검색, 필터, 정렬이 적용된 현재 페이지
    pub fn visible(&self) -> Vec<&BiddingProduct> {
        apply(&self.products, &self.query)
    }

    pub fn pagination(&self) -> Option<Pagination> {
        self.pagination
    }

    /// 서버 페이지 기준 번호 목록 (검색 결과 개수와 무관)
    pub fn page_numbers(&self) -> Vec<PageItem> {
        self.pagination
            .map(|p| page_numbers(p.page, p.total_pages))
            .unwrap_or_default()
    }
}
// endregion: --- List Screen

// region:    --- Detail Screen
/// 입찰 상품 상세 화면
#[derive(Debug, Default)]
pub struct BiddingDetailScreen {
    view: ActiveView,
    auction: Option<Auction>,
    product: Option<BiddingProduct>,
    deleted: bool,
    needs_reload: bool,
}

impl BiddingDetailScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &ActiveView {
        &self.view
    }

    pub fn ticket(&self) -> ViewTicket {
        self.view.ticket()
    }

    /// 새 요청 시작, 진행 중이던 이전 요청 결과는 버려진다
    pub fn begin_request(&self) -> ViewTicket {
        self.view.invalidate();
        self.view.ticket()
    }

    pub fn leave(&self) {
        self.view.invalidate();
    }

    pub fn auction(&self) -> Option<&Auction> {
        self.auction.as_ref()
    }

    pub fn product(&self) -> Option<&BiddingProduct> {
        self.product.as_ref()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// 변경은 반영됐지만 표시 중인 레코드가 최신이 아님
    pub fn needs_reload(&self) -> bool {
        self.needs_reload
    }

    /// 현재 상태에서 표시할 액션 버튼
    pub fn actions(&self) -> &'static [AdminAction] {
        self.auction
            .as_ref()
            .and_then(|a| classify(a.state))
            .map(|status| status.legal_actions())
            .unwrap_or(&[])
    }

    /// 조회 결과 반영, 지난 티켓이면 `false`
    pub fn apply_auction(&mut self, ticket: &ViewTicket, auction: Auction, now: DateTime<Utc>) -> bool {
        if !ticket.is_current() {
            debug!("{:<12} --> 지난 상세 응답 무시: {}", "Screen", auction.id);
            return false;
        }
        self.product = project(&auction, now);
        self.auction = Some(auction);
        self.deleted = false;
        self.needs_reload = false;
        true
    }

    /// 명령 결과 반영, 지난 티켓이면 `false`
    pub fn apply_outcome(&mut self, ticket: &ViewTicket, outcome: TransitionOutcome, now: DateTime<Utc>) -> bool {
        if !ticket.is_current() {
            debug!("{:<12} --> 지난 명령 응답 무시", "Screen");
            return false;
        }
        match outcome {
            TransitionOutcome::Updated { auction, .. } => {
                self.product = project(&auction, now);
                self.auction = Some(auction);
            }
            TransitionOutcome::Deleted { .. } => {
                self.auction = None;
                self.product = None;
                self.deleted = true;
            }
            TransitionOutcome::Applied { .. } => {
                self.needs_reload = true;
            }
            TransitionOutcome::Unchanged { .. } => {}
        }
        true
    }

    pub fn tick(&mut self, now: DateTime<Utc>) {
        self.product = self.auction.as_ref().and_then(|a| project(a, now));
    }

    pub async fn load(&mut self, api: &impl AuctionApi, id: &str, now: DateTime<Utc>) -> Result<bool, AdminError> {
        let ticket = self.begin_request();
        let auction = api.get_auction(id).await?;
        Ok(self.apply_auction(&ticket, auction, now))
    }

    /// 표시 중인 경매에 명령 실행
    ///
    /// 실패하면 표시 상태는 그대로 두고 에러를 돌려준다.
    pub async fn perform(
        &mut self,
        api: &impl AuctionApi,
        command: TransitionCommand,
        now: DateTime<Utc>,
    ) -> Result<bool, AdminError> {
        let Some(auction) = self.auction.clone() else {
            return Err(AdminError::validation("auction", "표시 중인 경매가 없습니다."));
        };
        let ticket = self.begin_request();
        let outcome = handle_transition(command, &auction, api, now).await?;
        Ok(self.apply_outcome(&ticket, outcome, now))
    }
}
// endregion: --- Detail Screen

// endregion: --- Tests
