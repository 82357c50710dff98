/// 관리자 경매 상태 전환 커맨드 처리
/// 1. 허용 액션 검사 (네트워크 호출 전)
/// 2. 입력 검증
/// 3. 서버 호출 후 레코드 다시 조회
// region:    --- Imports
use super::model::{Auction, AuctionUpdate, ServerState};
use super::status::{classify, AdminAction, ClientStatus};
use crate::api::AuctionApi;
use crate::bidding::model::BiddingProduct;
use crate::bidding::projection::project;
use crate::error::AdminError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Commands
/// 관리자 전환 명령
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum TransitionCommand {
    /// 경매 시작, `reset_start_at`이면 시작 시각을 지금으로 덮어쓴다
    Start {
        #[serde(rename = "resetStartAt", default)]
        reset_start_at: bool,
    },
    Pause,
    /// 지금 종료 (종료 시각을 지금으로 덮어쓴다)
    EndNow,
    Cancel,
    EditSchedule {
        #[serde(rename = "startAt")]
        start_at: DateTime<Utc>,
        #[serde(rename = "endAt")]
        end_at: DateTime<Utc>,
    },
    ApproveBids,
    Delete,
    ViewPayment,
    ContactBidder,
}

impl TransitionCommand {
    pub fn action(&self) -> AdminAction {
        match self {
            TransitionCommand::Start { .. } => AdminAction::Start,
            TransitionCommand::Pause => AdminAction::Pause,
            TransitionCommand::EndNow => AdminAction::EndNow,
            TransitionCommand::Cancel => AdminAction::Cancel,
            TransitionCommand::EditSchedule { .. } => AdminAction::EditSchedule,
            TransitionCommand::ApproveBids => AdminAction::ApproveBids,
            TransitionCommand::Delete => AdminAction::Delete,
            TransitionCommand::ViewPayment => AdminAction::ViewPayment,
            TransitionCommand::ContactBidder => AdminAction::ContactBidder,
        }
    }
}

/// 전환 결과
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum TransitionOutcome {
    /// 서버에서 다시 조회한 레코드, 목록 제외 상태가 되면 `product`는 `None`
    Updated {
        auction: Auction,
        product: Option<BiddingProduct>,
    },
    /// 상품 삭제 (경매도 서버에서 함께 삭제됨)
    #[serde(rename_all = "camelCase")]
    Deleted {
        auction_id: String,
        product_id: String,
    },
    /// 변경은 반영됐지만 다시 조회하지 못함, 화면은 레코드를 다시 불러와야 한다
    #[serde(rename_all = "camelCase")]
    Applied {
        action: AdminAction,
        auction_id: String,
        reason: String,
    },
    /// 서버 호출이 없는 액션
    Unchanged { action: AdminAction },
}

/// 서버 호출 없이 어떤 변경을 보낼지
enum Mutation {
    State(ServerState),
    Full(AuctionUpdate),
    DeleteProduct,
}
// endregion: --- Commands

// region:    --- Validation
/// 일정 검증, 종료 시각은 시작 시각보다 뒤여야 한다
pub fn validate_schedule(start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> Result<(), AdminError> {
    if end_at <= start_at {
        return Err(AdminError::validation(
            "endAt",
            "종료 시각은 시작 시각보다 뒤여야 합니다.",
        ));
    }
    Ok(())
}

/// 현재 상태에서 액션이 허용되는지 검사
pub fn ensure_allowed(auction: &Auction, action: AdminAction) -> Result<ClientStatus, AdminError> {
    let status = classify(auction.state).ok_or_else(|| AdminError::NotListed {
        id: auction.id.clone(),
        state: auction.state.to_string(),
    })?;

    if !status.allows(action) {
        return Err(AdminError::IllegalAction {
            action: action.to_string(),
            status: status.to_string(),
        });
    }
    Ok(status)
}

fn plan(
    auction: &Auction,
    command: &TransitionCommand,
    now: DateTime<Utc>,
) -> Result<Option<Mutation>, AdminError> {
    let mutation = match command {
        TransitionCommand::Start {
            reset_start_at: false,
        } => Mutation::State(ServerState::Live),
        TransitionCommand::Start {
            reset_start_at: true,
        } => {
            validate_schedule(now, auction.end_at)?;
            Mutation::Full(AuctionUpdate {
                state: ServerState::Live,
                start_at: Some(now),
                end_at: None,
            })
        }
        TransitionCommand::Pause => Mutation::State(ServerState::Scheduled),
        TransitionCommand::EndNow => {
            validate_schedule(auction.start_at, now)?;
            Mutation::Full(AuctionUpdate {
                state: ServerState::Ended,
                start_at: None,
                end_at: Some(now),
            })
        }
        TransitionCommand::Cancel => Mutation::State(ServerState::Cancelled),
        TransitionCommand::EditSchedule { start_at, end_at } => {
            validate_schedule(*start_at, *end_at)?;
            Mutation::Full(AuctionUpdate {
                state: ServerState::Scheduled,
                start_at: Some(*start_at),
                end_at: Some(*end_at),
            })
        }
        TransitionCommand::Delete => Mutation::DeleteProduct,
        TransitionCommand::ApproveBids
        | TransitionCommand::ViewPayment
        | TransitionCommand::ContactBidder => return Ok(None),
    };
    Ok(Some(mutation))
}
// endregion: --- Validation

// region:    --- Handlers
/// 경매 레코드에 관리자 명령 적용
///
/// 실패하면 에러만 돌려주고 호출 측 상태는 건드리지 않는다. 재시도하지 않는다.
pub async fn handle_transition(
    command: TransitionCommand,
    auction: &Auction,
    api: &impl AuctionApi,
    now: DateTime<Utc>,
) -> Result<TransitionOutcome, AdminError> {
    let action = command.action();
    info!(
        "{:<12} --> 관리자 명령 처리 시작: {} (auction: {})",
        "Command", action, auction.id
    );

    let status = ensure_allowed(auction, action).inspect_err(|e| {
        warn!("{:<12} --> 허용되지 않은 명령: {}", "Command", e);
    })?;

    let Some(mutation) = plan(auction, &command, now)? else {
        info!(
            "{:<12} --> 서버 호출이 없는 명령: {} ({})",
            "Command", action, status
        );
        return Ok(TransitionOutcome::Unchanged { action });
    };

    let result = match &mutation {
        Mutation::State(state) => api.update_state(&auction.id, *state).await,
        Mutation::Full(update) => api.update_auction(&auction.id, update).await,
        Mutation::DeleteProduct => api.delete_product(&auction.product_id).await,
    };
    if let Err(e) = result {
        warn!(
            "{:<12} --> 명령 실패: {} (auction: {}): {}",
            "Command", action, auction.id, e
        );
        return Err(e);
    }

    if let Mutation::DeleteProduct = mutation {
        info!(
            "{:<12} --> 상품 삭제 완료: {} (auction: {})",
            "Command", auction.product_id, auction.id
        );
        return Ok(TransitionOutcome::Deleted {
            auction_id: auction.id.clone(),
            product_id: auction.product_id.clone(),
        });
    }

    // 낙관적으로 고치지 않고 서버 레코드를 다시 조회
    let fresh = match api.get_auction(&auction.id).await {
        Ok(fresh) => fresh,
        Err(e) => {
            warn!(
                "{:<12} --> 명령은 반영됐지만 재조회 실패: {} (auction: {}): {}",
                "Command", action, auction.id, e
            );
            return Ok(TransitionOutcome::Applied {
                action,
                auction_id: auction.id.clone(),
                reason: e.to_string(),
            });
        }
    };
    info!(
        "{:<12} --> 명령 성공: {} (auction: {}, state: {} -> {})",
        "Command", action, auction.id, auction.state, fresh.state
    );

    let product = project(&fresh, now);
    Ok(TransitionOutcome::Updated {
        auction: fresh,
        product,
    })
}

/// id로 최신 레코드를 조회한 뒤 명령 적용
pub async fn handle_transition_by_id(
    auction_id: &str,
    command: TransitionCommand,
    api: &impl AuctionApi,
    now: DateTime<Utc>,
) -> Result<TransitionOutcome, AdminError> {
    let auction = api.get_auction(auction_id).await?;
    handle_transition(command, &auction, api, now).await
}
// endregion: --- Handlers

// endregion: --- Tests
