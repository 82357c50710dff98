/// 경매 상태 분류
/// 1. 서버 상태 -> 관리자 화면 상태
/// 2. 상태별 허용 관리자 액션
// region:    --- Imports
use super::model::ServerState;
use crate::error::AdminError;
use serde::{Deserialize, Serialize};
use std::fmt;

// endregion: --- Imports

// region:    --- Client Status
/// 관리자 화면에 표시되는 경매 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClientStatus {
    /// 입찰 없이 종료 (레거시 데이터에서만 나타남)
    EndedUnsold,
    PaymentRequested,
    FullyPaidSold,
    Scheduled,
    Live,
}

impl ClientStatus {
    pub const ALL: [ClientStatus; 5] = [
        ClientStatus::EndedUnsold,
        ClientStatus::PaymentRequested,
        ClientStatus::FullyPaidSold,
        ClientStatus::Scheduled,
        ClientStatus::Live,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::EndedUnsold => "ended-unsold",
            ClientStatus::PaymentRequested => "payment-requested",
            ClientStatus::FullyPaidSold => "fully-paid-sold",
            ClientStatus::Scheduled => "scheduled",
            ClientStatus::Live => "live",
        }
    }

    /// 상태 필터 드롭다운에 쓰이는 표시 이름
    pub fn label(&self) -> &'static str {
        match self {
            ClientStatus::EndedUnsold => "Ended - Unsold",
            ClientStatus::PaymentRequested => "Payment Requested",
            ClientStatus::FullyPaidSold => "Fully Paid & Sold",
            ClientStatus::Scheduled => "Scheduled",
            ClientStatus::Live => "Live",
        }
    }

    /// 표시 이름 또는 내부 값으로 상태 찾기
    pub fn from_label(label: &str) -> Option<ClientStatus> {
        let label = label.trim();
        Self::ALL.into_iter().find(|status| {
            status.label().eq_ignore_ascii_case(label) || status.as_str() == label
        })
    }

    /// 상태별 허용 관리자 액션
    pub fn legal_actions(&self) -> &'static [AdminAction] {
        legal_actions(*self)
    }

    pub fn allows(&self, action: AdminAction) -> bool {
        self.legal_actions().contains(&action)
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
// endregion: --- Client Status

// region:    --- Admin Action
/// 관리자 액션 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdminAction {
    Start,
    Pause,
    EndNow,
    Cancel,
    EditSchedule,
    /// 자리만 잡아둔 액션, 서버 호출 없음
    ApproveBids,
    Delete,
    ViewPayment,
    ContactBidder,
}

impl AdminAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminAction::Start => "start",
            AdminAction::Pause => "pause",
            AdminAction::EndNow => "end-now",
            AdminAction::Cancel => "cancel",
            AdminAction::EditSchedule => "edit-schedule",
            AdminAction::ApproveBids => "approve-bids",
            AdminAction::Delete => "delete",
            AdminAction::ViewPayment => "view-payment",
            AdminAction::ContactBidder => "contact-bidder",
        }
    }

    /// 서버 상태를 바꾸는 액션인지 여부
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            AdminAction::Start
                | AdminAction::Pause
                | AdminAction::EndNow
                | AdminAction::Cancel
                | AdminAction::EditSchedule
                | AdminAction::Delete
        )
    }
}

impl fmt::Display for AdminAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
// endregion: --- Admin Action

// region:    --- Classifier
/// 서버 상태 분류
///
/// `None`은 관리자 입찰 목록에서 제외되는 상태(draft, cancelled)를 뜻한다.
/// `ended`는 입찰 유무와 관계없이 `payment-requested`로 분류된다.
pub fn classify(state: ServerState) -> Option<ClientStatus> {
    match state {
        ServerState::Draft => None,
        ServerState::Scheduled => Some(ClientStatus::Scheduled),
        ServerState::Live => Some(ClientStatus::Live),
        ServerState::Ended => Some(ClientStatus::PaymentRequested),
        ServerState::Settled => Some(ClientStatus::FullyPaidSold),
        ServerState::Cancelled => None,
    }
}

/// 문자열 상태 분류, 알 수 없는 값은 에러
pub fn classify_raw(state: &str) -> Result<Option<ClientStatus>, AdminError> {
    let state: ServerState = state.parse()?;
    Ok(classify(state))
}

/// 상태별 허용 관리자 액션
pub fn legal_actions(status: ClientStatus) -> &'static [AdminAction] {
    match status {
        ClientStatus::Scheduled => &[
            AdminAction::Start,
            AdminAction::Cancel,
            AdminAction::EditSchedule,
            AdminAction::Delete,
        ],
        ClientStatus::Live => &[
            AdminAction::Pause,
            AdminAction::EndNow,
            AdminAction::Cancel,
            AdminAction::ApproveBids,
            AdminAction::Delete,
        ],
        ClientStatus::PaymentRequested => &[AdminAction::ViewPayment, AdminAction::ContactBidder],
        ClientStatus::FullyPaidSold => &[],
        ClientStatus::EndedUnsold => &[],
    }
}
// endregion: --- Classifier

// endregion: --- Tests
