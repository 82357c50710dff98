// region:    --- Imports
use thiserror::Error;

// endregion: --- Imports

// region:    --- Admin Error
/// 관리자 콘솔 공통 에러
#[derive(Debug, Error)]
pub enum AdminError {
    /// 제출 전 입력 검증 실패 (네트워크 호출 없음)
    #[error("입력값이 올바르지 않습니다 ({field}): {message}")]
    Validation { field: &'static str, message: String },

    /// 현재 상태에서 허용되지 않은 관리자 액션 (네트워크 호출 없음)
    #[error("'{action}' 액션은 '{status}' 상태에서 허용되지 않습니다.")]
    IllegalAction { action: String, status: String },

    /// 서버가 문서화되지 않은 경매 상태를 보냄
    #[error("알 수 없는 경매 상태입니다: {0}")]
    UnknownState(String),

    /// 관리자 입찰 목록에서 제외되는 상태(draft, cancelled)의 경매
    #[error("경매 {id}은(는) '{state}' 상태라 입찰 목록에 표시되지 않습니다.")]
    NotListed { id: String, state: String },

    /// 서버가 2xx 이외의 응답을 보냄
    #[error("{message}")]
    Api { status: u16, message: String },

    /// 전송 실패
    #[error("네트워크 오류: {0}")]
    Network(String),

    /// 응답 본문을 모델로 해석할 수 없음 (알 수 없는 경매 상태 포함)
    #[error("응답 해석 실패: {0}")]
    Decode(String),

    /// 토큰 갱신 실패 또는 재시도 후에도 401, 자격 증명이 삭제됨
    #[error("세션이 만료되었습니다. 다시 로그인해 주세요.")]
    SessionExpired,

    /// 자격 증명이 없음
    #[error("로그인이 필요합니다.")]
    Unauthenticated,

    /// 설정 값 누락 또는 잘못된 값
    #[error("설정 오류: {0}")]
    Config(String),
}

impl AdminError {
    /// 응답 본문의 `code` 필드에 사용하는 식별자
    pub fn code(&self) -> &'static str {
        match self {
            AdminError::Validation { .. } => "VALIDATION",
            AdminError::IllegalAction { .. } => "ILLEGAL_ACTION",
            AdminError::UnknownState(_) => "UNKNOWN_STATE",
            AdminError::NotListed { .. } => "NOT_LISTED",
            AdminError::Api { .. } => "UPSTREAM",
            AdminError::Network(_) => "NETWORK",
            AdminError::Decode(_) => "DECODE",
            AdminError::SessionExpired => "SESSION_EXPIRED",
            AdminError::Unauthenticated => "UNAUTHENTICATED",
            AdminError::Config(_) => "CONFIG",
        }
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AdminError::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for AdminError {
    fn from(e: reqwest::Error) -> Self {
        AdminError::Network(e.to_string())
    }
}

// endregion: --- Admin Error
