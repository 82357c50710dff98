/// 목록 화면 검색, 상태 필터, 정렬
///
/// 서버가 이미 나눠서 보낸 한 페이지 안에서만 동작한다. 검색은 다른 페이지를 조회하지 않는다.
// region:    --- Imports
use crate::auction::status::ClientStatus;
use crate::bidding::model::BiddingProduct;
use crate::error::AdminError;
use serde::{Deserialize, Serialize};

// endregion: --- Imports

/// 상태 필터 해제를 뜻하는 표시 이름
pub const ALL_STATUS_LABEL: &str = "All Status";

// region:    --- Query Model
/// 정렬 기준
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    None,
    Newest,
    Oldest,
}

impl SortKey {
    /// `"Newest First"`, `"oldest"` 같은 표시 이름 또는 내부 값 해석
    pub fn from_label(label: &str) -> Result<SortKey, AdminError> {
        match label.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "default" => Ok(SortKey::None),
            "newest" | "newest first" => Ok(SortKey::Newest),
            "oldest" | "oldest first" => Ok(SortKey::Oldest),
            other => Err(AdminError::validation(
                "sort",
                format!("알 수 없는 정렬 기준입니다: {}", other),
            )),
        }
    }
}

/// 상태 필터 표시 이름 -> 내부 상태
///
/// 빈 값과 `"All Status"`는 필터 없음.
pub fn parse_status_filter(label: &str) -> Result<Option<ClientStatus>, AdminError> {
    let label = label.trim();
    if label.is_empty() || label.eq_ignore_ascii_case(ALL_STATUS_LABEL) || label == "all" {
        return Ok(None);
    }
    ClientStatus::from_label(label).map(Some).ok_or_else(|| {
        AdminError::validation("status", format!("알 수 없는 상태 필터입니다: {}", label))
    })
}

/// 목록 검색 조건
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub search: String,
    pub status: Option<ClientStatus>,
    pub sort: SortKey,
}
// endregion: --- Query Model

// region:    --- Apply
/// 현재 페이지에 검색, 필터, 정렬 적용
pub fn apply<'a>(products: &'a [BiddingProduct], query: &ListQuery) -> Vec<&'a BiddingProduct> {
    let needle = query.search.trim().to_lowercase();

    let mut visible: Vec<&BiddingProduct> = products
        .iter()
        .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
        .filter(|p| query.status.map_or(true, |status| p.status == status))
        .collect();

    // 종료되지 않은 항목(ended_at 없음)은 가장 이른 날짜로 취급
    match query.sort {
        SortKey::None => {}
        SortKey::Oldest => visible.sort_by(|a, b| a.ended_at.cmp(&b.ended_at)),
        SortKey::Newest => visible.sort_by(|a, b| b.ended_at.cmp(&a.ended_at)),
    }

    visible
}
// endregion: --- Apply

// endregion: --- Tests
