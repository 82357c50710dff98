/// 페이지 번호 목록 생성
// region:    --- Imports
use serde::{Deserialize, Serialize};

// endregion: --- Imports

/// 이 개수 이하면 모든 페이지 번호를 표시
const SHOW_ALL_LIMIT: u32 = 8;

/// 페이지 번호 표시 항목
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "page", rename_all = "lowercase")]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

/// 서버 페이지 정보 기준 번호 목록
///
/// 8페이지 이하는 전부, 그 이상은 첫 페이지, 마지막 페이지, 현재 페이지 ±1만 표시하고
/// 사이가 비면 말줄임을 넣는다. 빠진 페이지가 하나뿐이면 말줄임 대신 그 번호를 넣는다.
/// 경계에서는 현재 페이지의 아래쪽 이웃만 남는다.
pub fn page_numbers(current: u32, total_pages: u32) -> Vec<PageItem> {
    if total_pages == 0 {
        return Vec::new();
    }
    if total_pages <= SHOW_ALL_LIMIT {
        return (1..=total_pages).map(PageItem::Page).collect();
    }

    let current = current.clamp(1, total_pages);
    let window_start = current.saturating_sub(1).max(2);
    let window_end = current.saturating_add(1).min(total_pages - 1);

    let mut pages = vec![1];
    pages.extend(window_start..=window_end);
    pages.push(total_pages);

    let mut items = Vec::with_capacity(pages.len() + 2);
    let mut previous = 0;
    for page in pages {
        if page <= previous {
            continue;
        }
        if previous != 0 && page == previous + 2 {
            items.push(PageItem::Page(previous + 1));
        } else if previous != 0 && page > previous + 2 {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page(page));
        previous = page;
    }
    items
}

// endregion: --- Tests
