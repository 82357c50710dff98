/// 경매 목록 조회
pub const AUCTIONS: &str = "/auctions";

/// 토큰 갱신
pub const AUTH_REFRESH: &str = "/auth/refresh";

/// 경매 상세 조회, 전체 변경
pub fn auction(id: &str) -> String {
    format!("/auctions/{}", id)
}

/// 경매 상태 변경
pub fn auction_state(id: &str) -> String {
    format!("/auctions/{}/state", id)
}

/// 경매 입찰 목록 조회
pub fn auction_bids(id: &str) -> String {
    format!("/auctions/{}/bids", id)
}

/// 상품 삭제 (소유 경매도 함께 삭제됨)
pub fn product(id: &str) -> String {
    format!("/products/{}", id)
}

/// 인증 엔드포인트는 401 재시도 대상이 아니다
pub fn is_auth_endpoint(path: &str) -> bool {
    path.starts_with("/auth/")
}
