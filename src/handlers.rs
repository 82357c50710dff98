// region:    --- Imports
use crate::api::{ApiClient, AuctionApi, AuctionListParams};
use crate::auction::commands::{handle_transition_by_id, TransitionCommand};
use crate::auction::model::ServerState;
use crate::auction::status::{classify, ClientStatus};
use crate::bidding::projection::{project, project_page};
use crate::config::Config;
use crate::error::AdminError;
use crate::query::list::{apply, parse_status_filter, ListQuery, SortKey, ALL_STATUS_LABEL};
use crate::query::pager::page_numbers;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

// endregion: --- Imports

pub type AppState = (Arc<ApiClient>, Arc<Config>);

// region:    --- Router
/// 관리자 화면용 라우터
pub fn routes(state: AppState) -> Router {
    // 관리자 화면 개발 서버를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/bidding-products", get(handle_list_bidding_products))
        .route("/bidding-products/:id", get(handle_get_bidding_product))
        .route("/bidding-products/:id/bids", get(handle_get_bids))
        .route("/bidding-products/:id/actions", post(handle_action))
        .route("/statuses", get(handle_get_statuses))
        .layer(cors)
        .with_state(state)
}

/// 에러 -> 응답
fn error_response(e: AdminError) -> Response {
    let status = match &e {
        AdminError::Validation { .. } => StatusCode::BAD_REQUEST,
        AdminError::IllegalAction { .. } => StatusCode::CONFLICT,
        AdminError::NotListed { .. } => StatusCode::NOT_FOUND,
        AdminError::SessionExpired | AdminError::Unauthenticated => StatusCode::UNAUTHORIZED,
        AdminError::Api { status: 404, .. } => StatusCode::NOT_FOUND,
        AdminError::Api { .. }
        | AdminError::Network(_)
        | AdminError::Decode(_)
        | AdminError::UnknownState(_) => StatusCode::BAD_GATEWAY,
        AdminError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!("{:<12} --> 요청 처리 실패: {}", "Handler", e);
    }
    (
        status,
        Json(json!({
            "error": e.to_string(),
            "code": e.code(),
        })),
    )
        .into_response()
}
// endregion: --- Router

// region:    --- Request Models
/// 목록 요청 쿼리
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    pub state: Option<ServerState>,
    #[serde(rename = "type")]
    pub auction_type: Option<String>,
    pub vendor_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
}

impl ListRequest {
    fn params(&self, default_limit: u32) -> AuctionListParams {
        AuctionListParams {
            state: self.state,
            auction_type: self.auction_type.clone(),
            vendor_id: self.vendor_id.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            ..AuctionListParams::page(self.page.unwrap_or(1), self.limit.unwrap_or(default_limit))
        }
    }

    fn query(&self) -> Result<ListQuery, AdminError> {
        Ok(ListQuery {
            search: self.search.clone().unwrap_or_default(),
            status: parse_status_filter(self.status.as_deref().unwrap_or(""))?,
            sort: SortKey::from_label(self.sort.as_deref().unwrap_or(""))?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct BidsRequest {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}
// endregion: --- Request Models

// region:    --- Query Handlers
/// 입찰 상품 목록 조회
pub async fn handle_list_bidding_products(
    State((api, config)): State<AppState>,
    Query(request): Query<ListRequest>,
) -> Response {
    info!("{:<12} --> 입찰 상품 목록 조회: {:?}", "Handler", request);

    // 서버 호출 전에 검색 조건부터 검증
    let query = match request.query() {
        Ok(query) => query,
        Err(e) => return error_response(e),
    };
    let page = match api.list_auctions(&request.params(config.page_limit)).await {
        Ok(page) => page,
        Err(e) => return error_response(e),
    };

    let products = project_page(&page, Utc::now());
    let visible: Vec<_> = apply(&products, &query).into_iter().cloned().collect();
    let pages = page_numbers(page.pagination.page, page.pagination.total_pages);

    Json(json!({
        "data": visible,
        "pagination": page.pagination,
        "pages": pages,
    }))
    .into_response()
}

/// 입찰 상품 상세 조회
pub async fn handle_get_bidding_product(
    State((api, _)): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    info!("{:<12} --> 입찰 상품 조회 id: {}", "Handler", id);
    let auction = match api.get_auction(&id).await {
        Ok(auction) => auction,
        Err(e) => return error_response(e),
    };

    let (Some(status), Some(product)) = (classify(auction.state), project(&auction, Utc::now()))
    else {
        return error_response(AdminError::NotListed {
            id,
            state: auction.state.to_string(),
        });
    };

    Json(json!({
        "data": product,
        "actions": status.legal_actions(),
    }))
    .into_response()
}

/// 입찰 이력 조회
pub async fn handle_get_bids(
    State((api, config)): State<AppState>,
    Path(id): Path<String>,
    Query(request): Query<BidsRequest>,
) -> Response {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "Handler", id);
    match api
        .list_bids(
            &id,
            request.page.unwrap_or(1),
            request.limit.unwrap_or(config.page_limit),
        )
        .await
    {
        Ok(bids) => Json(bids).into_response(),
        Err(e) => error_response(e),
    }
}

/// 상태 필터 목록
pub async fn handle_get_statuses() -> Response {
    let mut statuses = vec![json!({ "value": null, "label": ALL_STATUS_LABEL })];
    statuses.extend(
        ClientStatus::ALL
            .iter()
            .map(|s| json!({ "value": s, "label": s.label() })),
    );
    Json(statuses).into_response()
}
// endregion: --- Query Handlers

// region:    --- Command Handlers
/// 관리자 명령 처리
pub async fn handle_action(
    State((api, _)): State<AppState>,
    Path(id): Path<String>,
    Json(command): Json<TransitionCommand>,
) -> Response {
    info!("{:<12} --> 관리자 명령 요청 id: {}, {:?}", "Handler", id, command);
    match handle_transition_by_id(&id, command, api.as_ref(), Utc::now()).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => error_response(e),
    }
}
// endregion: --- Command Handlers
