use auction_admin::api::{ApiClient, AuctionApi, AuctionListParams, Credentials};
use auction_admin::auction::commands::{handle_transition, TransitionCommand, TransitionOutcome};
use auction_admin::auction::model::ServerState;
use auction_admin::auction::status::ClientStatus;
use auction_admin::bidding::projection::project_page;
use auction_admin::config::Config;
use auction_admin::error::AdminError;
use auction_admin::handlers;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use chrono::{Duration, SecondsFormat, Utc};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

// region:    --- Mock Backend
/// 테스트용 경매, 상품 서비스
struct Backend {
    auctions: Mutex<Vec<Value>>,
    access_token: Mutex<String>,
    refresh_ok: bool,
    // 켜져 있으면 갱신된 토큰도 거부
    revoked: AtomicBool,
    refresh_calls: AtomicUsize,
    mutations: AtomicUsize,
}

type Shared = Arc<Backend>;

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "Token expired"})),
    )
        .into_response()
}

fn authorized(backend: &Backend, headers: &HeaderMap) -> bool {
    if backend.revoked.load(Ordering::SeqCst) {
        return false;
    }
    let expected = format!("Bearer {}", backend.access_token.lock().unwrap());
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v == expected)
}

async fn list_auctions(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&backend, &headers) {
        return unauthorized();
    }
    let data: Vec<Value> = backend
        .auctions
        .lock()
        .unwrap()
        .iter()
        .filter(|a| params.get("state").map_or(true, |s| a["state"] == s.as_str()))
        .cloned()
        .collect();
    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    Json(json!({
        "data": data,
        "pagination": {"page": page, "limit": 10, "total": 95, "totalPages": 10}
    }))
    .into_response()
}

async fn get_auction(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&backend, &headers) {
        return unauthorized();
    }
    let auctions = backend.auctions.lock().unwrap();
    match auctions.iter().find(|a| a["id"] == id.as_str()) {
        Some(auction) => Json(json!({"data": {"auction": auction}})).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Auction not found"})),
        )
            .into_response(),
    }
}

async fn update_state(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    update_auction(State(backend), headers, Path(id), Json(body)).await
}

async fn update_auction(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&backend, &headers) {
        return unauthorized();
    }
    backend.mutations.fetch_add(1, Ordering::SeqCst);
    let mut auctions = backend.auctions.lock().unwrap();
    let Some(auction) = auctions.iter_mut().find(|a| a["id"] == id.as_str()) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let has_bids = auction["bids"].as_array().map_or(false, |b| !b.is_empty());
    if body["state"] == "scheduled" && has_bids {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"message": "Cannot pause an auction with bids"})),
        )
            .into_response();
    }
    for key in ["state", "startAt", "endAt"] {
        if let Some(value) = body.get(key) {
            auction[key] = value.clone();
        }
    }
    Json(json!({"data": {"auction": auction}})).into_response()
}

async fn list_bids(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&backend, &headers) {
        return unauthorized();
    }
    let auctions = backend.auctions.lock().unwrap();
    let bids = auctions
        .iter()
        .find(|a| a["id"] == id.as_str())
        .map(|a| a["bids"].clone())
        .unwrap_or_else(|| json!([]));
    Json(json!({"data": bids})).into_response()
}

async fn delete_product(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&backend, &headers) {
        return unauthorized();
    }
    backend.mutations.fetch_add(1, Ordering::SeqCst);
    // 상품 삭제 시 소유 경매도 삭제
    backend
        .auctions
        .lock()
        .unwrap()
        .retain(|a| a["productId"] != id.as_str());
    StatusCode::NO_CONTENT.into_response()
}

async fn refresh(State(backend): State<Shared>, Json(body): Json<Value>) -> Response {
    backend.refresh_calls.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    if !backend.refresh_ok || body["refreshToken"] != "refresh-1" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid refresh token"})),
        )
            .into_response();
    }
    *backend.access_token.lock().unwrap() = "access-2".to_string();
    Json(json!({"data": {"accessToken": "access-2", "refreshToken": "refresh-2"}})).into_response()
}

fn auction_json(id: &str, product_id: &str, state: &str, title: &str, end_in: Duration, bids: Value) -> Value {
    let now = Utc::now();
    json!({
        "id": id,
        "productId": product_id,
        "state": state,
        "startAt": (now - Duration::days(1)).to_rfc3339_opts(SecondsFormat::Millis, true),
        "endAt": (now + end_in).to_rfc3339_opts(SecondsFormat::Millis, true),
        "minIncrement": 10000,
        "depositAmount": 50000,
        "bids": bids,
        "product": {
            "title": title,
            "description": "",
            "priceMinor": 900000,
            "currency": "QAR",
            "media": [],
            "categories": [{"id": "c1", "name": "Watches"}]
        }
    })
}

fn seed() -> Vec<Value> {
    let bid = json!([{
        "id": "b1",
        "amountMinor": 875000,
        "userId": "u1",
        "placedAt": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "isWinning": true
    }]);
    vec![
        auction_json(
            "a1",
            "p1",
            "live",
            "Vintage Rolex Submariner Watch",
            Duration::days(2) + Duration::seconds(30),
            bid,
        ),
        auction_json("a2", "p2", "scheduled", "Rolex Daytona", Duration::days(5), json!([])),
        auction_json("a3", "p3", "draft", "Rolex Datejust", Duration::days(5), json!([])),
        auction_json("a4", "p4", "ended", "Persian Rug", -Duration::days(3), json!([])),
    ]
}

async fn spawn_backend(access_token: &str, refresh_ok: bool) -> (Shared, SocketAddr) {
    let backend = Arc::new(Backend {
        auctions: Mutex::new(seed()),
        access_token: Mutex::new(access_token.to_string()),
        refresh_ok,
        revoked: AtomicBool::new(false),
        refresh_calls: AtomicUsize::new(0),
        mutations: AtomicUsize::new(0),
    });
    let router = Router::new()
        .route("/auctions", get(list_auctions))
        .route("/auctions/:id", get(get_auction).patch(update_auction))
        .route("/auctions/:id/state", patch(update_state))
        .route("/auctions/:id/bids", get(list_bids))
        .route("/products/:id", delete(delete_product))
        .route("/auth/refresh", post(refresh))
        .with_state(Arc::clone(&backend));

    let addr = serve(router).await;
    (backend, addr)
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service()).await.unwrap();
    });
    addr
}

fn client(addr: SocketAddr, access_token: &str) -> ApiClient {
    ApiClient::new(
        format!("http://{}", addr),
        Some(Credentials {
            access_token: access_token.into(),
            refresh_token: "refresh-1".into(),
        }),
        std::time::Duration::from_secs(5),
    )
    .unwrap()
}
// endregion: --- Mock Backend

// region:    --- Client Tests
/// 목록 조회 후 투영
#[tokio::test]
async fn test_list_and_project() {
    let (_, addr) = spawn_backend("access-1", true).await;
    let api = client(addr, "access-1");

    let page = api.list_auctions(&AuctionListParams::page(1, 10)).await.unwrap();
    assert_eq!(page.data.len(), 4);
    assert_eq!(page.pagination.total_pages, 10);

    let products = project_page(&page, Utc::now());
    // draft는 목록에서 제외
    assert_eq!(products.len(), 3);

    let live = products.iter().find(|p| p.id == "a1").unwrap();
    assert_eq!(live.status, ClientStatus::Live);
    assert_eq!(live.current_bid, "8,750.00 QAR");
    assert_eq!(live.time_left, "2d : 0h : 0m");
    assert_eq!(live.category, "Watches");

    let ended = products.iter().find(|p| p.id == "a4").unwrap();
    assert_eq!(ended.status, ClientStatus::PaymentRequested);
    assert!(ended.time_left.starts_with("Ended "));

    let bids = api.list_bids("a1", 1, 10).await.unwrap();
    assert_eq!(bids.data.len(), 1);
    assert_eq!(bids.data[0].amount_minor, 875_000);
}

/// 만료된 토큰은 한 번 갱신 후 재전송
#[tokio::test]
async fn test_refresh_and_replay() {
    // 서버가 받아들이는 토큰은 갱신 후의 access-2 뿐
    let (backend, addr) = spawn_backend("access-2", true).await;
    let api = client(addr, "access-1");

    let auction = api.get_auction("a2").await.unwrap();
    assert_eq!(auction.state, ServerState::Scheduled);
    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(api.auth().current().await.unwrap().1, "access-2");

    // 갱신된 토큰으로는 더 갱신하지 않는다
    api.get_auction("a1").await.unwrap();
    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 1);
}

/// 동시에 받은 401은 갱신 한 번을 공유
#[tokio::test]
async fn test_concurrent_unauthorized_share_one_refresh() {
    let (backend, addr) = spawn_backend("access-2", true).await;
    let api = Arc::new(client(addr, "access-1"));

    let mut handles = vec![];
    for _ in 0..8 {
        let api = Arc::clone(&api);
        handles.push(tokio::spawn(async move {
            api.list_auctions(&AuctionListParams::page(1, 10)).await
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }
    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 1);
}

/// 갱신 실패 시 로그아웃
#[tokio::test]
async fn test_refresh_failure_clears_credentials() {
    let (backend, addr) = spawn_backend("access-2", false).await;
    let api = client(addr, "access-1");

    let err = api.get_auction("a1").await.unwrap_err();
    assert!(matches!(err, AdminError::SessionExpired));
    assert!(api.auth().current().await.is_none());

    // 다시 갱신을 시도하지 않는다
    let err = api.get_auction("a1").await.unwrap_err();
    assert!(matches!(err, AdminError::Unauthenticated));
    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 1);

    api.login_with(Credentials {
        access_token: "access-2".into(),
        refresh_token: "refresh-1".into(),
    })
    .await;
    assert!(api.get_auction("a1").await.is_ok());
}

/// 재전송까지 거부되면 다시 갱신하지 않고 로그아웃
#[tokio::test]
async fn test_replay_rejected_again_expires_session() {
    let (backend, addr) = spawn_backend("access-2", true).await;
    backend.revoked.store(true, Ordering::SeqCst);
    let api = client(addr, "access-1");

    let err = api.get_auction("a1").await.unwrap_err();
    assert!(matches!(err, AdminError::SessionExpired));
    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 1);
    assert!(api.auth().current().await.is_none());

    let err = api
        .list_auctions(&AuctionListParams::page(1, 10))
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Unauthenticated));
    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 1);
}

/// 서버 메시지를 그대로 전달하고 재시도하지 않는다
#[tokio::test]
async fn test_server_message_is_surfaced() {
    let (backend, addr) = spawn_backend("access-1", true).await;
    let api = client(addr, "access-1");
    let auction = api.get_auction("a1").await.unwrap();

    let err = handle_transition(TransitionCommand::Pause, &auction, &api, Utc::now())
        .await
        .unwrap_err();
    match err {
        AdminError::Api { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "Cannot pause an auction with bids");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(backend.mutations.load(Ordering::SeqCst), 1);
    assert_eq!(
        api.get_auction("a1").await.unwrap().state,
        ServerState::Live
    );
}

/// 상품 삭제 후 경매가 목록에서 사라진다
#[tokio::test]
async fn test_delete_product_cascades_to_auction() {
    let (_, addr) = spawn_backend("access-1", true).await;
    let api = client(addr, "access-1");
    let auction = api.get_auction("a1").await.unwrap();
    assert_eq!(auction.product_id, "p1");

    let outcome = handle_transition(TransitionCommand::Delete, &auction, &api, Utc::now())
        .await
        .unwrap();
    assert!(matches!(outcome, TransitionOutcome::Deleted { .. }));

    let page = api.list_auctions(&AuctionListParams::page(1, 10)).await.unwrap();
    assert!(page.data.iter().all(|a| a.id != "a1"));
}

/// 서버 상태 변경 후 다시 조회
#[tokio::test]
async fn test_start_now_refetches_record() {
    let (_, addr) = spawn_backend("access-1", true).await;
    let api = client(addr, "access-1");
    let auction = api.get_auction("a2").await.unwrap();
    let now = Utc::now();

    let outcome = handle_transition(
        TransitionCommand::Start {
            reset_start_at: true,
        },
        &auction,
        &api,
        now,
    )
    .await
    .unwrap();
    let TransitionOutcome::Updated { auction, product } = outcome else {
        panic!("expected updated outcome");
    };
    assert_eq!(auction.state, ServerState::Live);
    assert_eq!(auction.start_at.timestamp_millis(), now.timestamp_millis());
    assert_eq!(product.unwrap().status, ClientStatus::Live);
}

/// 알 수 없는 서버 상태는 조용히 넘기지 않는다
#[tokio::test]
async fn test_unknown_state_fails_loudly() {
    let (backend, addr) = spawn_backend("access-1", true).await;
    backend.auctions.lock().unwrap().push(auction_json(
        "a9",
        "p9",
        "paused",
        "Mystery Lot",
        Duration::days(1),
        json!([]),
    ));
    let api = client(addr, "access-1");

    let err = api
        .list_auctions(&AuctionListParams::page(1, 10))
        .await
        .unwrap_err();
    match err {
        AdminError::Decode(message) => assert!(message.contains("paused")),
        other => panic!("unexpected error: {:?}", other),
    }
}
// endregion: --- Client Tests

// region:    --- Router Tests
async fn spawn_admin(addr: SocketAddr) -> SocketAddr {
    let config = Config {
        api_base_url: format!("http://{}", addr),
        access_token: "access-1".into(),
        refresh_token: "refresh-1".into(),
        listen_addr: "127.0.0.1:0".into(),
        page_limit: 10,
        request_timeout: std::time::Duration::from_secs(5),
    };
    let api = Arc::new(ApiClient::from_config(&config).unwrap());
    serve(handlers::routes((api, Arc::new(config)))).await
}

/// 관리자 목록 API: 검색, 정렬, 페이지 번호
#[tokio::test]
async fn test_admin_list_endpoint() {
    let (_, backend_addr) = spawn_backend("access-1", true).await;
    let admin_addr = spawn_admin(backend_addr).await;

    let body: Value = reqwest::get(format!(
        "http://{}/bidding-products?search=ROLEX&sort=Oldest%20First&page=4",
        admin_addr
    ))
    .await
    .unwrap()
    .json()
    .await
    .unwrap();

    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["a1", "a2"]);
    assert_eq!(body["pagination"]["page"], 4);
    assert_eq!(body["pages"].as_array().unwrap().len(), 7);

    let response = reqwest::get(format!(
        "http://{}/bidding-products?status=Archived",
        admin_addr
    ))
    .await
    .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// 관리자 명령 API: 허용되지 않은 명령은 서버 호출 전에 거부
#[tokio::test]
async fn test_admin_action_endpoint() {
    let (backend, backend_addr) = spawn_backend("access-1", true).await;
    let admin_addr = spawn_admin(backend_addr).await;
    let http = reqwest::Client::new();

    let response = http
        .post(format!("http://{}/bidding-products/a2/actions", admin_addr))
        .json(&json!({"action": "pause"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "ILLEGAL_ACTION");
    assert_eq!(backend.mutations.load(Ordering::SeqCst), 0);

    let response = http
        .post(format!("http://{}/bidding-products/a2/actions", admin_addr))
        .json(&json!({"action": "start"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["outcome"], "updated");
    assert_eq!(body["product"]["status"], "live");

    let body: Value = http
        .get(format!("http://{}/bidding-products/a2", admin_addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["status"], "live");
    assert!(body["actions"]
        .as_array()
        .unwrap()
        .contains(&json!("end-now")));

    let response = http
        .get(format!("http://{}/bidding-products/a3", admin_addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
// endregion: --- Router Tests
