// region:    --- Imports
use auction_admin::api::ApiClient;
use auction_admin::config::Config;
use auction_admin::handlers;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // 설정 읽기
    let config = match Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("{:<12} --> 설정 읽기 실패: {}", "Main", e);
            return Err(e.into());
        }
    };
    info!(
        "{:<12} --> 경매 서비스 주소: {}",
        "Main", config.api_base_url
    );

    // 경매 서비스 클라이언트 생성
    let api = Arc::new(ApiClient::from_config(&config)?);

    // 라우터 설정
    let routes_all = handlers::routes((api, Arc::clone(&config)));

    // 리스너 생성
    let listener = TcpListener::bind(config.listen_addr.as_str()).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
