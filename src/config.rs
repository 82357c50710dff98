// region:    --- Imports
use crate::api::Credentials;
use crate::error::AdminError;
use std::time::Duration;

// endregion: --- Imports

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_PAGE_LIMIT: u32 = 10;
const DEFAULT_TIMEOUT_SECS: u64 = 15;

// region:    --- Config
/// 관리자 콘솔 설정
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub access_token: String,
    pub refresh_token: String,
    pub listen_addr: String,
    pub page_limit: u32,
    pub request_timeout: Duration,
}

impl Config {
    /// 환경 변수에서 설정 읽기 (`.env` 파일이 있으면 먼저 적용)
    pub fn from_env() -> Result<Self, AdminError> {
        // .env 파일이 없어도 무시
        _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 키 조회 함수로 설정 만들기
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AdminError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| AdminError::Config(format!("{} 값이 설정되지 않았습니다.", key)))
        };

        let page_limit = match lookup("PAGE_LIMIT") {
            Some(value) => parse_positive("PAGE_LIMIT", &value)?,
            None => DEFAULT_PAGE_LIMIT,
        };
        let timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(value) => parse_positive::<u64>("REQUEST_TIMEOUT_SECS", &value)?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_base_url: required("AUCTION_API_URL")?,
            access_token: required("ADMIN_ACCESS_TOKEN")?,
            refresh_token: required("ADMIN_REFRESH_TOKEN")?,
            listen_addr: lookup("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
            page_limit,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

fn parse_positive<T>(key: &str, value: &str) -> Result<T, AdminError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match value.trim().parse::<T>() {
        Ok(parsed) if parsed > T::default() => Ok(parsed),
        _ => Err(AdminError::Config(format!(
            "{} 값은 양의 정수여야 합니다: {}",
            key, value
        ))),
    }
}
// endregion: --- Config

// endregion: --- Tests
