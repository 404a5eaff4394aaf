use anyhow::{anyhow, Result};
use std::net::SocketAddr;
use std::str::FromStr;
use url::Url;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub http_addr: String,
    pub app_mode: String,
    pub redis_url: String,
    pub layout_store: String,
    pub push_list_key: String,
    pub app_origin: Url,
    pub bridge_token: Option<String>,
    pub delivery_timeout_ms: u64,
    pub push_poll_seconds: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let http_addr = env_or("HTTP_ADDR", "0.0.0.0:8080");
        let _parsed_http_addr = SocketAddr::from_str(&http_addr)
            .map_err(|err| anyhow!("invalid HTTP_ADDR: {}", err))?;
        let app_mode = env_or("APP_MODE", "api");

        let app_origin = Url::parse(&env_or("APP_ORIGIN", "http://localhost:5173"))
            .map_err(|err| anyhow!("invalid APP_ORIGIN: {}", err))?;
        if !app_origin.has_host() {
            return Err(anyhow!("invalid APP_ORIGIN: missing host"));
        }

        Ok(Self {
            http_addr,
            app_mode,
            redis_url: env_or("REDIS_URL", "redis://127.0.0.1/"),
            layout_store: env_or("LAYOUT_STORE", "redis"),
            push_list_key: env_or("PUSH_LIST_KEY", "taleemhub:push"),
            app_origin,
            bridge_token: std::env::var("BRIDGE_TOKEN").ok(),
            delivery_timeout_ms: env_or_parse("DELIVERY_TIMEOUT_MS", "10000")?,
            push_poll_seconds: env_or_parse("PUSH_POLL_SECONDS", "10")?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    let value = std::env::var(key).unwrap_or_else(|_| default.to_string());
    value
        .parse::<T>()
        .map_err(|err| anyhow!("invalid {}: {}", key, err))
}
