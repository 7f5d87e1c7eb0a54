use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::output::Charset;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        service_root: get_env_or_default("SUBSIFT_SERVICE_ROOT", DEFAULT_SERVICE_ROOT),
        page_delay: Duration::from_secs(get_env_parsed("SUBSIFT_PAGE_DELAY_SECS", 3)),
        request_timeout: Duration::from_secs(get_env_parsed("SUBSIFT_REQUEST_TIMEOUT_SECS", 30)),
        run_timeout: match get_env_parsed("SUBSIFT_RUN_TIMEOUT_SECS", 600) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        },
        user_agent: get_env_or_default("SUBSIFT_USER_AGENT", &default_user_agent()),
        output_path: env::var("SUBSIFT_OUTPUT_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from),
        output_charset: if get_env_parsed("SUBSIFT_OUTPUT_ASCII", false) {
            Charset::Ascii
        } else {
            Charset::Utf8
        },
    }
});

pub const DEFAULT_SERVICE_ROOT: &str = "https://old.reddit.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub service_root: String,
    /// Pause between two consecutive page requests.
    pub page_delay: Duration,
    pub request_timeout: Duration,
    /// Upper bound for a whole pagination run, `None` for unbounded.
    pub run_timeout: Option<Duration>,
    pub user_agent: String,
    /// Where each run's rows are saved. Nothing is written when unset.
    pub output_path: Option<PathBuf>,
    pub output_charset: Charset,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            service_root: DEFAULT_SERVICE_ROOT.to_string(),
            page_delay: Duration::from_secs(3),
            request_timeout: Duration::from_secs(30),
            run_timeout: Some(Duration::from_secs(600)),
            user_agent: default_user_agent(),
            output_path: None,
            output_charset: Charset::Utf8,
        }
    }
}

fn default_user_agent() -> String {
    format!("subsift/{}", env!("CARGO_PKG_VERSION"))
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_env_parsed<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("ignoring {key}={raw:?}, using default {default}");
            default
        }),
        Err(_) => default,
    }
}
