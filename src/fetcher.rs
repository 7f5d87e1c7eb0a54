use reqwest::Url;

use crate::config::Config;
use crate::errors::{InputError, ScrapeError};

/// Source of raw search-page markup.
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    /// One GET of `endpoint` with `params` as query string.
    async fn fetch(
        &self,
        endpoint: &Url,
        params: &[(&'static str, String)],
    ) -> Result<String, ScrapeError>;
}

impl<F: Fetcher> Fetcher for &F {
    async fn fetch(
        &self,
        endpoint: &Url,
        params: &[(&'static str, String)],
    ) -> Result<String, ScrapeError> {
        (**self).fetch(endpoint, params).await
    }
}

/// Fetcher backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<HttpFetcher, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()?;
        Ok(HttpFetcher { client })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(
        &self,
        endpoint: &Url,
        params: &[(&'static str, String)],
    ) -> Result<String, ScrapeError> {
        let wrap = |e: reqwest::Error| ScrapeError::network(endpoint.as_str(), e);

        let res = self
            .client
            .get(endpoint.clone())
            .query(params)
            .send()
            .await
            .map_err(wrap)?;
        log::debug!("GET {} -> {}", res.url(), res.status());

        let res = res.error_for_status().map_err(wrap)?;
        let body = res.text().await.map_err(wrap)?;
        Ok(body)
    }
}

/// `<service_root>/r/<community>/search`.
///
/// Accepts `rust`, `r/rust` and `/r/rust/` for the community.
pub fn search_endpoint(service_root: &str, community: &str) -> Result<Url, ScrapeError> {
    let name = community.trim().trim_matches('/');
    let name = name.strip_prefix("r/").unwrap_or(name);
    if name.is_empty() {
        return Err(InputError::Empty { field: "community" }.into());
    }
    if name.contains(['/', '?', '#']) || name.contains(char::is_whitespace) {
        return Err(InputError::Invalid {
            field: "community",
            reason: format!("{name:?} is not a single community name"),
        }
        .into());
    }

    let invalid_root = |reason: String| InputError::Invalid {
        field: "service root",
        reason,
    };
    let mut url = Url::parse(service_root).map_err(|e| invalid_root(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| invalid_root(format!("{service_root} cannot carry a path")))?
        .pop_if_empty()
        .extend(["r", name, "search"]);
    Ok(url)
}
