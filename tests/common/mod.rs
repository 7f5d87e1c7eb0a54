#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use reqwest::Url;
use subsift::config::Config;
use subsift::errors::ScrapeError;
use subsift::fetcher::Fetcher;

/// Config with no delay and no run deadline.
pub fn fast_config() -> Config {
    Config {
        page_delay: Duration::ZERO,
        run_timeout: None,
        ..Config::default()
    }
}

/// One old-reddit style post: score in `midcol`, title in `entry`, both under
/// the same `thing`.
pub fn post(score: &str, title: &str, href: &str) -> String {
    format!(
        r#"<div class="thing">
             <div class="midcol"><div class="score unvoted">{score}</div><div class="score likes">{score}</div></div>
             <div class="entry"><p class="title"><a class="title may-blank" href="{href}">{title}</a></p></div>
           </div>"#
    )
}

pub fn page(posts: &[String]) -> String {
    format!(
        "<html><head><title>search</title></head><body><div id=\"siteTable\">{}</div></body></html>",
        posts.join("\n")
    )
}

pub fn empty_page() -> String {
    page(&[])
}

/// Serves canned responses in order and records every request.
#[derive(Default)]
pub struct ScriptedFetcher {
    responses: RefCell<VecDeque<Result<String, ScrapeError>>>,
    requests: RefCell<Vec<(String, Vec<(&'static str, String)>)>>,
}

impl ScriptedFetcher {
    pub fn new(responses: Vec<Result<String, ScrapeError>>) -> ScriptedFetcher {
        ScriptedFetcher {
            responses: RefCell::new(responses.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn pages(pages: Vec<String>) -> ScriptedFetcher {
        Self::new(pages.into_iter().map(Ok).collect())
    }

    pub fn calls(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|(u, _)| u.clone()).collect()
    }

    /// The `count` parameter of every request, in order.
    pub fn offsets(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|(_, params)| param(params, "count").unwrap_or_default())
            .collect()
    }

    pub fn params(&self, call: usize) -> Vec<(&'static str, String)> {
        self.requests.borrow()[call].1.clone()
    }
}

pub fn param(params: &[(&'static str, String)], key: &str) -> Option<String> {
    params
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.clone())
}

impl Fetcher for ScriptedFetcher {
    async fn fetch(
        &self,
        endpoint: &Url,
        params: &[(&'static str, String)],
    ) -> Result<String, ScrapeError> {
        self.requests
            .borrow_mut()
            .push((endpoint.to_string(), params.to_vec()));
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(empty_page()))
    }
}

pub fn network_error(url: &str) -> ScrapeError {
    ScrapeError::network(
        url,
        std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset"),
    )
}
