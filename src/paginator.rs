use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::data_models::{PageQuery, ResultSet, SearchRequest};
use crate::errors::ScrapeError;
use crate::extractor::{KeywordMatcher, extract};
use crate::fetcher::{Fetcher, search_endpoint};
use crate::parser::{Selectors, parse};

/// Walks search result pages one at a time until the requested offset is
/// covered.
///
/// Pages are fetched strictly in sequence with `page_delay` between two
/// requests. The remote service expects that pause; do not parallelize.
pub struct Paginator<F> {
    fetcher: F,
    selectors: Selectors,
    service_root: String,
    page_delay: Duration,
    run_timeout: Option<Duration>,
    cancel: CancellationToken,
}

impl<F: Fetcher> Paginator<F> {
    pub fn new(fetcher: F, config: &Config) -> Paginator<F> {
        Paginator {
            fetcher,
            selectors: Selectors::default(),
            service_root: config.service_root.clone(),
            page_delay: config.page_delay,
            run_timeout: config.run_timeout,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_selectors(mut self, selectors: Selectors) -> Paginator<F> {
        self.selectors = selectors;
        self
    }

    /// Runs stop at the next page boundary, or mid-delay, once `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Paginator<F> {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Fetch, parse and filter pages at offsets 0, 25, 50, ... while the
    /// offset is within `request.result_target`.
    ///
    /// The first failing page aborts the run; rows from earlier pages are
    /// discarded along with it.
    pub async fn paginate(&self, request: &SearchRequest) -> Result<ResultSet, ScrapeError> {
        match self.run_timeout {
            Some(limit) => tokio::time::timeout(limit, self.run(request))
                .await
                .map_err(|_| ScrapeError::Timeout(limit))?,
            None => self.run(request).await,
        }
    }

    async fn run(&self, request: &SearchRequest) -> Result<ResultSet, ScrapeError> {
        let endpoint = search_endpoint(&self.service_root, &request.community)?;
        let matcher = KeywordMatcher::new(&request.keyword)?;
        let target = u64::from(request.result_target);

        let mut page = PageQuery::new(endpoint, request.query.clone());
        let mut results = ResultSet::default();

        while page.page_offset <= target {
            if self.cancel.is_cancelled() {
                return Err(ScrapeError::Cancelled);
            }

            log::info!("fetching {} at offset {}", page.endpoint, page.page_offset);
            let body = self.fetcher.fetch(&page.endpoint, &page.params()).await?;
            let rows = {
                let document = parse(&body)?;
                extract(
                    &document,
                    &self.selectors,
                    &matcher,
                    request.score_threshold,
                    &page.endpoint,
                )
            };
            log::info!(
                "offset {}: kept {} rows ({} so far)",
                page.page_offset,
                rows.len(),
                results.rows.len() + rows.len()
            );
            results.rows.extend(rows);
            results.pages_fetched += 1;

            page.advance();
            if page.page_offset <= target {
                self.pause().await?;
            }
        }

        Ok(results)
    }

    async fn pause(&self) -> Result<(), ScrapeError> {
        if self.page_delay.is_zero() {
            return Ok(());
        }
        tokio::select! {
            _ = self.cancel.cancelled() => Err(ScrapeError::Cancelled),
            _ = tokio::time::sleep(self.page_delay) => Ok(()),
        }
    }
}
