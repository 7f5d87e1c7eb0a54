use scraper::{Html, Selector};

use crate::errors::ScrapeError;

pub const SCORE_SELECTOR: &str = "div.score.likes";
pub const TITLE_SELECTOR: &str = "a.title";

/// Parse a page body into a document tree.
///
/// html5ever recovers from nearly anything, so the only body rejected is one
/// with no markup in it at all.
pub fn parse(raw_markup: &str) -> Result<Html, ScrapeError> {
    if raw_markup.trim().is_empty() {
        return Err(ScrapeError::Parse("response body is empty".to_string()));
    }
    Ok(Html::parse_document(raw_markup))
}

/// CSS selectors locating posts on a search page.
#[derive(Debug, Clone)]
pub struct Selectors {
    pub score: Selector,
    pub title: Selector,
}

impl Selectors {
    pub fn new(score: &str, title: &str) -> Result<Selectors, ScrapeError> {
        Ok(Selectors {
            score: compile(score)?,
            title: compile(title)?,
        })
    }
}

impl Default for Selectors {
    fn default() -> Self {
        // Both constants are known-good selectors.
        Selectors {
            score: Selector::parse(SCORE_SELECTOR).unwrap(),
            title: Selector::parse(TITLE_SELECTOR).unwrap(),
        }
    }
}

fn compile(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Parse(format!("bad selector {css:?}: {e}")))
}
