use regex::Regex;
use reqwest::Url;
use scraper::{ElementRef, Html};

use crate::data_models::ResultRow;
use crate::errors::ScrapeError;
use crate::parser::Selectors;

/// Case-insensitive whole-word test for post titles.
///
/// "cat" matches "Cat video" but not "category" or "concatenate". The keyword
/// is taken literally, never as a pattern. A blank keyword matches everything.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    pattern: Option<Regex>,
}

impl KeywordMatcher {
    pub fn new(keyword: &str) -> Result<KeywordMatcher, ScrapeError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Ok(KeywordMatcher { pattern: None });
        }

        // `\b` next to a non-word character (as in "c++") would demand a word
        // character on the far side, so only anchor word-character edges.
        let lead = if keyword.starts_with(is_word_char) { r"\b" } else { "" };
        let trail = if keyword.ends_with(is_word_char) { r"\b" } else { "" };
        let pattern = format!("(?i){lead}{}{trail}", regex::escape(keyword));

        Ok(KeywordMatcher {
            pattern: Some(Regex::new(&pattern)?),
        })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.pattern.as_ref().is_none_or(|re| re.is_match(text))
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub fn parse_score(text: &str) -> Result<i64, ScrapeError> {
    text.trim()
        .parse()
        .map_err(|_| ScrapeError::MalformedScore {
            text: text.to_string(),
        })
}

/// Pull the posts that clear `score_threshold` and match `matcher`.
///
/// Each score indicator is paired with the title links under its grandparent
/// element. Relative links are resolved against `base`.
pub fn extract(
    document: &Html,
    selectors: &Selectors,
    matcher: &KeywordMatcher,
    score_threshold: i64,
    base: &Url,
) -> Vec<ResultRow> {
    let mut rows = Vec::new();

    for score in document.select(&selectors.score) {
        let rating = match parse_score(&score.text().collect::<String>()) {
            Ok(rating) => rating,
            Err(e) => {
                log::warn!("skipping score element: {e}");
                continue;
            }
        };
        if rating <= score_threshold {
            continue;
        }

        let Some(post) = score.ancestors().nth(1).and_then(ElementRef::wrap) else {
            continue;
        };

        for title in post.select(&selectors.title) {
            let text = title.text().collect::<String>().trim().to_string();
            if !matcher.matches(&text) {
                continue;
            }
            let Some(href) = title.value().attr("href") else {
                log::debug!("title {text:?} has no link, skipping");
                continue;
            };
            rows.push(ResultRow {
                title: text,
                link: resolve_link(base, href),
                score: rating,
            });
        }
    }

    rows
}

fn resolve_link(base: &Url, href: &str) -> String {
    match base.join(href) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => href.to_string(),
    }
}
