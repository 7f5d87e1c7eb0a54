use std::fmt;

use reqwest::Url;

/// Results the search endpoint returns per page.
pub const PAGE_SIZE: u32 = 25;

/// One scrape job, as collected from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub community: String,
    pub query: String,
    pub keyword: String,
    pub result_target: u32,
    pub score_threshold: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    Relevance,
    Hot,
    Top,
    New,
    Comments,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Relevance => "relevance",
            SortMode::Hot => "hot",
            SortMode::Top => "top",
            SortMode::New => "new",
            SortMode::Comments => "comments",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    Hour,
    Day,
    Week,
    Month,
    Year,
    #[default]
    All,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Hour => "hour",
            TimeRange::Day => "day",
            TimeRange::Week => "week",
            TimeRange::Month => "month",
            TimeRange::Year => "year",
            TimeRange::All => "all",
        }
    }
}

/// Cursor over the search endpoint. Only `page_offset` moves during a run.
#[derive(Debug, Clone)]
pub struct PageQuery {
    pub endpoint: Url,
    pub query: String,
    pub restrict_to_community: bool,
    pub page_offset: u64,
    pub sort_mode: SortMode,
    pub time_range: TimeRange,
}

impl PageQuery {
    pub fn new(endpoint: Url, query: impl Into<String>) -> PageQuery {
        PageQuery {
            endpoint,
            query: query.into(),
            restrict_to_community: true,
            page_offset: 0,
            sort_mode: SortMode::default(),
            time_range: TimeRange::default(),
        }
    }

    /// Query-string pairs for the current page.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("q", self.query.clone())];
        if self.restrict_to_community {
            params.push(("restrict_sr", "on".to_string()));
        }
        params.push(("count", self.page_offset.to_string()));
        params.push(("sort", self.sort_mode.as_str().to_string()));
        params.push(("t", self.time_range.as_str().to_string()));
        params
    }

    pub fn advance(&mut self) {
        self.page_offset += u64::from(PAGE_SIZE);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub title: String,
    pub link: String,
    pub score: i64,
}

impl fmt::Display for ResultRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.score, self.title)
    }
}

/// Rows retained by one run, in discovery order. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    pub rows: Vec<ResultRow>,
    pub pages_fetched: usize,
}

impl ResultSet {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
