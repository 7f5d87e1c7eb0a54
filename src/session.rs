use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::Config;
use crate::data_models::{ResultSet, SearchRequest};
use crate::errors::InputError;
use crate::fetcher::Fetcher;
use crate::output::{Charset, render_rows, save_results};
use crate::paginator::Paginator;

const COMMUNITY: &str = "community";
const QUERY: &str = "search topic";
const RESULT_TARGET: &str = "number of results";
const SCORE_THRESHOLD: &str = "score threshold";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Collecting,
    Running(SearchRequest),
    Terminal,
}

/// Prompt-driven loop: collect a request, run it, offer another.
pub struct Session<R, W, F> {
    input: R,
    out: W,
    paginator: Paginator<F>,
    output_path: Option<PathBuf>,
    charset: Charset,
}

impl<R: BufRead, W: Write, F: Fetcher> Session<R, W, F> {
    pub fn new(input: R, out: W, paginator: Paginator<F>, config: &Config) -> Session<R, W, F> {
        Session {
            input,
            out,
            paginator,
            output_path: config.output_path.clone(),
            charset: config.output_charset,
        }
    }

    /// Drive the session until the user stops or input runs out.
    ///
    /// Only I/O failures on the console itself are returned.
    pub async fn run(&mut self) -> Result<(), InputError> {
        let mut state = SessionState::Collecting;
        loop {
            state = match state {
                SessionState::Collecting => match self.collect_request() {
                    Ok(request) => SessionState::Running(request),
                    Err(InputError::Closed) => SessionState::Terminal,
                    Err(e) => return Err(e),
                },
                SessionState::Running(request) => {
                    self.execute(&request).await?;
                    match self.ask_continue() {
                        Ok(true) => SessionState::Collecting,
                        Ok(false) | Err(InputError::Closed) => SessionState::Terminal,
                        Err(e) => return Err(e),
                    }
                }
                SessionState::Terminal => return Ok(()),
            };
        }
    }

    fn collect_request(&mut self) -> Result<SearchRequest, InputError> {
        let community = self.prompt_required(
            "Please enter the subreddit you're interested in: ",
            COMMUNITY,
        )?;
        let query = self.prompt_required(
            "Please enter what topic you would like to search for: ",
            QUERY,
        )?;
        let keyword =
            self.read_line("Please enter the specific keyword you would like to monitor: ")?;
        let result_target = self.prompt_parsed(
            "Please enter the total number of items you want to search: ",
            parse_result_target,
        )?;
        let score_threshold = self.prompt_parsed(
            "Please enter the minimum score threshold for your results: ",
            parse_score_threshold,
        )?;

        Ok(SearchRequest {
            community,
            query,
            keyword,
            result_target,
            score_threshold,
        })
    }

    async fn execute(&mut self, request: &SearchRequest) -> Result<(), InputError> {
        writeln!(
            self.out,
            "Searching r/{} for {:?}...",
            request.community, request.query
        )?;

        match self.paginator.paginate(request).await {
            Ok(results) if results.is_empty() => {
                writeln!(
                    self.out,
                    "The search produced no results after {} page(s), or you may be sending requests too frequently.",
                    results.pages_fetched
                )?;
            }
            Ok(results) => {
                write!(self.out, "{}", render_rows(&results.rows))?;
                writeln!(
                    self.out,
                    "{} result(s) from {} page(s).",
                    results.len(),
                    results.pages_fetched
                )?;
                self.save(&results)?;
            }
            Err(e) => {
                log::error!("search failed: {e}");
                writeln!(self.out, "Search failed: {e}")?;
            }
        }
        Ok(())
    }

    fn save(&mut self, results: &ResultSet) -> Result<(), InputError> {
        let Some(path) = &self.output_path else {
            return Ok(());
        };
        match save_results(path, &results.rows, self.charset) {
            Ok(report) if report.dropped > 0 => writeln!(
                self.out,
                "Saved {} row(s) to {}; {} row(s) were not ASCII and were left out.",
                report.written,
                path.display(),
                report.dropped
            )?,
            Ok(report) => writeln!(
                self.out,
                "Saved {} row(s) to {}.",
                report.written,
                path.display()
            )?,
            Err(e) => writeln!(self.out, "Could not save results: {e}")?,
        }
        Ok(())
    }

    fn ask_continue(&mut self) -> Result<bool, InputError> {
        let answer = self.read_line(
            "If you would like to search for more results, please enter 'y'. Otherwise, press enter to exit. ",
        )?;
        Ok(is_affirmative(&answer))
    }

    fn read_line(&mut self, prompt: &str) -> Result<String, InputError> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(InputError::Closed);
        }
        Ok(line.trim().to_string())
    }

    fn prompt_required(&mut self, prompt: &str, field: &'static str) -> Result<String, InputError> {
        loop {
            let answer = self.read_line(prompt)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            writeln!(self.out, "{}. Please try again.", InputError::Empty { field })?;
        }
    }

    /// Re-asks the same prompt until `parse` accepts the answer.
    fn prompt_parsed<T>(
        &mut self,
        prompt: &str,
        parse: fn(&str) -> Result<T, InputError>,
    ) -> Result<T, InputError> {
        loop {
            let answer = self.read_line(prompt)?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(
                    e @ (InputError::NotAnInteger { .. }
                    | InputError::Negative { .. }
                    | InputError::Empty { .. }
                    | InputError::Invalid { .. }),
                ) => writeln!(self.out, "{e}. Please try again.")?,
                Err(e) => return Err(e),
            }
        }
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

pub fn parse_result_target(value: &str) -> Result<u32, InputError> {
    let n = parse_integer(RESULT_TARGET, value)?;
    if n < 0 {
        return Err(InputError::Negative {
            field: RESULT_TARGET,
            value: n,
        });
    }
    u32::try_from(n).map_err(|_| InputError::Invalid {
        field: RESULT_TARGET,
        reason: format!("{n} is larger than {}", u32::MAX),
    })
}

pub fn parse_score_threshold(value: &str) -> Result<i64, InputError> {
    parse_integer(SCORE_THRESHOLD, value)
}

fn parse_integer(field: &'static str, value: &str) -> Result<i64, InputError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(InputError::Empty { field });
    }
    value.parse().map_err(|_| InputError::NotAnInteger {
        field,
        value: value.to_string(),
    })
}
