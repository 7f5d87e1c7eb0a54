use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::mem::take;
use std::path::Path;

use crate::data_models::ResultRow;
use crate::errors::{EncodingError, OutputError};

pub const HEADER: [&str; 3] = ["URL", "Title", "Rating"];
const SEP: char = ',';

/// Character set for saved files. Console output is always full UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    #[default]
    Utf8,
    Ascii,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub written: usize,
    /// Rows left out because a field did not fit the charset.
    pub dropped: usize,
}

/* ---------------- Console ---------------- */

pub fn render_rows(rows: &[ResultRow]) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str(&format!("{row}\n    {}\n", row.link));
    }
    out
}

/* ---------------- File ---------------- */

/// Field order follows `HEADER`: link, title, score.
pub fn to_record(row: &ResultRow, charset: Charset) -> Result<[String; 3], EncodingError> {
    if charset == Charset::Ascii {
        ensure_ascii("title", &row.title)?;
        ensure_ascii("link", &row.link)?;
    }
    Ok([row.link.clone(), row.title.clone(), row.score.to_string()])
}

fn ensure_ascii(field: &'static str, text: &str) -> Result<(), EncodingError> {
    if text.is_ascii() {
        Ok(())
    } else {
        Err(EncodingError {
            field,
            text: text.to_string(),
        })
    }
}

/// Header plus one record per row. A row that fails `charset` is dropped
/// whole so every record keeps three fields.
pub fn write_results<W: Write>(
    mut w: W,
    rows: &[ResultRow],
    charset: Charset,
) -> io::Result<SaveReport> {
    let mut report = SaveReport::default();
    write_row(&mut w, &HEADER)?;
    for row in rows {
        match to_record(row, charset) {
            Ok(record) => {
                write_row(&mut w, &record)?;
                report.written += 1;
            }
            Err(e) => {
                log::warn!("dropping row from output: {e}");
                report.dropped += 1;
            }
        }
    }
    w.flush()?;
    Ok(report)
}

pub fn save_results(
    path: &Path,
    rows: &[ResultRow],
    charset: Charset,
) -> Result<SaveReport, OutputError> {
    let io_err = |source| OutputError::Io {
        path: path.display().to_string(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let report = write_results(BufWriter::new(file), rows, charset).map_err(io_err)?;
    log::info!(
        "saved {} rows to {} ({} dropped)",
        report.written,
        path.display(),
        report.dropped
    );
    Ok(report)
}

fn needs_quotes(field: &str) -> bool {
    field.contains(SEP) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row<W: Write, S: AsRef<str>>(w: &mut W, row: &[S]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        let cell = cell.as_ref();
        if !first {
            write!(w, "{SEP}")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{cell}")?;
        }
    }
    writeln!(w)
}

/* ---------------- Reading back ---------------- */

/// Minimal reader for files written by `write_results` (quotes and CRLF
/// tolerant).
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = String::new();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            c if c == SEP && !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}
