//! CSV completion-map adapter
//!
//! The wire format is one record per line, `date,value`, with an optional
//! `date,value` header. Values are `true`/`false` or the numeric codes
//! `0`/`1`/`2`. Blank lines are ignored. Export renders the same shape with
//! original markers preserved, so legacy codes survive a round trip.

use super::CompletionImportAdapter;
use crate::dates::{day_key, parse_day_key};
use crate::error::EngineError;
use crate::types::{CompletionMap, CompletionMark};

/// Adapter for the `date,value` line format
pub struct CsvAdapter;

impl CompletionImportAdapter for CsvAdapter {
    fn parse(&self, raw: &str) -> Result<CompletionMap, EngineError> {
        let mut map = CompletionMap::new();

        for (index, line) in raw.lines().enumerate() {
            let line_no = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if index == 0 && trimmed.eq_ignore_ascii_case("date,value") {
                continue;
            }

            let (date_field, value_field) =
                trimmed
                    .split_once(',')
                    .ok_or_else(|| EngineError::MalformedRecord {
                        line: line_no,
                        message: format!("expected 'date,value', got '{}'", trimmed),
                    })?;

            let day =
                parse_day_key(date_field.trim()).map_err(|e| EngineError::MalformedRecord {
                    line: line_no,
                    message: e.to_string(),
                })?;
            let mark = parse_value(value_field.trim()).ok_or_else(|| {
                EngineError::MalformedRecord {
                    line: line_no,
                    message: format!("unrecognized value '{}'", value_field.trim()),
                }
            })?;

            map.insert_mark(day, mark);
        }

        Ok(map)
    }
}

fn parse_value(value: &str) -> Option<CompletionMark> {
    if value.eq_ignore_ascii_case("true") {
        return Some(CompletionMark::Flag(true));
    }
    if value.eq_ignore_ascii_case("false") {
        return Some(CompletionMark::Flag(false));
    }
    value.parse::<i64>().ok().map(CompletionMark::Code)
}

/// Render a completion map to the `date,value` line format
pub fn to_csv(map: &CompletionMap) -> String {
    let mut out = String::from("date,value\n");
    for (day, mark) in map.entries() {
        let value = match mark {
            CompletionMark::Flag(flag) => flag.to_string(),
            CompletionMark::Code(code) => code.to_string(),
        };
        out.push_str(&day_key(day));
        out.push(',');
        out.push_str(&value);
        out.push('\n');
    }
    out
}
