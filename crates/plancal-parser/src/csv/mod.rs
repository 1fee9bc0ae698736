//! CSV task table parser
//!
//! Accepts the comma-separated exports planners produce: quoted fields with
//! doubled quotes, embedded newlines inside quotes, literal quotes inside
//! unquoted fields (`27" monitor`), LF or CRLF line endings and an optional
//! UTF-8 byte order mark. The first record is the header.

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use plancal_core::TaskRecord;

use crate::table::records_from_rows;
use crate::ParseError;

#[derive(Parser)]
#[grammar = "csv/grammar.pest"]
struct CsvParser;

/// Parse CSV text into task records
pub fn parse(input: &str) -> Result<Vec<TaskRecord>, ParseError> {
    let mut rows = parse_rows(input)?.into_iter();
    let headers: Vec<String> = rows
        .next()
        .map(|header| header.into_iter().map(Option::unwrap_or_default).collect())
        .unwrap_or_default();
    let data: Vec<Vec<Option<String>>> = rows.collect();

    records_from_rows(&headers, &data)
}

/// Split CSV text into non-blank records of cells; empty cells are `None`
pub fn parse_rows(input: &str) -> Result<Vec<Vec<Option<String>>>, ParseError> {
    let file = CsvParser::parse(Rule::file, input)
        .map_err(|e| {
            let (line, column) = match e.line_col {
                pest::error::LineColLocation::Pos((l, c)) => (l, c),
                pest::error::LineColLocation::Span((l, c), _) => (l, c),
            };
            ParseError::Syntax {
                line,
                column,
                message: e.variant.message().to_string(),
            }
        })?
        .next()
        .ok_or_else(|| ParseError::InvalidValue("empty CSV parse tree".into()))?;

    Ok(file
        .into_inner()
        .filter(|pair| pair.as_rule() == Rule::record)
        .map(parse_record)
        .filter(|cells| cells.iter().any(Option::is_some))
        .collect())
}

fn parse_record(pair: Pair<Rule>) -> Vec<Option<String>> {
    pair.into_inner().map(parse_field).collect()
}

fn parse_field(pair: Pair<Rule>) -> Option<String> {
    let text = match pair.into_inner().next() {
        Some(inner) if inner.as_rule() == Rule::quoted_field => inner
            .into_inner()
            .next()
            .map(|t| t.as_str().replace("\"\"", "\""))
            .unwrap_or_default(),
        Some(inner) => inner.as_str().to_string(),
        None => String::new(),
    };

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
