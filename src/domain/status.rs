//! The nginx stub_status snapshot and its parser.
//!
//! The upstream page is four lines of plaintext:
//!
//! ```text
//! Active connections: 39
//! server accepts handled requests
//!  286479 286479 1417563
//! Reading: 0 Writing: 64 Waiting: 10
//! ```
//!
//! `accepts`, `handled` and `requests` are absolute totals since the
//! *upstream* process started; the remaining four fields are instantaneous
//! connection counts.

use crate::domain::errors::ParseError;

/// One parsed observation of the upstream's absolute values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StubStatus {
    pub active: u64,
    pub accepts: u64,
    pub handled: u64,
    pub requests: u64,
    pub reading: u64,
    pub writing: u64,
    pub waiting: u64,
}

/// Parse a raw stub_status body into a [`StubStatus`].
///
/// Malformed input (missing lines, wrong field counts, non-numeric tokens)
/// yields a [`ParseError`] naming the failing field; short input never
/// panics. Incidental whitespace around tokens is tolerated.
pub fn parse_stub_status(body: &str) -> Result<StubStatus, ParseError> {
    let lines: Vec<&str> = body.lines().collect();
    if lines.len() < 4 {
        return Err(ParseError::TruncatedBody { found: lines.len() });
    }

    let active = match lines[0].split_once(':') {
        Some((_, rest)) => parse_field("active connections", rest)?,
        None => return Err(ParseError::MissingSeparator { line: 1 }),
    };

    // Line 2 is the "server accepts handled requests" header.

    let totals: Vec<&str> = lines[2].split_whitespace().collect();
    if totals.len() != 3 {
        return Err(ParseError::FieldCount {
            line: 3,
            found: totals.len(),
            expected: 3,
        });
    }
    let accepts = parse_field("accepts", totals[0])?;
    let handled = parse_field("handled", totals[1])?;
    let requests = parse_field("requests", totals[2])?;

    // "Reading: <n> Writing: <n> Waiting: <n>" - the numbers sit between
    // the labels at positions 1, 3 and 5.
    let states: Vec<&str> = lines[3].split_whitespace().collect();
    if states.len() != 6 {
        return Err(ParseError::FieldCount {
            line: 4,
            found: states.len(),
            expected: 6,
        });
    }
    let reading = parse_field("reading", states[1])?;
    let writing = parse_field("writing", states[3])?;
    let waiting = parse_field("waiting", states[5])?;

    Ok(StubStatus {
        active,
        accepts,
        handled,
        requests,
        reading,
        writing,
        waiting,
    })
}

fn parse_field(field: &'static str, token: &str) -> Result<u64, ParseError> {
    let token = token.trim();
    token.parse::<u64>().map_err(|_| ParseError::InvalidInteger {
        field,
        token: token.to_string(),
    })
}
