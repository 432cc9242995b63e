//! Line-oriented event stream reader with zero-allocation number parsing.
//!
//! ```text
//! # drag the slider
//! n 10
//! n 250
//! flush
//! limit 1000
//! term 999
//! ```
//!
//! `n` / `term` / `power` move the slider, `limit` / `range` pick an upper
//! bound.  `flush` or a blank line closes a burst; `#` starts a comment.

use std::{
    borrow::Cow,
    fmt::{self, Display},
    io::{BufRead, BufReader, Read},
};

use crate::core::controller::Event;

/// One parsed line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Line {
    Event(Event),
    /// End of a burst of input.
    Flush,
}

// --- Error Handling ---
#[derive(Debug)]
pub struct ParseEventError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

#[derive(Debug)]
pub enum ParseErrorKind {
    Io(std::io::Error),
    UnknownCommand(String),
    MissingValue(&'static str),
    BadNumber { field: &'static str, text: String },
}

impl Display for ParseEventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ParseErrorKind::Io(e) => write!(f, "I/O error on line {}: {}", self.line, e),
            ParseErrorKind::UnknownCommand(c) => {
                write!(f, "line {}: unknown command '{}'", self.line, c)
            }
            ParseErrorKind::MissingValue(field) => {
                write!(f, "line {}: missing {} value", self.line, field)
            }
            ParseErrorKind::BadNumber { field, text } => {
                write!(f, "line {}: invalid {} value '{}'", self.line, field, text)
            }
        }
    }
}
impl std::error::Error for ParseEventError {}

// --- Helpers ---
#[inline]
fn trim(mut b: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = b {
        if !first.is_ascii_whitespace() {
            break;
        }
        b = rest;
    }
    while let [rest @ .., last] = b {
        if !last.is_ascii_whitespace() {
            break;
        }
        b = rest;
    }
    b
}

const UNICODE_MINUS: &[u8] = "\u{2212}".as_bytes();

/// Number text with every U+2212 MINUS SIGN spelled as ASCII `-`.
fn ascii_minus(bytes: &[u8]) -> Cow<'_, [u8]> {
    if !bytes.windows(UNICODE_MINUS.len()).any(|w| w == UNICODE_MINUS) {
        return Cow::Borrowed(bytes);
    }
    let mut out = Vec::with_capacity(bytes.len());
    let mut rest = bytes;
    loop {
        if let Some(tail) = rest.strip_prefix(UNICODE_MINUS) {
            out.push(b'-');
            rest = tail;
        } else if let Some((&b, tail)) = rest.split_first() {
            out.push(b);
            rest = tail;
        } else {
            break;
        }
    }
    Cow::Owned(out)
}

#[inline]
fn parse_f64(bytes: &[u8], line: usize, field: &'static str) -> Result<f64, ParseEventError> {
    lexical_core::parse::<f64>(&ascii_minus(bytes)).map_err(|_| ParseEventError {
        line,
        kind: ParseErrorKind::BadNumber {
            field,
            text: String::from_utf8_lossy(bytes).into_owned(),
        },
    })
}

/// Range limits must be exact non-negative integers that fit a `u32`.
#[inline]
fn parse_limit(bytes: &[u8], line: usize) -> Result<u32, ParseEventError> {
    let v = parse_f64(bytes, line, "limit")?;
    if v.is_finite() && v >= 0.0 && v.fract() <= 0.0 && v <= f64::from(u32::MAX) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let limit = v as u32;
        return Ok(limit);
    }
    Err(ParseEventError {
        line,
        kind: ParseErrorKind::BadNumber {
            field: "limit",
            text: String::from_utf8_lossy(bytes).into_owned(),
        },
    })
}

/// Parse a single, already trimmed, non-empty line.
fn parse_line(buf: &[u8], line: usize) -> Result<Line, ParseEventError> {
    let split = buf
        .iter()
        .position(u8::is_ascii_whitespace)
        .unwrap_or(buf.len());
    let (keyword, rest) = buf.split_at(split);
    let value = trim(rest);

    let require = |field: &'static str| {
        if value.is_empty() {
            Err(ParseEventError {
                line,
                kind: ParseErrorKind::MissingValue(field),
            })
        } else {
            Ok(value)
        }
    };

    match keyword.to_ascii_lowercase().as_slice() {
        b"flush" => Ok(Line::Flush),
        // Sign and fraction are checked by the controller, not here.
        b"n" | b"term" | b"power" => {
            let v = parse_f64(require("term count")?, line, "term count")?;
            Ok(Line::Event(Event::TermCount(v)))
        }
        b"limit" | b"range" => {
            let v = parse_limit(require("limit")?, line)?;
            Ok(Line::Event(Event::RangeLimit(v)))
        }
        other => Err(ParseEventError {
            line,
            kind: ParseErrorKind::UnknownCommand(String::from_utf8_lossy(other).into_owned()),
        }),
    }
}

// --- Stream ingest ---
const BUF_CAP: usize = 1 << 16; // 64 KiB

pub fn read_events<R: Read>(src: R) -> Result<Vec<Line>, ParseEventError> {
    let mut rdr = BufReader::with_capacity(BUF_CAP, src);
    let mut buf = Vec::<u8>::with_capacity(64);
    let mut out = Vec::<Line>::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        let n = rdr.read_until(b'\n', &mut buf).map_err(|e| ParseEventError {
            line: line_no,
            kind: ParseErrorKind::Io(e),
        })?;
        if n == 0 {
            break;
        }
        line_no += 1;

        let text = trim(&buf);
        if text.first() == Some(&b'#') {
            continue;
        }
        if text.is_empty() {
            // collapse runs of blank lines into one flush
            if !matches!(out.last(), Some(Line::Flush) | None) {
                out.push(Line::Flush);
            }
            continue;
        }
        out.push(parse_line(text, line_no)?);
    }
    Ok(out)
}

pub fn read_events_from_path(path: &str) -> Result<Vec<Line>, ParseEventError> {
    if path == "-" {
        read_events(std::io::stdin())
    } else {
        use std::fs::File;
        read_events(File::open(path).map_err(|e| ParseEventError {
            line: 0,
            kind: ParseErrorKind::Io(e),
        })?)
    }
}
