//! Board extractor: headings to sections, checklist lines to tasks.
//!
//! # Responsibility
//! - Segment document text at top-level heading lines (`# ` prefix).
//! - Classify checklist lines under the active [`ExtractPolicy`].
//!
//! # Invariants
//! - Pure and deterministic: no I/O, no logging, no shared state.
//! - Only lines starting with exactly one `#` and a space split sections;
//!   `##`+ headings are ordinary text.
//! - Content before the first heading forms a leading implicit section only
//!   when it contains a non-whitespace character.
//! - A leading UTF-8 byte order mark is not part of line 1.
//! - Lines that are neither headings nor tasks are dropped silently.

use crate::model::board::{Board, Section, Task};
use crate::parser::frontmatter::split_frontmatter;
use crate::parser::policy::{ExtractPolicy, Indentation, MarkerCase};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static TOP_LEVEL_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^# ").expect("valid heading regex"));
static CHECKLIST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([ \t]*)- \[([ xX])\]").expect("valid checklist regex"));

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Extraction failure for non-text input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// Input bytes are not valid UTF-8.
    InvalidInput {
        /// Byte offset of the first invalid sequence.
        valid_up_to: usize,
    },
}

impl Display for ExtractError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { valid_up_to } => write!(
                f,
                "invalid input: document is not valid UTF-8 text (first bad byte at {valid_up_to})"
            ),
        }
    }
}

impl Error for ExtractError {}

/// Extracts the board using the strict default policy.
pub fn extract(document: &str) -> Board {
    extract_with(document, &ExtractPolicy::default())
}

/// Extracts the board using `policy`.
///
/// An empty or whitespace-only document yields an empty board.
pub fn extract_with(document: &str, policy: &ExtractPolicy) -> Board {
    let document = document.strip_prefix(BYTE_ORDER_MARK).unwrap_or(document);
    let (body, first_line) = if policy.strip_frontmatter {
        match split_frontmatter(document) {
            Some(span) => (&document[span.body_offset..], span.body_line),
            None => (document, 1),
        }
    } else {
        (document, 1)
    };

    let mut sections: Vec<Section> = Vec::new();
    let mut preamble = Section::implicit();
    let mut preamble_has_content = false;

    for (index, line) in body.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let line_number = first_line + index;

        if let Some(heading) = heading_text(line) {
            sections.push(Section::headed(heading, line_number));
            continue;
        }

        let target = match sections.last_mut() {
            Some(section) => section,
            None => {
                if !line.trim().is_empty() {
                    preamble_has_content = true;
                }
                &mut preamble
            }
        };
        if let Some(task) = classify_task(line, line_number, policy) {
            target.tasks.push(task);
        }
    }

    if preamble_has_content {
        sections.insert(0, preamble);
    }
    Board::new(sections)
}

/// Validates `bytes` as UTF-8 text, then extracts with `policy`.
///
/// # Errors
/// - `ExtractError::InvalidInput` when `bytes` is not UTF-8.
pub fn extract_bytes(bytes: &[u8], policy: &ExtractPolicy) -> Result<Board, ExtractError> {
    let document = std::str::from_utf8(bytes).map_err(|err| ExtractError::InvalidInput {
        valid_up_to: err.valid_up_to(),
    })?;
    Ok(extract_with(document, policy))
}

/// Returns the heading display text when `line` is a top-level heading.
pub fn heading_text(line: &str) -> Option<&str> {
    if !TOP_LEVEL_HEADING_RE.is_match(line) {
        return None;
    }
    Some(line.trim_start_matches('#').trim())
}

/// Classifies one line as a task under `policy`.
pub fn classify_task(line: &str, line_number: usize, policy: &ExtractPolicy) -> Option<Task> {
    let caps = CHECKLIST_RE.captures(line)?;
    let indent = caps.get(1).map_or("", |m| m.as_str());
    if !indent.is_empty() && policy.indentation == Indentation::Reject {
        return None;
    }

    let checked = match caps.get(2).map(|m| m.as_str()) {
        Some(" ") => false,
        Some("x") => true,
        Some("X") if policy.checked_marker == MarkerCase::IgnoreCase => true,
        _ => return None,
    };
    Some(Task::new(line, checked, line_number))
}
