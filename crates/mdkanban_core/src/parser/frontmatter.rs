//! YAML frontmatter detection and the kanban gate predicate.
//!
//! # Responsibility
//! - Locate a leading `---` delimited block without allocating.
//! - Parse the block as a YAML mapping on demand.
//! - Decide whether a note opts into the board view.
//!
//! # Invariants
//! - Frontmatter only exists when line 1 is `---` (after an optional byte
//!   order mark) and a closing `---` line follows; otherwise the whole
//!   document is body.
//! - Gate evaluation never fails: malformed metadata means "not enabled".

use log::warn;
use serde_yaml::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::Range;

/// Frontmatter key that opts a note into the board view.
pub const DEFAULT_GATE_KEY: &str = "kanban";

const DELIMITER: &str = "---";
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Byte/line layout of a frontmatter block inside a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontmatterSpan {
    /// Byte range of the YAML text between the delimiters.
    pub yaml: Range<usize>,
    /// Byte offset where the body starts.
    pub body_offset: usize,
    /// 1-based line number of the first body line.
    pub body_line: usize,
}

/// Parsed frontmatter plus the body location.
#[derive(Debug, Clone, PartialEq)]
pub struct Frontmatter {
    /// `None` when the block is empty or absent.
    pub metadata: Option<Value>,
    pub body_offset: usize,
    pub body_line: usize,
}

/// Frontmatter parse failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontmatterError {
    InvalidYaml(String),
    NotAMapping,
}

impl Display for FrontmatterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidYaml(message) => write!(f, "invalid frontmatter yaml: {message}"),
            Self::NotAMapping => write!(f, "frontmatter must be a yaml mapping"),
        }
    }
}

impl Error for FrontmatterError {}

/// Locates the leading frontmatter block, if any.
pub fn split_frontmatter(document: &str) -> Option<FrontmatterSpan> {
    let mut lines = document.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_start_matches(BYTE_ORDER_MARK).trim_end() != DELIMITER {
        return None;
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for (index, line) in lines.enumerate() {
        if line.trim_end() == DELIMITER {
            return Some(FrontmatterSpan {
                yaml: yaml_start..offset,
                body_offset: offset + line.len(),
                // line 1 is the opening delimiter, `index` 0 is line 2
                body_line: index + 3,
            });
        }
        offset += line.len();
    }
    None
}

/// Parses the leading frontmatter block of `document`.
///
/// Documents without frontmatter yield `metadata: None` and a body that
/// starts at line 1.
///
/// # Errors
/// - `InvalidYaml` when the block is not valid YAML.
/// - `NotAMapping` when the block parses to a scalar or sequence.
pub fn parse_frontmatter(document: &str) -> Result<Frontmatter, FrontmatterError> {
    let Some(span) = split_frontmatter(document) else {
        return Ok(Frontmatter {
            metadata: None,
            body_offset: 0,
            body_line: 1,
        });
    };

    let yaml = &document[span.yaml.clone()];
    let metadata = if yaml.trim().is_empty() {
        None
    } else {
        let value: Value = serde_yaml::from_str(yaml)
            .map_err(|err| FrontmatterError::InvalidYaml(err.to_string()))?;
        match value {
            Value::Mapping(_) => Some(value),
            Value::Null => None,
            _ => return Err(FrontmatterError::NotAMapping),
        }
    };

    Ok(Frontmatter {
        metadata,
        body_offset: span.body_offset,
        body_line: span.body_line,
    })
}

/// Returns whether `metadata` opts into the board view via `key: true`.
///
/// Only a YAML boolean counts; the string `"true"` does not.
pub fn is_kanban_enabled(metadata: Option<&Value>, key: &str) -> bool {
    metadata
        .and_then(|value| value.get(key))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Parses `document` frontmatter and evaluates the gate predicate.
pub fn document_enables_kanban(document: &str, key: &str) -> bool {
    match parse_frontmatter(document) {
        Ok(frontmatter) => is_kanban_enabled(frontmatter.metadata.as_ref(), key),
        Err(err) => {
            warn!("event=gate_eval module=parser status=error error_code=frontmatter_invalid error={err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        document_enables_kanban, is_kanban_enabled, parse_frontmatter, split_frontmatter,
        FrontmatterError, DEFAULT_GATE_KEY,
    };

    #[test]
    fn split_finds_block_and_body_line() {
        let doc = "---\nkanban: true\n---\n# To Do\n";
        let span = split_frontmatter(doc).expect("frontmatter span");
        assert_eq!(&doc[span.yaml.clone()], "kanban: true\n");
        assert_eq!(&doc[span.body_offset..], "# To Do\n");
        assert_eq!(span.body_line, 4);
    }

    #[test]
    fn split_requires_opening_delimiter_on_first_line() {
        assert!(split_frontmatter("\n---\nkanban: true\n---\n").is_none());
        assert!(split_frontmatter("# Title\n---\n").is_none());
    }

    #[test]
    fn split_requires_closing_delimiter() {
        assert!(split_frontmatter("---\nkanban: true\n# To Do\n").is_none());
    }

    #[test]
    fn split_handles_crlf_and_empty_block() {
        let doc = "---\r\n---\r\n# A\r\n";
        let span = split_frontmatter(doc).expect("frontmatter span");
        assert!(span.yaml.is_empty());
        assert_eq!(&doc[span.body_offset..], "# A\r\n");
        assert_eq!(span.body_line, 3);
    }

    #[test]
    fn split_skips_byte_order_mark() {
        let doc = "\u{feff}---\nkanban: true\n---\n# A";
        let span = split_frontmatter(doc).expect("frontmatter span");
        assert_eq!(&doc[span.yaml.clone()], "kanban: true\n");
        assert_eq!(&doc[span.body_offset..], "# A");
        assert!(document_enables_kanban(doc, DEFAULT_GATE_KEY));
    }

    #[test]
    fn parse_returns_mapping_metadata() {
        let parsed = parse_frontmatter("---\nkanban: true\ntags: [a]\n---\nbody").expect("parse");
        assert!(is_kanban_enabled(parsed.metadata.as_ref(), DEFAULT_GATE_KEY));
        assert_eq!(parsed.body_line, 5);
    }

    #[test]
    fn parse_without_block_starts_body_at_line_one() {
        let parsed = parse_frontmatter("# To Do").expect("parse");
        assert!(parsed.metadata.is_none());
        assert_eq!(parsed.body_offset, 0);
        assert_eq!(parsed.body_line, 1);
    }

    #[test]
    fn parse_rejects_scalar_block() {
        let err = parse_frontmatter("---\njust text\n---\n").expect_err("scalar must fail");
        assert_eq!(err, FrontmatterError::NotAMapping);
    }

    #[test]
    fn parse_rejects_broken_yaml() {
        let err = parse_frontmatter("---\nkanban: [true\n---\n").expect_err("broken yaml");
        assert!(matches!(err, FrontmatterError::InvalidYaml(_)));
    }

    #[test]
    fn gate_requires_boolean_true() {
        assert!(document_enables_kanban("---\nkanban: true\n---\n", "kanban"));
        assert!(!document_enables_kanban("---\nkanban: false\n---\n", "kanban"));
        assert!(!document_enables_kanban("---\nkanban: \"true\"\n---\n", "kanban"));
        assert!(!document_enables_kanban("---\nboard: true\n---\n", "kanban"));
        assert!(!document_enables_kanban("# no frontmatter", "kanban"));
        assert!(!document_enables_kanban("---\nkanban: [true\n---\n", "kanban"));
    }

    #[test]
    fn gate_key_is_configurable() {
        assert!(document_enables_kanban("---\nboard: true\n---\n", "board"));
    }
}
