//! Board domain model.
//!
//! # Responsibility
//! - Define the value objects produced by one extraction pass.
//! - Keep the JSON wire shape stable for host/CLI consumers.
//!
//! # Invariants
//! - `Board` sections follow heading order in the source document.
//! - `Section::tasks` follow source line order.
//! - Values are recomputed on every extraction; nothing here carries identity.
//!
//! # See also
//! - crate::parser::extract

use serde::{Deserialize, Serialize};

/// Literal prefix of an unchecked checklist item.
pub const UNCHECKED_MARKER: &str = "- [ ]";
/// Literal prefix of a checked checklist item (strict policy).
pub const CHECKED_MARKER: &str = "- [x]";

/// One checklist line and its completion state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Source line exactly as written (trailing `\r` removed).
    pub raw: String,
    /// `true` for `- [x]` items.
    pub checked: bool,
    /// 1-based line number in the original document.
    pub line: usize,
}

impl Task {
    pub fn new(raw: impl Into<String>, checked: bool, line: usize) -> Self {
        Self {
            raw: raw.into(),
            checked,
            line,
        }
    }

    /// Returns the task label without indentation and checklist marker.
    ///
    /// `- [X]` has the same byte length as [`CHECKED_MARKER`], so slicing
    /// after the marker is char-boundary safe.
    pub fn text(&self) -> &str {
        let marker = if self.checked {
            CHECKED_MARKER
        } else {
            UNCHECKED_MARKER
        };
        self.raw
            .trim_start()
            .get(marker.len()..)
            .unwrap_or_default()
            .trim()
    }
}

/// A heading-introduced column holding zero or more tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Heading display text; empty for the implicit section.
    pub heading: String,
    /// 1-based heading line, `None` for the implicit section.
    pub line: Option<usize>,
    pub tasks: Vec<Task>,
}

impl Section {
    /// Creates a section introduced by a top-level heading.
    pub fn headed(heading: impl Into<String>, line: usize) -> Self {
        Self {
            heading: heading.into(),
            line: Some(line),
            tasks: Vec::new(),
        }
    }

    /// Creates the section covering content before the first heading.
    pub fn implicit() -> Self {
        Self {
            heading: String::new(),
            line: None,
            tasks: Vec::new(),
        }
    }

    pub fn is_implicit(&self) -> bool {
        self.line.is_none()
    }

    pub fn checked_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.checked).count()
    }
}

/// Ordered section sequence produced by one extraction call.
///
/// Serialized transparently as a JSON array of sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    sections: Vec<Section>,
}

impl Board {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn into_sections(self) -> Vec<Section> {
        self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total number of tasks across all sections.
    pub fn task_count(&self) -> usize {
        self.sections.iter().map(|section| section.tasks.len()).sum()
    }
}

impl From<Vec<Section>> for Board {
    fn from(value: Vec<Section>) -> Self {
        Self::new(value)
    }
}

impl IntoIterator for Board {
    type Item = Section;
    type IntoIter = std::vec::IntoIter<Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.into_iter()
    }
}

impl<'a> IntoIterator for &'a Board {
    type Item = &'a Section;
    type IntoIter = std::slice::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{Board, Section, Task, CHECKED_MARKER, UNCHECKED_MARKER};

    #[test]
    fn task_text_strips_marker_and_indent() {
        assert_eq!(Task::new("- [ ] Buy milk", false, 1).text(), "Buy milk");
        assert_eq!(Task::new("  - [x]   Pay bills ", true, 2).text(), "Pay bills");
        assert_eq!(Task::new("- [ ]", false, 3).text(), "");
        assert_eq!(Task::new("- [X] Shouted", true, 4).text(), "Shouted");
        assert_eq!(
            Task::new(format!("{CHECKED_MARKER} done"), true, 5).text(),
            "done"
        );
        assert_eq!(
            Task::new(format!("{UNCHECKED_MARKER} open"), false, 6).text(),
            "open"
        );
    }

    #[test]
    fn implicit_section_has_no_line() {
        let section = Section::implicit();
        assert!(section.is_implicit());
        assert!(section.heading.is_empty());
        assert!(!Section::headed("To Do", 1).is_implicit());
    }

    #[test]
    fn board_counts_tasks_across_sections() {
        let mut todo = Section::headed("To Do", 1);
        todo.tasks.push(Task::new("- [ ] a", false, 2));
        todo.tasks.push(Task::new("- [x] b", true, 3));
        let done = Section::headed("Done", 4);

        let board = Board::new(vec![todo, done]);
        assert_eq!(board.len(), 2);
        assert_eq!(board.task_count(), 2);
        assert_eq!(board.sections()[0].checked_count(), 1);

        let headings: Vec<String> = board
            .into_sections()
            .into_iter()
            .map(|section| section.heading)
            .collect();
        assert_eq!(headings, vec!["To Do", "Done"]);
    }
}
