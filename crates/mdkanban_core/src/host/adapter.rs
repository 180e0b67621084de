//! Host-facing board adapter.
//!
//! # Responsibility
//! - Re-extract the board whenever the host reports a document change.
//! - Apply the frontmatter opt-in gate before a board view is shown.
//! - Pull document text from a host-provided [`DocumentSource`].
//!
//! # Invariants
//! - No debouncing or caching: every call re-runs extraction.
//! - Log events carry counts and timings only, never document text.

use crate::config::{BoardConfig, GateConfig};
use crate::model::board::Board;
use crate::parser::extract::{extract_with, ExtractError};
use crate::parser::frontmatter::document_enables_kanban;
use crate::parser::policy::ExtractPolicy;
use log::{debug, error};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Host read/validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The host could not provide the document.
    Read { source_id: String, message: String },
    /// The host provided bytes that are not text.
    InvalidInput(ExtractError),
}

impl Display for HostError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { source_id, message } => {
                write!(f, "failed to read document `{source_id}`: {message}")
            }
            Self::InvalidInput(err) => write!(f, "{err}"),
        }
    }
}

impl Error for HostError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::Read { .. } => None,
        }
    }
}

impl From<ExtractError> for HostError {
    fn from(value: ExtractError) -> Self {
        Self::InvalidInput(value)
    }
}

/// Host contract: provide the full document text on demand.
pub trait DocumentSource {
    fn read_document(&self) -> Result<String, HostError>;
}

/// Host contract: receive a fresh board for changed document text.
pub trait DocumentObserver {
    fn on_document_changed(&self, document: &str) -> Board;
}

/// In-memory document, mostly for hosts that already hold the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryDocument {
    text: String,
}

impl InMemoryDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl DocumentSource for InMemoryDocument {
    fn read_document(&self) -> Result<String, HostError> {
        Ok(self.text.clone())
    }
}

/// Markdown file on the local file system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDocument {
    path: PathBuf,
}

impl FileDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSource for FileDocument {
    fn read_document(&self) -> Result<String, HostError> {
        let bytes = std::fs::read(&self.path).map_err(|err| HostError::Read {
            source_id: self.path.display().to_string(),
            message: err.to_string(),
        })?;
        String::from_utf8(bytes).map_err(|err| {
            HostError::InvalidInput(ExtractError::InvalidInput {
                valid_up_to: err.utf8_error().valid_up_to(),
            })
        })
    }
}

/// Gated view result for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardView {
    /// Document did not opt into the board view.
    Disabled,
    Board(Board),
}

/// Extraction adapter any host (UI, CLI, test harness) can drive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardAdapter {
    policy: ExtractPolicy,
    gate: GateConfig,
}

impl BoardAdapter {
    pub fn new(policy: ExtractPolicy, gate: GateConfig) -> Self {
        Self { policy, gate }
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        Self::new(config.policy, config.gate.clone())
    }

    pub fn policy(&self) -> &ExtractPolicy {
        &self.policy
    }

    /// Returns whether `document` should render as a board.
    pub fn is_enabled(&self, document: &str) -> bool {
        !self.gate.enabled || document_enables_kanban(document, &self.gate.key)
    }

    /// Reads from `source` and extracts a fresh board.
    ///
    /// # Errors
    /// - Propagates the source's [`HostError`].
    pub fn refresh<S: DocumentSource + ?Sized>(&self, source: &S) -> Result<Board, HostError> {
        match source.read_document() {
            Ok(document) => Ok(self.on_document_changed(&document)),
            Err(err) => {
                error!("event=board_refresh module=host status=error error={err}");
                Err(err)
            }
        }
    }

    /// Applies the gate, then extracts.
    pub fn view_for(&self, document: &str) -> BoardView {
        if !self.is_enabled(document) {
            debug!("event=board_view module=host status=disabled");
            return BoardView::Disabled;
        }
        BoardView::Board(self.on_document_changed(document))
    }
}

impl DocumentObserver for BoardAdapter {
    fn on_document_changed(&self, document: &str) -> Board {
        let started_at = Instant::now();
        let board = extract_with(document, &self.policy);
        debug!(
            "event=board_extract module=host status=ok sections={} tasks={} bytes={} duration_us={}",
            board.len(),
            board.task_count(),
            document.len(),
            started_at.elapsed().as_micros()
        );
        board
    }
}

#[cfg(test)]
mod tests {
    use super::{
        BoardAdapter, BoardView, DocumentObserver, DocumentSource, FileDocument, HostError,
        InMemoryDocument,
    };
    use crate::config::GateConfig;
    use crate::parser::extract::ExtractError;
    use crate::parser::policy::ExtractPolicy;
    use std::io::Write;

    struct FailingSource;

    impl DocumentSource for FailingSource {
        fn read_document(&self) -> Result<String, HostError> {
            Err(HostError::Read {
                source_id: "vault/missing.md".to_string(),
                message: "not found".to_string(),
            })
        }
    }

    #[test]
    fn refresh_extracts_from_source() {
        let adapter = BoardAdapter::default();
        let board = adapter
            .refresh(&InMemoryDocument::new("# A\n- [ ] a"))
            .expect("in-memory refresh");
        assert_eq!(board.task_count(), 1);
    }

    #[test]
    fn refresh_propagates_source_errors() {
        let err = BoardAdapter::default()
            .refresh(&FailingSource)
            .expect_err("failing source");
        assert!(err.to_string().contains("vault/missing.md"));
    }

    #[test]
    fn repeated_changes_are_recomputed_independently() {
        let adapter = BoardAdapter::default();
        let first = adapter.on_document_changed("# A\n- [ ] a");
        let second = adapter.on_document_changed("# A\n- [x] a");
        assert!(!first.sections()[0].tasks[0].checked);
        assert!(second.sections()[0].tasks[0].checked);
        assert_eq!(first, adapter.on_document_changed("# A\n- [ ] a"));
    }

    #[test]
    fn view_is_gated_by_frontmatter() {
        let adapter = BoardAdapter::new(
            ExtractPolicy::default().with_strip_frontmatter(true),
            GateConfig::default(),
        );
        assert_eq!(adapter.view_for("# A\n- [ ] a"), BoardView::Disabled);

        let BoardView::Board(board) = adapter.view_for("---\nkanban: true\n---\n# A\n- [ ] a")
        else {
            panic!("kanban note should render a board");
        };
        assert_eq!(board.len(), 1);
        assert_eq!(board.sections()[0].heading, "A");
    }

    #[test]
    fn disabled_gate_renders_every_document() {
        let gate = GateConfig {
            enabled: false,
            ..GateConfig::default()
        };
        let adapter = BoardAdapter::new(ExtractPolicy::default(), gate);
        assert!(matches!(adapter.view_for("# A"), BoardView::Board(_)));
    }

    #[test]
    fn file_document_rejects_non_utf8() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"# A\n\xff").expect("write bytes");
        let err = FileDocument::new(file.path())
            .read_document()
            .expect_err("invalid utf-8");
        assert_eq!(
            err,
            HostError::InvalidInput(ExtractError::InvalidInput { valid_up_to: 4 })
        );
    }

    #[test]
    fn file_document_reports_missing_file() {
        let err = FileDocument::new("/definitely/missing/board.md")
            .read_document()
            .expect_err("missing file");
        assert!(matches!(err, HostError::Read { .. }));
    }
}
