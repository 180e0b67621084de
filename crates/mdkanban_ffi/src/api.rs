//! FFI board API for Flutter-facing hosts.
//!
//! # Responsibility
//! - Expose board extraction, the frontmatter gate and theme CSS via FRB.
//! - Describe the built-in board plugin so the host can register its view
//!   and command.
//! - Keep error semantics simple: strings and `ok` flags, no exceptions.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every extraction call is independent; nothing is cached between calls.

use mdkanban_core::{
    core_version as core_version_inner, document_enables_kanban,
    init_logging as init_logging_inner, register_theme, BoardAdapter, Capability,
    DocumentObserver, ExtractPolicy, GateConfig, Indentation, MarkerCase, PluginRegistry,
    Section, Theme, BOARD_PLUGIN_ID,
};

/// Extraction switches exposed to the host settings screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardOptions {
    /// Treat `- [X]` as checked.
    pub ignore_case: bool,
    /// Accept indented checklist items.
    pub allow_indent: bool,
    /// Skip a leading YAML frontmatter block.
    pub strip_frontmatter: bool,
}

/// One task row as seen by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardTaskItem {
    pub raw: String,
    /// Label without the checklist marker.
    pub text: String,
    pub checked: bool,
    pub line: u32,
}

/// One board column as seen by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSectionItem {
    pub heading: String,
    /// `None` for content before the first heading.
    pub line: Option<u32>,
    pub tasks: Vec<BoardTaskItem>,
}

/// JSON response envelope for hosts that prefer a single string payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardJsonResponse {
    pub ok: bool,
    /// JSON array of sections; `[]` on failure.
    pub json: String,
    pub message: String,
}

/// Built-in board plugin declaration for host-side registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardPluginInfo {
    pub ok: bool,
    pub plugin_id: String,
    pub version: String,
    pub capabilities: Vec<String>,
    /// Host view type, e.g. `kanban-view`.
    pub view_type: String,
    /// Context-menu command id, e.g. `open-as-kanban`.
    pub command_id: String,
    pub theme_id: String,
    pub message: String,
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Extracts board columns from note text.
///
/// # FFI contract
/// - Sync call, CPU-only, proportional to document length.
/// - Never panics; unrecognized lines are dropped.
#[flutter_rust_bridge::frb(sync)]
pub fn extract_board(document: String, options: BoardOptions) -> Vec<BoardSectionItem> {
    adapter_for(options)
        .on_document_changed(&document)
        .into_sections()
        .into_iter()
        .map(to_section_item)
        .collect()
}

/// Extracts board columns and returns them as a JSON array.
///
/// # FFI contract
/// - Never panics; `ok=false` carries the encoding error message.
#[flutter_rust_bridge::frb(sync)]
pub fn extract_board_json(document: String, options: BoardOptions) -> BoardJsonResponse {
    let board = adapter_for(options).on_document_changed(&document);
    match serde_json::to_string(&board) {
        Ok(json) => BoardJsonResponse {
            ok: true,
            message: format!(
                "Extracted {} section(s), {} task(s).",
                board.len(),
                board.task_count()
            ),
            json,
        },
        Err(err) => BoardJsonResponse {
            ok: false,
            json: "[]".to_string(),
            message: format!("extract_board_json failed: {err}"),
        },
    }
}

/// Returns whether note frontmatter opts into the board view.
///
/// `key` defaults to `kanban`.
#[flutter_rust_bridge::frb(sync)]
pub fn is_kanban_enabled(document: String, key: Option<String>) -> bool {
    let key = key
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| GateConfig::default().key);
    document_enables_kanban(&document, &key)
}

/// Registers the default board theme once and returns its stylesheet.
///
/// # FFI contract
/// - Idempotent; hosts may call it on every view open.
/// - Returns an empty string if a different theme is already registered.
#[flutter_rust_bridge::frb(sync)]
pub fn board_theme_css() -> String {
    match register_theme(Theme::kanban_default()) {
        Ok(theme) => theme.css.clone(),
        Err(err) => {
            log::warn!("event=theme_register module=ffi status=error error={err}");
            String::new()
        }
    }
}

/// Returns the validated built-in board plugin declaration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never panics; `ok=false` carries the validation error message.
#[flutter_rust_bridge::frb(sync)]
pub fn board_plugin_manifest() -> BoardPluginInfo {
    let mut registry = PluginRegistry::new();
    if let Err(err) = registry.register_builtin_board() {
        return BoardPluginInfo {
            message: format!("board_plugin_manifest failed: {err}"),
            ..BoardPluginInfo::default()
        };
    }
    let Some(plugin) = registry.get(BOARD_PLUGIN_ID) else {
        return BoardPluginInfo {
            message: "board_plugin_manifest failed: builtin board not registered".to_string(),
            ..BoardPluginInfo::default()
        };
    };

    let manifest = &plugin.manifest;
    let entrypoint = |capability| {
        manifest
            .entrypoints
            .for_capability(capability)
            .unwrap_or_default()
            .to_string()
    };
    BoardPluginInfo {
        ok: true,
        plugin_id: manifest.id.clone(),
        version: manifest.version.clone(),
        capabilities: manifest.capabilities.clone(),
        view_type: entrypoint(Capability::View),
        command_id: entrypoint(Capability::Command),
        theme_id: entrypoint(Capability::Theme),
        message: String::new(),
    }
}

fn adapter_for(options: BoardOptions) -> BoardAdapter {
    let mut policy = ExtractPolicy::default().with_strip_frontmatter(options.strip_frontmatter);
    if options.ignore_case {
        policy = policy.with_marker_case(MarkerCase::IgnoreCase);
    }
    if options.allow_indent {
        policy = policy.with_indentation(Indentation::Allow);
    }
    BoardAdapter::new(policy, GateConfig::default())
}

fn to_section_item(section: Section) -> BoardSectionItem {
    BoardSectionItem {
        line: section.line.map(saturating_u32),
        tasks: section
            .tasks
            .into_iter()
            .map(|task| BoardTaskItem {
                text: task.text().to_string(),
                line: saturating_u32(task.line),
                checked: task.checked,
                raw: task.raw,
            })
            .collect(),
        heading: section.heading,
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        board_plugin_manifest, board_theme_css, core_version, extract_board, extract_board_json,
        init_logging, is_kanban_enabled, BoardOptions,
    };

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/mdkanban-logs".to_string());
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn extract_board_maps_sections_and_task_labels() {
        let sections = extract_board(
            "# To Do\n- [ ] Buy milk\n- [x] Pay bills\n# Done".to_string(),
            BoardOptions::default(),
        );
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].heading, "To Do");
        assert_eq!(sections[0].line, Some(1));
        assert_eq!(sections[0].tasks[1].text, "Pay bills");
        assert!(sections[0].tasks[1].checked);
        assert!(sections[1].tasks.is_empty());
    }

    #[test]
    fn extract_board_honors_options() {
        let document = "---\nkanban: true\n---\n# Col\n  - [X] shout".to_string();
        let strict = extract_board(document.clone(), BoardOptions::default());
        assert_eq!(strict.len(), 2);
        assert!(strict[1].tasks.is_empty());

        let relaxed = extract_board(
            document,
            BoardOptions {
                ignore_case: true,
                allow_indent: true,
                strip_frontmatter: true,
            },
        );
        assert_eq!(relaxed.len(), 1);
        assert_eq!(relaxed[0].tasks[0].line, 5);
    }

    #[test]
    fn extract_board_json_returns_array_payload() {
        let response = extract_board_json(String::new(), BoardOptions::default());
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.json, "[]");

        let response = extract_board_json("# A\n- [ ] a".to_string(), BoardOptions::default());
        let value: serde_json::Value = serde_json::from_str(&response.json).expect("json");
        assert_eq!(value[0]["tasks"][0]["raw"], "- [ ] a");
    }

    #[test]
    fn kanban_gate_defaults_key() {
        let note = "---\nkanban: true\n---\n# A".to_string();
        assert!(is_kanban_enabled(note.clone(), None));
        assert!(is_kanban_enabled(note.clone(), Some("  ".to_string())));
        assert!(!is_kanban_enabled(note, Some("board".to_string())));
    }

    #[test]
    fn theme_css_is_stable_across_calls() {
        let first = board_theme_css();
        assert!(first.contains(".kanban-board"));
        assert_eq!(first, board_theme_css());
    }

    #[test]
    fn board_plugin_manifest_exposes_view_and_command() {
        let info = board_plugin_manifest();
        assert!(info.ok, "{}", info.message);
        assert_eq!(info.plugin_id, "builtin.kanban.board");
        assert_eq!(info.view_type, "kanban-view");
        assert_eq!(info.command_id, "open-as-kanban");
        assert_eq!(info.theme_id, "kanban-default");
        assert_eq!(info.version, core_version());
        assert_eq!(
            info.capabilities,
            vec!["view", "command", "parser", "theme"]
        );
    }
}
