//! Core logic for mdkanban.
//! This crate is the single source of truth for board parsing invariants.

pub mod config;
pub mod host;
pub mod logging;
pub mod model;
pub mod parser;
pub mod plugin;
pub mod theme;

pub use config::{BoardConfig, ConfigError, GateConfig, LoggingConfig};
pub use host::adapter::{
    BoardAdapter, BoardView, DocumentObserver, DocumentSource, FileDocument, HostError,
    InMemoryDocument,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::board::{Board, Section, Task};
pub use parser::extract::{extract, extract_bytes, extract_with, ExtractError};
pub use parser::frontmatter::{
    document_enables_kanban, is_kanban_enabled, parse_frontmatter, Frontmatter, FrontmatterError,
};
pub use parser::policy::{ExtractPolicy, Indentation, MarkerCase};
pub use plugin::manifest::{
    Capability, ManifestValidationError, PluginEntrypoints, PluginManifest,
};
pub use plugin::registry::{
    BuiltinPluginAdapter, PluginAdapter, PluginError, PluginRegistry, PluginSource,
    RegisteredPlugin, BOARD_PLUGIN_ID, BOARD_VIEW_TYPE, OPEN_AS_BOARD_COMMAND,
};
pub use theme::{active_theme, register_theme, Theme, ThemeError, ThemeRegistry};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
