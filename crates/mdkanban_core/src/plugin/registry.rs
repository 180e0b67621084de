//! In-process plugin registry.

use crate::plugin::manifest::{
    Capability, ManifestValidationError, PluginEntrypoints, PluginManifest,
};
use log::info;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Id of the built-in board plugin.
pub const BOARD_PLUGIN_ID: &str = "builtin.kanban.board";
/// Host view type the board renders into.
pub const BOARD_VIEW_TYPE: &str = "kanban-view";
/// Host command that opens a note as a board.
pub const OPEN_AS_BOARD_COMMAND: &str = "open-as-kanban";

/// Origin of one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginSource {
    Builtin,
    External,
}

/// Registered plugin snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredPlugin {
    pub manifest: PluginManifest,
    pub source: PluginSource,
}

/// Registration contract for anything that can declare a manifest.
pub trait PluginAdapter {
    fn manifest(&self) -> &PluginManifest;
    fn source(&self) -> PluginSource;
}

/// Built-in adapter wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinPluginAdapter {
    manifest: PluginManifest,
}

impl BuiltinPluginAdapter {
    pub fn new(manifest: PluginManifest) -> Self {
        Self { manifest }
    }

    /// Markdown board plugin: view, context-menu command, parser and theme.
    pub fn kanban_board() -> Self {
        Self::new(PluginManifest {
            id: BOARD_PLUGIN_ID.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            capabilities: Capability::ALL
                .iter()
                .map(|capability| capability.as_str().to_string())
                .collect(),
            entrypoints: PluginEntrypoints {
                init: Some("builtin.kanban.init".to_string()),
                dispose: Some("builtin.kanban.dispose".to_string()),
                view: Some(BOARD_VIEW_TYPE.to_string()),
                command: Some(OPEN_AS_BOARD_COMMAND.to_string()),
                parser: Some("builtin.kanban.extract".to_string()),
                theme: Some("kanban-default".to_string()),
            },
        })
    }
}

impl PluginAdapter for BuiltinPluginAdapter {
    fn manifest(&self) -> &PluginManifest {
        &self.manifest
    }

    fn source(&self) -> PluginSource {
        PluginSource::Builtin
    }
}

/// Registry of declared plugins, indexed by capability.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    entries: BTreeMap<String, RegisteredPlugin>,
    capability_index: BTreeMap<Capability, BTreeSet<String>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one adapter after manifest validation.
    pub fn register_adapter(&mut self, adapter: &impl PluginAdapter) -> Result<(), PluginError> {
        let manifest = adapter.manifest().clone();
        manifest.validate().map_err(PluginError::InvalidManifest)?;
        let capabilities = manifest
            .declared_capabilities()
            .map_err(PluginError::InvalidManifest)?;
        let id = manifest.id.trim().to_string();
        if self.entries.contains_key(&id) {
            return Err(PluginError::DuplicatePluginId(id));
        }

        for capability in &capabilities {
            self.capability_index
                .entry(*capability)
                .or_default()
                .insert(id.clone());
        }
        info!(
            "event=plugin_register module=plugin status=ok plugin_id={} capabilities={}",
            id,
            capabilities.len()
        );
        self.entries.insert(
            id,
            RegisteredPlugin {
                manifest,
                source: adapter.source(),
            },
        );
        Ok(())
    }

    /// Registers the built-in board plugin.
    pub fn register_builtin_board(&mut self) -> Result<(), PluginError> {
        self.register_adapter(&BuiltinPluginAdapter::kanban_board())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, plugin_id: &str) -> Option<&RegisteredPlugin> {
        self.entries.get(plugin_id.trim())
    }

    /// Returns plugins declaring `capability`, sorted by id.
    pub fn list_by_capability(&self, capability: Capability) -> Vec<&RegisteredPlugin> {
        let Some(ids) = self.capability_index.get(&capability) else {
            return vec![];
        };
        ids.iter().filter_map(|id| self.entries.get(id)).collect()
    }

    /// Returns the first registered plugin providing `capability`.
    pub fn provider_of(&self, capability: Capability) -> Option<&RegisteredPlugin> {
        self.list_by_capability(capability).into_iter().next()
    }
}

/// Registration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginError {
    InvalidManifest(ManifestValidationError),
    DuplicatePluginId(String),
}

impl Display for PluginError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidManifest(err) => write!(f, "invalid plugin manifest: {err}"),
            Self::DuplicatePluginId(value) => write!(f, "plugin id already registered: {value}"),
        }
    }
}

impl Error for PluginError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidManifest(err) => Some(err),
            Self::DuplicatePluginId(_) => None,
        }
    }
}
