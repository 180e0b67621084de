//! Plugin manifest declaration and validation.

use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Capability string for a host view type.
pub const CAPABILITY_VIEW: &str = "view";
/// Capability string for a host command (menu item, palette entry).
pub const CAPABILITY_COMMAND: &str = "command";
/// Capability string for a document parser.
pub const CAPABILITY_PARSER: &str = "parser";
/// Capability string for a presentation theme.
pub const CAPABILITY_THEME: &str = "theme";

/// Typed form of a declared capability string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Capability {
    View,
    Command,
    Parser,
    Theme,
}

impl Capability {
    pub const ALL: [Capability; 4] = [
        Capability::View,
        Capability::Command,
        Capability::Parser,
        Capability::Theme,
    ];

    /// Parses a trimmed capability string.
    ///
    /// # Errors
    /// - `EmptyCapability` for blank input.
    /// - `UnsupportedCapability` for anything outside `view|command|parser|theme`.
    pub fn parse(value: &str) -> Result<Self, ManifestValidationError> {
        match value.trim() {
            "" => Err(ManifestValidationError::EmptyCapability),
            CAPABILITY_VIEW => Ok(Self::View),
            CAPABILITY_COMMAND => Ok(Self::Command),
            CAPABILITY_PARSER => Ok(Self::Parser),
            CAPABILITY_THEME => Ok(Self::Theme),
            other => Err(ManifestValidationError::UnsupportedCapability(
                other.to_string(),
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::View => CAPABILITY_VIEW,
            Self::Command => CAPABILITY_COMMAND,
            Self::Parser => CAPABILITY_PARSER,
            Self::Theme => CAPABILITY_THEME,
        }
    }
}

/// Declarative plugin manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginManifest {
    /// Stable plugin identifier, e.g. `builtin.kanban.board`.
    pub id: String,
    /// `major.minor.patch`.
    pub version: String,
    /// Declared capabilities (`view|command|parser|theme`).
    pub capabilities: Vec<String>,
    pub entrypoints: PluginEntrypoints,
}

impl PluginManifest {
    /// Validates declaration-level manifest invariants.
    ///
    /// Checks run in a fixed order: id, version, capabilities, then the
    /// entrypoints each capability and the lifecycle require.
    pub fn validate(&self) -> Result<(), ManifestValidationError> {
        check_id(&self.id)?;
        check_version(&self.version)?;
        for capability in self.declared_capabilities()? {
            self.entrypoints.require_for(capability)?;
        }
        self.entrypoints.require_lifecycle()
    }

    /// Parses `capabilities` into typed values, rejecting blanks, unknown
    /// strings and duplicates. Declaration order is kept.
    pub fn declared_capabilities(&self) -> Result<Vec<Capability>, ManifestValidationError> {
        if self.capabilities.is_empty() {
            return Err(ManifestValidationError::MissingCapabilities);
        }
        let mut seen = BTreeSet::new();
        let mut declared = Vec::with_capacity(self.capabilities.len());
        for raw in &self.capabilities {
            let capability = Capability::parse(raw)?;
            if !seen.insert(capability) {
                return Err(ManifestValidationError::DuplicateCapability(
                    capability.as_str().to_string(),
                ));
            }
            declared.push(capability);
        }
        Ok(declared)
    }

    pub fn declares(&self, capability: Capability) -> bool {
        self.capabilities
            .iter()
            .any(|value| value.trim() == capability.as_str())
    }
}

/// Declared entrypoint identifiers; resolution is up to the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginEntrypoints {
    pub init: Option<String>,
    pub dispose: Option<String>,
    /// Host view type id, e.g. `kanban-view`.
    pub view: Option<String>,
    /// Host command id, e.g. `open-as-kanban`.
    pub command: Option<String>,
    pub parser: Option<String>,
    pub theme: Option<String>,
}

impl PluginEntrypoints {
    /// Returns the entrypoint backing `capability`, ignoring blank values.
    pub fn for_capability(&self, capability: Capability) -> Option<&str> {
        let slot = match capability {
            Capability::View => &self.view,
            Capability::Command => &self.command,
            Capability::Parser => &self.parser,
            Capability::Theme => &self.theme,
        };
        non_blank(slot)
    }

    fn require_for(&self, capability: Capability) -> Result<(), ManifestValidationError> {
        self.for_capability(capability)
            .map(|_| ())
            .ok_or(ManifestValidationError::MissingEntrypoint(
                capability.as_str(),
            ))
    }

    fn require_lifecycle(&self) -> Result<(), ManifestValidationError> {
        if non_blank(&self.init).is_none() {
            return Err(ManifestValidationError::MissingEntrypoint("init"));
        }
        if non_blank(&self.dispose).is_none() {
            return Err(ManifestValidationError::MissingEntrypoint("dispose"));
        }
        Ok(())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}

fn check_id(raw: &str) -> Result<(), ManifestValidationError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(ManifestValidationError::EmptyId);
    }
    // lowercase ascii/digit segments joined by single `.`, `_` or `-`
    let well_formed = id
        .split(['.', '_', '-'])
        .all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        });
    if well_formed {
        Ok(())
    } else {
        Err(ManifestValidationError::InvalidId(raw.to_string()))
    }
}

fn check_version(raw: &str) -> Result<(), ManifestValidationError> {
    let version = raw.trim();
    if version.is_empty() {
        return Err(ManifestValidationError::EmptyVersion);
    }
    let mut parts = 0;
    for part in version.split('.') {
        parts += 1;
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err(ManifestValidationError::InvalidVersion(raw.to_string()));
        }
    }
    if parts == 3 {
        Ok(())
    } else {
        Err(ManifestValidationError::InvalidVersion(raw.to_string()))
    }
}

/// Manifest validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestValidationError {
    EmptyId,
    InvalidId(String),
    EmptyVersion,
    InvalidVersion(String),
    MissingCapabilities,
    EmptyCapability,
    UnsupportedCapability(String),
    DuplicateCapability(String),
    MissingEntrypoint(&'static str),
}

impl Display for ManifestValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "manifest id must not be empty"),
            Self::InvalidId(value) => write!(f, "manifest id is invalid: {value}"),
            Self::EmptyVersion => write!(f, "manifest version must not be empty"),
            Self::InvalidVersion(value) => write!(
                f,
                "manifest version is invalid: {value} (expected major.minor.patch)"
            ),
            Self::MissingCapabilities => write!(f, "manifest capabilities must not be empty"),
            Self::EmptyCapability => write!(f, "manifest contains empty capability value"),
            Self::UnsupportedCapability(value) => {
                write!(f, "manifest capability is unsupported: {value}")
            }
            Self::DuplicateCapability(value) => {
                write!(f, "manifest capability is duplicated: {value}")
            }
            Self::MissingEntrypoint(name) => {
                write!(f, "manifest missing required entrypoint: {name}")
            }
        }
    }
}

impl Error for ManifestValidationError {}
