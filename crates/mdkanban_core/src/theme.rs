//! Board presentation theme registration.
//!
//! # Responsibility
//! - Ship the default board stylesheet.
//! - Register one theme per process so hosts apply it exactly once.
//!
//! # Invariants
//! - Registering the identical theme again is a no-op.
//! - Registering a different theme after the first one is rejected.
//! - Registration never panics.

use log::info;
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};

const DEFAULT_THEME_ID: &str = "kanban-default";

const DEFAULT_THEME_CSS: &str = r#".kanban-board {
  display: flex;
  gap: 12px;
  overflow-x: auto;
  padding: 8px;
}
.kanban-column {
  flex: 0 0 260px;
  border-radius: 6px;
  padding: 8px;
  background: var(--background-secondary);
}
.kanban-column-title {
  font-weight: 600;
  margin-bottom: 8px;
}
.kanban-task {
  padding: 6px 8px;
  margin-bottom: 6px;
  border-radius: 4px;
  background: var(--background-primary);
}
.kanban-task.is-checked {
  opacity: 0.6;
  text-decoration: line-through;
}
"#;

static GLOBAL_THEME: OnceCell<Theme> = OnceCell::new();

/// Named stylesheet applied by the host when rendering boards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub id: String,
    pub css: String,
}

impl Theme {
    pub fn new(id: impl Into<String>, css: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            css: css.into(),
        }
    }

    /// Built-in board stylesheet.
    pub fn kanban_default() -> Self {
        Self::new(DEFAULT_THEME_ID, DEFAULT_THEME_CSS)
    }

    fn validate(&self) -> Result<(), ThemeError> {
        if self.id.trim().is_empty() {
            return Err(ThemeError::EmptyId);
        }
        if self.css.trim().is_empty() {
            return Err(ThemeError::EmptyStylesheet(self.id.clone()));
        }
        Ok(())
    }
}

/// Theme registration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeError {
    EmptyId,
    EmptyStylesheet(String),
    AlreadyRegistered { active: String, requested: String },
}

impl Display for ThemeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "theme id must not be empty"),
            Self::EmptyStylesheet(id) => write!(f, "theme `{id}` has an empty stylesheet"),
            Self::AlreadyRegistered { active, requested } => write!(
                f,
                "theme `{active}` already registered; refusing to switch to `{requested}`"
            ),
        }
    }
}

impl Error for ThemeError {}

/// Scoped single-slot theme registry.
///
/// Same contract as [`register_theme`] without process-global state.
#[derive(Debug, Default)]
pub struct ThemeRegistry {
    slot: OnceCell<Theme>,
}

impl ThemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, theme: Theme) -> Result<&Theme, ThemeError> {
        register_in(&self.slot, theme)
    }

    pub fn active(&self) -> Option<&Theme> {
        self.slot.get()
    }
}

/// Registers the process-wide board theme.
///
/// # Errors
/// - `EmptyId` / `EmptyStylesheet` for blank input.
/// - `AlreadyRegistered` when a different theme is already active.
pub fn register_theme(theme: Theme) -> Result<&'static Theme, ThemeError> {
    register_in(&GLOBAL_THEME, theme)
}

/// Returns the process-wide theme, if registered.
pub fn active_theme() -> Option<&'static Theme> {
    GLOBAL_THEME.get()
}

fn register_in(slot: &OnceCell<Theme>, theme: Theme) -> Result<&Theme, ThemeError> {
    theme.validate()?;

    let mut installed = false;
    let active = slot.get_or_init(|| {
        installed = true;
        theme.clone()
    });

    if *active != theme {
        return Err(ThemeError::AlreadyRegistered {
            active: active.id.clone(),
            requested: theme.id,
        });
    }
    if installed {
        info!(
            "event=theme_register module=theme status=ok theme_id={} css_bytes={}",
            active.id,
            active.css.len()
        );
    }
    Ok(active)
}
