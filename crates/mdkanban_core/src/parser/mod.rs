//! Markdown text parsing for board projections.
//!
//! # Responsibility
//! - Turn raw note text into [`crate::model::board::Board`] values.
//! - Detect frontmatter and evaluate the board opt-in gate.
//!
//! # See also
//! - crate::host for the adapter hosts drive on every document change.

pub mod extract;
pub mod frontmatter;
pub mod policy;
