//! Board model for heading/checklist projections.
//!
//! # Responsibility
//! - Define the canonical section/task shapes handed to hosts.
//! - Keep one serialization shape for CLI, FFI and library callers.
//!
//! # Invariants
//! - Model values are plain data; parsing rules live in `crate::parser`.

pub mod board;
