//! Plugin declaration contracts.
//!
//! Hosts resolve the declared view, command, parser and theme entrypoints;
//! this module only validates and indexes the declarations.

pub mod manifest;
pub mod registry;
