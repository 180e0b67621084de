//! Host integration seams.
//!
//! Hosts supply document text and receive boards; layout, styling and
//! interaction stay on the host side.

pub mod adapter;
