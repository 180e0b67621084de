//! Flutter bridge surface for mdkanban.

pub mod api;
