//! # regbook-cli
//!
//! The `regbook` command: reads the compliance register workbook and
//! writes the validated JSON tree, custom indexes, and discovery manifest
//! consumed by the static register site.

pub mod generate;
