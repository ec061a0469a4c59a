//! # jysp-cli — Command-Line Front End
//!
//! Loads schema and data documents from disk and drives the
//! [`jysp_schema`] compiler and validator.
//!
//! ## Subcommands
//!
//! - `validate`: compile a schema and check a document against it.
//! - `check`: compile a schema and list its type registry.
//!
//! Each handler returns `anyhow::Result<u8>` carrying the process exit code;
//! the binary maps loader failures to exit code 1.

pub mod check;
pub mod load;
pub mod validate;
