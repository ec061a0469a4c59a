//! # `jysp validate`
//!
//! Compiles a schema file and validates a data file against it. Prints
//! `valid` on success, otherwise the schema or validation error in its
//! `<Kind> - Path: <path> - <message>` form.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use jysp_schema::{compile, SchemaError, ValidationError};
use tracing::info;

use crate::load::load_document;

/// Arguments for the `validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema definition (.yml, .yaml or .json).
    pub schema: PathBuf,

    /// Document to validate (.yml, .yaml or .json).
    pub data: PathBuf,
}

/// Why a schema or document was refused.
#[derive(Debug, thiserror::Error)]
pub enum Rejection {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Document(#[from] ValidationError),
}

/// Compile `schema` and validate `data` against it.
///
/// The outer `Result` carries I/O and decoding failures; the inner one
/// carries the verdict. The data file is not read when the schema is
/// rejected.
pub fn validate_files(schema: &Path, data: &Path) -> Result<Result<(), Rejection>> {
    let definition = load_document(schema)?;
    let compiled = match compile(&definition) {
        Ok(compiled) => compiled,
        Err(e) => return Ok(Err(e.into())),
    };
    info!(schema = %schema.display(), types = compiled.len(), "schema compiled");

    let document = load_document(data)?;
    Ok(compiled.validate(&document).map_err(Rejection::from))
}

/// Run the `validate` subcommand. Returns the process exit code.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    match validate_files(&args.schema, &args.data)? {
        Ok(()) => {
            println!("valid");
            Ok(0)
        }
        Err(rejection) => {
            println!("{rejection}");
            Ok(1)
        }
    }
}
