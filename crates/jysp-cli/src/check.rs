//! # `jysp check`
//!
//! Compiles a schema file without validating any data and lists the
//! resulting type registry, one `<name>: <descriptor>` line per entry in
//! name order.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use jysp_schema::{compile, SchemaError};

use crate::load::load_document;

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schema definition (.yml, .yaml or .json).
    pub schema: PathBuf,
}

/// Compile the schema at `path` and describe every registered type.
pub fn describe_schema(path: &Path) -> Result<Result<Vec<String>, SchemaError>> {
    let definition = load_document(path)?;
    Ok(compile(&definition).map(|compiled| {
        let registry = compiled.registry();
        registry
            .type_names()
            .into_iter()
            .filter_map(|name| {
                registry
                    .get(name)
                    .map(|descriptor| format!("{name}: {descriptor}"))
            })
            .collect()
    }))
}

/// Run the `check` subcommand. Returns the process exit code.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    match describe_schema(&args.schema)? {
        Ok(lines) => {
            println!("valid");
            for line in lines {
                println!("{line}");
            }
            Ok(0)
        }
        Err(e) => {
            println!("{e}");
            Ok(1)
        }
    }
}
