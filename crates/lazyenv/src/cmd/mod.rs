use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Subcommand};
use lazyenv_bind::{ProcessEnv, Source, Subset};
use lazyenv_schema::{JsonSchema, SchemaConfig};

use crate::exit::{schema_error, CliResult};
use crate::output::OutputFormat;

pub mod check;
pub mod get;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate the process environment against a JSON Schema file.
    Check(CheckArgs),
    /// Read one variable through a JSON Schema file.
    Get(GetArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Check(args) => check::run(args, format),
        Command::Get(args) => get::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Options shared by commands that load a schema file.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// JSON Schema file describing the environment.
    #[arg(long, short = 's', env = "LAZYENV_SCHEMA", value_name = "FILE")]
    pub schema: PathBuf,
    /// Reject undeclared keys inside declared objects. The environment is
    /// narrowed to the declared variables first.
    #[arg(long)]
    pub strict: bool,
    /// Validate raw strings without converting them to declared types.
    #[arg(long)]
    pub no_coerce: bool,
}

impl SchemaArgs {
    pub fn load(&self) -> CliResult<JsonSchema> {
        let config = SchemaConfig {
            strict_mode: self.strict,
            coerce_types: !self.no_coerce,
            ..SchemaConfig::default()
        };
        JsonSchema::from_file(&self.schema, config)
            .map_err(|err| schema_error(&self.schema.display().to_string(), err))
    }

    /// The process environment the schema is checked against.
    ///
    /// Strict mode forbids undeclared top-level keys, and every real
    /// environment has some (`PATH`, `HOME`), so it only sees declared ones.
    pub fn environment(&self, schema: &JsonSchema) -> Arc<dyn Source> {
        if self.strict {
            Arc::new(Subset::new(ProcessEnv, schema.property_names()))
        } else {
            Arc::new(ProcessEnv)
        }
    }
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,
    /// Variable to read.
    pub key: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
