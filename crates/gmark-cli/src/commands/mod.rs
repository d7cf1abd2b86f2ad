//! Subcommand handlers and the plumbing they share

pub mod mutate;
pub mod query;

use clap::Args;
use gmark_core::logging_facility::{init, Profile};
use gmark_core::ops::TimestampVersioner;
use gmark_core::{MarkedObject, PermissiveValidator, StructuralValidator};
use gmark_engine::MarkingEngine;
use std::io::Read;
use std::path::{Path, PathBuf};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Accept any non-empty selector instead of resolving it against the object
    #[arg(long, global = true)]
    pub permissive: bool,

    /// Human-readable debug logs on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON logs on stderr
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub log_json: bool,
}

/// Object input shared by every subcommand
#[derive(Debug, Args)]
pub struct ObjectArgs {
    /// JSON object file (`-` reads stdin)
    #[arg(short = 'f', long = "object", value_name = "FILE")]
    pub object: PathBuf,
}

pub fn init_logging(global: &GlobalArgs) {
    if global.log_json {
        init(Profile::Production);
    } else if global.verbose {
        init(Profile::Development);
    }
}

pub fn build_engine(global: &GlobalArgs) -> MarkingEngine {
    if global.permissive {
        MarkingEngine::new(PermissiveValidator, TimestampVersioner)
    } else {
        MarkingEngine::new(StructuralValidator, TimestampVersioner)
    }
}

/// Read and parse the object named by `--object`
pub fn load_object(path: &Path) -> Result<MarkedObject, Box<dyn std::error::Error>> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };

    let value: serde_json::Value = serde_json::from_str(&raw)?;
    Ok(MarkedObject::from_value(value)?)
}

/// Write a snapshot as pretty JSON to `output` or stdout
pub fn write_object(object: &MarkedObject, output: Option<&Path>) -> CommandResult {
    let json = serde_json::to_string_pretty(&object.to_value()?)?;

    if let Some(output_path) = output {
        std::fs::write(output_path, format!("{}\n", json))?;
        eprintln!("✓ Wrote {}", output_path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}
