//! Mutation commands
//!
//! Usage:
//!   gmark add|remove|set --object <FILE> --marking <REF>... <SELECTOR>... [--output <FILE>]
//!   gmark clear --object <FILE> <SELECTOR>... [--output <FILE>]
//!
//! The input file is never rewritten unless it is also named by `--output`.

use clap::Args;
use gmark_core::MarkedObject;
use gmark_engine::MarkingEngine;
use std::path::PathBuf;

use super::{load_object, write_object, CommandResult, ObjectArgs};

#[derive(Debug, Args)]
pub struct MarkingArgs {
    #[command(flatten)]
    pub object: ObjectArgs,

    /// Marking definition reference (repeatable)
    #[arg(short, long = "marking", value_name = "REF", required = true)]
    pub markings: Vec<String>,

    /// Selectors the markings apply to
    #[arg(required = true)]
    pub selectors: Vec<String>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ClearArgs {
    #[command(flatten)]
    pub object: ObjectArgs,

    /// Selectors to clear
    #[arg(required = true)]
    pub selectors: Vec<String>,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn execute_add(engine: &MarkingEngine, args: MarkingArgs) -> CommandResult {
    run_marking(args, |object, markings, selectors| {
        engine.add_markings(object, markings, selectors)
    })
}

pub fn execute_remove(engine: &MarkingEngine, args: MarkingArgs) -> CommandResult {
    run_marking(args, |object, markings, selectors| {
        engine.remove_markings(object, markings, selectors)
    })
}

pub fn execute_set(engine: &MarkingEngine, args: MarkingArgs) -> CommandResult {
    run_marking(args, |object, markings, selectors| {
        engine.set_markings(object, markings, selectors)
    })
}

pub fn execute_clear(engine: &MarkingEngine, args: ClearArgs) -> CommandResult {
    let object = load_object(&args.object.object)?;
    let next = engine.clear_markings(&object, args.selectors)?;
    write_object(&next, args.output.as_deref())
}

fn run_marking<F>(args: MarkingArgs, op: F) -> CommandResult
where
    F: FnOnce(&MarkedObject, Vec<String>, Vec<String>) -> gmark_core::Result<MarkedObject>,
{
    let object = load_object(&args.object.object)?;
    let next = op(&object, args.markings, args.selectors)?;
    write_object(&next, args.output.as_deref())
}
