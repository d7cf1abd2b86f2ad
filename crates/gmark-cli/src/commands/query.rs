//! Query commands
//!
//! Usage:
//!   gmark get --object <FILE> <SELECTOR>... [--inherited] [--descendants]
//!   gmark is-marked --object <FILE> <SELECTOR>... [--marking <REF>]...

use clap::Args;
use gmark_core::{MarkingList, MatchOptions, SelectorList};
use gmark_engine::MarkingEngine;

use super::{load_object, CommandResult, ObjectArgs};

#[derive(Debug, Args)]
pub struct MatchArgs {
    /// Also match markings declared on ancestor selectors
    #[arg(long)]
    pub inherited: bool,

    /// Also match markings declared on descendant selectors
    #[arg(long)]
    pub descendants: bool,
}

impl MatchArgs {
    fn options(&self) -> MatchOptions {
        MatchOptions::explicit()
            .with_inherited(self.inherited)
            .with_descendants(self.descendants)
    }
}

#[derive(Debug, Args)]
pub struct GetArgs {
    #[command(flatten)]
    pub object: ObjectArgs,

    #[command(flatten)]
    pub matching: MatchArgs,

    /// Selectors to query
    #[arg(required = true)]
    pub selectors: Vec<String>,
}

#[derive(Debug, Args)]
pub struct IsMarkedArgs {
    #[command(flatten)]
    pub object: ObjectArgs,

    #[command(flatten)]
    pub matching: MatchArgs,

    /// Require this marking (repeatable); all must apply
    #[arg(short, long = "marking", value_name = "REF")]
    pub markings: Vec<String>,

    /// Selectors to check
    #[arg(required = true)]
    pub selectors: Vec<String>,
}

/// Print one marking ref per line
pub fn execute_get(engine: &MarkingEngine, args: GetArgs) -> CommandResult {
    let object = load_object(&args.object.object)?;
    let refs = engine.get_markings(&object, args.selectors, args.matching.options())?;

    for marking_ref in refs {
        println!("{}", marking_ref);
    }

    Ok(())
}

/// Print `true` or `false`
pub fn execute_is_marked(engine: &MarkingEngine, args: IsMarkedArgs) -> CommandResult {
    let object = load_object(&args.object.object)?;
    let marked = engine.is_marked(
        &object,
        MarkingList::from(args.markings),
        Some(SelectorList::from(args.selectors)),
        args.matching.options(),
    )?;

    println!("{}", marked);
    Ok(())
}
