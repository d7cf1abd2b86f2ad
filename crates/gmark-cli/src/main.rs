//! gmark CLI
//!
//! Command-line interface for granular markings on JSON objects

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "gmark")]
#[command(about = "gmark - Granular data markings on JSON objects", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: commands::GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the markings applying to selectors
    Get(commands::query::GetArgs),
    /// Check whether selectors are marked
    IsMarked(commands::query::IsMarkedArgs),
    /// Apply markings to selectors
    Add(commands::mutate::MarkingArgs),
    /// Remove specific markings from selectors
    Remove(commands::mutate::MarkingArgs),
    /// Remove every marking from selectors
    Clear(commands::mutate::ClearArgs),
    /// Replace the markings on selectors
    Set(commands::mutate::MarkingArgs),
}

fn main() {
    let cli = Cli::parse();
    commands::init_logging(&cli.global);
    let engine = commands::build_engine(&cli.global);

    let result = match cli.command {
        Commands::Get(args) => commands::query::execute_get(&engine, args),
        Commands::IsMarked(args) => commands::query::execute_is_marked(&engine, args),
        Commands::Add(args) => commands::mutate::execute_add(&engine, args),
        Commands::Remove(args) => commands::mutate::execute_remove(&engine, args),
        Commands::Clear(args) => commands::mutate::execute_clear(&engine, args),
        Commands::Set(args) => commands::mutate::execute_set(&engine, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
