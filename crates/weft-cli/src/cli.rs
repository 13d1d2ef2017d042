//! Argument definitions for the `weft` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "weft", version, about = "Pattern rule compiler for token stream matching")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate rule files and report diagnostics
    Check(CheckArgs),
    /// Compile rule files and print the emitted backend call trace
    Dump(DumpArgs),
}

/// Rule source input shared by all commands. Files are loaded in order into
/// one compiler instance; `-` reads standard input.
#[derive(Args)]
pub struct SourceArgs {
    /// Rule files, loaded in order
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Inline rule source instead of files
    #[arg(short = 'e', long = "expr", value_name = "TEXT", conflicts_with = "files")]
    pub expr: Option<String>,
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output format for diagnostics
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args)]
pub struct DumpArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
