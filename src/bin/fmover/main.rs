mod config;
mod locate;
mod matching;
mod mover;
mod types;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use crate::mover::Mover;

#[derive(Parser)]
#[command(
    author,
    version,
    name = env!("CARGO_BIN_NAME"),
    about = "Move company documents from an inbox to matching archive folders"
)]
struct Args {
    /// Optional source root containing one folder per company
    #[arg(value_hint = clap::ValueHint::DirPath)]
    source: Option<PathBuf>,

    /// Destination root containing the archive company folders
    #[arg(short, long, value_hint = clap::ValueHint::DirPath, name = "DIR")]
    dest: Option<PathBuf>,

    /// Auto-approve all ready proposals without asking
    #[arg(short, long)]
    auto: bool,

    /// Print debug information
    #[arg(short = 'D', long)]
    debug: bool,

    /// Additional document extension(s) to move
    #[arg(short = 'n', long = "extension", num_args = 1, action = clap::ArgAction::Append, name = "EXTENSION")]
    extensions: Vec<String>,

    /// Move inbound/outbound subfolders instead of documents by default
    #[arg(short, long)]
    subfolders: bool,

    /// Only print the plan without moving anything
    #[arg(short, long)]
    print: bool,

    /// Generate shell completion
    #[arg(short = 'l', long, name = "SHELL")]
    completion: Option<Shell>,

    /// Print verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(ref shell) = args.completion {
        fiscal_mover::generate_shell_completion(*shell, Args::command(), true, env!("CARGO_BIN_NAME"))
    } else {
        Mover::new(args)?.run()
    }
}
