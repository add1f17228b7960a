// Wed Jan 15 2026 - Alex

use clap::Parser;
use colored::Colorize;
use skia_dep_tools::cli::{run_sync, SyncArgs};

fn main() {
    let args = SyncArgs::parse();

    if let Err(e) = run_sync(args) {
        eprintln!("{} {:#}", "[!]".red(), e);
        std::process::exit(1);
    }
}
