// Wed Jan 15 2026 - Alex

use clap::Parser;
use colored::Colorize;
use skia_dep_tools::cli::{run_exports, ExportArgs};

fn main() {
    let args = ExportArgs::parse();

    if let Err(e) = run_exports(args) {
        eprintln!("{} {:#}", "[!]".red(), e);
        std::process::exit(1);
    }
}
