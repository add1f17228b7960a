// Wed Jan 15 2026 - Alex

use super::args::{ExportArgs, SyncArgs};
use crate::config::{ConfigError, SyncConfig};
use crate::deps::SyncRunner;
use crate::symbol::{ExportSummary, SymbolExporter};
use crate::utils::logging::{init_logger, level_from_str, scoped_timer};
use crate::utils::{format_duration, pluralize};
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;

pub fn run_exports(args: ExportArgs) -> anyhow::Result<()> {
    init_logger(level_from_str(&args.log_level));

    let config = args.to_config();
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    println!("{} Reading exports from {}...", "[*]".blue(), config.dll_path.display());

    let exporter = SymbolExporter::new(config);
    let summary = {
        let _timer = scoped_timer("export");
        exporter.run()?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let mut stdout = std::io::stdout().lock();
    write_export_summary(&mut stdout, &summary, exporter.config().preview_limit)?;
    Ok(())
}

fn write_export_summary<W: Write>(out: &mut W, summary: &ExportSummary, limit: usize) -> std::io::Result<()> {
    writeln!(out, "{} Found {} exported symbols", "[+]".green(), summary.total)?;
    if summary.ordinal_only > 0 {
        writeln!(
            out,
            "{} {} exported by ordinal only",
            "[*]".blue(),
            pluralize(summary.ordinal_only, "symbol", "symbols")
        )?;
    }
    writeln!(out, "{} Saved to {}", "[+]".green(), summary.output.display())?;

    writeln!(out)?;
    writeln!(out, "{}", format!("First {} symbols:", limit).yellow().bold())?;
    for identifier in &summary.preview {
        writeln!(out, "  {}", identifier)?;
    }
    out.flush()
}

pub fn run_sync(args: SyncArgs) -> anyhow::Result<()> {
    init_logger(level_from_str(&args.log_level));

    let config = args.to_config()?;
    println!("{} Working directory: {}", "[*]".blue(), working_directory(&config)?.display());

    let runner = SyncRunner::new(config);
    let timer = scoped_timer("git-sync-deps");
    let report = runner.run()?;

    println!(
        "{} Synced {} in {}",
        "[+]".green(),
        pluralize(report.succeeded, "dependency", "dependencies"),
        format_duration(timer.elapsed())
    );
    Ok(())
}

/// The sync root, canonicalised when it exists.
fn working_directory(config: &SyncConfig) -> Result<PathBuf, ConfigError> {
    let root = config.root()?;
    Ok(std::fs::canonicalize(&root).unwrap_or(root))
}
