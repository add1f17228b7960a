// Wed Jan 15 2026 - Alex

use crate::config::{ConfigError, ExecutionMode, ExportConfig, SyncConfig, DEFAULT_PREVIEW_LIMIT};
use clap::builder::FalseyValueParser;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "get-exports")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Extract exported symbols from a DLL and save them to a file", long_about = None)]
pub struct ExportArgs {
    #[arg(short, long, default_value = "skia.dll")]
    pub dll: PathBuf,

    #[arg(short, long, default_value = "skia_dll_symbols.txt")]
    pub output: PathBuf,

    /// Number of symbols to preview, in export-table order
    #[arg(long, default_value_t = DEFAULT_PREVIEW_LIMIT)]
    pub preview: usize,

    /// Print the run summary as JSON instead of the preview
    #[arg(long)]
    pub json: bool,

    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

impl ExportArgs {
    pub fn to_config(&self) -> ExportConfig {
        ExportConfig::new()
            .with_dll_path(self.dll.clone())
            .with_output_path(self.output.clone())
            .with_preview_limit(self.preview)
    }
}

#[derive(Parser, Debug)]
#[command(name = "git-sync-deps-serial")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Sync DEPS git dependencies one at a time to avoid 429 rate limits", long_about = None)]
pub struct SyncArgs {
    /// Checkout root holding the DEPS file [default: skia next to this executable]
    #[arg(long, env = "SKIA_DIR")]
    pub root: Option<PathBuf>,

    /// Descriptor file [default: <root>/DEPS]
    #[arg(long, env = "GIT_SYNC_DEPS_PATH")]
    pub deps: Option<PathBuf>,

    #[arg(long, env = "GIT_EXECUTABLE")]
    pub git: Option<String>,

    /// Interpreter for the post-sync scripts
    #[arg(long)]
    pub python: Option<String>,

    /// Any non-empty value other than 0/false/no/off enables it
    #[arg(short, long, env = "GIT_SYNC_DEPS_QUIET", value_parser = FalseyValueParser::new())]
    pub quiet: bool,

    #[arg(long, env = "GIT_SYNC_DEPS_SKIP_EMSDK", value_parser = FalseyValueParser::new())]
    pub skip_emsdk: bool,

    /// Do not run bin/fetch-gn or bin/activate-emsdk
    #[arg(long)]
    pub no_hooks: bool,

    /// Sync every dependency concurrently instead of one at a time
    #[arg(long)]
    pub parallel: bool,

    /// JSON file with SyncConfig fields; flags take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// OS-specific dependency sets to include (win, mac, linux, all, ...)
    pub os: Vec<String>,
}

impl SyncArgs {
    pub fn to_config(&self) -> Result<SyncConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => SyncConfig::from_json_file(path)?,
            None => SyncConfig::default(),
        };

        if let Some(root) = &self.root {
            config.root = Some(root.clone());
        }
        if let Some(deps) = &self.deps {
            config.deps_path = Some(deps.clone());
        }
        if let Some(git) = &self.git {
            config.git_executable = Some(git.clone());
        }
        if let Some(python) = &self.python {
            config.python = python.clone();
        }
        if self.quiet {
            config.verbose = false;
        }
        if self.skip_emsdk {
            config.skip_emsdk = true;
        }
        if self.no_hooks {
            config.run_hooks = false;
        }
        if self.parallel {
            config.mode = ExecutionMode::Parallel;
        }
        if !self.os.is_empty() {
            config.os_requests = self.os.clone();
        }

        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}
