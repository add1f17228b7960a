// Tue Jan 15 2026 - Alex

use crate::deps::task::CheckoutTask;
use crate::deps::SyncError;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

const CANDIDATES: [&str; 3] = ["git", "git.exe", "git.bat"];
const STATUS_DIR_WIDTH: usize = 36;
const STATUS_COMMIT_WIDTH: usize = 40;

/// Thin wrapper over a git executable.
#[derive(Debug, Clone)]
pub struct Git {
    executable: String,
}

impl Git {
    pub fn new(executable: &str) -> Self {
        Self {
            executable: executable.to_string(),
        }
    }

    /// Uses `explicit` if given, otherwise the first candidate whose `--version` runs.
    pub fn discover(explicit: Option<&str>) -> Result<Self, SyncError> {
        let candidates: Vec<&str> = match explicit {
            Some(git) => vec![git],
            None => CANDIDATES.to_vec(),
        };

        for candidate in candidates {
            let works = Command::new(candidate)
                .arg("--version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .map(|status| status.success())
                .unwrap_or(false);
            if works {
                log::debug!("Using git executable {:?}", candidate);
                return Ok(Self::new(candidate));
            }
        }
        Err(SyncError::GitNotFound)
    }

    fn command(&self, dir: Option<&Path>, args: &[&str]) -> Command {
        log::debug!("{} {}", self.executable, args.join(" "));
        let mut cmd = Command::new(&self.executable);
        cmd.args(args);
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Runs git with inherited stdio; a non-zero exit is an error.
    pub fn run(&self, dir: Option<&Path>, args: &[&str]) -> Result<(), SyncError> {
        let status = self.command(dir, args).status()?;
        if status.success() {
            return Ok(());
        }
        Err(SyncError::Command {
            command: format!("git {}", args.join(" ")),
            dir: dir.map(Path::to_path_buf).unwrap_or_default(),
            status: status.to_string(),
        })
    }

    /// Runs git with stderr discarded and reports only success.
    pub fn try_run(&self, dir: &Path, args: &[&str]) -> bool {
        self.command(Some(dir), args)
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Captures stdout of a successful run.
    pub fn output(&self, dir: &Path, args: &[&str]) -> Option<String> {
        let output = self.command(Some(dir), args).stderr(Stdio::null()).output().ok()?;
        if !output.status.success() {
            return None;
        }
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    pub fn is_toplevel(&self, dir: &Path) -> bool {
        let Some(toplevel) = self.output(dir, &["rev-parse", "--show-toplevel"]) else {
            return false;
        };
        match (std::fs::canonicalize(dir), std::fs::canonicalize(&toplevel)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    pub fn sync_disabled(&self, dir: &Path) -> bool {
        self.output(dir, &["config", "sync-deps.disable"])
            .map(|value| matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
            .unwrap_or(false)
    }

    /// Brings `task.directory` to `task.commit`, cloning or fetching only when needed.
    pub fn checkout_to_directory(&self, task: &CheckoutTask) -> Result<(), SyncError> {
        let dir = task.directory.as_path();
        let commit = task.commit.as_str();

        if !dir.is_dir() {
            let target = dir.to_string_lossy();
            self.run(None, &["clone", "--quiet", "--no-checkout", &task.repo, &target])?;
            self.run(Some(dir), &["checkout", "--quiet", commit])?;
            report_status(task, true);
            return Ok(());
        }

        if !self.is_toplevel(dir) {
            print_notice(&format!("{}\n  IS NOT TOP-LEVEL GIT DIRECTORY.\n", dir.display()));
            return Ok(());
        }

        if self.sync_disabled(dir) {
            print_notice(&format!("{}\n  SYNC IS DISABLED.\n", dir.display()));
            return Ok(());
        }

        if self.try_run(dir, &["checkout", "--quiet", commit]) {
            report_status(task, false);
            return Ok(());
        }

        // origin may point at an old mirror
        self.run(Some(dir), &["remote", "set-url", "origin", &task.repo])?;
        self.run(Some(dir), &["fetch", "--quiet"])?;
        self.run(Some(dir), &["checkout", "--quiet", commit])?;
        report_status(task, true);
        Ok(())
    }
}

fn print_notice(text: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(text.as_bytes());
    let _ = stdout.flush();
}

fn report_status(task: &CheckoutTask, changed: bool) {
    if task.verbose {
        let directory = task.directory.to_string_lossy();
        print_notice(&format!("{}\n", status_line(&directory, &task.commit, changed)));
    }
}

/// `<directory> <@|>> <commit>`, with `>` marking a directory that changed.
pub fn status_line(directory: &str, commit: &str, changed: bool) -> String {
    let directory = truncate_beginning(directory, STATUS_DIR_WIDTH);
    let commit = truncate_end(commit, STATUS_COMMIT_WIDTH);
    let symbol = if changed { '>' } else { '@' };
    format!("{:<width$} {} {}", directory, symbol, commit, width = STATUS_DIR_WIDTH)
}

fn truncate_beginning(s: &str, length: usize) -> String {
    let count = s.chars().count();
    if count <= length {
        return s.to_string();
    }
    let keep = length.saturating_sub(3);
    let tail: String = s.chars().skip(count - keep).collect();
    format!("...{}", tail)
}

fn truncate_end(s: &str, length: usize) -> String {
    if s.chars().count() <= length {
        return s.to_string();
    }
    let head: String = s.chars().take(length.saturating_sub(3)).collect();
    format!("{}...", head)
}
