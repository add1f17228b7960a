// Tue Jan 15 2026 - Alex

use crate::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DepsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("Undefined variable: {0}")]
    UndefinedVar(String),
    #[error("Type error: {0}")]
    Type(String),
    #[error("Descriptor has no `deps` table")]
    MissingDeps,
    #[error("Invalid entry for {directory}: {reason}")]
    InvalidEntry { directory: String, reason: String },
    #[error("{parent:?} is parent of {child:?}")]
    NestedDependency { parent: String, child: String },
    #[error("Please specify commit for {0}")]
    MissingCommit(String),
    #[error("Poorly formed commit hash: {0:?}")]
    MalformedCommit(String),
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Deps(#[from] DepsError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Descriptor file not found: {0}")]
    DescriptorNotFound(PathBuf),
    #[error("Could not find a working git executable")]
    GitNotFound,
    #[error("`{command}` failed in {dir}: {status}")]
    Command {
        command: String,
        dir: PathBuf,
        status: String,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{failed} of {total} dependencies failed to sync")]
    TasksFailed { failed: usize, total: usize },
    #[error("Hook {hook} failed: {status}")]
    HookFailed { hook: PathBuf, status: String },
    #[error("Failed to start worker pool: {0}")]
    Pool(String),
}
