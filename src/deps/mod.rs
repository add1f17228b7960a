// Tue Jan 15 2026 - Alex

pub mod error;
pub mod git;
pub mod manifest;
pub mod parser;
pub mod strategy;
pub mod sync;
pub mod task;

pub use error::{DepsError, SyncError};
pub use git::Git;
pub use manifest::{DependencySpec, DepsFile};
pub use strategy::{ExecutionStrategy, ParallelStrategy, SerialStrategy, SyncReport, TaskFailure};
pub use sync::SyncRunner;
pub use task::{build_tasks, CheckoutTask};
