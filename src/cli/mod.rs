// Wed Jan 15 2026 - Alex

pub mod args;
pub mod handler;

pub use args::{ExportArgs, SyncArgs};
pub use handler::{run_exports, run_sync};
