// Tue Jan 15 2026 - Alex

pub mod cli;
pub mod config;
pub mod deps;
pub mod symbol;
pub mod utils;

pub use config::{ExecutionMode, ExportConfig, SyncConfig};
pub use deps::{SyncRunner, SyncReport};
pub use symbol::{ExportTable, SymbolExporter};
