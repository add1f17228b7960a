// Tue Jan 13 2026 - Alex

pub mod error;
pub mod export;
pub mod exporter;
pub mod image;
pub mod writer;

#[cfg(test)]
pub(crate) mod testing;

pub use error::SymbolError;
pub use export::{ExportRecord, ExportTable};
pub use exporter::{ExportSummary, SymbolExporter};
pub use image::PeImage;
pub use writer::write_sorted;
