// Tue Jan 15 2026 - Alex

use crate::config::ExportConfig;
use crate::symbol::writer::write_sorted;
use crate::symbol::{ExportTable, PeImage, SymbolError};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub dll: PathBuf,
    pub output: PathBuf,
    pub dll_name: Option<String>,
    pub total: usize,
    pub named: usize,
    pub ordinal_only: usize,
    pub forwarders: usize,
    pub preview: Vec<String>,
}

/// Reads a DLL's exports and persists them as a sorted symbol list.
pub struct SymbolExporter {
    config: ExportConfig,
}

impl SymbolExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn read_table(&self) -> Result<ExportTable, SymbolError> {
        let image = PeImage::open(&self.config.dll_path)?;
        ExportTable::from_image(&image)
    }

    pub fn run(&self) -> Result<ExportSummary, SymbolError> {
        let table = self.read_table()?;
        log::info!(
            "{}: {} exports ({} named)",
            self.config.dll_path.display(),
            table.len(),
            table.named_count()
        );

        write_sorted(&table, &self.config.output_path)?;
        Ok(self.summarize(&table))
    }

    pub fn summarize(&self, table: &ExportTable) -> ExportSummary {
        ExportSummary {
            dll: self.config.dll_path.clone(),
            output: self.config.output_path.clone(),
            dll_name: table.dll_name().map(str::to_string),
            total: table.len(),
            named: table.named_count(),
            ordinal_only: table.ordinal_only_count(),
            forwarders: table.forwarder_count(),
            preview: table.preview(self.config.preview_limit),
        }
    }
}
