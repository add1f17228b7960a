// Tue Jan 13 2026 - Alex

use crate::symbol::image::{check_dos_magic, read_rva_string, PeImage};
use crate::symbol::SymbolError;
use goblin::pe::export::{ExportAddressTableEntry, ExportData};
use goblin::pe::section_table::SectionTable;
use goblin::pe::PE;
use itertools::Itertools;
use serde::Serialize;
use std::collections::HashSet;

/// One entry of a DLL export table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
    pub ordinal: u32,
    pub name: Option<String>,
    pub rva: u32,
    pub forwarder: Option<String>,
}

impl ExportRecord {
    pub fn named(ordinal: u32, name: String, rva: u32) -> Self {
        Self {
            ordinal,
            name: Some(name),
            rva,
            forwarder: None,
        }
    }

    pub fn ordinal_only(ordinal: u32, rva: u32) -> Self {
        Self {
            ordinal,
            name: None,
            rva,
            forwarder: None,
        }
    }

    pub fn with_forwarder(mut self, forwarder: String) -> Self {
        self.forwarder = Some(forwarder);
        self
    }

    /// The exported name, or `ordinal_<n>` when the entry has none.
    pub fn identifier(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("ordinal_{}", self.ordinal),
        }
    }

    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }

    pub fn is_forwarder(&self) -> bool {
        self.forwarder.is_some()
    }
}

/// Export records in export-table order: named entries first, then the
/// remaining non-empty address slots.
#[derive(Debug, Clone, Default)]
pub struct ExportTable {
    dll_name: Option<String>,
    ordinal_base: u32,
    records: Vec<ExportRecord>,
}

impl ExportTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_image(image: &PeImage) -> Result<Self, SymbolError> {
        if image.is_empty() {
            return Err(SymbolError::NotPe(format!("{} is empty", image.path().display())));
        }
        Self::from_bytes(image.as_bytes())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SymbolError> {
        check_dos_magic(bytes)?;
        let pe = PE::parse(bytes)?;

        match pe.export_data.as_ref() {
            Some(export_data) => Ok(Self::from_export_data(bytes, export_data, &pe.sections)),
            None => {
                log::debug!("Image has no export directory");
                Ok(Self::new())
            }
        }
    }

    fn from_export_data(bytes: &[u8], data: &ExportData, sections: &[SectionTable]) -> Self {
        let directory = &data.export_directory_table;
        let base = directory.ordinal_base;
        let addresses = &data.export_address_table;

        let mut records = Vec::with_capacity(addresses.len().max(data.export_name_pointer_table.len()));
        let mut named_slots = HashSet::new();

        for (idx, &name_rva) in data.export_name_pointer_table.iter().enumerate() {
            let Some(&slot) = data.export_ordinal_table.get(idx) else {
                log::warn!("Name pointer {} has no ordinal table entry", idx);
                break;
            };
            named_slots.insert(slot as usize);

            let ordinal = base.wrapping_add(slot as u32);
            let entry = addresses.get(slot as usize);
            let record = ExportRecord {
                ordinal,
                name: read_rva_string(bytes, name_rva, sections),
                rva: entry.map(entry_rva).unwrap_or(0),
                forwarder: entry.and_then(|e| forwarder_text(bytes, e, sections)),
            };
            if record.name.is_none() {
                log::warn!("Export name at RVA 0x{:x} could not be resolved", name_rva);
            }
            records.push(record);
        }

        for (slot, entry) in addresses.iter().enumerate() {
            if named_slots.contains(&slot) {
                continue;
            }
            let rva = entry_rva(entry);
            if rva == 0 {
                continue;
            }

            let mut record = ExportRecord::ordinal_only(base.wrapping_add(slot as u32), rva);
            if let Some(forwarder) = forwarder_text(bytes, entry, sections) {
                record = record.with_forwarder(forwarder);
            }
            records.push(record);
        }

        Self {
            dll_name: data.name.map(str::to_string),
            ordinal_base: base,
            records,
        }
    }

    pub fn push(&mut self, record: ExportRecord) {
        self.records.push(record);
    }

    pub fn dll_name(&self) -> Option<&str> {
        self.dll_name.as_deref()
    }

    pub fn ordinal_base(&self) -> u32 {
        self.ordinal_base
    }

    pub fn records(&self) -> &[ExportRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExportRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn named_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_named()).count()
    }

    pub fn ordinal_only_count(&self) -> usize {
        self.len() - self.named_count()
    }

    pub fn forwarder_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_forwarder()).count()
    }

    /// Identifiers in export-table order.
    pub fn identifiers(&self) -> Vec<String> {
        self.records.iter().map(ExportRecord::identifier).collect()
    }

    pub fn sorted_identifiers(&self) -> Vec<String> {
        self.records.iter().map(ExportRecord::identifier).sorted().collect()
    }

    pub fn preview(&self, limit: usize) -> Vec<String> {
        self.records.iter().take(limit).map(ExportRecord::identifier).collect()
    }
}

fn entry_rva(entry: &ExportAddressTableEntry) -> u32 {
    match *entry {
        ExportAddressTableEntry::ExportRVA(rva) => rva,
        ExportAddressTableEntry::ForwarderRVA(rva) => rva,
    }
}

fn forwarder_text(bytes: &[u8], entry: &ExportAddressTableEntry, sections: &[SectionTable]) -> Option<String> {
    match *entry {
        ExportAddressTableEntry::ForwarderRVA(rva) => read_rva_string(bytes, rva, sections),
        ExportAddressTableEntry::ExportRVA(_) => None,
    }
}
