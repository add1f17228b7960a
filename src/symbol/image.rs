// Tue Jan 13 2026 - Alex

use crate::symbol::SymbolError;
use goblin::pe::section_table::SectionTable;
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};

const DOS_MAGIC: &[u8; 2] = b"MZ";

/// A PE file mapped read-only into memory.
pub struct PeImage {
    mmap: Mmap,
    path: PathBuf,
}

impl PeImage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SymbolError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| SymbolError::Open {
            path: path.clone(),
            source,
        })?;
        let mmap = unsafe { Mmap::map(&file) }.map_err(|source| SymbolError::Open {
            path: path.clone(),
            source,
        })?;

        log::debug!("Mapped {} ({} bytes)", path.display(), mmap.len());

        Ok(Self { mmap, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.mmap.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }
}

pub(crate) fn check_dos_magic(bytes: &[u8]) -> Result<(), SymbolError> {
    if bytes.len() < DOS_MAGIC.len() || &bytes[..DOS_MAGIC.len()] != DOS_MAGIC {
        return Err(SymbolError::NotPe("missing MZ signature".to_string()));
    }
    Ok(())
}

/// Maps an RVA to a file offset. RVAs below the first section resolve into the headers.
pub(crate) fn rva_to_offset(rva: u32, sections: &[SectionTable]) -> Option<usize> {
    for section in sections {
        let start = section.virtual_address;
        let span = section.virtual_size.max(section.size_of_raw_data);
        if rva < start || rva - start >= span {
            continue;
        }

        let delta = rva - start;
        if delta >= section.size_of_raw_data {
            // zero-fill tail, nothing on disk
            return None;
        }
        return Some(section.pointer_to_raw_data as usize + delta as usize);
    }

    let first_section = sections.iter().map(|s| s.virtual_address).min();
    match first_section {
        Some(first) if rva < first => Some(rva as usize),
        _ => None,
    }
}

/// Reads a NUL-terminated string, replacing invalid UTF-8 sequences.
pub(crate) fn read_c_string(bytes: &[u8], offset: usize) -> Option<String> {
    let tail = bytes.get(offset..)?;
    let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
    Some(String::from_utf8_lossy(&tail[..end]).into_owned())
}

pub(crate) fn read_rva_string(bytes: &[u8], rva: u32, sections: &[SectionTable]) -> Option<String> {
    rva_to_offset(rva, sections).and_then(|offset| read_c_string(bytes, offset))
}
