// Tue Jan 15 2026 - Alex

//! In-memory PE32 DLL images for export-table tests.

const PE_POINTER: usize = 0x80;
const FILE_ALIGNMENT: u32 = 0x200;
const SECTION_RVA: u32 = 0x1000;
const SECTION_SIZE: u32 = 0x1000;
const SECTION_FILE_OFFSET: u32 = 0x200;
const CODE_RVA: u32 = 0x1800;
const EXPORT_DIRECTORY_SIZE: u32 = 40;

#[derive(Debug, Clone)]
pub(crate) enum Slot {
    Function,
    Gap,
    Forwarder(String),
}

/// Describes an export table and assembles a minimal DLL around it.
#[derive(Debug, Clone)]
pub(crate) struct PeFixture {
    dll_name: String,
    ordinal_base: u32,
    slots: Vec<Slot>,
    names: Vec<(Vec<u8>, u16)>,
}

impl PeFixture {
    pub(crate) fn new(ordinal_base: u32) -> Self {
        Self {
            dll_name: "fixture.dll".to_string(),
            ordinal_base,
            slots: Vec::new(),
            names: Vec::new(),
        }
    }

    pub(crate) fn function(mut self) -> Self {
        self.slots.push(Slot::Function);
        self
    }

    pub(crate) fn functions(mut self, count: usize) -> Self {
        self.slots.extend(std::iter::repeat(Slot::Function).take(count));
        self
    }

    pub(crate) fn gap(mut self) -> Self {
        self.slots.push(Slot::Gap);
        self
    }

    pub(crate) fn forwarder(mut self, target: &str) -> Self {
        self.slots.push(Slot::Forwarder(target.to_string()));
        self
    }

    /// Names address-table slot `slot`. Names are emitted in call order.
    pub(crate) fn name(mut self, name: &str, slot: u16) -> Self {
        self.names.push((name.as_bytes().to_vec(), slot));
        self
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let mut image = vec![0u8; (SECTION_FILE_OFFSET + SECTION_SIZE) as usize];
        self.write_headers(&mut image);
        self.write_exports(&mut image);
        image
    }

    fn write_headers(&self, image: &mut [u8]) {
        image[0..2].copy_from_slice(b"MZ");
        put_u32(image, 0x3c, PE_POINTER as u32);
        image[PE_POINTER..PE_POINTER + 4].copy_from_slice(b"PE\0\0");

        let coff = PE_POINTER + 4;
        put_u16(image, coff, 0x14c);
        put_u16(image, coff + 2, 1);
        put_u16(image, coff + 16, 224);
        put_u16(image, coff + 18, 0x2102);

        let opt = coff + 20;
        put_u16(image, opt, 0x10b);
        put_u32(image, opt + 4, SECTION_SIZE);
        put_u32(image, opt + 20, SECTION_RVA);
        put_u32(image, opt + 28, 0x1000_0000);
        put_u32(image, opt + 32, 0x1000);
        put_u32(image, opt + 36, FILE_ALIGNMENT);
        put_u16(image, opt + 40, 6);
        put_u16(image, opt + 48, 6);
        put_u32(image, opt + 56, SECTION_RVA + SECTION_SIZE);
        put_u32(image, opt + 60, SECTION_FILE_OFFSET);
        put_u16(image, opt + 68, 2);
        put_u32(image, opt + 72, 0x10_0000);
        put_u32(image, opt + 76, 0x1000);
        put_u32(image, opt + 80, 0x10_0000);
        put_u32(image, opt + 84, 0x1000);
        put_u32(image, opt + 92, 16);

        let section = opt + 224;
        image[section..section + 6].copy_from_slice(b".edata");
        put_u32(image, section + 8, SECTION_SIZE);
        put_u32(image, section + 12, SECTION_RVA);
        put_u32(image, section + 16, SECTION_SIZE);
        put_u32(image, section + 20, SECTION_FILE_OFFSET);
        put_u32(image, section + 36, 0x4000_0040);
    }

    fn write_exports(&self, image: &mut [u8]) {
        let eat_rva = SECTION_RVA + EXPORT_DIRECTORY_SIZE;
        let names_rva = eat_rva + 4 * self.slots.len() as u32;
        let ordinals_rva = names_rva + 4 * self.names.len() as u32;
        let mut cursor = ordinals_rva + 2 * self.names.len() as u32;

        let dll_name_rva = cursor;
        cursor = put_str(image, cursor, self.dll_name.as_bytes());

        for (idx, (name, slot)) in self.names.iter().enumerate() {
            put_u32(image, offset(names_rva) + 4 * idx, cursor);
            put_u16(image, offset(ordinals_rva) + 2 * idx, *slot);
            cursor = put_str(image, cursor, name);
        }

        let mut code = CODE_RVA;
        for (idx, slot) in self.slots.iter().enumerate() {
            let rva = match slot {
                Slot::Function => {
                    code += 0x10;
                    code
                }
                Slot::Gap => 0,
                Slot::Forwarder(target) => {
                    let rva = cursor;
                    cursor = put_str(image, cursor, target.as_bytes());
                    rva
                }
            };
            put_u32(image, offset(eat_rva) + 4 * idx, rva);
        }
        assert!(cursor < CODE_RVA, "fixture export data overflows into code area");

        let dir = offset(SECTION_RVA);
        put_u32(image, dir + 12, dll_name_rva);
        put_u32(image, dir + 16, self.ordinal_base);
        put_u32(image, dir + 20, self.slots.len() as u32);
        put_u32(image, dir + 24, self.names.len() as u32);
        put_u32(image, dir + 28, eat_rva);
        put_u32(image, dir + 32, names_rva);
        put_u32(image, dir + 36, ordinals_rva);

        // export table data directory
        let data_dirs = PE_POINTER + 4 + 20 + 96;
        put_u32(image, data_dirs, SECTION_RVA);
        put_u32(image, data_dirs + 4, cursor - SECTION_RVA);
    }
}

fn offset(rva: u32) -> usize {
    (rva - SECTION_RVA + SECTION_FILE_OFFSET) as usize
}

fn put_u16(image: &mut [u8], at: usize, value: u16) {
    image[at..at + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(image: &mut [u8], at: usize, value: u32) {
    image[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

fn put_str(image: &mut [u8], rva: u32, bytes: &[u8]) -> u32 {
    let at = offset(rva);
    image[at..at + bytes.len()].copy_from_slice(bytes);
    image[at + bytes.len()] = 0;
    rva + bytes.len() as u32 + 1
}
