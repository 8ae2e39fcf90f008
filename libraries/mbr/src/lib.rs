// Based on https://github.com/ischeinkman/mbr-nostd

use std::io::{Read, Seek, SeekFrom};

use byteorder::{ByteOrder, LittleEndian};

mod error;
pub use error::{ErrorCause, MbrError};

mod partition;
pub use partition::*;

mod extended;
pub use extended::{walk_extended, Ebr, ExtendedChain, MAX_CHAIN_LENGTH};

mod report;
pub use report::{ReportedPartition, Size};

mod table;
pub use table::{assemble, PartitionTable};

pub const SECTOR_SIZE: usize = 512;
pub const TABLE_OFFSET: usize = 446;
pub const ENTRY_SIZE: usize = 16;
pub const SIGNATURE_OFFSET: usize = SECTOR_SIZE - 2;
pub const SIGNATURE: u16 = 0xaa55;
pub const MAX_ENTRIES: usize = (SECTOR_SIZE - TABLE_OFFSET - 2) / ENTRY_SIZE;
pub const EBR_ENTRIES: usize = 2;

/// The MBR sector: boot code, four primary entries and the boot signature.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DiskLabel {
    pub boot_code: [u8; TABLE_OFFSET],
    pub entries: [PartitionTableEntry; MAX_ENTRIES],

    /// The signature as stored, read little-endian. Not checked on decode.
    pub signature: u16,
}

impl DiskLabel {
    /// Decodes a disk label from a raw byte buffer.
    ///
    /// Throws `TruncatedInput` if `bytes.len()` is less than 512. The
    /// signature is decoded but not validated; see [`DiskLabel::has_valid_signature`].
    pub fn from_bytes<T: AsRef<[u8]>>(bytes: &T) -> Result<DiskLabel, MbrError> {
        let buffer: &[u8] = bytes.as_ref();
        if buffer.len() < SECTOR_SIZE {
            return Err(MbrError::from_cause(ErrorCause::TruncatedInput {
                expected: SECTOR_SIZE,
                actual: buffer.len(),
            }));
        }
        let mut boot_code = [0u8; TABLE_OFFSET];
        boot_code.copy_from_slice(&buffer[..TABLE_OFFSET]);
        let mut entries = [PartitionTableEntry::empty(); MAX_ENTRIES];
        for (idx, entry) in entries.iter_mut().enumerate() {
            let offset = TABLE_OFFSET + idx * ENTRY_SIZE;
            *entry = PartitionTableEntry::from_bytes(&buffer[offset..offset + ENTRY_SIZE])?;
        }
        let signature = LittleEndian::read_u16(&buffer[SIGNATURE_OFFSET..SECTOR_SIZE]);
        Ok(DiskLabel {
            boot_code,
            entries,
            signature,
        })
    }

    pub fn has_valid_signature(&self) -> bool {
        self.signature == SIGNATURE
    }

    /// Reads sector 0 of `source` and checks its signature.
    pub fn read_from<S: Read + Seek>(source: &mut S) -> Result<DiskLabel, MbrError> {
        let mut buffer = [0u8; SECTOR_SIZE];
        read_sector(source, 0, &mut buffer)?;
        let label = DiskLabel::from_bytes(&buffer)?;
        if !label.has_valid_signature() {
            return Err(MbrError::from_cause(ErrorCause::InvalidSignature {
                actual: label.signature.to_le_bytes(),
            }));
        }
        Ok(label)
    }
}

/// Decodes a 512-byte disk label. Same as [`DiskLabel::from_bytes`].
pub fn decode_label(bytes: &[u8]) -> Result<DiskLabel, MbrError> {
    DiskLabel::from_bytes(&bytes)
}

/// Fills `buffer` from the start of absolute sector `sector`.
fn read_sector<S: Read + Seek>(source: &mut S, sector: u32, buffer: &mut [u8]) -> Result<(), MbrError> {
    let offset = u64::from(sector) * SECTOR_SIZE as u64;
    source
        .seek(SeekFrom::Start(offset))
        .map_err(|err| ErrorCause::SeekFailure { sector, kind: err.kind() })?;
    source
        .read_exact(buffer)
        .map_err(|err| ErrorCause::ReadFailure { sector, kind: err.kind() })?;
    Ok(())
}
