use byteorder::{ByteOrder, LittleEndian};

use crate::{ErrorCause, MbrError, ENTRY_SIZE};

const BOOTABLE_INDICATOR: u8 = 0x80;

/// The type of a particular partition.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PartitionType {
    Unused,
    Unknown(u8),
    Fat32(u8),
    Extended(u8),
    LinuxNative(u8),
    LinuxSwap(u8),
    NtfsExfat(u8),
    EfiSystem(u8),
    BiosBoot(u8),
}

impl PartitionType {
    /// Parses a partition type from the type byte in the MBR's table.
    pub fn from_mbr_tag_byte(tag: u8) -> PartitionType {
        match tag {
            0x0 => PartitionType::Unused,
            0x0b | 0x0c => PartitionType::Fat32(tag),
            0x05 | 0x0f => PartitionType::Extended(tag),
            0x83 => PartitionType::LinuxNative(tag),
            0x82 => PartitionType::LinuxSwap(tag),
            0x07 => PartitionType::NtfsExfat(tag),
            0xef => PartitionType::EfiSystem(tag),
            0xa0 => PartitionType::BiosBoot(tag),
            _ => PartitionType::Unknown(tag),
        }
    }

    /// Retrieves the associated type byte for this partition type.
    pub fn to_mbr_tag_byte(&self) -> u8 {
        match *self {
            PartitionType::Unused => 0,
            PartitionType::Unknown(t) => t,
            PartitionType::Fat32(t) => t,
            PartitionType::Extended(t) => t,
            PartitionType::LinuxNative(t) => t,
            PartitionType::LinuxSwap(t) => t,
            PartitionType::NtfsExfat(t) => t,
            PartitionType::EfiSystem(t) => t,
            PartitionType::BiosBoot(t) => t,
        }
    }

    /// Whether this tag marks a container of logical partitions.
    pub fn is_extended(&self) -> bool {
        matches!(self, PartitionType::Extended(_))
    }

    /// The human-readable label printed for this type.
    pub fn label(&self) -> &'static str {
        type_label(self.to_mbr_tag_byte())
    }
}

/// Maps a partition type byte to its descriptive label.
///
/// Only a short list of common tags is named. Everything else, including
/// the LBA extended tag `0x0f`, is `"Unknown"`.
pub fn type_label(tag: u8) -> &'static str {
    match tag {
        0x0b => "W95 FAT32",
        0x0c => "W95 FAT32 (LBA)",
        0x83 => "Linux",
        0x05 => "Extended",
        0x07 => "HPFS/NTFS/exFAT",
        0x82 => "Linux swap / Solaris",
        0xef => "EFI System",
        0xa0 => "BIOS boot",
        _ => "Unknown",
    }
}

/// An entry in a partition table, as laid out on disk.
///
/// The CHS fields are kept verbatim but never interpreted; the LBA fields
/// are authoritative.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct PartitionTableEntry {
    pub boot_indicator: u8,
    pub start_head: u8,
    pub start_sector: u8,
    pub start_cylinder: u8,

    /// The raw type tag. `0` marks an unused slot.
    pub partition_type: u8,
    pub end_head: u8,
    pub end_sector: u8,
    pub end_cylinder: u8,

    /// The absolute index of the first block of this entry.
    pub start_sector_abs: u32,

    /// The total number of blocks in this entry.
    pub total_sectors: u32,
}

impl PartitionTableEntry {
    /// Decodes the first 16 bytes of `buffer`.
    pub fn from_bytes(buffer: &[u8]) -> Result<PartitionTableEntry, MbrError> {
        let bytes: &[u8; ENTRY_SIZE] = buffer
            .get(..ENTRY_SIZE)
            .and_then(|raw| raw.try_into().ok())
            .ok_or(ErrorCause::TruncatedInput {
                expected: ENTRY_SIZE,
                actual: buffer.len(),
            })?;
        Ok(decode_entry(bytes))
    }

    pub fn empty() -> PartitionTableEntry {
        PartitionTableEntry {
            boot_indicator: 0,
            start_head: 0,
            start_sector: 0,
            start_cylinder: 0,
            partition_type: 0,
            end_head: 0,
            end_sector: 0,
            end_cylinder: 0,
            start_sector_abs: 0,
            total_sectors: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.partition_type == 0
    }

    pub fn is_bootable(&self) -> bool {
        self.boot_indicator == BOOTABLE_INDICATOR
    }

    pub fn is_extended(&self) -> bool {
        self.kind().is_extended()
    }

    pub fn kind(&self) -> PartitionType {
        PartitionType::from_mbr_tag_byte(self.partition_type)
    }

    /// The last sector covered by this entry, or `None` for a zero-length entry.
    pub fn end_lba(&self) -> Option<u64> {
        match self.total_sectors {
            0 => None,
            n => Some(u64::from(self.start_sector_abs) + u64::from(n) - 1),
        }
    }
}

/// Decodes one 16-byte partition table entry.
pub fn decode_entry(bytes: &[u8; ENTRY_SIZE]) -> PartitionTableEntry {
    PartitionTableEntry {
        boot_indicator: bytes[0],
        start_head: bytes[1],
        start_sector: bytes[2],
        start_cylinder: bytes[3],
        partition_type: bytes[4],
        end_head: bytes[5],
        end_sector: bytes[6],
        end_cylinder: bytes[7],
        start_sector_abs: LittleEndian::read_u32(&bytes[8..12]),
        total_sectors: LittleEndian::read_u32(&bytes[12..16]),
    }
}
