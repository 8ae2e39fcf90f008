use std::fmt;

use crate::{type_label, PartitionTableEntry, SECTOR_SIZE};

const MIB: f64 = 1024.0 * 1024.0;

/// A partition's size, in the largest binary unit that keeps it at least one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Size {
    Mebibytes(f64),
    Gibibytes(f64),
}

impl Size {
    pub fn from_sectors(sectors: u32) -> Size {
        let mebibytes = f64::from(sectors) * SECTOR_SIZE as f64 / MIB;
        let gibibytes = mebibytes / 1024.0;
        if gibibytes >= 1.0 {
            Size::Gibibytes(gibibytes)
        } else {
            Size::Mebibytes(mebibytes)
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match *self {
            Size::Mebibytes(value) => format!("{:.1}M", value),
            Size::Gibibytes(value) => format!("{:.1}G", value),
        };
        // pad as a whole so width applies to "100.0M", not the number
        f.pad(&text)
    }
}

/// A non-empty partition as it is listed to the user.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportedPartition {
    /// Device name with the slot number appended, e.g. `/dev/sda5`.
    pub name: String,
    pub bootable: bool,
    pub start_lba: u32,
    pub end_lba: Option<u64>,
    pub sectors: u32,
    pub size: Size,
    pub partition_type: u8,
    pub type_label: &'static str,
}

impl ReportedPartition {
    pub fn new(name: String, entry: &PartitionTableEntry, bootable: bool) -> ReportedPartition {
        ReportedPartition {
            name,
            bootable,
            start_lba: entry.start_sector_abs,
            end_lba: entry.end_lba(),
            sectors: entry.total_sectors,
            size: Size::from_sectors(entry.total_sectors),
            partition_type: entry.partition_type,
            type_label: type_label(entry.partition_type),
        }
    }
}
