use std::io::{Read, Seek};

use crate::{walk_extended, DiskLabel, MbrError, ReportedPartition};

/// Every partition found on a device, in slot order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PartitionTable {
    /// Primary partitions first, then logical partitions chain by chain.
    pub partitions: Vec<ReportedPartition>,

    /// Errors that cut an extended chain short. Partitions found before the
    /// error are still listed.
    pub chain_errors: Vec<MbrError>,
}

impl PartitionTable {
    pub fn is_complete(&self) -> bool {
        self.chain_errors.is_empty()
    }
}

/// Reads the partition layout of `source`, naming slots `device_name1`,
/// `device_name2`, ...
///
/// Primary entries are numbered first in slot order, skipping empty slots.
/// Logical partitions follow, numbered on from the last primary, for each
/// extended entry in slot order. A missing or bad boot sector fails the
/// whole call; a broken extended chain only ends that chain.
pub fn assemble<S: Read + Seek>(source: &mut S, device_name: &str) -> Result<PartitionTable, MbrError> {
    let label = DiskLabel::read_from(source)?;
    let mut table = PartitionTable::default();
    let mut next_index = 1;

    for entry in label.entries.iter().filter(|entry| !entry.is_empty()) {
        let name = format!("{}{}", device_name, next_index);
        next_index += 1;
        table
            .partitions
            .push(ReportedPartition::new(name, entry, entry.is_bootable()));
    }
    log::debug!("{} primary partition(s) on {}", table.partitions.len(), device_name);

    for entry in label.entries.iter().filter(|entry| entry.is_extended()) {
        log::debug!("walking extended partition at sector {}", entry.start_sector_abs);
        if let Err(err) = walk_extended(
            source,
            entry.start_sector_abs,
            device_name,
            &mut next_index,
            &mut table.partitions,
        ) {
            log::warn!(
                "extended partition at sector {} cut short: {}",
                entry.start_sector_abs,
                err
            );
            table.chain_errors.push(err);
        }
    }

    Ok(table)
}
