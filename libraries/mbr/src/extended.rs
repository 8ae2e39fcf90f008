use std::collections::BTreeSet;
use std::io::{Read, Seek};

use crate::{
    read_sector, ErrorCause, MbrError, PartitionTableEntry, ReportedPartition,
    EBR_ENTRIES, ENTRY_SIZE,
};

/// The most extended boot records a single chain may link together.
pub const MAX_CHAIN_LENGTH: usize = 4096;

/// One extended boot record: a logical partition and the link to the next record.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Ebr {
    /// The absolute sector this record was read from.
    pub sector: u32,
    pub logical: PartitionTableEntry,
    pub link: PartitionTableEntry,
}

impl Ebr {
    /// The absolute sector of the next record, if this one links onward.
    pub fn next_sector(&self) -> Option<u32> {
        if self.link.is_extended() && self.link.start_sector_abs != 0 {
            Some(self.link.start_sector_abs)
        } else {
            None
        }
    }
}

/// Iterates over the extended boot records of one extended partition.
///
/// Every link is an absolute sector on the source. The iterator stops after
/// the first error; records yielded before it remain valid.
pub struct ExtendedChain<'a, S> {
    source: &'a mut S,
    cursor: u32,
    visited: Option<BTreeSet<u32>>,
    failed: bool,
}

impl<'a, S: Read + Seek> ExtendedChain<'a, S> {
    /// Starts a chain at `start_sector`, refusing to visit any sector twice.
    pub fn new(source: &'a mut S, start_sector: u32) -> ExtendedChain<'a, S> {
        ExtendedChain {
            source,
            cursor: start_sector,
            visited: Some(BTreeSet::new()),
            failed: false,
        }
    }

    /// Starts a chain that follows links blindly. A looping chain never ends,
    /// so callers must bound it themselves.
    pub fn unchecked(source: &'a mut S, start_sector: u32) -> ExtendedChain<'a, S> {
        ExtendedChain {
            source,
            cursor: start_sector,
            visited: None,
            failed: false,
        }
    }

    fn check_visit(&mut self) -> Result<(), MbrError> {
        let Some(visited) = self.visited.as_mut() else {
            return Ok(());
        };
        if visited.len() >= MAX_CHAIN_LENGTH {
            return Err(MbrError::from_cause(ErrorCause::ChainTooLong {
                limit: MAX_CHAIN_LENGTH,
            }));
        }
        if !visited.insert(self.cursor) {
            return Err(MbrError::from_cause(ErrorCause::CycleDetected {
                sector: self.cursor,
            }));
        }
        Ok(())
    }

    fn read_current(&mut self) -> Result<Ebr, MbrError> {
        self.check_visit()?;
        let mut raw = [0u8; ENTRY_SIZE * EBR_ENTRIES];
        read_sector(&mut *self.source, self.cursor, &mut raw)?;
        Ok(Ebr {
            sector: self.cursor,
            logical: PartitionTableEntry::from_bytes(&raw[..ENTRY_SIZE])?,
            link: PartitionTableEntry::from_bytes(&raw[ENTRY_SIZE..])?,
        })
    }
}

impl<'a, S: Read + Seek> Iterator for ExtendedChain<'a, S> {
    type Item = Result<Ebr, MbrError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor == 0 {
            return None;
        }
        match self.read_current() {
            Ok(ebr) => {
                log::trace!(
                    "EBR at sector {}: logical type {:#04x}, link type {:#04x} -> {}",
                    ebr.sector,
                    ebr.logical.partition_type,
                    ebr.link.partition_type,
                    ebr.link.start_sector_abs
                );
                self.cursor = ebr.next_sector().unwrap_or(0);
                Some(Ok(ebr))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

/// Walks the chain rooted at `start_sector`, appending each logical
/// partition to `out` as `base_name` followed by `next_index`.
///
/// `next_index` is advanced once per reported partition and is left pointing
/// at the next free slot number. Logical partitions are never reported as
/// bootable. On error the walk stops, but whatever was appended stays.
pub fn walk_extended<S: Read + Seek>(
    source: &mut S,
    start_sector: u32,
    base_name: &str,
    next_index: &mut u32,
    out: &mut Vec<ReportedPartition>,
) -> Result<(), MbrError> {
    for ebr in ExtendedChain::new(source, start_sector) {
        let ebr = ebr?;
        if ebr.logical.is_empty() {
            continue;
        }
        let name = format!("{}{}", base_name, next_index);
        *next_index += 1;
        out.push(ReportedPartition::new(name, &ebr.logical, false));
    }
    Ok(())
}
