use std::io::{self, Write};

use mbr::ReportedPartition;

pub const HEADER: &str = "Device       Boot  Start      End    Sectors  Size  Type";

/// Formats one partition as a row under [`HEADER`].
pub fn format_row(partition: &ReportedPartition) -> String {
    let boot = if partition.bootable { "*" } else { " " };
    let end = match partition.end_lba {
        Some(end) => end.to_string(),
        None => "-".to_string(),
    };
    format!(
        "{:<10} {:>4} {:>7} {:>7} {:>7} {:>6} {:<18}",
        partition.name,
        boot,
        partition.start_lba,
        end,
        partition.sectors,
        partition.size,
        partition.type_label
    )
}

pub fn print_table<W: Write>(out: &mut W, partitions: &[ReportedPartition]) -> io::Result<()> {
    writeln!(out, "{}", HEADER)?;
    for partition in partitions {
        writeln!(out, "{}", format_row(partition))?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mbr::PartitionTableEntry;

    fn entry(boot: u8, tag: u8, start: u32, count: u32) -> PartitionTableEntry {
        let mut entry = PartitionTableEntry::empty();
        entry.boot_indicator = boot;
        entry.partition_type = tag;
        entry.start_sector_abs = start;
        entry.total_sectors = count;
        entry
    }

    #[test]
    fn row_columns() {
        let e = entry(0x80, 0x83, 2048, 204800);
        let row = format_row(&ReportedPartition::new("/dev/sda1".into(), &e, e.is_bootable()));
        assert_eq!(row, "/dev/sda1     *    2048  206847  204800 100.0M Linux             ");
    }

    #[test]
    fn zero_length_row_has_no_end() {
        let e = entry(0, 0x07, 100, 0);
        let row = format_row(&ReportedPartition::new("sda5".into(), &e, false));
        assert_eq!(row, "sda5                100       -       0   0.0M HPFS/NTFS/exFAT   ");
    }

    #[test]
    fn table_starts_with_header() {
        let e = entry(0, 0xef, 34, 2048 * 1024 * 2);
        let mut out = Vec::new();
        print_table(&mut out, &[ReportedPartition::new("nvme0n1p".into(), &e, false)]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(HEADER));
        assert!(lines.next().unwrap().contains("  2.0G EFI System"));
        assert_eq!(lines.next(), None);
    }
}
