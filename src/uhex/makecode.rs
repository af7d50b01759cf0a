//! Detection of hex files produced by MakeCode for the micro:bit V1.
//!
//! These files carry the project source next to the program, either written
//! to RAM before the End Of File record or appended after it. Neither
//! survives combination: everything following the End Of File record would
//! be lost, and RAM writes would reach bootloaders that cannot handle them.

use core::ops::Range;

use crate::ihex::{
    Record, RecordType,
    record::{get_record_type, parse_record},
    stream::split_into_records,
};

/// RAM address space of the supported microcontrollers.
const RAM: Range<u32> = 0x2000_0000..0x4000_0000;

/// Whether a document looks like a MakeCode V1 hex file.
pub fn is_makecode_v1(hex: &str) -> bool {
    is_makecode_v1_records(&split_into_records(hex))
}

/// Whether a sequence of record lines looks like a MakeCode V1 hex file.
///
/// This is the case if any record follows the End Of File record, or if a
/// Data record before it targets RAM. Documents without an End Of File record
/// never match.
pub fn is_makecode_v1_records(records: &[&str]) -> bool {
    let Some(eof) = records.iter().position(|r| is_end_of_file(r)) else {
        return false;
    };

    eof + 1 < records.len() || writes_ram(&records[..eof])
}

/// Whether records found after an End Of File record hold MakeCode project
/// metadata, rather than being misplaced program data.
pub(crate) fn has_trailing_metadata(records: &[&str]) -> bool {
    records
        .iter()
        .filter_map(|record| parse_record(record).ok())
        .any(|record| match record.record_type {
            RecordType::OtherData => true,
            RecordType::ExtendedLinearAddress => base_address(&record).is_some_and(|a| RAM.contains(&a)),
            _ => false,
        })
}

pub(crate) fn is_end_of_file(record: &str) -> bool {
    get_record_type(record) == Ok(RecordType::EndOfFile)
}

fn writes_ram(records: &[&str]) -> bool {
    let mut base = 0;

    for record in records.iter().filter_map(|record| parse_record(record).ok()) {
        if let Some(address) = base_address(&record) {
            base = address;
        } else if record.record_type == RecordType::Data
            && RAM.contains(&base.wrapping_add(u32::from(record.address)))
        {
            return true;
        }
    }

    false
}

/// Base address set by an extended address record.
fn base_address(record: &Record) -> Option<u32> {
    match (record.record_type, record.data.as_slice()) {
        (RecordType::ExtendedLinearAddress, &[high, low]) => {
            Some(u32::from_be_bytes([high, low, 0, 0]))
        }
        (RecordType::ExtendedSegmentAddress, &[high, low]) => {
            Some(u32::from(u16::from_be_bytes([high, low])) << 4)
        }
        _ => None,
    }
}
