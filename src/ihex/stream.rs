//! Splitting of whole documents into record lines.

use alloc::vec::Vec;

use crate::error::RangeError;

use super::record::{MAX_RECORD_DATA_BYTES, MIN_RECORD_STR_LEN, RecordType, get_record_type};

/// Iterate over the record lines of a document.
///
/// Lines may end in `\n`, `\r\n` or `\r`, mixed freely. Empty lines are
/// skipped.
pub fn records(hex: &str) -> impl Iterator<Item = &str> {
    hex.split(['\r', '\n']).filter(|line| !line.is_empty())
}

/// Split a document into its record lines.
///
/// See [`records`] for the accepted line endings.
pub fn split_into_records(hex: &str) -> Vec<&str> {
    records(hex).collect()
}

/// Find the data field width used by a document, either 16 or 32 bytes.
pub fn find_data_field_length(hex: &str) -> Result<usize, RangeError> {
    let longest = records(hex)
        .filter(|record| {
            matches!(
                get_record_type(record),
                Ok(RecordType::Data
                    | RecordType::PaddedData
                    | RecordType::CustomData
                    | RecordType::OtherData)
            )
        })
        .map(|record| record.len().saturating_sub(MIN_RECORD_STR_LEN) / 2)
        .max()
        .unwrap_or(0);

    if longest > MAX_RECORD_DATA_BYTES {
        Err(RangeError::DataFieldLength(longest))?;
    }

    Ok(if longest > 16 { MAX_RECORD_DATA_BYTES } else { 16 })
}
