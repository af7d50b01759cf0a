//! Parsing and construction of single records.

use core::fmt;

use alloc::{
    string::{String, ToString},
    vec::Vec,
};

use zerocopy::{FromBytes, Immutable, IntoBytes, TryFromBytes};

use crate::error::{FormatError, RangeError};

use super::{
    bytes::{bytes_to_hex, concat_bytes, hex_to_bytes},
    check::{checksum, compute_sum},
};

/// Largest data field supported, in bytes.
pub const MAX_RECORD_DATA_BYTES: usize = 32;
/// Length of a record line with an empty data field, excluding line endings.
pub const MIN_RECORD_STR_LEN: usize = 11;
/// Length of a record line with a full data field, excluding line endings.
pub const MAX_RECORD_STR_LEN: usize = MIN_RECORD_STR_LEN + 2 * MAX_RECORD_DATA_BYTES;

/// The End Of File record line.
pub const EOF_RECORD: &str = ":00000001FF";

/// Value following the board ID in a Block Start record.
pub const BLOCK_START_MAGIC: [u8; 2] = [0xC0, 0xDE];

const PADDING: [u8; MAX_RECORD_DATA_BYTES] = [0xFF; MAX_RECORD_DATA_BYTES];

/// Intel Hex record types, including the Universal Hex extensions.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromBytes)]
pub enum RecordType {
    Data = 0x00,
    EndOfFile = 0x01,
    ExtendedSegmentAddress = 0x02,
    StartSegmentAddress = 0x03,
    ExtendedLinearAddress = 0x04,
    StartLinearAddress = 0x05,
    /// Opens a block of records owned by one board.
    BlockStart = 0x0A,
    /// Closes a block, padding it with its data field.
    BlockEnd = 0x0B,
    /// Filler aligning a block, ignored by every board.
    PaddedData = 0x0C,
    /// Data record for a board that does not understand standard Data
    /// records inside a Universal Hex.
    CustomData = 0x0D,
    /// Data not meant to be flashed (such as project metadata).
    OtherData = 0x0E,
}

impl TryFrom<u8> for RecordType {
    type Error = FormatError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let record_type: Result<RecordType, _> = zerocopy::try_transmute!(value);
        record_type.map_err(|_| FormatError::UnknownRecordType(value))
    }
}

/// A decoded record.
///
/// Records built with [`Record::new`] always hold a correct byte count and
/// checksum. Parsed records hold the values found in the text, see
/// [`Record::is_checksum_valid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub byte_count: u8,
    pub address: u16,
    pub record_type: RecordType,
    pub data: Vec<u8>,
    pub checksum: u8,
}

#[repr(C, packed)]
#[derive(FromBytes)]
struct RecordHeader {
    byte_count: u8,
    address: [u8; 2],
    record_type: u8,
}

#[repr(C, packed)]
#[derive(FromBytes, IntoBytes, Immutable)]
struct BlockStartData {
    board_id: [u8; 2],
    magic: [u8; 2],
}

impl Record {
    /// Build a record, computing its byte count and checksum.
    pub fn new(record_type: RecordType, address: u16, data: &[u8]) -> Result<Self, RangeError> {
        if data.len() > MAX_RECORD_DATA_BYTES {
            Err(RangeError::DataLength(data.len()))?;
        }

        Ok(Self::assemble(record_type, address, data))
    }

    /// Build a record from a data field known to fit.
    fn assemble(record_type: RecordType, address: u16, data: &[u8]) -> Self {
        let mut record = Self {
            byte_count: data.len() as u8,
            address,
            record_type,
            data: data.to_vec(),
            checksum: 0,
        };
        record.checksum = record.calculate_checksum();
        record
    }

    /// Compute the checksum matching the other fields of this record.
    pub fn calculate_checksum(&self) -> u8 {
        checksum(compute_sum(compute_sum(0, &self.header()), &self.data))
    }

    /// Whether the stored checksum matches the other fields of this record.
    pub fn is_checksum_valid(&self) -> bool {
        self.checksum == self.calculate_checksum()
    }

    /// Replace the record type, recomputing the checksum.
    pub fn retyped(self, record_type: RecordType) -> Self {
        let mut record = Self {
            record_type,
            ..self
        };
        record.checksum = record.calculate_checksum();
        record
    }

    /// Board ID of a well-formed Block Start record.
    ///
    /// Returns `None` for other record types, and for Block Start records with
    /// a wrong data length, magic value or checksum.
    pub fn board_id(&self) -> Option<u16> {
        if self.record_type != RecordType::BlockStart || !self.is_checksum_valid() {
            return None;
        }

        let data: [u8; 4] = self.data.as_slice().try_into().ok()?;
        let BlockStartData { board_id, magic } = zerocopy::transmute!(data);

        (magic == BLOCK_START_MAGIC).then_some(u16::from_be_bytes(board_id))
    }

    fn header(&self) -> [u8; 4] {
        let [high, low] = self.address.to_be_bytes();
        [self.byte_count, high, low, self.record_type as u8]
    }
}

impl fmt::Display for Record {
    /// Format the record as a line, without a line ending.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = concat_bytes(&[&self.header(), &self.data, &[self.checksum]]);
        write!(f, ":{}", bytes_to_hex(&bytes))
    }
}

/// Create a record line from its fields.
pub fn create_record(
    record_type: RecordType,
    address: u32,
    data: &[u8],
) -> Result<String, RangeError> {
    let address = u16::try_from(address).map_err(|_| RangeError::Address(address))?;
    Ok(Record::new(record_type, address, data)?.to_string())
}

/// Read the record type of a record line.
///
/// Only the type field is examined, so the rest of the line may be truncated
/// or carry a line ending.
pub fn get_record_type(record: &str) -> Result<RecordType, FormatError> {
    let digits = record
        .get(7..9)
        .ok_or(FormatError::TooShort(record.len()))?;

    RecordType::try_from(hex_to_bytes(digits)?[0])
}

/// Read the data field of a record line.
///
/// The data field runs from the end of the type field up to the checksum.
/// Lines too short to hold a data field return no bytes.
pub fn get_record_data(record: &str) -> Result<Vec<u8>, FormatError> {
    let record = record.trim_end_matches(['\r', '\n']);

    match record.get(9..record.len().saturating_sub(2)) {
        Some(data) => hex_to_bytes(data),
        None => Ok(Vec::new()),
    }
}

/// Decode a record line.
///
/// The shape of the record is validated, but the checksum is not. See
/// [`Record::is_checksum_valid`].
pub fn parse_record(record: &str) -> Result<Record, FormatError> {
    let record = record.trim_end_matches(['\r', '\n']);
    let body = record.strip_prefix(':').ok_or(FormatError::MissingColon)?;

    if record.len() < MIN_RECORD_STR_LEN {
        Err(FormatError::TooShort(record.len()))?;
    }
    if record.len() > MAX_RECORD_STR_LEN {
        Err(FormatError::TooLong(record.len()))?;
    }

    let bytes = hex_to_bytes(body)?;

    let (header, rest) = bytes
        .split_first_chunk::<4>()
        .ok_or(FormatError::TooShort(record.len()))?;
    let (checksum, data) = rest
        .split_last()
        .ok_or(FormatError::TooShort(record.len()))?;

    let RecordHeader {
        byte_count,
        address,
        record_type,
    } = zerocopy::transmute!(*header);

    if byte_count as usize != data.len() {
        Err(FormatError::ByteCount {
            declared: byte_count,
            found: data.len(),
        })?;
    }

    Ok(Record {
        byte_count,
        address: u16::from_be_bytes(address),
        record_type: RecordType::try_from(record_type)?,
        data: data.to_vec(),
        checksum: *checksum,
    })
}

/// The End Of File record line.
pub fn eof_record() -> &'static str {
    EOF_RECORD
}

/// Create an Extended Linear Address record line for the upper 16 bits of an
/// address.
pub fn ext_lin_address_record(address: u64) -> Result<String, RangeError> {
    let address = u32::try_from(address).map_err(|_| RangeError::ExtendedAddress(address))?;
    let upper = (address >> 16) as u16;

    Ok(Record::assemble(RecordType::ExtendedLinearAddress, 0, &upper.to_be_bytes()).to_string())
}

/// Create a Block Start record line for a board.
pub fn block_start_record(board_id: u16) -> String {
    let data = BlockStartData {
        board_id: board_id.to_be_bytes(),
        magic: BLOCK_START_MAGIC,
    };

    Record::assemble(RecordType::BlockStart, 0, data.as_bytes()).to_string()
}

/// Create a Block End record line carrying `padding` bytes of `0xFF`.
pub fn block_end_record(padding: usize) -> Result<String, RangeError> {
    padding_record(RecordType::BlockEnd, padding)
}

/// Create a Padded Data record line carrying `padding` bytes of `0xFF`.
pub fn padded_data_record(padding: usize) -> Result<String, RangeError> {
    padding_record(RecordType::PaddedData, padding)
}

fn padding_record(record_type: RecordType, padding: usize) -> Result<String, RangeError> {
    let data = PADDING.get(..padding).ok_or(RangeError::Padding(padding))?;
    Ok(Record::assemble(record_type, 0, data).to_string())
}

/// Change the type of a record line, recomputing its checksum.
pub fn convert_record_to(record: &str, record_type: RecordType) -> Result<String, FormatError> {
    Ok(parse_record(record)?.retyped(record_type).to_string())
}

/// Rewrite an Extended Segment Address record line as the equivalent
/// Extended Linear Address record line.
///
/// Only segments starting on a 64 KiB boundary can be expressed this way.
pub fn convert_ext_seg_to_lin_address(record: &str) -> Result<String, FormatError> {
    let record =
        parse_record(record).map_err(|_| FormatError::InvalidExtendedSegmentAddress)?;

    let segment = match (record.record_type, record.address, record.data.as_slice()) {
        (RecordType::ExtendedSegmentAddress, 0, &[high, low]) => u16::from_be_bytes([high, low]),
        _ => Err(FormatError::InvalidExtendedSegmentAddress)?,
    };

    if segment & 0x0FFF != 0 {
        Err(FormatError::InvalidExtendedSegmentAddress)?;
    }

    ext_lin_address_record(u64::from(segment) << 4)
        .map_err(|_| FormatError::InvalidExtendedSegmentAddress)
}
