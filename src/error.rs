//! Errors produced while handling records and hex documents.

use alloc::string::String;

use thiserror::Error;

/// A malformed record or hex string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Record line lacks its start code.
    #[error("Record does not start with a \":\".")]
    MissingColon,
    /// Hex string with an odd number of digits.
    #[error("Hex string length ({0}) is not divisible by 2.")]
    OddLength(usize),
    /// Hex string containing characters other than hex digits.
    #[error("Could not parse hex string, it contains non-hex characters.")]
    NonHex,
    /// Record line shorter than the smallest possible record.
    #[error("Record length too small ({0}).")]
    TooShort(usize),
    /// Record line longer than a record with a full data field.
    #[error("Record length is too large ({0}).")]
    TooLong(usize),
    /// Declared byte count and data field length disagree.
    #[error("Record byte count ({declared}) does not match its data length ({found}).")]
    ByteCount { declared: u8, found: usize },
    /// Unknown record type code.
    #[error("Record type 0x{0:02X} is not valid.")]
    UnknownRecordType(u8),
    /// Record cannot be expressed as an Extended Linear Address.
    #[error("Invalid Extended Segment Address record.")]
    InvalidExtendedSegmentAddress,
}

/// A numeric field outside its allowed bounds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    /// Record address does not fit in 16 bits.
    #[error("Record address out of range (0x{0:X}).")]
    Address(u32),
    /// Record data longer than a data field can hold.
    #[error("Record data has too many bytes ({0}).")]
    DataLength(usize),
    /// Extended address does not fit in 32 bits.
    #[error("Address record is out of range (0x{0:X}).")]
    ExtendedAddress(u64),
    /// Padding longer than a data field can hold.
    #[error("Padding record has too many bytes ({0}).")]
    Padding(usize),
    /// Document using a data field wider than supported.
    #[error("Intel Hex record data size is too large ({0}).")]
    DataFieldLength(usize),
}

/// Well-formed records making up an unusable document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// Input to the combiner is itself a Universal Hex.
    #[error("Board ID 0x{0:04X} Hex is already a Universal Hex.")]
    AlreadyUniversal(u16),
    /// Input to the combiner carries MakeCode V1 metadata.
    #[error(
        "Board ID 0x{0:04X} Hex is from MakeCode, import this hex into the MakeCode editor to create a Universal Hex."
    )]
    MakeCode(u16),
    /// End of File record followed by more records.
    #[error("EoF record found at record {position} of {count} in Board ID 0x{board_id:04X} hex.")]
    EndOfFile {
        position: usize,
        count: usize,
        board_id: u16,
    },
    /// Document without any record.
    #[error("Empty Universal Hex.")]
    Empty,
    /// Document not opening with a Block Start record.
    #[error("Universal Hex block format invalid.")]
    FormatInvalid,
    /// Block Start record with a bad shape, magic value or checksum.
    #[error("Block Start record invalid: {0}")]
    BlockStart(String),
}

/// Any error produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A malformed record or hex string.
    #[error(transparent)]
    Format(#[from] FormatError),
    /// A numeric field outside its allowed bounds.
    #[error(transparent)]
    Range(#[from] RangeError),
    /// Well-formed records making up an unusable document.
    #[error(transparent)]
    State(#[from] StateError),
}
