//! Combination and separation of Universal Hex documents.
//!
//! A Universal Hex interleaves the records of several Intel Hex images, one
//! per target board. Records of each image are wrapped between a Block Start
//! record, which carries the board ID, and a Block End record. A bootloader
//! flashes the blocks tagged with its own board ID and skips the others.
//!
//! Two layouts exist:
//!
//! - Sections (recommended): each image forms one contiguous section, padded
//! to a multiple of 512 characters.
//! - Blocks: each image is cut into 512-character blocks, and the blocks of
//! all images are interleaved.
//!
//! Both are produced by [`create_uhex`](combine::create_uhex) and read back by
//! [`separate_uhex`](separate::separate_uhex).
//!
//! Boards of the first micro:bit generation do not recognise the Custom Data
//! record type, so their images keep standard Data records. Every other board
//! gets its Data records rewritten as Custom Data, which older bootloaders
//! skip.

use alloc::string::String;

use crate::ihex::stream::records;

pub mod combine;
pub mod makecode;
pub mod separate;

/// Board ID of the micro:bit V1.
pub const BOARD_ID_V1: u16 = 0x9900;
/// Board ID of the micro:bit V2.
pub const BOARD_ID_V2: u16 = 0x9903;

/// Board IDs whose bootloader flashes standard Data records.
pub const V1_BOARD_IDS: [u16; 2] = [0x9900, 0x9901];

/// Alignment of sections and blocks, in characters of hex text.
pub const BLOCK_SIZE: usize = 512;

/// An Intel Hex image for a single board.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndividualHex {
    /// Full text of the Intel Hex document.
    pub hex: String,
    pub board_id: u16,
}

impl IndividualHex {
    pub fn new(hex: impl Into<String>, board_id: u16) -> Self {
        Self {
            hex: hex.into(),
            board_id,
        }
    }
}

/// Arrangement of the images in a Universal Hex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Layout {
    /// One section per image, aligned to 512 characters.
    #[default]
    Sections,
    /// Round-robin 512-character blocks.
    Blocks,
}

/// Whether Data records of a board must be rewritten as Custom Data.
pub fn uses_custom_data(board_id: u16) -> bool {
    !V1_BOARD_IDS.contains(&board_id)
}

/// Whether a document is a Universal Hex.
///
/// Only the first two records are examined: an Extended Linear Address
/// record followed by a Block Start record.
pub fn is_uhex(hex: &str) -> bool {
    let mut records = records(hex);

    match (records.next(), records.next()) {
        (Some(first), Some(second)) => {
            first.starts_with(":02000004") && second.starts_with(":0400000A")
        }
        _ => false,
    }
}
