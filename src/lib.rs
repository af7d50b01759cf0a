#![no_std]

//! A codec for Intel Hex records and the micro:bit Universal Hex format.
//!
//! A Universal Hex packs several board-specific Intel Hex images into a
//! single file. Each image is wrapped in blocks tagged with a board ID, so the
//! bootloader of every board flashes its own image and skips the rest.
//!
//! Most users should begin with [`create_uhex`] and [`separate_uhex`] from the
//! [`uhex`] module. The record-level building blocks they are made of live in
//! the [`ihex`] module, for applications that need to inspect or produce
//! individual records.
//!
//! All functions work on in-memory strings. Reading and writing files is left
//! to the caller.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `std`: implement errors and logging against the standard library
//! (default).

extern crate alloc;

pub mod error;
pub mod ihex;
pub mod uhex;

pub use error::{Error, FormatError, RangeError, StateError};
pub use ihex::{
    Record, RecordType,
    bytes::{byte_to_hex, bytes_to_hex, concat_bytes, hex_to_bytes},
    record::{
        block_end_record, block_start_record, convert_ext_seg_to_lin_address, convert_record_to,
        create_record, eof_record, ext_lin_address_record, get_record_data, get_record_type,
        padded_data_record, parse_record,
    },
    stream::{find_data_field_length, split_into_records},
};
pub use uhex::{
    BOARD_ID_V1, BOARD_ID_V2, IndividualHex, Layout, combine::create_uhex, is_uhex,
    makecode::is_makecode_v1, separate::separate_uhex,
};
