//! Intel Hex records and the Universal Hex record extensions.
//!
//! An Intel Hex document is a sequence of ASCII lines ("records"), each of
//! the form:
//!
//! ```text
//! :LLAAAATTDD..DDCC
//! ```
//!
//! where `LL` is the number of data bytes, `AAAA` a 16-bit address, `TT` the
//! record type, `DD` the data bytes and `CC` the two's complement of the sum
//! of all preceding bytes. Addresses above 64 KiB are reached through
//! Extended Linear (or Segment) Address records, which set the upper bits for
//! the records that follow.
//!
//! Universal Hex adds five record types (`0x0A` to `0x0E`) used to delimit
//! and pad per-board blocks. See [`crate::uhex`] for the document-level
//! operations built on these records.
//!
//! The functions in this module operate on single lines, except those in
//! [`stream`], which operate on whole documents.

pub mod bytes;
pub mod check;
pub mod record;
pub mod stream;

pub use record::{Record, RecordType};
