//! Conversions between hex strings and bytes.

use alloc::{string::String, vec::Vec};

use hex::FromHexError;

use crate::error::FormatError;

const DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Decode a string of hex digit pairs into bytes.
///
/// Both upper and lower case digits are accepted. Non-hex characters are
/// reported ahead of an odd length.
pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>, FormatError> {
    if !s.bytes().all(|c| c.is_ascii_hexdigit()) {
        Err(FormatError::NonHex)?;
    }

    hex::decode(s).map_err(|e| match e {
        FromHexError::OddLength | FromHexError::InvalidStringLength => {
            FormatError::OddLength(s.len())
        }
        FromHexError::InvalidHexCharacter { .. } => FormatError::NonHex,
    })
}

/// Render a byte as two uppercase hex digits, after a prefix (such as `0x`).
pub fn byte_to_hex(value: u8, prefix: &str) -> String {
    let mut s = String::with_capacity(prefix.len() + 2);
    s.push_str(prefix);
    s.push(DIGITS[(value >> 4) as usize] as char);
    s.push(DIGITS[(value & 0xF) as usize] as char);
    s
}

/// Render bytes as a string of uppercase hex digits.
pub fn bytes_to_hex(data: &[u8]) -> String {
    hex::encode_upper(data)
}

/// Concatenate byte slices, preserving their order.
pub fn concat_bytes(parts: &[&[u8]]) -> Vec<u8> {
    parts.concat()
}
