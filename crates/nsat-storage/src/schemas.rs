//! Binary schema definitions and utilities
//!
//! Every binary artifact exchanged with the engine is built from 4-byte
//! words and single-byte flags. The word width is fixed; only the byte
//! order varies with the platform that produced the file.

use crate::error::{Result, StorageError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Width in bytes of every integer and float word
pub const WORD_SIZE: usize = 4;

/// Byte order of the words in a binary artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ByteOrder {
    /// Least significant byte first
    #[default]
    Little,
    /// Most significant byte first
    Big,
}

impl ByteOrder {
    /// Byte order of the machine running this code
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::Big
        } else {
            Self::Little
        }
    }

    /// Decode a signed 32-bit word
    pub fn read_i32(self, word: [u8; WORD_SIZE]) -> i32 {
        match self {
            Self::Little => i32::from_le_bytes(word),
            Self::Big => i32::from_be_bytes(word),
        }
    }

    /// Decode a 32-bit float word
    pub fn read_f32(self, word: [u8; WORD_SIZE]) -> f32 {
        match self {
            Self::Little => f32::from_le_bytes(word),
            Self::Big => f32::from_be_bytes(word),
        }
    }

    /// Encode a signed 32-bit word
    pub fn i32_bytes(self, value: i32) -> [u8; WORD_SIZE] {
        match self {
            Self::Little => value.to_le_bytes(),
            Self::Big => value.to_be_bytes(),
        }
    }

    /// Encode a 32-bit float word
    pub fn f32_bytes(self, value: f32) -> [u8; WORD_SIZE] {
        match self {
            Self::Little => value.to_le_bytes(),
            Self::Big => value.to_be_bytes(),
        }
    }
}

impl std::str::FromStr for ByteOrder {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "little" | "le" => Ok(Self::Little),
            "big" | "be" => Ok(Self::Big),
            "native" => Ok(Self::native()),
            other => Err(StorageError::invalid_format(format!(
                "unknown byte order '{}' (expected little, big or native)",
                other
            ))),
        }
    }
}

/// Copy the word starting at `offset` out of `data`
///
/// Callers check the overall buffer length up front; a short read here is
/// still reported rather than panicking.
pub fn word_at(data: &[u8], offset: usize) -> Result<[u8; WORD_SIZE]> {
    data.get(offset..offset + WORD_SIZE)
        .and_then(|s| <[u8; WORD_SIZE]>::try_from(s).ok())
        .ok_or_else(|| {
            StorageError::invalid_format(format!(
                "Data too short: need {} bytes at offset {}, got {}",
                WORD_SIZE,
                offset,
                data.len()
            ))
        })
}

/// Decode a packed sequence of 32-bit integers
pub fn read_i32_words(data: &[u8], order: ByteOrder) -> Result<Vec<i32>> {
    if data.len() % WORD_SIZE != 0 {
        return Err(StorageError::invalid_format(format!(
            "{} bytes is not a whole number of {}-byte words",
            data.len(),
            WORD_SIZE
        )));
    }

    Ok(data
        .chunks_exact(WORD_SIZE)
        .map(|c| order.read_i32([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Number of bytes needed to pad `len` up to a multiple of `align`
pub const fn padding_for(len: usize, align: usize) -> usize {
    (align - len % align) % align
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_order_words() {
        let le = ByteOrder::Little.i32_bytes(0x0102_0304);
        assert_eq!(le, [4, 3, 2, 1]);
        let be = ByteOrder::Big.i32_bytes(0x0102_0304);
        assert_eq!(be, [1, 2, 3, 4]);

        assert_eq!(ByteOrder::Little.read_i32(le), 0x0102_0304);
        assert_eq!(ByteOrder::Big.read_i32(be), 0x0102_0304);
        assert_eq!(ByteOrder::Big.read_f32(ByteOrder::Big.f32_bytes(-50.0)), -50.0);
    }

    #[test]
    fn test_byte_order_parse() {
        assert_eq!("little".parse::<ByteOrder>().unwrap(), ByteOrder::Little);
        assert_eq!("BE".parse::<ByteOrder>().unwrap(), ByteOrder::Big);
        assert_eq!("native".parse::<ByteOrder>().unwrap(), ByteOrder::native());
        assert!("middle".parse::<ByteOrder>().is_err());
        assert_eq!(ByteOrder::default(), ByteOrder::Little);
    }

    #[test]
    fn test_read_words() {
        let data = [1u8, 0, 0, 0, 0xff, 0xff, 0xff, 0xff];
        assert_eq!(read_i32_words(&data, ByteOrder::Little).unwrap(), vec![1, -1]);
        assert!(read_i32_words(&data[..7], ByteOrder::Little).is_err());
    }

    #[test]
    fn test_word_at() {
        let data = [0u8, 1, 2, 3, 4, 5];
        assert_eq!(word_at(&data, 2).unwrap(), [2, 3, 4, 5]);
        assert!(word_at(&data, 3).is_err());
    }

    #[test]
    fn test_padding() {
        assert_eq!(padding_for(73, 4), 3);
        assert_eq!(padding_for(10, 4), 2);
        assert_eq!(padding_for(8, 4), 0);
    }
}
