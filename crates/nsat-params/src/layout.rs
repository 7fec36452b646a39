//! Fixed binary layout of the records handed to the engine
//!
//! The engine reads each record as a plain C struct: 4-byte floats and ints,
//! 1-byte bools, fields in declaration order, total size rounded up to the
//! 4-byte alignment of the widest member. Padding bytes are zero.
//!
//! | record   | payload | size |
//! |----------|---------|------|
//! | NSAT     | 73      | 76   |
//! | SPKG     | 10      | 12   |
//! | Blankout | 8       | 8    |

use nsat_storage::{
    schemas::{padding_for, word_at},
    ByteOrder, StorageError, WORD_SIZE,
};

use crate::error::Result;

/// Alignment of every record
pub const RECORD_ALIGN: usize = WORD_SIZE;

/// Size of a record with `words` 4-byte fields followed by `flags` bools
pub const fn record_size(words: usize, flags: usize) -> usize {
    let payload = words * WORD_SIZE + flags;
    payload + padding_for(payload, RECORD_ALIGN)
}

/// Sequential field writer over a zeroed record buffer
pub struct FieldWriter<'a> {
    buf: &'a mut [u8],
    offset: usize,
    order: ByteOrder,
}

impl<'a> FieldWriter<'a> {
    /// Start writing at offset zero; the whole buffer is zeroed first
    pub fn new(buf: &'a mut [u8], order: ByteOrder) -> Self {
        buf.fill(0);
        Self {
            buf,
            offset: 0,
            order,
        }
    }

    /// Append a 4-byte float
    pub fn f32(&mut self, value: f32) -> &mut Self {
        let bytes = self.order.f32_bytes(value);
        self.put(&bytes)
    }

    /// Append a 4-byte signed int
    pub fn i32(&mut self, value: i32) -> &mut Self {
        let bytes = self.order.i32_bytes(value);
        self.put(&bytes)
    }

    /// Append a 1-byte bool
    pub fn flag(&mut self, value: bool) -> &mut Self {
        self.put(&[value as u8])
    }

    /// Bytes written so far
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn put(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf[self.offset..self.offset + bytes.len()].copy_from_slice(bytes);
        self.offset += bytes.len();
        self
    }
}

/// Sequential field reader over an encoded record
pub struct FieldReader<'a> {
    data: &'a [u8],
    offset: usize,
    order: ByteOrder,
}

impl<'a> FieldReader<'a> {
    /// Check the buffer is exactly `size` bytes and start reading it
    pub fn new(data: &'a [u8], size: usize, record: &str, order: ByteOrder) -> Result<Self> {
        if data.len() != size {
            return Err(StorageError::invalid_format(format!(
                "{} record must be {} bytes, got {}",
                record,
                size,
                data.len()
            ))
            .into());
        }
        Ok(Self {
            data,
            offset: 0,
            order,
        })
    }

    /// Next 4-byte float
    pub fn f32(&mut self) -> Result<f32> {
        let word = word_at(self.data, self.offset)?;
        self.offset += WORD_SIZE;
        Ok(self.order.read_f32(word))
    }

    /// Next 4-byte signed int
    pub fn i32(&mut self) -> Result<i32> {
        let word = word_at(self.data, self.offset)?;
        self.offset += WORD_SIZE;
        Ok(self.order.read_i32(word))
    }

    /// Next 1-byte bool; any non-zero byte is true
    pub fn flag(&mut self) -> Result<bool> {
        let byte = *self.data.get(self.offset).ok_or_else(|| {
            StorageError::invalid_format(format!("no flag byte at offset {}", self.offset))
        })?;
        self.offset += 1;
        Ok(byte != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_sizes() {
        assert_eq!(record_size(18, 1), 76);
        assert_eq!(record_size(2, 2), 12);
        assert_eq!(record_size(2, 0), 8);
    }

    #[test]
    fn test_writer_reader() {
        let mut buf = [0xAAu8; 12];
        let mut w = FieldWriter::new(&mut buf, ByteOrder::Little);
        w.f32(1.5).i32(-3).flag(true);
        assert_eq!(w.offset(), 9);
        // Padding is zeroed.
        assert_eq!(&buf[9..], &[0, 0, 0]);

        let mut r = FieldReader::new(&buf, 12, "test", ByteOrder::Little).unwrap();
        assert_eq!(r.f32().unwrap(), 1.5);
        assert_eq!(r.i32().unwrap(), -3);
        assert!(r.flag().unwrap());
        assert!(!r.flag().unwrap());
    }

    #[test]
    fn test_reader_rejects_wrong_size() {
        let buf = [0u8; 11];
        assert!(FieldReader::new(&buf, 12, "spkg", ByteOrder::Little).is_err());
    }
}
