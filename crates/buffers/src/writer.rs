//! Growable big-endian byte writer.
//!
//! Mirrors [`Reader`](crate::Reader) so that fixtures for the decoders can be
//! assembled value by value. Nothing in the decoders writes files, so the
//! writer is only used from tests.

/// Appends big-endian values to an owned buffer.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    pub uint8: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes written so far, i.e. the offset of the next write.
    pub fn len(&self) -> usize {
        self.uint8.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uint8.is_empty()
    }

    /// Returns the written bytes and leaves the writer empty.
    pub fn flush(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.uint8)
    }

    pub fn buf(&mut self, data: &[u8]) {
        self.uint8.extend_from_slice(data);
    }

    pub fn u8(&mut self, value: u8) {
        self.uint8.push(value);
    }

    pub fn bool(&mut self, value: bool) {
        self.u8(value as u8);
    }

    pub fn u16(&mut self, value: u16) {
        self.buf(&value.to_be_bytes());
    }

    pub fn i32(&mut self, value: i32) {
        self.buf(&value.to_be_bytes());
    }

    pub fn u32(&mut self, value: u32) {
        self.buf(&value.to_be_bytes());
    }

    pub fn f64(&mut self, value: f64) {
        self.buf(&value.to_be_bytes());
    }

    /// Writes a string with its 2-byte length prefix.
    ///
    /// # Panics
    ///
    /// Panics if the UTF-8 encoding is longer than `u16::MAX` bytes.
    pub fn utf(&mut self, value: &str) {
        let len = u16::try_from(value.len()).expect("string longer than 65535 bytes");
        self.u16(len);
        self.buf(value.as_bytes());
    }

    /// Writes a little-endian base-128 variable-length integer.
    pub fn var_int(&mut self, value: i32) {
        let mut rest = value as u32;
        loop {
            let byte = (rest & 0x7f) as u8;
            rest >>= 7;
            if rest == 0 {
                self.u8(byte);
                return;
            }
            self.u8(byte | 0x80);
        }
    }

    /// Overwrites four bytes at `offset` with `value`, used to back-fill
    /// pointers once the pointed-to block has been written.
    pub fn patch_i32(&mut self, offset: usize, value: i32) {
        self.uint8[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
    }
}
