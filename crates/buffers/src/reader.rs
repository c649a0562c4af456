//! Binary buffer reader with cursor tracking.

use crate::BufferError;

/// Maximum number of bytes a variable-length integer may span.
const VAR_INT_MAX_BYTES: usize = 5;

/// A binary buffer reader that reads big-endian data from a byte slice.
///
/// The reader maintains a cursor position that can be moved freely with
/// [`Reader::seek`]; every read is bounds-checked and reports the offset it
/// failed at.
///
/// # Example
///
/// ```
/// use dofus_buffers::Reader;
///
/// let data = [0x00, 0x00, 0x01, 0x02, 0x01];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.i32().unwrap(), 0x0102);
/// assert!(reader.bool().unwrap());
/// assert!(reader.u8().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader positioned at the start of `uint8`.
    pub fn new(uint8: &'a [u8]) -> Self {
        Self { uint8, x: 0 }
    }

    /// Returns the number of remaining bytes.
    pub fn size(&self) -> usize {
        self.uint8.len().saturating_sub(self.x)
    }

    /// Current cursor position.
    pub fn offset(&self) -> usize {
        self.x
    }

    /// Moves the cursor to an absolute position.
    ///
    /// Offsets come straight from signed 32-bit pointers stored in the file,
    /// so the argument is signed. Seeking to exactly the end of the buffer is
    /// allowed; any read from there fails.
    pub fn seek(&mut self, offset: i64) -> Result<(), BufferError> {
        if offset < 0 || offset as u64 > self.uint8.len() as u64 {
            return Err(BufferError::OutOfBounds {
                offset,
                len: self.uint8.len(),
            });
        }
        self.x = offset as usize;
        Ok(())
    }

    /// Returns the next `size` bytes and advances the cursor.
    pub fn buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        let remaining = self.size();
        if size > remaining {
            return Err(BufferError::EndOfBuffer {
                offset: self.x,
                wanted: size,
                remaining,
            });
        }
        let start = self.x;
        self.x += size;
        Ok(&self.uint8[start..self.x])
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.buf(N)?);
        Ok(out)
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        Ok(self.buf(1)?[0])
    }

    /// Reads a boolean. Only the byte `1` is `true`; every other value,
    /// including `2`, is `false`.
    #[inline]
    pub fn bool(&mut self) -> Result<bool, BufferError> {
        Ok(self.u8()? == 1)
    }

    /// Reads an unsigned 16-bit integer (big-endian).
    #[inline]
    pub fn u16(&mut self) -> Result<u16, BufferError> {
        self.array().map(u16::from_be_bytes)
    }

    /// Reads a signed 32-bit integer (big-endian).
    #[inline]
    pub fn i32(&mut self) -> Result<i32, BufferError> {
        self.array().map(i32::from_be_bytes)
    }

    /// Reads an unsigned 32-bit integer (big-endian).
    #[inline]
    pub fn u32(&mut self) -> Result<u32, BufferError> {
        self.array().map(u32::from_be_bytes)
    }

    /// Reads a 64-bit floating point number (big-endian).
    #[inline]
    pub fn f64(&mut self) -> Result<f64, BufferError> {
        self.array().map(f64::from_be_bytes)
    }

    /// Reads a UTF-8 string of the given size.
    ///
    /// Invalid sequences are replaced with U+FFFD rather than rejected.
    pub fn utf8(&mut self, size: usize) -> Result<String, BufferError> {
        let bytes = self.buf(size)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Reads a string prefixed with its 2-byte big-endian byte length.
    pub fn utf(&mut self) -> Result<String, BufferError> {
        let size = self.u16()? as usize;
        self.utf8(size)
    }

    /// Reads a little-endian base-128 variable-length integer.
    ///
    /// Each byte carries 7 payload bits; a set high bit means another byte
    /// follows. At most 5 bytes are consumed, bits past the 32nd are dropped.
    pub fn var_int(&mut self) -> Result<i32, BufferError> {
        let start = self.x;
        let mut value: u32 = 0;
        for i in 0..VAR_INT_MAX_BYTES {
            let byte = self.u8()?;
            value |= ((byte & 0x7f) as u32).wrapping_shl(7 * i as u32);
            if byte & 0x80 == 0 {
                return Ok(value as i32);
            }
        }
        Err(BufferError::UnterminatedVarInt { offset: start })
    }

    /// Runs `read` at `offset` and restores the cursor afterwards, whether or
    /// not the read succeeded.
    pub fn peek_at<T>(
        &mut self,
        offset: i64,
        read: impl FnOnce(&mut Self) -> Result<T, BufferError>,
    ) -> Result<T, BufferError> {
        let saved = self.x;
        self.seek(offset)?;
        let result = read(self);
        self.x = saved;
        result
    }
}
