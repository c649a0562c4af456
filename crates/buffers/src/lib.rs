//! Byte cursor utilities for the Dofus data decoders.
//!
//! Both game data containers (`.d2o`) and translation tables (`.d2i`) are
//! written by an ActionScript `IDataOutput`, so every multi-byte value is
//! big-endian and strings carry a 2-byte length prefix.
//!
//! # Overview
//!
//! - [`Reader`] - Reads binary data from a byte slice with a repositionable cursor
//! - [`Writer`] - Appends big-endian values to a growing buffer; meant for
//!   assembling test fixtures, its string writer panics on oversized input
//!
//! # Example
//!
//! ```
//! use dofus_buffers::{Reader, Writer};
//!
//! let mut writer = Writer::new();
//! writer.i32(-7);
//! writer.utf("hello");
//! let data = writer.flush();
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.i32().unwrap(), -7);
//! assert_eq!(reader.utf().unwrap(), "hello");
//! ```

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

/// Error type for buffer operations.
///
/// Every variant carries the cursor offset at which the read was attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    EndOfBuffer {
        offset: usize,
        wanted: usize,
        remaining: usize,
    },
    /// A variable-length integer did not terminate within 5 bytes.
    UnterminatedVarInt { offset: usize },
    /// Attempted to move the cursor outside of the buffer.
    OutOfBounds { offset: i64, len: usize },
}

impl BufferError {
    /// Byte offset the failing operation started at.
    pub fn offset(&self) -> i64 {
        match self {
            BufferError::EndOfBuffer { offset, .. } => *offset as i64,
            BufferError::UnterminatedVarInt { offset } => *offset as i64,
            BufferError::OutOfBounds { offset, .. } => *offset,
        }
    }
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::EndOfBuffer {
                offset,
                wanted,
                remaining,
            } => write!(
                f,
                "end of buffer at {:#x}: wanted {} bytes, {} remaining",
                offset, wanted, remaining
            ),
            BufferError::UnterminatedVarInt { offset } => {
                write!(f, "variable-length integer at {:#x} is too long", offset)
            }
            BufferError::OutOfBounds { offset, len } => {
                write!(f, "offset {} is outside of a {} byte buffer", offset, len)
            }
        }
    }
}

impl std::error::Error for BufferError {}
