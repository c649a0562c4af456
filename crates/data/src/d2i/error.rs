//! D2I decoder error type.

use std::path::PathBuf;

use dofus_buffers::BufferError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum D2iError {
    #[error("{0}")]
    Buffer(#[from] BufferError),
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid index length {value} at {offset:#x}")]
    InvalidLength { value: i32, offset: usize },
}
