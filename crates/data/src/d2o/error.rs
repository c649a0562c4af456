//! D2O decoder error type.

use std::path::PathBuf;

use dofus_buffers::BufferError;
use thiserror::Error;

use super::types::ClassId;

/// Error type for D2O container decoding. Any error aborts the whole file.
#[derive(Debug, Error)]
pub enum D2oError {
    #[error("{0}")]
    Buffer(#[from] BufferError),
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid header {found:?}, expected \"D2O\"")]
    InvalidHeader { found: String },
    #[error("invalid type tag {tag} for field `{field}` at {offset:#x}")]
    InvalidFieldType {
        tag: i32,
        field: String,
        offset: usize,
    },
    #[error("invalid {what} {value} at {offset:#x}")]
    InvalidLength {
        what: &'static str,
        value: i32,
        offset: usize,
    },
    #[error("neither class id {class_id} nor declared class id {declared} is defined at {offset:#x}")]
    UnresolvedReference {
        class_id: ClassId,
        declared: ClassId,
        offset: usize,
    },
    #[error("vector field `{field}` has no element type")]
    MissingElementType { field: String },
    #[error("nesting deeper than {limit} levels at {offset:#x}")]
    NestingTooDeep { limit: usize, offset: usize },
}
