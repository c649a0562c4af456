//! D2I translation tables.

mod decoder;
mod error;

pub use decoder::{decode, decode_file, TranslationTable};
pub use error::D2iError;
