//! D2I translation table decoder.
//!
//! Layout: a pointer to the index block, the strings, then at the pointer
//! `[byte length: i32]` followed by entries
//! `[id: i32][has diacritic: u8][string pointer: i32]([diacritic pointer: i32])`.

use std::collections::BTreeMap;
use std::path::Path;

use dofus_buffers::Reader;
use serde::Serialize;
use tracing::debug;

use super::error::D2iError;

/// Text id → localized text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TranslationTable(BTreeMap<i32, String>);

impl TranslationTable {
    pub fn get(&self, id: i32) -> Option<&str> {
        self.0.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, &str)> {
        self.0.iter().map(|(id, text)| (*id, text.as_str()))
    }
}

/// Reads and decodes a D2I file.
pub fn decode_file(path: impl AsRef<Path>) -> Result<TranslationTable, D2iError> {
    let path = path.as_ref();
    debug!(file = %path.display(), "processing D2I file");
    let data = std::fs::read(path).map_err(|source| D2iError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode(&data)
}

/// Decodes a D2I translation table held in memory.
pub fn decode(data: &[u8]) -> Result<TranslationTable, D2iError> {
    let mut reader = Reader::new(data);
    let index_pointer = reader.i32()?;
    reader.seek(index_pointer.into())?;

    let offset = reader.offset();
    let length = reader.i32()?;
    let length =
        usize::try_from(length).map_err(|_| D2iError::InvalidLength { value: length, offset })?;
    let end = reader.offset() + length;

    let mut entries = BTreeMap::new();
    while reader.offset() < end {
        let id = reader.i32()?;
        let has_diacritic = reader.bool()?;
        let pointer = reader.i32()?;
        let text = reader.peek_at(pointer.into(), |r| r.utf())?;
        if has_diacritic {
            // Pointer to the diacritic-free variant; unused.
            reader.i32()?;
        }
        entries.insert(id, text);
    }
    debug!(entries = entries.len(), "decoded D2I");

    Ok(TranslationTable(entries))
}
