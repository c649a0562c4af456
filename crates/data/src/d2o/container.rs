//! Top-level D2O container decoder.
//!
//! Layout: `"D2O"`, a pointer to the offset index, the objects, then at the
//! pointer the index (`[byte length: i32]` + `(object id, offset)` pairs)
//! directly followed by the class table.

use std::collections::BTreeMap;
use std::path::Path;

use dofus_buffers::Reader;
use tracing::debug;

use super::error::D2oError;
use super::object::ObjectDecoder;
use super::schema::{read_classes, read_count};
use super::types::{D2oData, DecodedObject};

/// File signature.
pub const HEADER: &[u8; 3] = b"D2O";

/// Size of one index entry: object id and byte offset.
const INDEX_ENTRY_SIZE: usize = 8;

/// Object id → byte offset of the object's encoded form.
pub type OffsetIndex = BTreeMap<i32, i32>;

/// Reads and decodes a D2O file.
pub fn decode_file(path: impl AsRef<Path>) -> Result<D2oData, D2oError> {
    let path = path.as_ref();
    debug!(file = %path.display(), "processing D2O file");
    let data = std::fs::read(path).map_err(|source| D2oError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode(&data)
}

/// Decodes a D2O container held in memory.
pub fn decode(data: &[u8]) -> Result<D2oData, D2oError> {
    let mut reader = Reader::new(data);
    read_header(&mut reader)?;

    let index_pointer = reader.i32()?;
    debug!(pointer = index_pointer, "index pointer");
    reader.seek(index_pointer.into())?;
    let index = read_index(&mut reader)?;

    let class_count = read_count(&mut reader, "class count")?;
    debug!(count = class_count, "class count");
    let classes = read_classes(&mut reader, class_count)?;

    let decoder = ObjectDecoder::new(&classes);
    let offsets = sorted_offsets(&index);
    let mut objects = Vec::with_capacity(offsets.len());
    for offset in offsets {
        reader.seek(offset.into())?;
        let class_id = reader.i32()?;
        match classes.get(class_id) {
            Some(class) => objects.push(decoder.read_object(&mut reader, class)?),
            None => {
                debug!(class_id, offset, "unknown class, emitting an empty object");
                objects.push(DecodedObject::new(""));
            }
        }
    }
    debug!(classes = classes.len(), objects = objects.len(), "decoded D2O");

    Ok(D2oData { classes, objects })
}

/// Checks the 3-byte signature.
pub fn read_header(reader: &mut Reader<'_>) -> Result<(), D2oError> {
    let header = reader.buf(HEADER.len()).map_err(|_| D2oError::InvalidHeader {
        found: String::from_utf8_lossy(&reader.uint8[reader.x..]).into_owned(),
    })?;
    if header != HEADER {
        return Err(D2oError::InvalidHeader {
            found: String::from_utf8_lossy(header).into_owned(),
        });
    }
    Ok(())
}

/// Reads the offset index at the cursor. The byte length is divided by the
/// entry size, so trailing bytes of a partial entry are ignored.
pub fn read_index(reader: &mut Reader<'_>) -> Result<OffsetIndex, D2oError> {
    let length = read_count(reader, "index length")?;
    let entries = length / INDEX_ENTRY_SIZE;
    debug!(entries, "index length");
    let mut index = OffsetIndex::new();
    for _ in 0..entries {
        let id = reader.i32()?;
        let offset = reader.i32()?;
        index.insert(id, offset);
    }
    Ok(index)
}

/// Object offsets in ascending numeric order; object ids play no part.
pub fn sorted_offsets(index: &OffsetIndex) -> Vec<i32> {
    let mut offsets: Vec<i32> = index.values().copied().collect();
    offsets.sort_unstable();
    offsets
}
