//! Class table decoder.
//!
//! A class definition is `[id: i32][name: utf][package: utf][field count: i32]`
//! followed by its fields; a field is `[name: utf][type tag: i32]`, and a
//! vector tag is followed by the element field.

use dofus_buffers::Reader;
use tracing::debug;

use super::error::D2oError;
use super::object::MAX_DEPTH;
use super::types::{ClassDescriptor, ClassTable, FieldDescriptor, FieldType};

/// Reads `count` class definitions.
///
/// Class references inside the definitions are kept as ids; they may point
/// at classes defined later in the table.
pub fn read_classes(reader: &mut Reader<'_>, count: usize) -> Result<ClassTable, D2oError> {
    let mut classes = ClassTable::new();
    for _ in 0..count {
        let id = reader.i32()?;
        let class = read_class(reader)?;
        debug!(
            id,
            class = %class.qualified_name(),
            fields = class.fields.len(),
            "read class"
        );
        classes.insert(id, class);
    }
    Ok(classes)
}

/// Reads one class definition, after its id.
pub fn read_class(reader: &mut Reader<'_>) -> Result<ClassDescriptor, D2oError> {
    let class_name = reader.utf()?;
    let package_name = reader.utf()?;
    let count = read_count(reader, "field count")?;
    let mut fields = Vec::with_capacity(count.min(reader.size()));
    for _ in 0..count {
        fields.push(read_field(reader)?);
    }
    Ok(ClassDescriptor {
        package_name,
        class_name,
        fields,
    })
}

/// Reads one field definition.
///
/// Vector element definitions are read in a loop. A chain of more than
/// [`MAX_DEPTH`] vectors is rejected with [`D2oError::NestingTooDeep`].
pub fn read_field(reader: &mut Reader<'_>) -> Result<FieldDescriptor, D2oError> {
    let mut vectors = Vec::new();
    let innermost = loop {
        let name = reader.utf()?;
        let offset = reader.offset();
        let tag = reader.i32()?;
        match FieldType::from_tag(tag) {
            Some(FieldType::Vector) => {
                if vectors.len() == MAX_DEPTH {
                    return Err(D2oError::NestingTooDeep {
                        limit: MAX_DEPTH,
                        offset,
                    });
                }
                vectors.push(name);
            }
            Some(field_type) => break FieldDescriptor::new(name, field_type),
            None => {
                return Err(D2oError::InvalidFieldType {
                    tag,
                    field: name,
                    offset,
                })
            }
        }
    };
    Ok(vectors
        .into_iter()
        .rev()
        .fold(innermost, |element, name| FieldDescriptor::vector(name, element)))
}

/// Reads a signed 32-bit count, rejecting negative values.
pub(crate) fn read_count(reader: &mut Reader<'_>, what: &'static str) -> Result<usize, D2oError> {
    let offset = reader.offset();
    let value = reader.i32()?;
    usize::try_from(value).map_err(|_| D2oError::InvalidLength {
        what,
        value,
        offset,
    })
}
