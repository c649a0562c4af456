//! Object decoder: replays a class schema against the byte stream.

use dofus_buffers::Reader;
use indexmap::IndexMap;
use tracing::{debug, trace};

use super::error::D2oError;
use super::schema::read_count;
use super::types::{
    ClassDescriptor, ClassId, ClassTable, DecodedObject, DecodedValue, FieldDescriptor, FieldType,
};

/// Maximum nesting of objects and vectors inside one top-level object.
pub const MAX_DEPTH: usize = 256;

/// Where a value sits; decides how an unknown class id is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Falls back to the declared class id, fails if that is unknown too.
    Field,
    /// Decodes to [`DecodedValue::Absent`].
    Element,
}

/// Decodes objects against the class table of one file.
pub struct ObjectDecoder<'c> {
    classes: &'c ClassTable,
}

impl<'c> ObjectDecoder<'c> {
    pub fn new(classes: &'c ClassTable) -> Self {
        Self { classes }
    }

    /// Decodes the fields of `class` starting at the reader's cursor. The
    /// leading class id must already have been consumed.
    pub fn read_object(
        &self,
        reader: &mut Reader<'_>,
        class: &ClassDescriptor,
    ) -> Result<DecodedObject, D2oError> {
        self.read_object_at(reader, class, 0)
    }

    fn read_object_at(
        &self,
        reader: &mut Reader<'_>,
        class: &ClassDescriptor,
        depth: usize,
    ) -> Result<DecodedObject, D2oError> {
        if depth > MAX_DEPTH {
            return Err(D2oError::NestingTooDeep {
                limit: MAX_DEPTH,
                offset: reader.offset(),
            });
        }
        debug!(
            class = %class.qualified_name(),
            fields = class.fields.len(),
            offset = reader.offset(),
            "reading object"
        );
        let mut fields = IndexMap::with_capacity(class.fields.len());
        for field in &class.fields {
            trace!(
                name = %field.name,
                kind = %field.field_type,
                offset = reader.offset(),
                "reading field"
            );
            let value = self.read_value(reader, field, Slot::Field, depth)?;
            fields.insert(field.name.clone(), value);
        }
        Ok(DecodedObject {
            class_name: class.class_name.clone(),
            fields,
        })
    }

    fn read_value(
        &self,
        reader: &mut Reader<'_>,
        field: &FieldDescriptor,
        slot: Slot,
        depth: usize,
    ) -> Result<DecodedValue, D2oError> {
        let value = match field.field_type {
            FieldType::Integer => DecodedValue::Int(reader.i32()?),
            FieldType::I18n => DecodedValue::TextId(reader.i32()?),
            FieldType::UnsignedInteger => DecodedValue::Uint(reader.u32()?),
            FieldType::Boolean => DecodedValue::Bool(reader.bool()?),
            FieldType::String => DecodedValue::Str(reader.utf()?),
            FieldType::Number => {
                let number = reader.f64()?;
                if number.is_nan() {
                    DecodedValue::Absent
                } else {
                    DecodedValue::Number(number)
                }
            }
            FieldType::Vector => self.read_vector(reader, field, depth)?,
            FieldType::Class(declared) => self.read_reference(reader, declared, slot, depth)?,
        };
        Ok(value)
    }

    fn read_vector(
        &self,
        reader: &mut Reader<'_>,
        field: &FieldDescriptor,
        depth: usize,
    ) -> Result<DecodedValue, D2oError> {
        let element = field
            .element
            .as_deref()
            .ok_or_else(|| D2oError::MissingElementType {
                field: field.name.clone(),
            })?;
        if depth >= MAX_DEPTH {
            return Err(D2oError::NestingTooDeep {
                limit: MAX_DEPTH,
                offset: reader.offset(),
            });
        }
        let len = read_count(reader, "vector length")?;
        trace!(name = %field.name, len, offset = reader.offset(), "reading vector");
        let mut items = Vec::with_capacity(len.min(reader.size()));
        for _ in 0..len {
            items.push(self.read_value(reader, element, Slot::Element, depth + 1)?);
        }
        Ok(DecodedValue::Vector(items))
    }

    /// Reads the runtime class id of an embedded object, then the object.
    fn read_reference(
        &self,
        reader: &mut Reader<'_>,
        declared: ClassId,
        slot: Slot,
        depth: usize,
    ) -> Result<DecodedValue, D2oError> {
        let offset = reader.offset();
        let class_id = reader.i32()?;
        let class = match (self.classes.get(class_id), slot) {
            (Some(class), _) => class,
            (None, Slot::Field) => {
                self.classes
                    .get(declared)
                    .ok_or(D2oError::UnresolvedReference {
                        class_id,
                        declared,
                        offset,
                    })?
            }
            (None, Slot::Element) => {
                debug!(class_id, offset, "unknown class in vector element");
                return Ok(DecodedValue::Absent);
            }
        };
        self.read_object_at(reader, class, depth + 1)
            .map(DecodedValue::Object)
    }
}
