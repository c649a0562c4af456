//! D2O schema and value types.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// File-local class identifier.
pub type ClassId = i32;

/// Key under which a decoded object's class name is emitted.
pub const CLASS_TYPE_KEY: &str = "ClassType_";

/// Declared type of a field.
///
/// The wire tag is a single signed integer: fixed negative codes for the
/// built-in kinds, positive values for references to classes of the same
/// file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Integer,
    Boolean,
    String,
    Number,
    /// Id of a localized text, resolved against a translation table.
    I18n,
    UnsignedInteger,
    Vector,
    /// Expected class of an embedded object. The class actually used is read
    /// from the stream for every instance.
    Class(ClassId),
}

impl FieldType {
    pub const INTEGER_TAG: i32 = -1;
    pub const BOOLEAN_TAG: i32 = -2;
    pub const STRING_TAG: i32 = -3;
    pub const NUMBER_TAG: i32 = -4;
    pub const I18N_TAG: i32 = -5;
    pub const UNSIGNED_INTEGER_TAG: i32 = -6;
    pub const VECTOR_TAG: i32 = -99;

    /// Maps a wire tag to a field type. Zero and unassigned negative tags
    /// have no meaning and yield `None`.
    pub fn from_tag(tag: i32) -> Option<Self> {
        match tag {
            Self::INTEGER_TAG => Some(FieldType::Integer),
            Self::BOOLEAN_TAG => Some(FieldType::Boolean),
            Self::STRING_TAG => Some(FieldType::String),
            Self::NUMBER_TAG => Some(FieldType::Number),
            Self::I18N_TAG => Some(FieldType::I18n),
            Self::UNSIGNED_INTEGER_TAG => Some(FieldType::UnsignedInteger),
            Self::VECTOR_TAG => Some(FieldType::Vector),
            id if id > 0 => Some(FieldType::Class(id)),
            _ => None,
        }
    }

    pub fn tag(self) -> i32 {
        match self {
            FieldType::Integer => Self::INTEGER_TAG,
            FieldType::Boolean => Self::BOOLEAN_TAG,
            FieldType::String => Self::STRING_TAG,
            FieldType::Number => Self::NUMBER_TAG,
            FieldType::I18n => Self::I18N_TAG,
            FieldType::UnsignedInteger => Self::UNSIGNED_INTEGER_TAG,
            FieldType::Vector => Self::VECTOR_TAG,
            FieldType::Class(id) => id,
        }
    }

    /// Kind name, or the decimal class id for class references.
    pub fn name(self) -> Cow<'static, str> {
        match self {
            FieldType::Integer => "Integer".into(),
            FieldType::Boolean => "Boolean".into(),
            FieldType::String => "String".into(),
            FieldType::Number => "Number".into(),
            FieldType::I18n => "I18n".into(),
            FieldType::UnsignedInteger => "UnsignedInteger".into(),
            FieldType::Vector => "Vector".into(),
            FieldType::Class(id) => id.to_string().into(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

/// A named, typed field of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Element type; set only for [`FieldType::Vector`].
    #[serde(rename = "subtype", skip_serializing_if = "Option::is_none")]
    pub element: Option<Box<FieldDescriptor>>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            element: None,
        }
    }

    pub fn vector(name: impl Into<String>, element: FieldDescriptor) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Vector,
            element: Some(Box::new(element)),
        }
    }
}

/// Schema of one class. Field order is the order values appear on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassDescriptor {
    #[serde(rename = "packageName")]
    pub package_name: String,
    #[serde(rename = "packageClass")]
    pub class_name: String,
    pub fields: Vec<FieldDescriptor>,
}

impl ClassDescriptor {
    /// `package.Class`
    pub fn qualified_name(&self) -> String {
        if self.package_name.is_empty() {
            self.class_name.clone()
        } else {
            format!("{}.{}", self.package_name, self.class_name)
        }
    }
}

/// Classes of one file keyed by their file-local id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClassTable(BTreeMap<ClassId, ClassDescriptor>);

impl ClassTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a class, replacing any earlier class with the same id.
    pub fn insert(&mut self, id: ClassId, class: ClassDescriptor) -> Option<ClassDescriptor> {
        self.0.insert(id, class)
    }

    pub fn get(&self, id: ClassId) -> Option<&ClassDescriptor> {
        self.0.get(&id)
    }

    pub fn contains(&self, id: ClassId) -> bool {
        self.0.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &ClassDescriptor)> {
        self.0.iter().map(|(id, class)| (*id, class))
    }
}

impl FromIterator<(ClassId, ClassDescriptor)> for ClassTable {
    fn from_iter<I: IntoIterator<Item = (ClassId, ClassDescriptor)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A decoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    Int(i32),
    Uint(u32),
    /// Raw localized text id.
    TextId(i32),
    Bool(bool),
    Str(String),
    Number(f64),
    /// NaN numbers and vector elements of unknown classes.
    Absent,
    Object(DecodedObject),
    Vector(Vec<DecodedValue>),
}

impl DecodedValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, DecodedValue::Absent)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DecodedValue::Int(v) | DecodedValue::TextId(v) => Some(*v as i64),
            DecodedValue::Uint(v) => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DecodedValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&DecodedObject> {
        match self {
            DecodedValue::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[DecodedValue]> {
        match self {
            DecodedValue::Vector(items) => Some(items),
            _ => None,
        }
    }
}

impl Serialize for DecodedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DecodedValue::Int(v) | DecodedValue::TextId(v) => serializer.serialize_i32(*v),
            DecodedValue::Uint(v) => serializer.serialize_u32(*v),
            DecodedValue::Bool(v) => serializer.serialize_bool(*v),
            DecodedValue::Str(v) => serializer.serialize_str(v),
            DecodedValue::Number(v) => serializer.serialize_f64(*v),
            DecodedValue::Absent => serializer.serialize_none(),
            DecodedValue::Object(o) => o.serialize(serializer),
            DecodedValue::Vector(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

/// An instance of a file class, fields in declared order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedObject {
    /// Simple name of the class the object was decoded with.
    pub class_name: String,
    pub fields: IndexMap<String, DecodedValue>,
}

impl DecodedObject {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            fields: IndexMap::new(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&DecodedValue> {
        self.fields.get(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for DecodedObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry(CLASS_TYPE_KEY, &self.class_name)?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Everything decoded from one D2O file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct D2oData {
    pub classes: ClassTable,
    /// Top-level objects in ascending file offset order.
    pub objects: Vec<DecodedObject>,
}
