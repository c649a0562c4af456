//! D2O game data containers.
//!
//! A D2O file embeds its own schema: a table of classes with typed fields,
//! followed by objects encoded against those classes. Decoding yields the
//! class table together with every object as a [`DecodedObject`].
//!
//! ```
//! use dofus_data::d2o;
//!
//! let err = d2o::decode(b"XYZ\0\0\0\0").unwrap_err();
//! assert!(matches!(err, d2o::D2oError::InvalidHeader { .. }));
//! ```

mod container;
mod error;
mod object;
mod schema;
mod types;

pub use container::{
    decode, decode_file, read_header, read_index, sorted_offsets, OffsetIndex, HEADER,
};
pub use error::D2oError;
pub use object::{ObjectDecoder, MAX_DEPTH};
pub use schema::{read_class, read_classes, read_field};
pub use types::{
    ClassDescriptor, ClassId, ClassTable, D2oData, DecodedObject, DecodedValue, FieldDescriptor,
    FieldType, CLASS_TYPE_KEY,
};
