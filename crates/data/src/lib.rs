//! Decoders for Dofus game data files.
//!
//! - [`d2o`] - self-describing game data containers (`*.d2o`)
//! - [`d2i`] - localized text tables (`i18n_*.d2i`)
//!
//! Each call owns its cursor and tables, so independent files can be
//! decoded from as many threads as needed.

pub mod d2i;
pub mod d2o;

pub use d2i::{D2iError, TranslationTable};
pub use d2o::{
    ClassDescriptor, ClassId, ClassTable, D2oData, D2oError, DecodedObject, DecodedValue,
    FieldDescriptor, FieldType,
};
