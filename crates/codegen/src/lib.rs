//! Rust source generator for the classes embedded in D2O files.
//!
//! Every D2O file carries the definitions of the classes it stores. The
//! [`Registry`] gathers them across files and renders one module per
//! package with `serde::Deserialize` structs matching the JSON produced from
//! the decoded objects.
//!
//! # Example
//!
//! ```
//! use dofus_codegen::Registry;
//! use dofus_data::{ClassDescriptor, ClassTable, FieldDescriptor, FieldType};
//!
//! let mut classes = ClassTable::new();
//! classes.insert(1, ClassDescriptor {
//!     package_name: "com.ankamagames.dofus.datacenter.breeds".into(),
//!     class_name: "Breed".into(),
//!     fields: vec![FieldDescriptor::new("shortNameId", FieldType::I18n)],
//! });
//!
//! let mut registry = Registry::new();
//! registry.add_classes(&classes);
//! let module = registry
//!     .render_package("com.ankamagames.dofus.datacenter.breeds")
//!     .unwrap();
//! assert_eq!(module.file_name(), "breeds.rs");
//! assert!(module.source.contains("pub short_name_id: i32,"));
//! ```

pub mod converter;
pub mod ident;
pub mod registry;
pub mod to_text;
pub mod types;

pub use converter::to_rust_struct;
pub use registry::{GeneratedModule, Registry};
pub use types::{RsField, RsStruct, RsType};
