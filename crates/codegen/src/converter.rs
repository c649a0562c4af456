//! Converts D2O class descriptors to Rust declarations.

use dofus_data::{ClassDescriptor, ClassTable, FieldDescriptor, FieldType};

use super::ident::{field_ident, module_ident};
use super::types::{RsField, RsStruct, RsType};

/// Whether a type sits directly in a struct field or inside a vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Field,
    Element,
}

/// Converts one class of `classes` to a struct declaration.
///
/// Class references are resolved against the same table the class came
/// from; class ids mean nothing outside their file.
pub fn to_rust_struct(class: &ClassDescriptor, classes: &ClassTable) -> RsStruct {
    let mut fields: Vec<RsField> = Vec::with_capacity(class.fields.len());
    for field in &class.fields {
        let mut ident = field_ident(&field.name);
        if fields.iter().any(|f| f.ident == ident) {
            let base = ident.trim_start_matches("r#").to_string();
            let mut n = 2;
            while fields.iter().any(|f| f.ident == format!("{}_{}", base, n)) {
                n += 1;
            }
            ident = format!("{}_{}", base, n);
        }
        fields.push(RsField {
            ident,
            wire_name: field.name.clone(),
            type_: field_type(field, &class.package_name, classes, Position::Field),
        });
    }
    RsStruct {
        name: class.class_name.clone(),
        package: class.package_name.clone(),
        fields,
    }
}

fn field_type(
    field: &FieldDescriptor,
    package: &str,
    classes: &ClassTable,
    position: Position,
) -> RsType {
    match field.field_type {
        FieldType::Integer | FieldType::I18n => RsType::I32,
        FieldType::UnsignedInteger => RsType::U32,
        FieldType::Boolean => RsType::Bool,
        FieldType::String => RsType::String,
        FieldType::Number => RsType::Number,
        FieldType::Vector => match field.element.as_deref() {
            Some(element) => RsType::Vec(Box::new(field_type(
                element,
                package,
                classes,
                Position::Element,
            ))),
            None => RsType::Vec(Box::new(RsType::Any)),
        },
        FieldType::Class(id) => match classes.get(id) {
            Some(target) => {
                let path = struct_path(target, package);
                match position {
                    // Unknown runtime classes decode to null inside vectors.
                    Position::Element => RsType::Option(Box::new(RsType::Struct(path))),
                    Position::Field => RsType::Boxed(Box::new(RsType::Struct(path))),
                }
            }
            None => RsType::Any,
        },
    }
}

fn struct_path(target: &ClassDescriptor, from_package: &str) -> String {
    if target.package_name == from_package {
        target.class_name.clone()
    } else {
        format!("super::{}::{}", module_ident(&target.package_name), target.class_name)
    }
}
