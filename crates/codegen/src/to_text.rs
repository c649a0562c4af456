//! Converts Rust declaration AST nodes to source text.

use super::types::{RsField, RsStruct, RsType};

const TAB: &str = "    ";

/// Convert an `RsType` to Rust source text.
pub fn type_to_text(t: &RsType) -> String {
    match t {
        RsType::I32 => "i32".into(),
        RsType::U32 => "u32".into(),
        RsType::Bool => "bool".into(),
        RsType::String => "String".into(),
        RsType::Number => "Option<f64>".into(),
        RsType::Vec(inner) => format!("Vec<{}>", type_to_text(inner)),
        RsType::Option(inner) => format!("Option<{}>", type_to_text(inner)),
        RsType::Boxed(inner) => format!("Box<{}>", type_to_text(inner)),
        RsType::Struct(path) => path.clone(),
        RsType::Any => "serde_json::Value".into(),
    }
}

fn field_to_text(field: &RsField) -> String {
    let mut out = String::new();
    if field.ident.trim_start_matches("r#") != field.wire_name {
        out.push_str(&format!(
            "{}#[serde(rename = \"{}\")]\n",
            TAB,
            field.wire_name.replace('\\', "\\\\").replace('"', "\\\"")
        ));
    }
    out.push_str(&format!(
        "{}pub {}: {},\n",
        TAB,
        field.ident,
        type_to_text(&field.type_)
    ));
    out
}

/// Convert a struct declaration to Rust source text.
pub fn struct_to_text(s: &RsStruct) -> String {
    let mut out = format!("/// `{}.{}`\n", s.package, s.name);
    out.push_str("#[derive(Debug, Clone, Deserialize)]\n");
    if s.fields.is_empty() {
        out.push_str(&format!("pub struct {} {{}}\n", s.name));
        return out;
    }
    out.push_str(&format!("pub struct {} {{\n", s.name));
    for field in &s.fields {
        out.push_str(&field_to_text(field));
    }
    out.push_str("}\n");
    out
}

/// Render a whole module holding the structs of one package.
pub fn module_to_text(package: &str, structs: &[&RsStruct]) -> String {
    let mut out = format!(
        "//! Classes of `{}`.\n//!\n//! Generated from D2O class definitions; do not edit.\n\nuse serde::Deserialize;\n",
        package
    );
    for s in structs {
        out.push('\n');
        out.push_str(&struct_to_text(s));
    }
    out
}
