//! Rust declaration AST produced from D2O classes.

/// A Rust type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RsType {
    /// `i32`
    I32,
    /// `u32`
    U32,
    /// `bool`
    Bool,
    /// `String`
    String,
    /// `Option<f64>`, NaN numbers decode to `null`
    Number,
    /// `Vec<T>`
    Vec(Box<RsType>),
    /// `Option<T>`
    Option(Box<RsType>),
    /// `Box<T>`
    Boxed(Box<RsType>),
    /// Path to another generated struct, e.g. `super::items::Item`
    Struct(String),
    /// `serde_json::Value`, for references whose class is unknown
    Any,
}

/// One field of a generated struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsField {
    /// Rust identifier, possibly a raw identifier.
    pub ident: String,
    /// Name of the field in the decoded JSON.
    pub wire_name: String,
    pub type_: RsType,
}

/// A generated struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsStruct {
    pub name: String,
    /// Qualified package the class was declared in.
    pub package: String,
    pub fields: Vec<RsField>,
}
