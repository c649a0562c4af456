//! Collects classes from many D2O files and renders one module per package.

use std::collections::BTreeMap;

use dofus_data::ClassTable;
use tracing::debug;

use super::converter::to_rust_struct;
use super::ident::module_ident;
use super::to_text::module_to_text;
use super::types::RsStruct;

/// Generated struct declarations grouped by package, then by class name.
#[derive(Debug, Default)]
pub struct Registry {
    packages: BTreeMap<String, BTreeMap<String, RsStruct>>,
}

/// Rendered source of one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModule {
    pub package: String,
    /// Module identifier, possibly a raw identifier.
    pub ident: String,
    pub source: String,
}

impl GeneratedModule {
    /// File name the module must be written to.
    pub fn file_name(&self) -> String {
        format!("{}.rs", self.ident.trim_start_matches("r#"))
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every class of one file. A class seen again under the same
    /// package and name replaces the earlier definition.
    pub fn add_classes(&mut self, classes: &ClassTable) {
        for (_, class) in classes.iter() {
            let s = to_rust_struct(class, classes);
            debug!(package = %s.package, class = %s.name, "registered class");
            self.packages
                .entry(class.package_name.clone())
                .or_default()
                .insert(class.class_name.clone(), s);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    /// Renders one package, classes in name order.
    pub fn render_package(&self, package: &str) -> Option<GeneratedModule> {
        let structs = self.packages.get(package)?;
        let list: Vec<&RsStruct> = structs.values().collect();
        Some(GeneratedModule {
            package: package.to_string(),
            ident: module_ident(package),
            source: module_to_text(package, &list),
        })
    }

    /// Renders every package.
    pub fn render(&self) -> Vec<GeneratedModule> {
        self.packages()
            .filter_map(|package| self.render_package(package))
            .collect()
    }

    /// Renders a crate root declaring the given modules.
    pub fn render_index(modules: &[GeneratedModule]) -> String {
        let mut idents: Vec<&str> = modules.iter().map(|m| m.ident.as_str()).collect();
        idents.sort_unstable();
        idents.dedup();
        let mut out = String::from("//! Generated from D2O class definitions; do not edit.\n\n");
        for ident in idents {
            out.push_str(&format!("pub mod {};\n", ident));
        }
        out
    }
}
