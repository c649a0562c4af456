//! Source generation from decoded D2O class tables.

use dofus_buffers::Writer;
use dofus_codegen::Registry;
use dofus_data::{d2o, ClassDescriptor, ClassTable, FieldDescriptor, FieldType};

const ITEMS: &str = "com.ankamagames.dofus.datacenter.items";
const EFFECTS: &str = "com.ankamagames.dofus.datacenter.effects";

fn class(package: &str, name: &str, fields: Vec<FieldDescriptor>) -> ClassDescriptor {
    ClassDescriptor {
        package_name: package.into(),
        class_name: name.into(),
        fields,
    }
}

/// A container with no objects, only class definitions.
fn schema_only_file() -> Vec<u8> {
    let mut w = Writer::new();
    w.buf(d2o::HEADER);
    w.i32(7);
    w.i32(0);
    w.i32(2);

    w.i32(1);
    w.utf("Item");
    w.utf(ITEMS);
    w.i32(3);
    w.utf("id");
    w.i32(FieldType::INTEGER_TAG);
    w.utf("possibleEffects");
    w.i32(FieldType::VECTOR_TAG);
    w.utf("Vector.<EffectInstance>");
    w.i32(2);
    w.utf("type");
    w.i32(FieldType::STRING_TAG);

    w.i32(2);
    w.utf("EffectInstance");
    w.utf(EFFECTS);
    w.i32(1);
    w.utf("effectId");
    w.i32(FieldType::UNSIGNED_INTEGER_TAG);
    w.flush()
}

#[test]
fn renders_modules_from_decoded_file() {
    let decoded = d2o::decode(&schema_only_file()).unwrap();
    assert!(decoded.objects.is_empty());

    let mut registry = Registry::new();
    registry.add_classes(&decoded.classes);
    let modules = registry.render();
    assert_eq!(modules.len(), 2);

    let items = modules.iter().find(|m| m.package == ITEMS).unwrap();
    assert_eq!(items.ident, "items");
    assert!(items.source.starts_with(&format!("//! Classes of `{}`.", ITEMS)));
    assert!(items.source.contains("use serde::Deserialize;\n"));
    assert!(items.source.contains("pub struct Item {\n"));
    assert!(items.source.contains(
        "    #[serde(rename = \"possibleEffects\")]\n    pub possible_effects: Vec<Option<super::effects::EffectInstance>>,\n"
    ));
    assert!(items.source.contains("    pub r#type: String,\n"));

    let effects = modules.iter().find(|m| m.package == EFFECTS).unwrap();
    assert!(effects.source.contains("pub effect_id: u32,"));
}

#[test]
fn later_definitions_replace_earlier_ones() {
    let mut first = ClassTable::new();
    first.insert(1, class(ITEMS, "Item", vec![FieldDescriptor::new("id", FieldType::Integer)]));
    let mut second = ClassTable::new();
    second.insert(
        4,
        class(
            ITEMS,
            "Item",
            vec![
                FieldDescriptor::new("id", FieldType::Integer),
                FieldDescriptor::new("level", FieldType::Integer),
            ],
        ),
    );
    second.insert(5, class(ITEMS, "ItemType", vec![]));

    let mut registry = Registry::new();
    registry.add_classes(&first);
    registry.add_classes(&second);

    let module = registry.render_package(ITEMS).unwrap();
    assert!(module.source.contains("pub level: i32,"));
    let item = module.source.find("pub struct Item {").unwrap();
    let item_type = module.source.find("pub struct ItemType {}").unwrap();
    assert!(item < item_type);
    assert!(registry.render_package("unknown").is_none());
}

#[test]
fn index_lists_modules_once() {
    let mut classes = ClassTable::new();
    classes.insert(1, class(ITEMS, "Item", vec![]));
    classes.insert(2, class(EFFECTS, "Effect", vec![]));
    classes.insert(3, class("com.ankamagames.dofus.datacenter.mod", "Mod", vec![]));
    let mut registry = Registry::new();
    registry.add_classes(&classes);
    let modules = registry.render();

    let text = Registry::render_index(&modules);
    assert_eq!(
        text,
        "//! Generated from D2O class definitions; do not edit.\n\npub mod effects;\npub mod items;\npub mod r#mod;\n"
    );
    let raw = modules.iter().find(|m| m.ident == "r#mod").unwrap();
    assert_eq!(raw.file_name(), "mod.rs");
}
