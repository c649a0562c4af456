//! End-to-end D2O container decoding against hand-assembled files.

use dofus_buffers::{BufferError, Reader, Writer};
use dofus_data::d2o::{
    self, ClassTable, D2oError, DecodedValue, FieldDescriptor, FieldType, ObjectDecoder,
    MAX_DEPTH,
};
use proptest::prelude::*;
use serde_json::json;

const INT: i32 = FieldType::INTEGER_TAG;
const BOOL: i32 = FieldType::BOOLEAN_TAG;
const STR: i32 = FieldType::STRING_TAG;
const NUM: i32 = FieldType::NUMBER_TAG;
const I18N: i32 = FieldType::I18N_TAG;
const UINT: i32 = FieldType::UNSIGNED_INTEGER_TAG;
const VEC: i32 = FieldType::VECTOR_TAG;

// ---------------------------------------------------------------------------
// Fixture assembly
// ---------------------------------------------------------------------------

/// Builds a container: header, index pointer, objects, index, class table.
struct Fixture {
    w: Writer,
    index: Vec<(i32, i32)>,
}

impl Fixture {
    fn new() -> Self {
        let mut w = Writer::new();
        w.buf(d2o::HEADER);
        w.i32(0);
        Self {
            w,
            index: Vec::new(),
        }
    }

    fn pad_to(&mut self, offset: usize) {
        while self.w.len() < offset {
            self.w.u8(0xee);
        }
    }

    /// Registers an object at the current position. `write` must emit the
    /// leading class id.
    fn object(&mut self, id: i32, write: impl FnOnce(&mut Writer)) {
        self.index.push((id, self.w.len() as i32));
        write(&mut self.w);
    }

    fn finish(mut self, classes: &[Class]) -> Vec<u8> {
        let pointer = self.w.len() as i32;
        self.w.patch_i32(3, pointer);
        self.w.i32((self.index.len() * 8) as i32);
        for (id, offset) in &self.index {
            self.w.i32(*id);
            self.w.i32(*offset);
        }
        self.w.i32(classes.len() as i32);
        for class in classes {
            class.write(&mut self.w);
        }
        self.w.flush()
    }
}

/// A class definition; each field is a name plus its tag chain, e.g.
/// `[VEC, VEC, INT]` for a vector of vectors of integers.
struct Class {
    id: i32,
    name: &'static str,
    package: &'static str,
    fields: Vec<(&'static str, Vec<i32>)>,
}

impl Class {
    fn new(id: i32, name: &'static str, fields: Vec<(&'static str, Vec<i32>)>) -> Self {
        Self {
            id,
            name,
            package: "com.ankamagames.dofus.datacenter.test",
            fields,
        }
    }

    fn write(&self, w: &mut Writer) {
        w.i32(self.id);
        w.utf(self.name);
        w.utf(self.package);
        w.i32(self.fields.len() as i32);
        for (name, tags) in &self.fields {
            for (i, tag) in tags.iter().enumerate() {
                w.utf(if i == 0 { name } else { "" });
                w.i32(*tag);
            }
        }
    }
}

/// Classes for a spell-like file: `Spell` embeds an `Effect` (class 2,
/// subclassed by `EffectDice`, class 3) and a vector of effects.
fn spell_classes() -> Vec<Class> {
    vec![
        Class::new(
            1,
            "Spell",
            vec![
                ("id", vec![INT]),
                ("nameId", vec![I18N]),
                ("verbose", vec![BOOL]),
                ("iconUri", vec![STR]),
                ("range", vec![NUM]),
                ("mask", vec![UINT]),
                ("mainEffect", vec![2]),
                ("effects", vec![VEC, 2]),
                ("grid", vec![VEC, VEC, INT]),
            ],
        ),
        Class::new(2, "Effect", vec![("effectId", vec![INT])]),
        Class::new(3, "EffectDice", vec![("effectId", vec![INT]), ("diceNum", vec![INT])]),
    ]
}

fn write_spell(w: &mut Writer, id: i32) {
    w.i32(1);
    w.i32(id);
    w.i32(9_000 + id);
    w.u8(0x02);
    w.utf("spell.png");
    w.f64(f64::NAN);
    w.u32(0xffff_ffff);
    // mainEffect: runtime class 3 instead of the declared 2
    w.i32(3);
    w.i32(100);
    w.i32(6);
    // effects: known, unknown (skipped as absent), known
    w.i32(3);
    w.i32(2);
    w.i32(101);
    w.i32(77);
    w.i32(3);
    w.i32(102);
    w.i32(8);
    // grid: [[], [1, 2, 3]]
    w.i32(2);
    w.i32(0);
    w.i32(3);
    w.i32(1);
    w.i32(2);
    w.i32(3);
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

#[test]
fn decodes_spell_container() {
    let mut fixture = Fixture::new();
    fixture.object(1, |w| write_spell(w, 1));
    let data = fixture.finish(&spell_classes());

    let decoded = d2o::decode(&data).unwrap();
    assert_eq!(decoded.classes.len(), 3);
    assert_eq!(decoded.objects.len(), 1);

    let spell = &decoded.objects[0];
    assert_eq!(spell.class_name, "Spell");
    assert_eq!(spell.get("id"), Some(&DecodedValue::Int(1)));
    assert_eq!(spell.get("nameId"), Some(&DecodedValue::TextId(9_001)));
    assert_eq!(spell.get("verbose"), Some(&DecodedValue::Bool(false)));
    assert_eq!(spell.get("iconUri"), Some(&DecodedValue::Str("spell.png".into())));
    assert_eq!(spell.get("range"), Some(&DecodedValue::Absent));
    assert_eq!(spell.get("mask"), Some(&DecodedValue::Uint(u32::MAX)));

    let main = spell.get("mainEffect").and_then(DecodedValue::as_object).unwrap();
    assert_eq!(main.class_name, "EffectDice");
    assert_eq!(main.get("diceNum"), Some(&DecodedValue::Int(6)));

    let effects = spell.get("effects").and_then(DecodedValue::as_vector).unwrap();
    assert_eq!(effects.len(), 3);
    assert_eq!(effects[0].as_object().unwrap().class_name, "Effect");
    assert!(effects[1].is_absent());
    assert_eq!(effects[2].as_object().unwrap().class_name, "EffectDice");
}

#[test]
fn decoded_container_serializes_like_the_json_export() {
    let mut fixture = Fixture::new();
    fixture.object(1, |w| write_spell(w, 1));
    let data = fixture.finish(&spell_classes());
    let decoded = d2o::decode(&data).unwrap();

    let value = serde_json::to_value(&decoded).unwrap();
    assert_eq!(
        value["classes"]["1"]["fields"][7],
        json!({"name": "effects", "type": "Vector", "subtype": {"name": "", "type": "2"}})
    );
    assert_eq!(value["classes"]["3"]["packageClass"], json!("EffectDice"));
    assert_eq!(
        value["objects"][0],
        json!({
            "ClassType_": "Spell",
            "id": 1,
            "nameId": 9001,
            "verbose": false,
            "iconUri": "spell.png",
            "range": null,
            "mask": 4294967295u32,
            "mainEffect": {"ClassType_": "EffectDice", "effectId": 100, "diceNum": 6},
            "effects": [
                {"ClassType_": "Effect", "effectId": 101},
                null,
                {"ClassType_": "EffectDice", "effectId": 102, "diceNum": 8}
            ],
            "grid": [[], [1, 2, 3]]
        })
    );
}

#[test]
fn objects_follow_ascending_offsets_not_ids() {
    let classes = vec![Class::new(1, "Item", vec![("id", vec![INT])])];
    let mut fixture = Fixture::new();
    fixture.pad_to(10);
    fixture.object(2, |w| {
        w.i32(1);
        w.i32(2);
    });
    fixture.pad_to(25);
    fixture.object(9, |w| {
        w.i32(1);
        w.i32(9);
    });
    fixture.pad_to(40);
    fixture.object(5, |w| {
        w.i32(1);
        w.i32(5);
    });
    // Index written in id order 5, 2, 9.
    fixture.index = vec![(5, 40), (2, 10), (9, 25)];
    let data = fixture.finish(&classes);

    let decoded = d2o::decode(&data).unwrap();
    let ids: Vec<i64> = decoded
        .objects
        .iter()
        .map(|o| o.get("id").and_then(DecodedValue::as_i64).unwrap())
        .collect();
    assert_eq!(ids, vec![2, 9, 5]);
}

#[test]
fn decoding_is_deterministic() {
    let mut fixture = Fixture::new();
    fixture.object(1, |w| write_spell(w, 1));
    fixture.object(2, |w| write_spell(w, 2));
    let data = fixture.finish(&spell_classes());

    let first = d2o::decode(&data).unwrap();
    let second = d2o::decode(&data).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn forward_class_references_resolve() {
    // Class 1 refers to class 7, which is defined after it.
    let classes = vec![
        Class::new(1, "Outer", vec![("inner", vec![7])]),
        Class::new(7, "Inner", vec![("x", vec![INT])]),
    ];
    let mut fixture = Fixture::new();
    fixture.object(1, |w| {
        w.i32(1);
        w.i32(7);
        w.i32(42);
    });
    let data = fixture.finish(&classes);
    let decoded = d2o::decode(&data).unwrap();
    let inner = decoded.objects[0].get("inner").and_then(DecodedValue::as_object).unwrap();
    assert_eq!(inner.get("x"), Some(&DecodedValue::Int(42)));
}

#[test]
fn unknown_runtime_class_falls_back_to_declared_class() {
    let classes = vec![
        Class::new(1, "Outer", vec![("inner", vec![2])]),
        Class::new(2, "Inner", vec![("x", vec![INT])]),
    ];
    let mut fixture = Fixture::new();
    fixture.object(1, |w| {
        w.i32(1);
        w.i32(55);
        w.i32(42);
    });
    let data = fixture.finish(&classes);
    let decoded = d2o::decode(&data).unwrap();
    let inner = decoded.objects[0].get("inner").and_then(DecodedValue::as_object).unwrap();
    assert_eq!(inner.class_name, "Inner");
    assert_eq!(inner.get("x"), Some(&DecodedValue::Int(42)));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn bad_header_fails() {
    let mut data = {
        let mut fixture = Fixture::new();
        fixture.object(1, |w| write_spell(w, 1));
        fixture.finish(&spell_classes())
    };
    data[2] = b'I';
    assert!(matches!(
        d2o::decode(&data),
        Err(D2oError::InvalidHeader { found }) if found == "D2I"
    ));
}

#[test]
fn unresolvable_scalar_reference_fails() {
    let classes = vec![Class::new(1, "Outer", vec![("inner", vec![2])])];
    let mut fixture = Fixture::new();
    fixture.object(1, |w| {
        w.i32(1);
        w.i32(3);
    });
    let data = fixture.finish(&classes);
    assert!(matches!(
        d2o::decode(&data),
        Err(D2oError::UnresolvedReference {
            class_id: 3,
            declared: 2,
            offset: 11
        })
    ));
}

#[test]
fn unknown_top_level_class_decodes_as_empty_object() {
    let classes = vec![Class::new(1, "Item", vec![("id", vec![INT])])];
    let mut fixture = Fixture::new();
    fixture.object(1, |w| {
        w.i32(99);
    });
    fixture.object(2, |w| {
        w.i32(1);
        w.i32(42);
    });
    let data = fixture.finish(&classes);

    let decoded = d2o::decode(&data).unwrap();
    assert_eq!(decoded.objects.len(), 2);
    assert_eq!(decoded.objects[0].class_name, "");
    assert!(decoded.objects[0].is_empty());
    assert_eq!(decoded.objects[1].get("id"), Some(&DecodedValue::Int(42)));
    assert_eq!(
        serde_json::to_value(&decoded.objects).unwrap(),
        json!([{"ClassType_": ""}, {"ClassType_": "Item", "id": 42}])
    );
}

#[test]
fn runaway_vector_schema_fails_the_file() {
    let mut tags = vec![VEC; 200_000];
    tags.push(INT);
    let classes = vec![Class::new(1, "Matrix", vec![("cells", tags)])];
    let data = Fixture::new().finish(&classes);
    assert!(matches!(
        d2o::decode(&data),
        Err(D2oError::NestingTooDeep { limit: MAX_DEPTH, .. })
    ));
}

#[test]
fn deepest_accepted_vector_schema_serializes() {
    let mut tags = vec![VEC; MAX_DEPTH];
    tags.push(INT);
    let classes = vec![Class::new(1, "Matrix", vec![("cells", tags)])];
    let data = Fixture::new().finish(&classes);
    let decoded = d2o::decode(&data).unwrap();
    let text = serde_json::to_string(&decoded).unwrap();
    assert_eq!(text.matches("\"subtype\"").count(), MAX_DEPTH);
}

#[test]
fn zero_type_tag_fails() {
    let classes = vec![Class::new(1, "Item", vec![("id", vec![0])])];
    let data = Fixture::new().finish(&classes);
    assert!(matches!(
        d2o::decode(&data),
        Err(D2oError::InvalidFieldType { tag: 0, .. })
    ));
}

#[test]
fn corrupted_vector_length_hits_end_of_buffer() {
    let classes = vec![Class::new(1, "Item", vec![("ids", vec![VEC, INT]), ("tail", vec![INT])])];
    let mut fixture = Fixture::new();
    fixture.object(1, |w| {
        w.i32(1);
        w.i32(1_000_000);
        w.i32(1);
        w.i32(2);
    });
    let data = fixture.finish(&classes);
    assert!(matches!(
        d2o::decode(&data),
        Err(D2oError::Buffer(BufferError::EndOfBuffer { .. }))
    ));
}

#[test]
fn index_pointer_past_end_fails() {
    let mut w = Writer::new();
    w.buf(b"D2O");
    w.i32(1_000);
    assert!(matches!(
        d2o::decode(&w.flush()),
        Err(D2oError::Buffer(BufferError::OutOfBounds { offset: 1_000, .. }))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = d2o::decode_file("/nonexistent/Spells.d2o").unwrap_err();
    assert!(matches!(err, D2oError::Io { .. }));
    assert!(err.to_string().contains("/nonexistent/Spells.d2o"));
}

// ---------------------------------------------------------------------------
// Object decoder byte accounting
// ---------------------------------------------------------------------------

#[test]
fn vector_of_vectors_consumes_declared_bytes() {
    let table = ClassTable::new();
    let class = dofus_data::ClassDescriptor {
        package_name: "p".into(),
        class_name: "Grid".into(),
        fields: vec![FieldDescriptor::vector(
            "cells",
            FieldDescriptor::vector("", FieldDescriptor::new("", FieldType::Integer)),
        )],
    };
    let mut w = Writer::new();
    w.i32(2);
    w.i32(0);
    w.i32(3);
    w.i32(7);
    w.i32(8);
    w.i32(9);
    w.i32(0x7e7e_7e7e);
    let data = w.flush();

    let mut reader = Reader::new(&data);
    let object = ObjectDecoder::new(&table).read_object(&mut reader, &class).unwrap();
    assert_eq!(reader.offset(), 4 + 4 + 4 + 3 * 4);
    assert_eq!(
        object.get("cells"),
        Some(&DecodedValue::Vector(vec![
            DecodedValue::Vector(vec![]),
            DecodedValue::Vector(vec![
                DecodedValue::Int(7),
                DecodedValue::Int(8),
                DecodedValue::Int(9)
            ]),
        ]))
    );
}

#[test]
fn nan_inside_vectors_is_absent() {
    let table = ClassTable::new();
    let class = dofus_data::ClassDescriptor {
        package_name: "p".into(),
        class_name: "Curve".into(),
        fields: vec![FieldDescriptor::vector(
            "points",
            FieldDescriptor::new("", FieldType::Number),
        )],
    };
    let mut w = Writer::new();
    w.i32(2);
    w.f64(f64::NAN);
    w.f64(0.5);
    let data = w.flush();
    let mut reader = Reader::new(&data);
    let object = ObjectDecoder::new(&table).read_object(&mut reader, &class).unwrap();
    assert_eq!(
        object.get("points"),
        Some(&DecodedValue::Vector(vec![
            DecodedValue::Absent,
            DecodedValue::Number(0.5)
        ]))
    );
}

#[test]
fn unknown_vector_element_does_not_stop_following_fields() {
    let mut table = ClassTable::new();
    table.insert(
        2,
        dofus_data::ClassDescriptor {
            package_name: "p".into(),
            class_name: "Reward".into(),
            fields: vec![FieldDescriptor::new("id", FieldType::Integer)],
        },
    );
    let class = dofus_data::ClassDescriptor {
        package_name: "p".into(),
        class_name: "Quest".into(),
        fields: vec![
            FieldDescriptor::vector("rewards", FieldDescriptor::new("", FieldType::Class(2))),
            FieldDescriptor::new("after", FieldType::Integer),
        ],
    };
    let mut w = Writer::new();
    w.i32(2);
    w.i32(404);
    w.i32(2);
    w.i32(5);
    w.i32(-1);
    let data = w.flush();
    let mut reader = Reader::new(&data);
    let object = ObjectDecoder::new(&table).read_object(&mut reader, &class).unwrap();
    let rewards = object.get("rewards").and_then(DecodedValue::as_vector).unwrap();
    assert!(rewards[0].is_absent());
    assert_eq!(
        rewards[1].as_object().and_then(|o| o.get("id")),
        Some(&DecodedValue::Int(5))
    );
    assert_eq!(object.get("after"), Some(&DecodedValue::Int(-1)));
    assert_eq!(reader.size(), 0);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn spell_file() -> Vec<u8> {
    let mut fixture = Fixture::new();
    fixture.object(1, |w| write_spell(w, 1));
    fixture.object(2, |w| write_spell(w, 2));
    fixture.finish(&spell_classes())
}

proptest! {
    #[test]
    fn truncated_files_fail_cleanly(cut in 0usize..200) {
        let data = spell_file();
        let cut = cut.min(data.len() - 1);
        prop_assert!(d2o::decode(&data[..cut]).is_err());
    }

    #[test]
    fn corrupted_bytes_never_panic(position in 0usize..200, byte in any::<u8>()) {
        let mut data = spell_file();
        let position = position % data.len();
        data[position] = byte;
        let _ = d2o::decode(&data);
    }
}
