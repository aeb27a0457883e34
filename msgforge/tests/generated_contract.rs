//! Behavioral tests for the generated-type contract.
//!
//! The `support` module holds checked-in samples of compiler output; these
//! tests pin the runtime-visible guarantees: codec round trips, tag
//! precedence on decode, setter purity with no-op preservation, union
//! discrimination, and the cached default/hash semantics.

mod support;

use msgforge::{CompactMessage, MapKey, Message, Value};
use proptest::prelude::*;

use support::point::{Point, PointProps, PointUpdate};
use support::shapes::{Circle, CircleProps, Drawing, DrawingProps, DrawingShape, Square, SquareProps};

fn sample_point() -> Point {
    Point::construct(PointProps {
        x: 1.0,
        y: 2.0,
        tags: vec!["a".to_string(), "b".to_string()],
    })
    .unwrap()
}

#[test]
fn tagged_round_trip_is_structural_identity() {
    let point = sample_point();
    let back = Point::deserialize(&point.serialize()).unwrap();
    assert!(back.equals(&point));
    assert_eq!(back.hash_code(), point.hash_code());
}

#[test]
fn compact_round_trip_is_structural_identity() {
    let circle = Circle::construct(CircleProps { radius: 2.5 }).unwrap();
    let back = Circle::from_compact(&circle.to_compact()).unwrap();
    assert!(back.equals(&circle));

    let embedded = circle.to_compact_embedded();
    assert!(embedded.starts_with("Circle~"));
    let back = Circle::from_compact_embedded(&embedded).unwrap();
    assert!(back.equals(&circle));
}

#[test]
fn numeric_tag_key_beats_name_key() {
    // Payload carries both the tag key "1" and the legacy name key "x" for
    // the same logical field; the tag value must win.
    let text = r#"{"$type": "Point", "fields": {"1": 10.0, "x": 99.0, "2": 0.0, "tags": []}}"#;
    let point = Point::deserialize(text).unwrap();
    assert_eq!(point.x(), 10.0);
}

#[test]
fn renamed_field_still_decodes_by_tag() {
    // A pre-rename payload that only knows tag 1 decodes fine regardless of
    // what the field is called today.
    let text = r#"{"$type": "Point", "fields": {"1": 4.0, "2": 5.0, "3": []}}"#;
    let point = Point::deserialize(text).unwrap();
    assert_eq!(point.x(), 4.0);
    assert_eq!(point.y(), 5.0);
}

#[test]
fn setter_with_equal_value_shares_storage() {
    let point = sample_point();
    let same = point.set_x(point.x()).unwrap();
    assert!(point.shares_storage(&same));

    let changed = point.set_x(5.0).unwrap();
    assert!(!point.shares_storage(&changed));
    assert_eq!(changed.x(), 5.0);
    // The receiver is untouched.
    assert_eq!(point.x(), 1.0);
}

#[test]
fn pop_on_empty_array_shares_storage() {
    let empty = Point::construct(PointProps::default()).unwrap();
    assert!(empty.shares_storage(&empty.pop_tags()));
    assert!(empty.shares_storage(&empty.shift_tags()));
}

#[test]
fn filtering_nothing_shares_storage() {
    let point = sample_point();
    let spliced = point.splice_tags(0, 0, &[]);
    assert!(point.shares_storage(&spliced));

    let sorted = point.sort_tags_by(|a, b| a.cmp(b));
    assert!(point.shares_storage(&sorted)); // already sorted

    let filled = point.fill_tags(&"a".to_string(), 0, 1);
    assert!(point.shares_storage(&filled)); // slot already holds "a"
}

#[test]
fn collection_mutators_copy_on_write() {
    let point = sample_point();
    let grown = point.push_tags("c".to_string());
    assert_eq!(grown.tags(), ["a", "b", "c"]);
    assert_eq!(point.tags(), ["a", "b"]);

    let reversed = point.reverse_tags();
    assert_eq!(reversed.tags(), ["b", "a"]);

    let front = point.unshift_tags("z".to_string());
    assert_eq!(front.tags(), ["z", "a", "b"]);
}

#[test]
fn bulk_update_skips_none_keys() {
    let point = sample_point();
    let updated = point
        .update(PointUpdate {
            x: Some(9.0),
            y: None,
            tags: None,
        })
        .unwrap();
    assert_eq!(updated.x(), 9.0);
    assert_eq!(updated.y(), 2.0);

    // An update that changes nothing shares storage.
    let untouched = point.update(PointUpdate::default()).unwrap();
    assert!(point.shares_storage(&untouched));
}

#[test]
fn construction_validates_immediately() {
    let err = Point::construct(PointProps {
        x: 0.0,
        y: -1.0,
        tags: vec![],
    })
    .unwrap_err();
    assert_eq!(err.field, "y");
    assert_eq!(err.code, "range.min");

    // Skip-validation stores the invalid value untouched.
    let raw = Point::construct_unchecked(PointProps {
        x: 0.0,
        y: -1.0,
        tags: vec![],
    });
    assert_eq!(raw.y(), -1.0);
}

#[test]
fn validate_all_collects_without_failing() {
    let mut entries = std::collections::BTreeMap::new();
    entries.insert(MapKey::Str("y".to_string()), Value::Float(-3.0));
    // x and tags missing, y out of range: three issues.
    let issues = Point::validate_all(&Value::Map(entries));
    assert_eq!(issues.len(), 3);

    let codes: Vec<&str> = issues.errors().iter().map(|e| e.code.as_str()).collect();
    assert!(codes.contains(&"range.min"));
    assert!(codes.contains(&"field.missing"));
}

#[test]
fn default_instance_is_a_singleton() {
    let a = Point::default_instance();
    let b = Point::default_instance();
    assert!(a.shares_storage(b));
    assert_eq!(a.x(), 0.0);
    assert!(a.tags().is_empty());
}

#[test]
fn hash_code_is_deterministic_and_structural() {
    let a = sample_point();
    let b = Point::construct(PointProps {
        x: 1.0,
        y: 2.0,
        tags: vec!["a".to_string(), "b".to_string()],
    })
    .unwrap();

    assert!(!a.shares_storage(&b));
    assert!(a.equals(&b));
    assert_eq!(a.hash_code(), b.hash_code());
    // Cached: repeated calls agree.
    assert_eq!(a.hash_code(), a.hash_code());

    let c = a.set_y(3.0).unwrap();
    assert_ne!(a.hash_code(), c.hash_code());
}

#[test]
fn is_instance_discriminates_by_type_id() {
    let point = sample_point();
    let circle = Circle::construct(CircleProps { radius: 1.0 }).unwrap();

    assert!(Point::is_instance(&point.serialize()));
    assert!(!Point::is_instance(&circle.serialize()));
    assert!(Circle::is_instance(&circle.to_compact_embedded()));
    assert!(!Circle::is_instance(&Square::construct(SquareProps { side: 1.0 })
        .unwrap()
        .to_compact_embedded()));
}

#[test]
fn union_round_trip_decodes_concrete_member() {
    let drawing = Drawing::construct(DrawingProps {
        name: "d".to_string(),
        shape: DrawingShape::Square(Square::construct(SquareProps { side: 3.0 }).unwrap()),
    })
    .unwrap();

    let back = Drawing::deserialize(&drawing.serialize()).unwrap();
    assert!(back.equals(&drawing));
    match back.shape() {
        DrawingShape::Square(square) => assert_eq!(square.side(), 3.0),
        other => panic!("expected a square, got {:?}", other),
    }
}

#[test]
fn union_disambiguates_on_discriminator_prefix_alone() {
    // Both members are compact; the embedded strings differ only in their
    // discriminator prefix.
    let circle_text = r#"{"$type": "Drawing", "fields": {"1": "c", "2": "Circle~2.5"}}"#;
    let square_text = r#"{"$type": "Drawing", "fields": {"1": "s", "2": "Square~2.5"}}"#;

    match Drawing::deserialize(circle_text).unwrap().shape() {
        DrawingShape::Circle(circle) => assert_eq!(circle.radius(), 2.5),
        other => panic!("expected a circle, got {:?}", other),
    }
    match Drawing::deserialize(square_text).unwrap().shape() {
        DrawingShape::Square(square) => assert_eq!(square.side(), 2.5),
        other => panic!("expected a square, got {:?}", other),
    }
}

#[test]
fn union_with_no_matching_member_is_an_error() {
    let text = r#"{"$type": "Drawing", "fields": {"1": "d", "2": "Triangle~9"}}"#;
    let err = Drawing::deserialize(text).unwrap_err();
    assert!(err.to_string().contains("no union member"));
}

proptest! {
    #[test]
    fn prop_set_equal_value_always_shares(x in -1e6_f64..1e6, y in 0.0_f64..1e6) {
        let point = Point::construct(PointProps { x, y, tags: vec![] }).unwrap();
        let same = point.set_x(point.x()).unwrap();
        prop_assert!(point.shares_storage(&same));
        let same = point.set_y(point.y()).unwrap();
        prop_assert!(point.shares_storage(&same));
    }

    #[test]
    fn prop_round_trip(x in -1e6_f64..1e6, y in 0.0_f64..1e6, tags in proptest::collection::vec("[a-z]{1,8}", 0..5)) {
        let point = Point::construct(PointProps { x, y, tags }).unwrap();
        let back = Point::deserialize(&point.serialize()).unwrap();
        prop_assert!(back.equals(&point));
    }

    #[test]
    fn prop_splice_insert_equal_segment_shares(tags in proptest::collection::vec("[a-z]{1,4}", 1..6)) {
        let point = Point::construct(PointProps { x: 0.0, y: 0.0, tags: tags.clone() }).unwrap();
        // Replacing any segment with itself is a no-op.
        let spliced = point.splice_tags(0, tags.len(), &tags);
        prop_assert!(point.shares_storage(&spliced));
    }
}
