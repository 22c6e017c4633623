mod common;

use chrono::{NaiveDate, TimeDelta};
use common::*;
use indexmap::IndexMap;
use serde_graph::conformance::{Harness, Mismatch};
use serde_graph::{Codec, ErrorKind, GeneratedCodec, Options, Record, Registry, TagMode, Value};

fn all_modes(base: Options) -> Vec<Options> {
    [TagMode::Names, TagMode::Aliases, TagMode::Ids]
        .into_iter()
        .map(|mode| base.clone().with_tag_mode(mode))
        .collect()
}

fn check_all<T: Record>(registry: &Registry, value: &T) {
    for options in all_modes(Options::new()) {
        let harness = Harness::<T>::new(registry, options).unwrap();
        harness.check_round_trip(value).unwrap();
    }
}

fn sample_tree() -> SampleTree {
    SampleTree {
        value: 11,
        children: Some(vec![
            SampleTree {
                value: 12,
                children: Some(vec![]),
            },
            SampleTree {
                value: 13,
                children: None,
            },
        ]),
    }
}

#[test]
fn test_simple_records_agree() {
    let registry = Registry::new();
    check_all(
        &registry,
        &Sample1 {
            x: 345,
            y: "test".to_string(),
        },
    );
    check_all(&registry, &Sample1::default());
    check_all(
        &registry,
        &SampleLong {
            s: i64::MIN,
            u: u64::MAX,
        },
    );
    check_all(
        &registry,
        &SampleSmallTypes {
            b: 198,
            ch: 'A',
            sb: -109,
            sh: -2000,
            ush: 2001,
        },
    );
    check_all(
        &registry,
        &SampleFloat {
            f: 1e-20,
            d: -3.1415e100,
        },
    );
    check_all(&registry, &Sample4 { e: SampleEnum::E2 });
}

#[test]
fn test_nested_records_agree() {
    let registry = Registry::new();
    check_all(&registry, &sample_tree());
    check_all(
        &registry,
        &SampleRect {
            a: SamplePoint { x: 33, y: 44 },
            b: SamplePoint { x: 55, y: 66 },
        },
    );

    let mut children = IndexMap::new();
    children.insert(
        "a".to_string(),
        SampleDict {
            value: 5,
            children: Some(IndexMap::new()),
        },
    );
    check_all(
        &registry,
        &SampleDict {
            value: 3,
            children: Some(children),
        },
    );
}

#[test]
fn test_polymorphic_records_agree() {
    let registry = Registry::new();
    check_all(
        &registry,
        &SampleWithCollection {
            a: vec![ISample::Interfaced(SampleInterfaced { x: 9 })],
            b: vec![7, 6],
        },
    );
    check_all(
        &registry,
        &SampleClassList {
            e: vec![
                AnyBase::Base(SampleBase { fbase: 1 }),
                AnyBase::A(SampleDerivedA::default()),
                AnyBase::B(SampleDerivedB {
                    fb: 4,
                    ..Default::default()
                }),
            ],
        },
    );
}

#[test]
fn test_special_members_agree() {
    let registry = Registry::new();
    check_all(
        &registry,
        &SampleDate {
            d: NaiveDate::from_ymd_opt(2011, 3, 25)
                .unwrap()
                .and_hms_opt(12, 30, 1)
                .unwrap(),
            t: TimeDelta::seconds(3 * 86_400 + 1),
        },
    );

    let mut delegate = SampleSelfDelegate {
        x: 77,
        ..Default::default()
    };
    delegate.on_something.bind("Handler2", SampleSelfDelegate::handler2);
    check_all(&registry, &delegate);
    check_all(&registry, &SampleWithNullField::default());
    check_all(&registry, &SampleCollection { items: vec![2, 5, 4] });
}

#[test]
fn test_option_variants_agree() {
    let registry = Registry::new();
    let value = SampleRect {
        a: SamplePoint { x: 1, y: 2 },
        b: SamplePoint { x: 3, y: 4 },
    };
    for base in [
        Options::compact(),
        Options::new().with_ignore_compact(true),
        Options::new().with_save_root_class(true),
        Options::new().with_field_separator(" ").with_indent(""),
    ] {
        for options in all_modes(base) {
            let harness = Harness::<SampleRect>::new(&registry, options).unwrap();
            harness.check_round_trip(&value).unwrap();
        }
    }

    let compact_root = Harness::<SamplePoint>::new(&registry, Options::compact()).unwrap();
    assert_eq!(compact_root.check_write(&SamplePoint { x: 5, y: 6 }).unwrap(), "[5,6]");
    let tagged_root =
        Harness::<SamplePoint>::new(&registry, Options::compact().with_save_root_class(true)).unwrap();
    let text = tagged_root.check_write(&SamplePoint { x: 5, y: 6 }).unwrap();
    assert!(text.starts_with(r#"{"class":"#));
}

#[test]
fn test_failures_agree() {
    let registry = Registry::new();
    let harness = Harness::<Sample1>::new(&registry, Options::new()).unwrap();
    for input in [
        "{}",
        r#"{ "X" }"#,
        "nn",
        r#"{ "X": 1, "Y": "\z" }"#,
        "{ ,}",
        r#"{ "Y": "q" }"#,
        "[]",
        r#"{ "class": "Q" }"#,
        "",
        r#"{ "X": 1"#,
        r#"{ "X": 1, "Z": 2 }"#,
        r#"{ "X": 1 } 2"#,
        "      z",
    ] {
        harness.check_read(input).unwrap();
    }

    let points = Harness::<SamplePoint>::new(&registry, Options::new()).unwrap();
    for input in [r#"[ "QQ" ]"#, "[1]", "[1,2,3]", r#"{"X":1}"#] {
        points.check_read(input).unwrap();
    }
}

#[test]
fn test_merges_agree() {
    let registry = Registry::new();
    let harness = Harness::<Sample1>::new(&registry, Options::new()).unwrap();
    let initial = Sample1 {
        x: 1,
        y: "kept".to_string(),
    };
    harness.check_merge(r#"{"X":999}"#, &initial).unwrap();
    harness.check_merge(r#"{"X":5,"Y":7}"#, &initial).unwrap();

    let collection = Harness::<SampleCollection>::new(&registry, Options::new()).unwrap();
    collection
        .check_merge("[7]", &SampleCollection { items: vec![1, 2] })
        .unwrap();
}

#[test]
fn test_declaration_errors_match() {
    let registry = Registry::new();
    let err = GeneratedCodec::<Bad1>::generate(&registry, Options::new()).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Declaration);

    let err = GeneratedCodec::<Empty>::generate(&registry, Options::new()).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Declaration);

    let lenient = Options::new().with_allow_empty_types(true);
    let harness = Harness::<Empty>::new(&registry, lenient).unwrap();
    harness.check_round_trip(&Empty).unwrap();
}

#[test]
fn test_counted_array_accepted_by_generated_only() {
    let registry = Registry::new();
    let counted = "{\n\"A\":[\n3,\n\"a\",\n\"b\",\n\"c\"\n]\n}";

    let codec = GeneratedCodec::<SampleArray>::generate(&registry, Options::new()).unwrap();
    let value = codec.from_str(counted).unwrap();
    assert_eq!(
        value.a.as_deref(),
        Some(&["a".to_string(), "b".to_string(), "c".to_string()][..])
    );

    let err = registry
        .from_str::<SampleArray>(counted, &Options::new())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);

    let harness = Harness::<SampleArray>::new(&registry, Options::new()).unwrap();
    match harness.check_read(counted) {
        Err(Mismatch::ReadOutcome {
            reflective,
            generated,
            ..
        }) => {
            assert_eq!(reflective, Some(ErrorKind::TypeMismatch));
            assert_eq!(generated, None);
        }
        other => panic!("expected a read outcome mismatch, got {:?}", other),
    }

    let uncounted = codec.from_str("{\n\"A\":[\n\"a\"\n]\n}").unwrap();
    assert_eq!(uncounted.a.as_deref(), Some(&["a".to_string()][..]));
}

#[test]
fn test_numeric_fixed_arrays_agree() {
    let registry = Registry::new();
    let value = SampleNumericArrays {
        levels: vec![SampleEnum::E1, SampleEnum::E3].into_boxed_slice(),
        slots: vec![Some(3), Some(4), None].into_boxed_slice(),
        values: vec![Value::from(2), Value::from("x")].into_boxed_slice(),
    };
    check_all(&registry, &value);
    for options in all_modes(Options::compact()) {
        let harness = Harness::<SampleNumericArrays>::new(&registry, options).unwrap();
        harness.check_round_trip(&value).unwrap();
    }

    let codec = GeneratedCodec::<SampleNumericArrays>::generate(&registry, Options::compact()).unwrap();
    let read = codec.from_str(r#"{"L":[0,2],"S":[3,4],"V":[1]}"#).unwrap();
    assert_eq!(&read.levels[..], &[SampleEnum::E1, SampleEnum::E3][..]);
    assert_eq!(&read.slots[..], &[Some(3), Some(4)][..]);
    assert_eq!(&read.values[..], &[Value::Number(1.0)][..]);
}

#[test]
fn test_counted_array_must_match_its_count() {
    let registry = Registry::new();
    let codec = GeneratedCodec::<SampleArray>::generate(&registry, Options::new()).unwrap();
    for input in [r#"{"A":[2,"a"]}"#, r#"{"A":[1,"a","b"]}"#, r#"{"A":[1]}"#] {
        let err = codec.from_str(input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedToken, "{}", input);
    }
    let empty = codec.from_str(r#"{"A":[0]}"#).unwrap();
    assert_eq!(empty.a.as_deref(), Some(&[][..]));
}

#[test]
fn test_class_tag_placement_agrees() {
    let registry = Registry::new();
    let harness = Harness::<Sample1>::new(&registry, Options::new()).unwrap();
    for input in [
        r#"{"class":"tests.Sample1","X":1}"#,
        r#"{"X":1,"class":"tests.Sample1"}"#,
        r#"{"class":"tests.Sample1","class":"tests.Sample1","X":1}"#,
        r#"{"X":1,"class":"Q"}"#,
    ] {
        harness.check_read(input).unwrap();
    }
    let lenient = Harness::<Sample1>::new(&registry, Options::new().with_ignore_new_fields(true)).unwrap();
    lenient.check_read(r#"{"X":1,"Z":2,"class":"tests.Sample1"}"#).unwrap();

    let codec = GeneratedCodec::<Sample1>::generate(&registry, Options::new()).unwrap();
    let err = codec.from_str(r#"{"X":1,"class":"tests.Sample1"}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedToken);
}

#[test]
fn test_generated_loop_failures_agree() {
    let registry = Registry::new();
    let dates = Harness::<SampleDate>::new(&registry, Options::new()).unwrap();
    for input in [
        r#"{"D":"2011-03-25","T":"999999999999999999.00:00:00"}"#,
        r#"{"D":"2011-03-25","T":"1.00:00:00"}"#,
        r#"{"D":"never","T":"00:00:01"}"#,
    ] {
        dates.check_read(input).unwrap();
    }

    let floats = Harness::<SampleFloat>::new(&registry, Options::new()).unwrap();
    for input in [r#"{"F":1e300,"D":1}"#, r#"{"F":1.5,"D":1e300}"#, r#"{"F":"1","D":1}"#] {
        floats.check_read(input).unwrap();
    }

    let trees = Harness::<SampleTree>::new(&registry, Options::new()).unwrap();
    for input in [
        r#"{"Value":1,"Children":[{"Value":2}]}"#,
        r#"{"Children":null}"#,
        r#"{"Value":1,"Children":[{"Value":"x"}]}"#,
        r#"{"Value":1,"Value":2}"#,
        "{",
    ] {
        trees.check_read(input).unwrap();
    }
}

#[test]
fn test_generated_plan_follows_tag_mode() {
    let registry = Registry::new();
    let options = Options::compact().with_tag_mode(TagMode::Aliases);
    let codec = GeneratedCodec::<SampleTree>::generate(&registry, options).unwrap();
    let plan = codec.plan();
    assert_eq!(plan.keys[0].1, "\"a\":");
    assert_eq!(plan.keys[1].1, "\"b\":");
    assert_eq!(plan.lookup.get("b"), Some(&1));
    assert!(!plan.compact);

    let text = codec
        .to_string(&SampleTree {
            value: 9,
            children: None,
        })
        .unwrap();
    assert_eq!(text, r#"{"a":9,"b":null}"#);
}
