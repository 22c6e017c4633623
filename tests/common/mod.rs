//! Fixture records shared by the integration tests.
#![allow(dead_code)]

use chrono::{NaiveDateTime, TimeDelta};
use indexmap::IndexMap;
use serde_graph::{enumeration, polymorphic, Delegate, Describe, MapKey, Record, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Sample1 {
    pub x: i32,
    pub y: String,
}

impl Default for Sample1 {
    fn default() -> Self {
        Sample1 {
            x: 0,
            y: "zzz".to_string(),
        }
    }
}

impl Record for Sample1 {
    fn describe(d: &mut Describe<Self>) {
        d.class_key("tests.Sample1");
        d.member("X", |s| &s.x, |s| &mut s.x);
        d.defaulted("Y", "zzz".to_string(), |s| &s.y, |s| &mut s.y);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sample2 {
    pub x: i32,
    pub y: String,
}

impl Record for Sample2 {
    fn describe(d: &mut Describe<Self>) {
        d.class_key("tests.Sample2");
        d.member("X", |s| &s.x, |s| &mut s.x);
        d.optional("Y", |s| &s.y, |s| &mut s.y);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sample3 {
    pub s1: Sample1,
    pub f: i32,
    pub s2: Sample2,
}

impl Record for Sample3 {
    fn describe(d: &mut Describe<Self>) {
        d.class_key("tests.Sample3");
        d.member("S1", |s| &s.s1, |s| &mut s.s1);
        d.member("F", |s| &s.f, |s| &mut s.f);
        d.member("S2", |s| &s.s2, |s| &mut s.s2);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleLong {
    pub s: i64,
    pub u: u64,
}

impl Record for SampleLong {
    fn describe(d: &mut Describe<Self>) {
        d.member("S", |s| &s.s, |s| &mut s.s);
        d.member("U", |s| &s.u, |s| &mut s.u);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SampleSmallTypes {
    pub b: u8,
    pub ch: char,
    pub sb: i8,
    pub sh: i16,
    pub ush: u16,
}

impl Default for SampleSmallTypes {
    fn default() -> Self {
        SampleSmallTypes {
            b: 0,
            ch: ' ',
            sb: 0,
            sh: 0,
            ush: 0,
        }
    }
}

impl Record for SampleSmallTypes {
    fn describe(d: &mut Describe<Self>) {
        d.member("B", |s| &s.b, |s| &mut s.b);
        d.member("Ch", |s| &s.ch, |s| &mut s.ch);
        d.member("Sb", |s| &s.sb, |s| &mut s.sb);
        d.member("Sh", |s| &s.sh, |s| &mut s.sh);
        d.member("USh", |s| &s.ush, |s| &mut s.ush);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleBool {
    pub b: bool,
}

impl Record for SampleBool {
    fn describe(d: &mut Describe<Self>) {
        d.member("B", |s| &s.b, |s| &mut s.b);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleFloat {
    pub f: f32,
    pub d: f64,
}

impl Record for SampleFloat {
    fn describe(d: &mut Describe<Self>) {
        d.member("F", |s| &s.f, |s| &mut s.f);
        d.member("D", |s| &s.d, |s| &mut s.d);
    }
}

enumeration! {
    pub enum SampleEnum {
        E1 = 0,
        E2 = 1,
        E3 = 2,
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sample4 {
    pub e: SampleEnum,
}

impl Record for Sample4 {
    fn describe(d: &mut Describe<Self>) {
        d.member("E", |s| &s.e, |s| &mut s.e);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleTree {
    pub value: i32,
    pub children: Option<Vec<SampleTree>>,
}

impl Record for SampleTree {
    fn describe(d: &mut Describe<Self>) {
        d.member("Value", |s| &s.value, |s| &mut s.value);
        d.optional("Children", |s| &s.children, |s| &mut s.children);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleList {
    pub e: Vec<String>,
}

impl Record for SampleList {
    fn describe(d: &mut Describe<Self>) {
        d.member("E", |s| &s.e, |s| &mut s.e);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleDict {
    pub value: i32,
    pub children: Option<IndexMap<String, SampleDict>>,
}

impl Record for SampleDict {
    fn describe(d: &mut Describe<Self>) {
        d.member("Value", |s| &s.value, |s| &mut s.value);
        d.optional("Children", |s| &s.children, |s| &mut s.children);
    }
}

/// Dictionary key without a built-in text form; written as `"3!"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SampleKey {
    pub v: i32,
}

impl MapKey for SampleKey {
    fn to_key(&self) -> String {
        format!("{}!", self.v)
    }
}

pub fn parse_sample_key(text: &str) -> Option<SampleKey> {
    text.strip_suffix('!')?.parse().ok().map(|v| SampleKey { v })
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleDictKeys {
    pub e: IndexMap<SampleEnum, i32>,
    pub i: IndexMap<i32, i32>,
    pub k: IndexMap<SampleKey, i32>,
}

impl Record for SampleDictKeys {
    fn describe(d: &mut Describe<Self>) {
        d.member("E", |s| &s.e, |s| &mut s.e);
        d.member("I", |s| &s.i, |s| &mut s.i);
        d.member("K", |s| &s.k, |s| &mut s.k);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleArray {
    pub a: Option<Box<[String]>>,
}

impl Record for SampleArray {
    fn describe(d: &mut Describe<Self>) {
        d.member("A", |s| &s.a, |s| &mut s.a);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SamplePoint {
    pub x: i32,
    pub y: i32,
}

impl Record for SamplePoint {
    fn describe(d: &mut Describe<Self>) {
        d.compact();
        d.member("X", |s| &s.x, |s| &mut s.x);
        d.member("Y", |s| &s.y, |s| &mut s.y);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleRect {
    pub a: SamplePoint,
    pub b: SamplePoint,
}

impl Record for SampleRect {
    fn describe(d: &mut Describe<Self>) {
        d.member("A", |s| &s.a, |s| &mut s.a);
        d.member("B", |s| &s.b, |s| &mut s.b);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleMatrix {
    pub m: Vec<Vec<i32>>,
}

impl Record for SampleMatrix {
    fn describe(d: &mut Describe<Self>) {
        d.member("M", |s| &s.m, |s| &mut s.m);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleBase {
    pub fbase: i32,
}

impl Record for SampleBase {
    fn describe(d: &mut Describe<Self>) {
        d.class_key("tests.SampleBase");
        d.member("FBase", |s| &s.fbase, |s| &mut s.fbase);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleDerivedA {
    pub base: SampleBase,
    pub fa: i32,
}

impl Record for SampleDerivedA {
    fn describe(d: &mut Describe<Self>) {
        d.class_key("tests.SampleDerivedA");
        d.base(|s| &s.base, |s| &mut s.base);
        d.member("FA", |s| &s.fa, |s| &mut s.fa);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleDerivedB {
    pub base: SampleBase,
    pub fb: i32,
}

impl Record for SampleDerivedB {
    fn describe(d: &mut Describe<Self>) {
        d.class_key("tests.SampleDerivedB");
        d.base(|s| &s.base, |s| &mut s.base);
        d.member("FB", |s| &s.fb, |s| &mut s.fb);
    }
}

polymorphic! {
    pub enum AnyBase {
        Base(SampleBase),
        A(SampleDerivedA),
        B(SampleDerivedB),
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleClassList {
    pub e: Vec<AnyBase>,
}

impl Record for SampleClassList {
    fn describe(d: &mut Describe<Self>) {
        d.class_key("tests.SampleClassList");
        d.member("E", |s| &s.e, |s| &mut s.e);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleInterfaced {
    pub x: i32,
}

impl Record for SampleInterfaced {
    fn describe(d: &mut Describe<Self>) {
        d.class_key("tests.SampleInterfaced");
        d.member("X", |s| &s.x, |s| &mut s.x);
    }
}

polymorphic! {
    pub enum ISample {
        Interfaced(SampleInterfaced),
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleInterfaceField {
    pub i: Option<ISample>,
}

impl Record for SampleInterfaceField {
    fn describe(d: &mut Describe<Self>) {
        d.class_key("tests.SampleInterfaceField");
        d.member("I", |s| &s.i, |s| &mut s.i);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleWithCollection {
    pub a: Vec<ISample>,
    pub b: Vec<i32>,
}

impl Record for SampleWithCollection {
    fn describe(d: &mut Describe<Self>) {
        d.member("A", |s| &s.a, |s| &mut s.a);
        d.member("B", |s| &s.b, |s| &mut s.b);
    }
}

/// Collection-like record: written as its item list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleCollection {
    pub items: Vec<i32>,
}

impl Record for SampleCollection {
    fn describe(d: &mut Describe<Self>) {
        d.items(|s| &s.items, |s| &mut s.items);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleObj {
    pub f: Value,
}

impl Record for SampleObj {
    fn describe(d: &mut Describe<Self>) {
        d.class_key("tests.SampleObj");
        d.member("F", |s| &s.f, |s| &mut s.f);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleDate {
    pub d: NaiveDateTime,
    pub t: TimeDelta,
}

impl Record for SampleDate {
    fn describe(d: &mut Describe<Self>) {
        d.member("D", |s| &s.d, |s| &mut s.d);
        d.member("T", |s| &s.t, |s| &mut s.t);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleSelfDelegate {
    pub on_something: Delegate<SampleSelfDelegate, i32>,
    pub x: i32,
}

impl SampleSelfDelegate {
    pub fn handler1(&mut self, a: i32) {
        self.x += a;
    }

    pub fn handler2(&mut self, a: i32) {
        self.x *= a;
    }
}

type Handler = fn(&mut SampleSelfDelegate, i32);

const HANDLERS: &[(&str, Handler)] = &[
    ("Handler1", SampleSelfDelegate::handler1),
    ("Handler2", SampleSelfDelegate::handler2),
];

impl Record for SampleSelfDelegate {
    fn describe(d: &mut Describe<Self>) {
        d.delegate("OnSomething", |s| &s.on_something, |s| &mut s.on_something, HANDLERS);
        d.member("x", |s| &s.x, |s| &mut s.x);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleAfter {
    pub x: String,
}

impl Record for SampleAfter {
    fn describe(d: &mut Describe<Self>) {
        d.member("X", |s| &s.x, |s| &mut s.x);
        d.after_read(|s| s.x.push('1'));
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleAfter2 {
    pub base: SampleAfter,
}

impl Record for SampleAfter2 {
    fn describe(d: &mut Describe<Self>) {
        d.base(|s| &s.base, |s| &mut s.base);
        d.after_read(|s| s.base.x.push('2'));
        d.after_read(|s| s.base.x.push('3'));
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleWithNullField {
    pub about: Option<String>,
}

impl Record for SampleWithNullField {
    fn describe(d: &mut Describe<Self>) {
        d.member("About", |s| &s.about, |s| &mut s.about);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Empty;

impl Record for Empty {
    fn describe(_d: &mut Describe<Self>) {}
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleCollectionWithField {
    pub items: Vec<i32>,
    pub extra: i32,
}

impl Record for SampleCollectionWithField {
    fn describe(d: &mut Describe<Self>) {
        d.items(|s| &s.items, |s| &mut s.items);
        d.member("Extra", |s| &s.extra, |s| &mut s.extra);
    }
}

/// Declares `F` twice.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bad1 {
    pub f: i32,
}

impl Record for Bad1 {
    fn describe(d: &mut Describe<Self>) {
        d.member("F", |s| &s.f, |s| &mut s.f);
        d.member("F", |s| &s.f, |s| &mut s.f);
    }
}

/// Compact record with a list member `F`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bad2 {
    pub f: Vec<i32>,
}

impl Record for Bad2 {
    fn describe(d: &mut Describe<Self>) {
        d.compact();
        d.member("F", |s| &s.f, |s| &mut s.f);
    }
}

/// `G` reuses the alias pinned on `F`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bad3 {
    pub f: i32,
    pub g: i32,
}

impl Record for Bad3 {
    fn describe(d: &mut Describe<Self>) {
        d.member("F", |s| &s.f, |s| &mut s.f).alias("x");
        d.member("G", |s| &s.g, |s| &mut s.g).alias("x");
    }
}

/// Fixed arrays whose elements are written as numbers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleNumericArrays {
    pub levels: Box<[SampleEnum]>,
    pub slots: Box<[Option<i32>]>,
    pub values: Box<[Value]>,
}

impl Record for SampleNumericArrays {
    fn describe(d: &mut Describe<Self>) {
        d.member("L", |s| &s.levels, |s| &mut s.levels);
        d.member("S", |s| &s.slots, |s| &mut s.slots);
        d.member("V", |s| &s.values, |s| &mut s.values);
    }
}
