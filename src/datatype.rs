// used to print out readable forms of a data type
use std::fmt;

use crate::construct::{DbId, ElementId, INVALID_ID};

// ------------- TimeStamp -------------
pub const MIN_TPS: u32 = 1;
pub const MAX_TPS: u32 = 1000;
pub const DEFAULT_TPS: u32 = 60;

/// A point in time counted in ticks at a given tick rate (ticks per second).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TimeStamp {
    tps: u32,
    ticks: i64,
}

impl TimeStamp {
    pub fn new(tps: u32, ticks: i64) -> Self {
        Self { tps, ticks }
    }
    pub fn tps(&self) -> u32 {
        self.tps
    }
    pub fn ticks(&self) -> i64 {
        self.ticks
    }
    pub fn is_legal(&self) -> bool {
        (MIN_TPS..=MAX_TPS).contains(&self.tps) && self.ticks >= 0
    }
}
impl fmt::Display for TimeStamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.tps == 0 {
            return write!(f, "{}@0tps", self.ticks);
        }
        let tps = self.tps as i64;
        let seconds = self.ticks / tps;
        let millis = (self.ticks % tps) * 1000 / tps;
        write!(
            f,
            "{:02}:{:02}:{:02}:{:03}",
            seconds / 3600,
            (seconds / 60) % 60,
            seconds % 60,
            millis
        )
    }
}

// ------------- PredicateInstance -------------
/// An invocation of a predicate vocabulary element. The target is held by
/// id only; `INVALID_ID` marks the empty predicate.
#[derive(Clone, Debug, PartialEq)]
pub struct PredicateInstance {
    db: DbId,
    pve_id: ElementId,
    args: Vec<DataValue>,
}

impl PredicateInstance {
    pub fn new(db: DbId, pve_id: ElementId, args: Vec<DataValue>) -> Self {
        Self { db, pve_id, args }
    }
    pub fn empty(db: DbId) -> Self {
        Self::new(db, INVALID_ID, Vec::new())
    }
    pub fn db(&self) -> DbId {
        self.db
    }
    pub fn pve_id(&self) -> ElementId {
        self.pve_id
    }
    pub fn args(&self) -> &[DataValue] {
        &self.args
    }
    pub fn is_empty(&self) -> bool {
        self.pve_id == INVALID_ID
    }
}
impl fmt::Display for PredicateInstance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let args: Vec<String> = self.args.iter().map(|a| a.value().to_string()).collect();
        write!(f, "#{}({})", self.pve_id, args.join(", "))
    }
}

// ------------- Literal -------------
/// A candidate value offered to a formal argument. Nominals, quoted strings
/// and text strings all arrive as `Str` and are told apart by legality.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    TimeStamp(TimeStamp),
    Predicate(PredicateInstance),
}
impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Int(v)
    }
}
impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        Literal::Float(v)
    }
}
impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::Str(v.to_owned())
    }
}
impl From<String> for Literal {
    fn from(v: String) -> Self {
        Literal::Str(v)
    }
}
impl From<TimeStamp> for Literal {
    fn from(v: TimeStamp) -> Self {
        Literal::TimeStamp(v)
    }
}
impl From<PredicateInstance> for Literal {
    fn from(v: PredicateInstance) -> Self {
        Literal::Predicate(v)
    }
}

// ------------- Value -------------
/// The payload of a data value. `None` is the empty value of a variant.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Placeholder carrying the name of the formal argument it stands in for.
    Undefined(String),
    Int(Option<i64>),
    Float(Option<f64>),
    Nominal(Option<String>),
    QuoteString(Option<String>),
    TextString(Option<String>),
    TimeStamp(Option<TimeStamp>),
    Predicate(Option<PredicateInstance>),
    QueryVariable(Option<String>),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Undefined(_) => "Undefined",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Nominal(_) => "Nominal",
            Value::QuoteString(_) => "QuoteString",
            Value::TextString(_) => "TextString",
            Value::TimeStamp(_) => "TimeStamp",
            Value::Predicate(_) => "Predicate",
            Value::QueryVariable(_) => "QueryVariable",
        }
    }
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Undefined(_) => true,
            Value::Int(v) => v.is_none(),
            Value::Float(v) => v.is_none(),
            Value::Nominal(v) | Value::QuoteString(v) | Value::TextString(v) => v.is_none(),
            Value::TimeStamp(v) => v.is_none(),
            Value::Predicate(v) => v.as_ref().is_none_or(PredicateInstance::is_empty),
            Value::QueryVariable(v) => v.is_none(),
        }
    }
}
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Undefined(name) => write!(f, "{}", name),
            Value::Int(Some(v)) => write!(f, "{}", v),
            Value::Float(Some(v)) => write!(f, "{:.6}", v),
            Value::Nominal(Some(v)) | Value::QueryVariable(Some(v)) => write!(f, "{}", v),
            Value::QuoteString(Some(v)) => write!(f, "\"{}\"", v),
            Value::TextString(Some(v)) => write!(f, "{}", v),
            Value::TimeStamp(Some(v)) => write!(f, "{}", v),
            Value::Predicate(Some(v)) => write!(f, "{}", v),
            _ => write!(f, "<{}>", self.kind()),
        }
    }
}

// ------------- DataValue -------------
/// A value bound to a formal argument position, referencing the argument
/// by id only.
#[derive(Clone, Debug, PartialEq)]
pub struct DataValue {
    farg_id: ElementId,
    value: Value,
}

impl DataValue {
    pub fn new(farg_id: ElementId, value: Value) -> Self {
        Self { farg_id, value }
    }
    pub fn farg_id(&self) -> ElementId {
        self.farg_id
    }
    pub fn value(&self) -> &Value {
        &self.value
    }
    pub fn into_value(self) -> Value {
        self.value
    }
}
impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}::<{}>", self.value, self.value.kind())
    }
}
