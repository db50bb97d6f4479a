//! Dynamic values for heterogeneous object graphs.
//!
//! Primitives are stored inline; every composite lives behind an `Rc` so
//! that reference identity is observable. The clone engine keys its visited
//! map on [`Value::ptr_id`], which is why two `Value`s wrapping the same
//! `Rc` are "the same node" no matter how many times the graph reaches it.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::date::DateValue;
use crate::error_object::ErrorValue;
use crate::map_data::{MapValue, SetValue};
use crate::object::GraphObject;
use crate::regexp::RegExpValue;

/// Native function handler. The first argument is the receiver the function
/// was read off; accessors use it as their backing object.
pub type NativeFn = Rc<dyn Fn(&Rc<GraphObject>, &[Value]) -> Value>;

/// An opaque callable.
///
/// Functions are never cloned — closures cannot be safely duplicated — so
/// the engine always shares them by reference.
pub struct FunctionValue {
    /// Optional diagnostic name.
    pub name: Option<String>,
    /// The native handler.
    pub func: NativeFn,
}

impl FunctionValue {
    /// Invoke the function with `receiver` as its backing object.
    pub fn call(&self, receiver: &Rc<GraphObject>, args: &[Value]) -> Value {
        (self.func)(receiver, args)
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "[function {name}]"),
            None => write!(f, "[function]"),
        }
    }
}

thread_local! {
    static NEXT_SYMBOL_ID: Cell<u64> = const { Cell::new(1) };
}

/// A unique symbol. Two symbols with the same description are still
/// distinct keys; identity is the `id`.
#[derive(Debug)]
pub struct Symbol {
    description: Option<String>,
    id: u64,
}

impl Symbol {
    /// Create a fresh symbol with a unique id.
    pub fn new(description: Option<&str>) -> Rc<Self> {
        let id = NEXT_SYMBOL_ID.with(|next| {
            let id = next.get();
            next.set(id + 1);
            id
        });
        Rc::new(Self {
            description: description.map(str::to_string),
            id,
        })
    }

    /// Symbol description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Unique id.
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Arbitrary-precision integer, kept as its decimal string form.
#[derive(Debug)]
pub struct BigInt {
    /// Decimal digits (with optional leading `-`).
    pub digits: String,
}

/// A value node in a graph.
#[derive(Clone)]
pub enum Value {
    /// The undefined value.
    Undefined,
    /// The null value.
    Null,
    /// Boolean primitive.
    Boolean(bool),
    /// Numeric primitive (IEEE 754 double).
    Number(f64),
    /// Arbitrary-precision integer primitive.
    BigInt(Rc<BigInt>),
    /// Immutable string; copies share the allocation.
    String(Rc<str>),
    /// Unique symbol.
    Symbol(Rc<Symbol>),
    /// Opaque callable, shared by reference.
    Function(Rc<FunctionValue>),
    /// Plain record or user-defined instance.
    Object(Rc<GraphObject>),
    /// Array-flagged object with dense elements.
    Array(Rc<GraphObject>),
    /// Keyed map collection.
    Map(Rc<MapValue>),
    /// Set collection.
    Set(Rc<SetValue>),
    /// Date (epoch-milliseconds timestamp).
    Date(Rc<DateValue>),
    /// Compiled regular expression.
    RegExp(Rc<RegExpValue>),
    /// Error object.
    Error(Rc<ErrorValue>),
}

impl Value {
    /// Create the undefined value.
    pub const fn undefined() -> Self {
        Self::Undefined
    }

    /// Create the null value.
    pub const fn null() -> Self {
        Self::Null
    }

    /// Create a boolean value.
    pub const fn boolean(b: bool) -> Self {
        Self::Boolean(b)
    }

    /// Create a number value.
    pub const fn number(n: f64) -> Self {
        Self::Number(n)
    }

    /// Create a string value.
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Self::String(s.into())
    }

    /// Create a bigint value from its decimal digits.
    pub fn bigint(digits: impl Into<String>) -> Self {
        Self::BigInt(Rc::new(BigInt {
            digits: digits.into(),
        }))
    }

    /// Create a symbol value.
    pub fn symbol(sym: Rc<Symbol>) -> Self {
        Self::Symbol(sym)
    }

    /// Create a function value from a native handler.
    pub fn native_function<F>(name: &str, f: F) -> Self
    where
        F: Fn(&Rc<GraphObject>, &[Value]) -> Value + 'static,
    {
        Self::Function(Rc::new(FunctionValue {
            name: Some(name.to_string()),
            func: Rc::new(f),
        }))
    }

    /// Wrap a non-array object record.
    pub fn object(obj: Rc<GraphObject>) -> Self {
        debug_assert!(!obj.is_array());
        Self::Object(obj)
    }

    /// Wrap an array-flagged object.
    pub fn array(arr: Rc<GraphObject>) -> Self {
        debug_assert!(arr.is_array());
        Self::Array(arr)
    }

    /// Wrap a map collection.
    pub fn map(map: Rc<MapValue>) -> Self {
        Self::Map(map)
    }

    /// Wrap a set collection.
    pub fn set(set: Rc<SetValue>) -> Self {
        Self::Set(set)
    }

    /// Wrap a date.
    pub fn date(date: Rc<DateValue>) -> Self {
        Self::Date(date)
    }

    /// Wrap a regular expression.
    pub fn regexp(re: Rc<RegExpValue>) -> Self {
        Self::RegExp(re)
    }

    /// Wrap an error object.
    pub fn error(err: Rc<ErrorValue>) -> Self {
        Self::Error(err)
    }

    /// `true` for the undefined value.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// `true` for the null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Boolean payload, if this is a boolean.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric payload, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// String payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// BigInt payload, if this is a bigint.
    pub fn as_bigint(&self) -> Option<&Rc<BigInt>> {
        match self {
            Self::BigInt(b) => Some(b),
            _ => None,
        }
    }

    /// Symbol payload, if this is a symbol.
    pub fn as_symbol(&self) -> Option<&Rc<Symbol>> {
        match self {
            Self::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Function payload, if this is a function.
    pub fn as_function(&self) -> Option<&Rc<FunctionValue>> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Object record, if this is a non-array object.
    pub fn as_object(&self) -> Option<&Rc<GraphObject>> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Object record, if this is an array.
    pub fn as_array(&self) -> Option<&Rc<GraphObject>> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Map payload, if this is a map.
    pub fn as_map(&self) -> Option<&Rc<MapValue>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Set payload, if this is a set.
    pub fn as_set(&self) -> Option<&Rc<SetValue>> {
        match self {
            Self::Set(s) => Some(s),
            _ => None,
        }
    }

    /// Date payload, if this is a date.
    pub fn as_date(&self) -> Option<&Rc<DateValue>> {
        match self {
            Self::Date(d) => Some(d),
            _ => None,
        }
    }

    /// RegExp payload, if this is a regular expression.
    pub fn as_regexp(&self) -> Option<&Rc<RegExpValue>> {
        match self {
            Self::RegExp(r) => Some(r),
            _ => None,
        }
    }

    /// Error payload, if this is an error object.
    pub fn as_error(&self) -> Option<&Rc<ErrorValue>> {
        match self {
            Self::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Reference identity of the heap allocation behind this value, or
    /// `None` for inline primitives.
    pub fn ptr_id(&self) -> Option<usize> {
        match self {
            Self::Undefined | Self::Null | Self::Boolean(_) | Self::Number(_) => None,
            Self::BigInt(b) => Some(Rc::as_ptr(b) as usize),
            Self::String(s) => Some(Rc::as_ptr(s) as *const u8 as usize),
            Self::Symbol(s) => Some(Rc::as_ptr(s) as usize),
            Self::Function(f) => Some(Rc::as_ptr(f) as usize),
            Self::Object(o) | Self::Array(o) => Some(Rc::as_ptr(o) as usize),
            Self::Map(m) => Some(Rc::as_ptr(m) as usize),
            Self::Set(s) => Some(Rc::as_ptr(s) as usize),
            Self::Date(d) => Some(Rc::as_ptr(d) as usize),
            Self::RegExp(r) => Some(Rc::as_ptr(r) as usize),
            Self::Error(e) => Some(Rc::as_ptr(e) as usize),
        }
    }

    /// `true` when both values wrap the same heap allocation. Always
    /// `false` for inline primitives.
    pub fn same_ref(&self, other: &Value) -> bool {
        match (self.ptr_id(), other.ptr_id()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::BigInt(b) => write!(f, "{}n", b.digits),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Symbol(s) => match s.description() {
                Some(d) => write!(f, "Symbol({d})"),
                None => write!(f, "Symbol()"),
            },
            Self::Function(func) => func.fmt(f),
            Self::Object(o) | Self::Array(o) => o.fmt(f),
            Self::Map(m) => m.fmt(f),
            Self::Set(s) => s.fmt(f),
            Self::Date(d) => d.fmt(f),
            Self::RegExp(r) => r.fmt(f),
            Self::Error(e) => e.fmt(f),
        }
    }
}
