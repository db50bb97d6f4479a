//! Dynamic value model for heterogeneous object graphs.
//!
//! The central type is [`Value`], a reference-semantics sum over the
//! primitives plus objects, arrays, maps, sets, dates, regexps, and errors.
//! Heap variants share their payload through `Rc`, so two `Value` handles
//! can point at the same node and graphs may contain cycles. [`GraphObject`]
//! carries the property machinery (descriptors, attributes, prototype
//! links), [`MapData`]/[`SetData`] the keyed collections with SameValueZero
//! key equality, and [`deep_eq`] the cycle-safe structural comparison used
//! throughout the test suites.

#![warn(clippy::all)]
#![warn(missing_docs)]

pub mod compare;
pub mod date;
pub mod error;
pub mod error_object;
pub mod kind;
pub mod map_data;
pub mod object;
pub mod regexp;
pub mod registry;
pub mod value;

pub use compare::deep_eq;
pub use date::DateValue;
pub use error::{ValueError, ValueResult};
pub use error_object::ErrorValue;
pub use kind::{Kind, is_plain_object, kind_of};
pub use map_data::{MapData, MapKey, MapValue, SetData, SetValue};
pub use object::{GraphObject, PropertyAttributes, PropertyDescriptor, PropertyKey};
pub use regexp::RegExpValue;
pub use registry::SymbolRegistry;
pub use value::{BigInt, FunctionValue, NativeFn, Symbol, Value};
