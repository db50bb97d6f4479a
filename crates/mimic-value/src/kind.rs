//! Value classification.
//!
//! `kind_of` is the closed type dispatch the clone engine switches on;
//! `is_plain_object` decides whether an object is a plain structural
//! record or a user-defined "instance". Both are pure and total.

use crate::value::Value;

/// Closed enumeration of value kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    /// The undefined value.
    Undefined,
    /// The null value.
    Null,
    /// Boolean primitive.
    Boolean,
    /// Number primitive.
    Number,
    /// BigInt primitive.
    BigInt,
    /// String primitive.
    String,
    /// Symbol primitive.
    Symbol,
    /// Callable.
    Function,
    /// Array-flagged object.
    Array,
    /// Plain record or opaque instance.
    Object,
    /// Keyed map collection.
    Map,
    /// Set collection.
    Set,
    /// Date.
    Date,
    /// Regular expression.
    RegExp,
    /// Error object.
    Error,
}

impl Kind {
    /// `true` for kinds that are copied by value or shared by identity
    /// without any structural work.
    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            Self::Undefined
                | Self::Null
                | Self::Boolean
                | Self::Number
                | Self::BigInt
                | Self::String
                | Self::Symbol
        )
    }
}

/// Classify a value into exactly one [`Kind`].
pub fn kind_of(value: &Value) -> Kind {
    match value {
        Value::Undefined => Kind::Undefined,
        Value::Null => Kind::Null,
        Value::Boolean(_) => Kind::Boolean,
        Value::Number(_) => Kind::Number,
        Value::BigInt(_) => Kind::BigInt,
        Value::String(_) => Kind::String,
        Value::Symbol(_) => Kind::Symbol,
        Value::Function(_) => Kind::Function,
        Value::Object(_) => Kind::Object,
        Value::Array(_) => Kind::Array,
        Value::Map(_) => Kind::Map,
        Value::Set(_) => Kind::Set,
        Value::Date(_) => Kind::Date,
        Value::RegExp(_) => Kind::RegExp,
        Value::Error(_) => Kind::Error,
    }
}

/// `true` for object values with no prototype link: plain structural
/// records. Objects carrying a prototype are opaque instances.
pub fn is_plain_object(value: &Value) -> bool {
    matches!(value, Value::Object(o) if o.prototype().is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::GraphObject;
    use std::rc::Rc;

    #[test]
    fn classifies_each_variant() {
        assert_eq!(kind_of(&Value::undefined()), Kind::Undefined);
        assert_eq!(kind_of(&Value::number(1.0)), Kind::Number);
        assert_eq!(kind_of(&Value::string("s")), Kind::String);
        assert_eq!(
            kind_of(&Value::array(Rc::new(GraphObject::array(0)))),
            Kind::Array
        );
        assert_eq!(
            kind_of(&Value::object(Rc::new(GraphObject::new(None)))),
            Kind::Object
        );
    }

    #[test]
    fn primitive_kinds() {
        assert!(Kind::Undefined.is_primitive());
        assert!(Kind::BigInt.is_primitive());
        assert!(!Kind::Function.is_primitive());
        assert!(!Kind::Array.is_primitive());
    }

    #[test]
    fn plain_versus_instance() {
        let plain = Value::object(Rc::new(GraphObject::new(None)));
        assert!(is_plain_object(&plain));

        let proto = Rc::new(GraphObject::new(None));
        let instance = Value::object(Rc::new(GraphObject::new(Some(proto))));
        assert!(!is_plain_object(&instance));

        assert!(!is_plain_object(&Value::array(Rc::new(GraphObject::array(0)))));
    }
}
