//! Error objects.
//!
//! An error is an object record whose `name` and `message` live as own
//! non-enumerable data properties, so property-level copying carries them
//! across like any other own property.

use std::fmt;
use std::rc::Rc;

use crate::object::{GraphObject, PropertyAttributes, PropertyDescriptor, PropertyKey};
use crate::value::Value;

/// An error value.
pub struct ErrorValue {
    object: Rc<GraphObject>,
}

impl ErrorValue {
    /// Create an error with name `Error`.
    pub fn new(message: &str) -> Self {
        Self::with_name("Error", message)
    }

    /// Create an error with an explicit name (`TypeError`, `RangeError`, …).
    pub fn with_name(name: &str, message: &str) -> Self {
        let object = GraphObject::new(None);
        object.define_property(
            PropertyKey::string("name"),
            PropertyDescriptor::data_with_attrs(Value::string(name), PropertyAttributes::hidden()),
        );
        object.define_property(
            PropertyKey::string("message"),
            PropertyDescriptor::data_with_attrs(
                Value::string(message),
                PropertyAttributes::hidden(),
            ),
        );
        Self {
            object: Rc::new(object),
        }
    }

    /// The object part holding all own properties.
    pub fn object(&self) -> &Rc<GraphObject> {
        &self.object
    }

    /// The `name` property, if still a string.
    pub fn name(&self) -> Option<String> {
        self.object
            .get(&PropertyKey::string("name"))
            .and_then(|v| v.as_str().map(str::to_string))
    }

    /// The `message` property, if still a string.
    pub fn message(&self) -> Option<String> {
        self.object
            .get(&PropertyKey::string("message"))
            .and_then(|v| v.as_str().map(str::to_string))
    }

    /// Fresh instance sharing the prototype, with no properties at all.
    /// Property-level copying is expected to fill it in.
    pub fn empty_like(&self) -> Self {
        Self {
            object: Rc::new(GraphObject::new(self.object.prototype().cloned())),
        }
    }
}

impl fmt::Debug for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), self.message()) {
            (Some(name), Some(message)) => write!(f, "{name}: {message}"),
            (Some(name), None) => write!(f, "{name}"),
            _ => write!(f, "Error"),
        }
    }
}
