//! Object records with full property descriptors.
//!
//! A property is either a data slot or an accessor pair, each carrying
//! writable/enumerable/configurable attributes. Array-flagged objects keep
//! dense elements separate from the named property table; extra string or
//! symbol keys attached to an array live in the table like on any object.

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::value::{Symbol, Value};

/// Property key (string, symbol, or array index).
#[derive(Clone, Debug)]
pub enum PropertyKey {
    /// String property key.
    String(Rc<str>),
    /// Symbol property key.
    Symbol(Rc<Symbol>),
    /// Integer index (for array elements).
    Index(u32),
}

impl PropertyKey {
    /// Create a string property key.
    pub fn string(s: &str) -> Self {
        Self::String(Rc::from(s))
    }

    /// Create a symbol property key.
    pub fn symbol(sym: Rc<Symbol>) -> Self {
        Self::Symbol(sym)
    }

    /// Create an index property key.
    pub fn index(i: u32) -> Self {
        Self::Index(i)
    }

    /// `true` for index keys.
    pub fn is_index(&self) -> bool {
        matches!(self, Self::Index(_))
    }
}

impl PartialEq for PropertyKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a.id() == b.id(),
            (Self::Index(a), Self::Index(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for PropertyKey {}

impl Hash for PropertyKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::String(s) => {
                0u8.hash(state);
                s.as_ref().hash(state);
            }
            Self::Symbol(sym) => {
                1u8.hash(state);
                sym.id().hash(state);
            }
            Self::Index(i) => {
                2u8.hash(state);
                i.hash(state);
            }
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}

impl From<u32> for PropertyKey {
    fn from(i: u32) -> Self {
        Self::Index(i)
    }
}

/// Property attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PropertyAttributes {
    /// Property is writable.
    pub writable: bool,
    /// Property is enumerable.
    pub enumerable: bool,
    /// Property is configurable.
    pub configurable: bool,
}

impl PropertyAttributes {
    /// Default data property attributes.
    pub const fn data() -> Self {
        Self {
            writable: true,
            enumerable: true,
            configurable: true,
        }
    }

    /// Writable but hidden from enumeration.
    pub const fn hidden() -> Self {
        Self {
            writable: true,
            enumerable: false,
            configurable: true,
        }
    }

    /// Attributes for accessor pairs (writability is meaningless there).
    pub const fn accessor() -> Self {
        Self {
            writable: false,
            enumerable: true,
            configurable: true,
        }
    }

    /// Non-writable, non-enumerable, non-configurable.
    pub const fn frozen() -> Self {
        Self {
            writable: false,
            enumerable: false,
            configurable: false,
        }
    }
}

/// Property descriptor.
#[derive(Clone, Debug)]
pub enum PropertyDescriptor {
    /// Data property.
    Data {
        /// The value slot.
        value: Value,
        /// Attributes.
        attributes: PropertyAttributes,
    },
    /// Accessor property.
    Accessor {
        /// Getter function.
        get: Option<Value>,
        /// Setter function.
        set: Option<Value>,
        /// Attributes.
        attributes: PropertyAttributes,
    },
}

impl PropertyDescriptor {
    /// Create a data property with default attributes.
    pub fn data(value: Value) -> Self {
        Self::Data {
            value,
            attributes: PropertyAttributes::data(),
        }
    }

    /// Create a data property with specific attributes.
    pub fn data_with_attrs(value: Value, attributes: PropertyAttributes) -> Self {
        Self::Data { value, attributes }
    }

    /// Create an accessor property.
    pub fn accessor(get: Option<Value>, set: Option<Value>, attributes: PropertyAttributes) -> Self {
        Self::Accessor {
            get,
            set,
            attributes,
        }
    }

    /// The value slot, for data properties.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Data { value, .. } => Some(value),
            Self::Accessor { .. } => None,
        }
    }

    /// The attributes of either descriptor kind.
    pub fn attributes(&self) -> PropertyAttributes {
        match self {
            Self::Data { attributes, .. } | Self::Accessor { attributes, .. } => *attributes,
        }
    }

    /// Check if writable. Accessors are never "writable" in the data sense.
    pub fn is_writable(&self) -> bool {
        match self {
            Self::Data { attributes, .. } => attributes.writable,
            Self::Accessor { .. } => false,
        }
    }
}

type PropertyTable = IndexMap<PropertyKey, PropertyDescriptor, FxBuildHasher>;

/// An object record: prototype link, insertion-ordered property table, and
/// (for array-flagged objects) dense elements.
///
/// Interior mutability via `RefCell`; the crate is single-threaded by
/// design, so no locking.
pub struct GraphObject {
    prototype: Option<Rc<GraphObject>>,
    properties: RefCell<PropertyTable>,
    elements: RefCell<Vec<Value>>,
    is_array: bool,
}

impl GraphObject {
    /// Create a new empty object. A `None` prototype marks a plain
    /// structural record; user-defined instances carry `Some`.
    pub fn new(prototype: Option<Rc<GraphObject>>) -> Self {
        Self {
            prototype,
            properties: RefCell::new(PropertyTable::default()),
            elements: RefCell::new(Vec::new()),
            is_array: false,
        }
    }

    /// Create a new array of `length` undefined elements.
    pub fn array(length: usize) -> Self {
        Self {
            prototype: None,
            properties: RefCell::new(PropertyTable::default()),
            elements: RefCell::new(vec![Value::undefined(); length]),
            is_array: true,
        }
    }

    /// Fresh instance of the "same constructor": same prototype, same
    /// array-ness, elements pre-sized to the current length, no properties.
    pub fn empty_like(&self) -> Self {
        Self {
            prototype: self.prototype.clone(),
            properties: RefCell::new(PropertyTable::default()),
            elements: RefCell::new(vec![Value::undefined(); self.elements.borrow().len()]),
            is_array: self.is_array,
        }
    }

    /// The prototype link.
    pub fn prototype(&self) -> Option<&Rc<GraphObject>> {
        self.prototype.as_ref()
    }

    /// Check if this object is array-flagged.
    pub fn is_array(&self) -> bool {
        self.is_array
    }

    /// Number of elements (zero for non-arrays).
    pub fn array_length(&self) -> usize {
        self.elements.borrow().len()
    }

    /// Element at `index`, if in bounds.
    pub fn element(&self, index: usize) -> Option<Value> {
        self.elements.borrow().get(index).cloned()
    }

    /// Store an element, extending the array if needed.
    pub fn set_element(&self, index: usize, value: Value) {
        let mut elements = self.elements.borrow_mut();
        if index >= elements.len() {
            elements.resize(index + 1, Value::undefined());
        }
        elements[index] = value;
    }

    /// Append an element.
    pub fn push(&self, value: Value) {
        self.elements.borrow_mut().push(value);
    }

    /// Data-path property read: own data slot, element, then prototype
    /// chain. Accessor properties yield `None` here; use [`read`] for
    /// accessor-aware reads.
    ///
    /// [`read`]: GraphObject::read
    pub fn get(&self, key: &PropertyKey) -> Option<Value> {
        if let Some(desc) = self.properties.borrow().get(key) {
            return desc.value().cloned();
        }
        if let PropertyKey::Index(i) = key
            && let Some(value) = self.element(*i as usize)
        {
            return Some(value);
        }
        if let Some(proto) = &self.prototype {
            return proto.get(key);
        }
        None
    }

    /// Data-path property write. Respects writability, keeps existing
    /// attributes on update, refuses accessor properties.
    pub fn set(&self, key: PropertyKey, value: Value) -> bool {
        if let PropertyKey::Index(i) = key {
            self.set_element(i as usize, value);
            return true;
        }
        let existing = self.properties.borrow().get(&key).cloned();
        match existing {
            Some(PropertyDescriptor::Data { attributes, .. }) => {
                if !attributes.writable {
                    return false;
                }
                self.properties
                    .borrow_mut()
                    .insert(key, PropertyDescriptor::Data { value, attributes });
                true
            }
            Some(PropertyDescriptor::Accessor { .. }) => false,
            None => {
                self.properties
                    .borrow_mut()
                    .insert(key, PropertyDescriptor::data(value));
                true
            }
        }
    }

    /// Accessor-aware read. Getters run with `self` as receiver; prototype
    /// properties are found but still see the original receiver.
    pub fn read(self: &Rc<Self>, key: &PropertyKey) -> Option<Value> {
        self.read_with_receiver(self, key)
    }

    fn read_with_receiver(&self, receiver: &Rc<GraphObject>, key: &PropertyKey) -> Option<Value> {
        // Clone the descriptor out so the borrow is released before any
        // getter runs (getters re-enter the property table).
        let own = self.properties.borrow().get(key).cloned();
        if let Some(desc) = own {
            return match desc {
                PropertyDescriptor::Data { value, .. } => Some(value),
                PropertyDescriptor::Accessor {
                    get: Some(Value::Function(getter)),
                    ..
                } => Some(getter.call(receiver, &[])),
                PropertyDescriptor::Accessor { .. } => Some(Value::undefined()),
            };
        }
        if let PropertyKey::Index(i) = key
            && let Some(value) = self.element(*i as usize)
        {
            return Some(value);
        }
        if let Some(proto) = &self.prototype {
            return proto.read_with_receiver(receiver, key);
        }
        None
    }

    /// Accessor-aware write. Setters run with `self` as receiver.
    pub fn write(self: &Rc<Self>, key: PropertyKey, value: Value) -> bool {
        if let PropertyKey::Index(i) = key {
            self.set_element(i as usize, value);
            return true;
        }
        let existing = self.properties.borrow().get(&key).cloned();
        match existing {
            Some(PropertyDescriptor::Accessor {
                set: Some(Value::Function(setter)),
                ..
            }) => {
                setter.call(self, &[value]);
                true
            }
            Some(PropertyDescriptor::Accessor { .. }) => false,
            _ => self.set(key, value),
        }
    }

    /// Define or replace a property with an explicit descriptor.
    pub fn define_property(&self, key: PropertyKey, desc: PropertyDescriptor) {
        self.properties.borrow_mut().insert(key, desc);
    }

    /// Delete a property. Refuses non-configurable properties.
    pub fn delete(&self, key: &PropertyKey) -> bool {
        let configurable = match self.properties.borrow().get(key) {
            Some(desc) => desc.attributes().configurable,
            None => return false,
        };
        if !configurable {
            return false;
        }
        self.properties.borrow_mut().shift_remove(key).is_some()
    }

    /// Check for an own property (named or element).
    pub fn has_own(&self, key: &PropertyKey) -> bool {
        if self.properties.borrow().contains_key(key) {
            return true;
        }
        if let PropertyKey::Index(i) = key {
            return (*i as usize) < self.elements.borrow().len();
        }
        false
    }

    /// Own property keys: element indices first, then named keys in
    /// insertion order.
    pub fn own_keys(&self) -> Vec<PropertyKey> {
        let mut keys: Vec<PropertyKey> = (0..self.elements.borrow().len())
            .map(|i| PropertyKey::Index(i as u32))
            .collect();
        keys.extend(self.properties.borrow().keys().cloned());
        keys
    }

    /// Own property descriptor for `key`. Elements are reported as plain
    /// writable data slots.
    pub fn get_own(&self, key: &PropertyKey) -> Option<PropertyDescriptor> {
        if let Some(desc) = self.properties.borrow().get(key) {
            return Some(desc.clone());
        }
        if let PropertyKey::Index(i) = key
            && let Some(value) = self.element(*i as usize)
        {
            return Some(PropertyDescriptor::data(value));
        }
        None
    }

    /// Snapshot of the named own descriptors (elements excluded). The
    /// borrow is released before the caller iterates, so cloning recursion
    /// may re-enter this object on cycles.
    pub fn own_descriptors(&self) -> Vec<(PropertyKey, PropertyDescriptor)> {
        self.properties
            .borrow()
            .iter()
            .map(|(k, d)| (k.clone(), d.clone()))
            .collect()
    }
}

impl fmt::Debug for GraphObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphObject")
            .field("properties", &self.properties.borrow().len())
            .field("elements", &self.elements.borrow().len())
            .field("is_array", &self.is_array)
            .finish()
    }
}
