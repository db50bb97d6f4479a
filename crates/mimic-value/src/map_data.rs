//! Backing data structures for map and set collections.
//!
//! SameValueZero key semantics via `MapKey`, insertion-ordered slot storage
//! where deletion never shifts later entries. `MapValue`/`SetValue` couple
//! the data part with a `GraphObject` so collections can carry extra own
//! properties like any other object.

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::object::GraphObject;
use crate::value::Value;

// Type discriminant tags for hashing
const HASH_TAG_UNDEFINED: u8 = 0;
const HASH_TAG_NULL: u8 = 1;
const HASH_TAG_BOOL: u8 = 2;
const HASH_TAG_FLOAT64: u8 = 3;
const HASH_TAG_BIGINT: u8 = 4;
const HASH_TAG_STRING: u8 = 5;
const HASH_TAG_SYMBOL: u8 = 6;
const HASH_TAG_HEAP: u8 = 7;

/// Normalize a float for SameValueZero hashing: -0 → +0, NaN → canonical
/// NaN bits.
fn normalize_float_bits(n: f64) -> u64 {
    if n == 0.0 {
        0u64 // both +0 and -0 hash the same
    } else if n.is_nan() {
        0x7FF8_0000_0000_0000u64 // canonical NaN
    } else {
        n.to_bits()
    }
}

/// `Value` wrapper with SameValueZero `Hash`/`Eq` for collection keys.
///
/// Strings and bigints compare by content, numbers by normalized bits
/// (NaN equals NaN, -0 equals +0), everything heap-allocated by reference.
#[derive(Clone)]
pub struct MapKey(Value);

impl MapKey {
    /// Wrap a value as a key.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Returns a reference to the underlying value.
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Consumes the key and returns the underlying value.
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl Hash for MapKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.0 {
            Value::Undefined => HASH_TAG_UNDEFINED.hash(state),
            Value::Null => HASH_TAG_NULL.hash(state),
            Value::Boolean(b) => {
                HASH_TAG_BOOL.hash(state);
                b.hash(state);
            }
            Value::Number(n) => {
                HASH_TAG_FLOAT64.hash(state);
                normalize_float_bits(*n).hash(state);
            }
            Value::BigInt(b) => {
                HASH_TAG_BIGINT.hash(state);
                b.digits.hash(state);
            }
            Value::String(s) => {
                HASH_TAG_STRING.hash(state);
                s.as_ref().hash(state);
            }
            Value::Symbol(s) => {
                HASH_TAG_SYMBOL.hash(state);
                s.id().hash(state);
            }
            other => {
                HASH_TAG_HEAP.hash(state);
                other.ptr_id().hash(state);
            }
        }
    }
}

impl PartialEq for MapKey {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => {
                normalize_float_bits(*a) == normalize_float_bits(*b)
            }
            (Value::BigInt(a), Value::BigInt(b)) => a.digits == b.digits,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a.id() == b.id(),
            (a, b) => a.same_ref(b),
        }
    }
}

impl Eq for MapKey {}

impl fmt::Debug for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MapKey({:?})", self.0)
    }
}

// ============================================================================
// MapData
// ============================================================================

/// Internal storage for a map collection.
///
/// An entry slot vector in insertion order plus a key lookup table that
/// holds slot indices. Deleting leaves the slot as `None` rather than
/// shifting, so indices in the lookup table never go stale.
pub struct MapData {
    inner: RefCell<MapDataInner>,
}

struct MapDataInner {
    /// Entry slots in insertion order; deleted slots stay as `None`.
    entries: Vec<Option<(MapKey, Value)>>,
    /// Key to its slot in `entries`.
    index: FxHashMap<MapKey, usize>,
    /// Live slot count.
    size: usize,
}

impl Default for MapData {
    fn default() -> Self {
        Self::new()
    }
}

impl MapData {
    /// Create an empty map store.
    pub fn new() -> Self {
        Self {
            inner: RefCell::new(MapDataInner {
                entries: Vec::new(),
                index: FxHashMap::default(),
                size: 0,
            }),
        }
    }

    /// Number of live entries.
    pub fn size(&self) -> usize {
        self.inner.borrow().size
    }

    /// Get the value associated with `key`, or `None`.
    pub fn get(&self, key: &MapKey) -> Option<Value> {
        let inner = self.inner.borrow();
        if let Some(&idx) = inner.index.get(key)
            && let Some(Some((_, v))) = inner.entries.get(idx)
        {
            return Some(v.clone());
        }
        None
    }

    /// Returns `true` if `key` exists.
    pub fn has(&self, key: &MapKey) -> bool {
        self.inner.borrow().index.contains_key(key)
    }

    /// Insert or update an entry. Returns `true` on update; an updated
    /// entry keeps its original position.
    pub fn set(&self, key: MapKey, value: Value) -> bool {
        let mut inner = self.inner.borrow_mut();
        if let Some(&idx) = inner.index.get(&key) {
            inner.entries[idx] = Some((key, value));
            true
        } else {
            let idx = inner.entries.len();
            inner.index.insert(key.clone(), idx);
            inner.entries.push(Some((key, value)));
            inner.size += 1;
            false
        }
    }

    /// Delete `key`. Returns `true` if it existed.
    pub fn delete(&self, key: &MapKey) -> bool {
        let mut inner = self.inner.borrow_mut();
        if let Some(idx) = inner.index.remove(key) {
            inner.entries[idx] = None; // slot stays, index entries keep working
            inner.size -= 1;
            true
        } else {
            false
        }
    }

    /// Remove all entries. The slot vector is dropped outright, not
    /// emptied slot by slot; no index survives a clear.
    pub fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.entries.clear();
        inner.index.clear();
        inner.size = 0;
    }

    /// Snapshot of the live entries in insertion order. The borrow is
    /// released before the caller iterates, so callbacks (and cloning
    /// recursion) may re-enter this map.
    pub fn entries(&self) -> Vec<(Value, Value)> {
        let inner = self.inner.borrow();
        let mut result = Vec::with_capacity(inner.size);
        for (k, v) in inner.entries.iter().flatten() {
            result.push((k.value().clone(), v.clone()));
        }
        result
    }
}

impl fmt::Debug for MapData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MapData(size={})", self.inner.borrow().size)
    }
}

// ============================================================================
// SetData
// ============================================================================

/// Internal storage for a set collection.
///
/// Member-only variant of the `MapData` slot layout.
pub struct SetData {
    inner: RefCell<SetDataInner>,
}

struct SetDataInner {
    entries: Vec<Option<MapKey>>,
    index: FxHashMap<MapKey, usize>,
    size: usize,
}

impl Default for SetData {
    fn default() -> Self {
        Self::new()
    }
}

impl SetData {
    /// Create an empty set store.
    pub fn new() -> Self {
        Self {
            inner: RefCell::new(SetDataInner {
                entries: Vec::new(),
                index: FxHashMap::default(),
                size: 0,
            }),
        }
    }

    /// Number of live entries.
    pub fn size(&self) -> usize {
        self.inner.borrow().size
    }

    /// Returns `true` if `key` exists.
    pub fn has(&self, key: &MapKey) -> bool {
        self.inner.borrow().index.contains_key(key)
    }

    /// Add a member. Returns `true` if it was already present (no-op).
    pub fn add(&self, key: MapKey) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.index.contains_key(&key) {
            return true;
        }
        let idx = inner.entries.len();
        inner.index.insert(key.clone(), idx);
        inner.entries.push(Some(key));
        inner.size += 1;
        false
    }

    /// Delete `key`. Returns `true` if it existed.
    pub fn delete(&self, key: &MapKey) -> bool {
        let mut inner = self.inner.borrow_mut();
        if let Some(idx) = inner.index.remove(key) {
            inner.entries[idx] = None;
            inner.size -= 1;
            true
        } else {
            false
        }
    }

    /// Remove all members.
    pub fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.entries.clear();
        inner.index.clear();
        inner.size = 0;
    }

    /// Snapshot of the live members in insertion order.
    pub fn members(&self) -> Vec<Value> {
        let inner = self.inner.borrow();
        let mut result = Vec::with_capacity(inner.size);
        for k in inner.entries.iter().flatten() {
            result.push(k.value().clone());
        }
        result
    }
}

impl fmt::Debug for SetData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SetData(size={})", self.inner.borrow().size)
    }
}

// ============================================================================
// MapValue / SetValue
// ============================================================================

/// A map collection value: keyed data plus an object part for extra own
/// properties.
pub struct MapValue {
    object: Rc<GraphObject>,
    data: MapData,
}

impl MapValue {
    /// Create an empty map with no prototype.
    pub fn new() -> Self {
        Self::with_prototype(None)
    }

    /// Create an empty map whose object part carries `prototype`.
    pub fn with_prototype(prototype: Option<Rc<GraphObject>>) -> Self {
        Self {
            object: Rc::new(GraphObject::new(prototype)),
            data: MapData::new(),
        }
    }

    /// Fresh empty instance of the "same constructor" (same prototype).
    pub fn empty_like(&self) -> Self {
        Self::with_prototype(self.object.prototype().cloned())
    }

    /// The object part holding extra own properties.
    pub fn object(&self) -> &Rc<GraphObject> {
        &self.object
    }

    /// Number of entries.
    pub fn size(&self) -> usize {
        self.data.size()
    }

    /// Value for `key` under SameValueZero, if present.
    pub fn get(&self, key: &Value) -> Option<Value> {
        self.data.get(&MapKey::new(key.clone()))
    }

    /// Returns `true` if `key` is present.
    pub fn has(&self, key: &Value) -> bool {
        self.data.has(&MapKey::new(key.clone()))
    }

    /// Insert or update an entry. Returns `true` on update.
    pub fn set(&self, key: Value, value: Value) -> bool {
        self.data.set(MapKey::new(key), value)
    }

    /// Delete an entry. Returns `true` if it existed.
    pub fn delete(&self, key: &Value) -> bool {
        self.data.delete(&MapKey::new(key.clone()))
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.data.clear();
    }

    /// Snapshot of the entries in insertion order.
    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.data.entries()
    }
}

impl Default for MapValue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MapValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Map(size={})", self.size())
    }
}

/// A set collection value: member data plus an object part for extra own
/// properties.
pub struct SetValue {
    object: Rc<GraphObject>,
    data: SetData,
}

impl SetValue {
    /// Create an empty set with no prototype.
    pub fn new() -> Self {
        Self::with_prototype(None)
    }

    /// Create an empty set whose object part carries `prototype`.
    pub fn with_prototype(prototype: Option<Rc<GraphObject>>) -> Self {
        Self {
            object: Rc::new(GraphObject::new(prototype)),
            data: SetData::new(),
        }
    }

    /// Fresh empty instance of the "same constructor" (same prototype).
    pub fn empty_like(&self) -> Self {
        Self::with_prototype(self.object.prototype().cloned())
    }

    /// The object part holding extra own properties.
    pub fn object(&self) -> &Rc<GraphObject> {
        &self.object
    }

    /// Number of members.
    pub fn size(&self) -> usize {
        self.data.size()
    }

    /// Returns `true` if `value` is a member under SameValueZero.
    pub fn has(&self, value: &Value) -> bool {
        self.data.has(&MapKey::new(value.clone()))
    }

    /// Add a member. Returns `true` if it was already present.
    pub fn add(&self, value: Value) -> bool {
        self.data.add(MapKey::new(value))
    }

    /// Delete a member. Returns `true` if it existed.
    pub fn delete(&self, value: &Value) -> bool {
        self.data.delete(&MapKey::new(value.clone()))
    }

    /// Remove all members.
    pub fn clear(&self) {
        self.data.clear();
    }

    /// Snapshot of the members in insertion order.
    pub fn members(&self) -> Vec<Value> {
        self.data.members()
    }
}

impl Default for SetValue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Set(size={})", self.size())
    }
}
