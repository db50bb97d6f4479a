//! Cycle-safe structural equality.
//!
//! `deep_eq` compares two value graphs by shape and content rather than by
//! reference: numbers under SameValueZero, strings and bigints by content,
//! symbols and functions by identity, composites recursively. A pair of
//! nodes already under comparison is assumed equal, which terminates on
//! cyclic graphs.

use std::rc::Rc;

use rustc_hash::FxHashSet;

use crate::object::{GraphObject, PropertyDescriptor};
use crate::value::Value;

type SeenPairs = FxHashSet<(usize, usize)>;

/// Structural equality over two value graphs.
pub fn deep_eq(a: &Value, b: &Value) -> bool {
    let mut seen = SeenPairs::default();
    eq_value(a, b, &mut seen)
}

fn same_value_zero(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Record a pair as in-progress. Returns `false` when the pair is already
/// being compared (treat as equal to break the cycle).
fn enter(seen: &mut SeenPairs, a: usize, b: usize) -> bool {
    seen.insert((a, b))
}

fn eq_value(a: &Value, b: &Value, seen: &mut SeenPairs) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Boolean(x), Value::Boolean(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => same_value_zero(*x, *y),
        (Value::BigInt(x), Value::BigInt(y)) => x.digits == y.digits,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Symbol(x), Value::Symbol(y)) => x.id() == y.id(),
        (Value::Function(x), Value::Function(y)) => Rc::ptr_eq(x, y),
        (Value::Object(x), Value::Object(y)) | (Value::Array(x), Value::Array(y)) => {
            eq_objects(x, y, seen)
        }
        (Value::Map(x), Value::Map(y)) => {
            if Rc::ptr_eq(x, y) {
                return true;
            }
            if !enter(seen, Rc::as_ptr(x) as usize, Rc::as_ptr(y) as usize) {
                return true;
            }
            let (ea, eb) = (x.entries(), y.entries());
            ea.len() == eb.len()
                && ea.iter().zip(&eb).all(|((ka, va), (kb, vb))| {
                    eq_value(ka, kb, seen) && eq_value(va, vb, seen)
                })
                && eq_objects(x.object(), y.object(), seen)
        }
        (Value::Set(x), Value::Set(y)) => {
            if Rc::ptr_eq(x, y) {
                return true;
            }
            if !enter(seen, Rc::as_ptr(x) as usize, Rc::as_ptr(y) as usize) {
                return true;
            }
            let (ma, mb) = (x.members(), y.members());
            ma.len() == mb.len()
                && ma.iter().zip(&mb).all(|(va, vb)| eq_value(va, vb, seen))
                && eq_objects(x.object(), y.object(), seen)
        }
        (Value::Date(x), Value::Date(y)) => {
            same_value_zero(x.timestamp(), y.timestamp()) && eq_objects(x.object(), y.object(), seen)
        }
        (Value::RegExp(x), Value::RegExp(y)) => {
            x.source() == y.source()
                && x.flags() == y.flags()
                && eq_objects(x.object(), y.object(), seen)
        }
        (Value::Error(x), Value::Error(y)) => eq_objects(x.object(), y.object(), seen),
        _ => false,
    }
}

fn eq_objects(a: &Rc<GraphObject>, b: &Rc<GraphObject>, seen: &mut SeenPairs) -> bool {
    if Rc::ptr_eq(a, b) {
        return true;
    }
    if !enter(seen, Rc::as_ptr(a) as usize, Rc::as_ptr(b) as usize) {
        return true;
    }
    if a.is_array() != b.is_array() || a.array_length() != b.array_length() {
        return false;
    }
    for i in 0..a.array_length() {
        match (a.element(i), b.element(i)) {
            (Some(ea), Some(eb)) if eq_value(&ea, &eb, seen) => {}
            _ => return false,
        }
    }
    let descriptors = a.own_descriptors();
    if descriptors.len() != b.own_descriptors().len() {
        return false;
    }
    for (key, desc_a) in descriptors {
        let Some(desc_b) = b.get_own(&key) else {
            return false;
        };
        if !eq_descriptor(&desc_a, &desc_b, seen) {
            return false;
        }
    }
    true
}

fn eq_descriptor(a: &PropertyDescriptor, b: &PropertyDescriptor, seen: &mut SeenPairs) -> bool {
    match (a, b) {
        (
            PropertyDescriptor::Data { value: va, .. },
            PropertyDescriptor::Data { value: vb, .. },
        ) => eq_value(va, vb, seen),
        (
            PropertyDescriptor::Accessor { get: ga, set: sa, .. },
            PropertyDescriptor::Accessor { get: gb, set: sb, .. },
        ) => opt_same_ref(ga, gb) && opt_same_ref(sa, sb),
        _ => false,
    }
}

fn opt_same_ref(a: &Option<Value>, b: &Option<Value>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => x.same_ref(y),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::PropertyKey;

    fn obj() -> Rc<GraphObject> {
        Rc::new(GraphObject::new(None))
    }

    #[test]
    fn primitives_compare_by_value() {
        assert!(deep_eq(&Value::number(1.0), &Value::number(1.0)));
        assert!(deep_eq(&Value::number(f64::NAN), &Value::number(f64::NAN)));
        assert!(deep_eq(&Value::number(0.0), &Value::number(-0.0)));
        assert!(deep_eq(&Value::string("a"), &Value::string("a")));
        assert!(!deep_eq(&Value::string("a"), &Value::number(1.0)));
    }

    #[test]
    fn objects_compare_structurally() {
        let a = obj();
        a.set(PropertyKey::string("x"), Value::number(1.0));
        let b = obj();
        b.set(PropertyKey::string("x"), Value::number(1.0));
        assert!(deep_eq(&Value::object(a.clone()), &Value::object(b.clone())));

        b.set(PropertyKey::string("y"), Value::number(2.0));
        assert!(!deep_eq(&Value::object(a), &Value::object(b)));
    }

    #[test]
    fn cyclic_graphs_terminate() {
        let a = obj();
        a.set(PropertyKey::string("me"), Value::object(a.clone()));
        let b = obj();
        b.set(PropertyKey::string("me"), Value::object(b.clone()));
        assert!(deep_eq(&Value::object(a), &Value::object(b)));
    }

    #[test]
    fn functions_compare_by_identity() {
        let f = Value::native_function("f", |_, _| Value::undefined());
        let g = Value::native_function("g", |_, _| Value::undefined());
        assert!(deep_eq(&f, &f.clone()));
        assert!(!deep_eq(&f, &g));
    }
}
