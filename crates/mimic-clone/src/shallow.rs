//! One-level cloning.
//!
//! A shallow clone reallocates exactly the container it is handed. Elements,
//! entries, members, and property value slots are copied by reference, never
//! recursed into, so the clone and the original share all children. There is
//! no visited map; the only state is the hook re-entrancy guard.

use std::rc::Rc;

use mimic_value::{GraphObject, Kind, MapValue, SetValue, Value, is_plain_object, kind_of};

use crate::context::CloneContext;
use crate::policy::Instancing;

/// One-level clone with the default [`Instancing::Off`] policy.
pub fn clone_shallow(value: &Value) -> Value {
    clone_shallow_with(value, &Instancing::Off)
}

/// One-level clone under an explicit instancing policy.
pub fn clone_shallow_with(value: &Value, policy: &Instancing) -> Value {
    let mut ctx = CloneContext::new();
    clone_shallow_in(value, policy, &mut ctx)
}

/// One-level clone inside an existing context. This is the entry a custom
/// hook uses to delegate back into the engine; the shared context keeps the
/// hook's re-entrancy guard consistent across that recursion.
pub fn clone_shallow_in(value: &Value, policy: &Instancing, ctx: &mut CloneContext) -> Value {
    match (kind_of(value), value) {
        (Kind::Object, Value::Object(obj)) => clone_object_shallow(value, obj, policy, ctx),
        (Kind::Array, Value::Array(arr)) => clone_array_shallow(arr),
        (Kind::Map, Value::Map(map)) => clone_map_shallow(map),
        (Kind::Set, Value::Set(set)) => clone_set_shallow(set),
        _ => clone_leaf(value),
    }
}

fn clone_object_shallow(
    value: &Value,
    obj: &Rc<GraphObject>,
    policy: &Instancing,
    ctx: &mut CloneContext,
) -> Value {
    if let Instancing::Hook(hook) = policy {
        let id = Rc::as_ptr(obj) as usize;
        if ctx.hook_enter(id) {
            let result = hook(value, ctx);
            ctx.hook_exit(id);
            return result;
        }
        // Hook already running for this value; fall through structurally.
    }
    let structural =
        matches!(policy, Instancing::Structural | Instancing::Hook(_)) || is_plain_object(value);
    if !structural {
        return value.clone();
    }
    let copy = Rc::new(obj.empty_like());
    copy_descriptors(obj, &copy);
    Value::object(copy)
}

fn clone_array_shallow(arr: &Rc<GraphObject>) -> Value {
    let copy = Rc::new(arr.empty_like());
    for i in 0..arr.array_length() {
        if let Some(element) = arr.element(i) {
            copy.set_element(i, element);
        }
    }
    copy_descriptors(arr, &copy);
    Value::array(copy)
}

fn clone_map_shallow(map: &Rc<MapValue>) -> Value {
    let copy = map.empty_like();
    for (key, entry) in map.entries() {
        copy.set(key, entry);
    }
    copy_descriptors(map.object(), copy.object());
    Value::map(Rc::new(copy))
}

fn clone_set_shallow(set: &Rc<SetValue>) -> Value {
    let copy = set.empty_like();
    for member in set.members() {
        copy.add(member);
    }
    copy_descriptors(set.object(), copy.object());
    Value::set(Rc::new(copy))
}

/// Clone rule for leaf composites, shared with deep mode (these kinds have
/// no children to recurse into beyond their own properties).
///
/// Dates get a fresh instance with the same timestamp, regexps a fresh
/// instance with the same source, flags, and compiled program, errors a
/// fresh same-prototype object. Own descriptors come across verbatim, which
/// is how a regexp's `lastIndex` survives the copy. Primitives and
/// functions are returned as-is.
pub(crate) fn clone_leaf(value: &Value) -> Value {
    match value {
        Value::Date(date) => {
            let copy = date.duplicate();
            copy_descriptors(date.object(), copy.object());
            Value::date(Rc::new(copy))
        }
        Value::RegExp(re) => {
            let copy = re.duplicate();
            copy_descriptors(re.object(), copy.object());
            Value::regexp(Rc::new(copy))
        }
        Value::Error(err) => {
            let copy = err.empty_like();
            copy_descriptors(err.object(), copy.object());
            Value::error(Rc::new(copy))
        }
        other => {
            debug_assert!(kind_of(other).is_primitive() || matches!(other, Value::Function(_)));
            other.clone()
        }
    }
}

/// Copy every own descriptor verbatim. Accessor pairs stay live (getter and
/// setter shared by reference) and data value slots are shared, which is
/// exactly the one-level contract.
fn copy_descriptors(src: &GraphObject, dst: &GraphObject) {
    for (key, desc) in src.own_descriptors() {
        dst.define_property(key, desc);
    }
}
