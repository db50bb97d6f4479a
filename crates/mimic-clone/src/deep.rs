//! Recursive cloning.
//!
//! The traversal classifies each node and dispatches to a per-kind rule.
//! Containers register their clone in the context *before* populating it,
//! so a cycle reaching back to a node still being built resolves to the
//! half-built clone instead of recursing forever. The visited lookup runs
//! before anything else and is what keeps shared sub-graphs shared in the
//! output.

use std::rc::Rc;

use mimic_value::{
    GraphObject, Kind, MapValue, PropertyDescriptor, SetValue, Value, is_plain_object, kind_of,
};

use crate::context::CloneContext;
use crate::policy::Instancing;
use crate::shallow;

/// Deep clone with the default [`Instancing::Off`] policy.
pub fn clone_deep(value: &Value) -> Value {
    clone_deep_with(value, &Instancing::Off)
}

/// Deep clone under an explicit instancing policy.
pub fn clone_deep_with(value: &Value, policy: &Instancing) -> Value {
    let mut ctx = CloneContext::new();
    clone_deep_in(value, policy, &mut ctx)
}

/// Deep clone inside an existing context. This is the entry a custom hook
/// uses to delegate children back into the engine; sharing the context is
/// what makes cycle resolution hold across the hook's manual recursion.
pub fn clone_deep_in(value: &Value, policy: &Instancing, ctx: &mut CloneContext) -> Value {
    if let Some(id) = value.ptr_id()
        && let Some(existing) = ctx.lookup(id)
    {
        return existing;
    }
    match (kind_of(value), value) {
        (Kind::Object, Value::Object(obj)) => clone_object_deep(value, obj, policy, ctx),
        (Kind::Array, Value::Array(arr)) => clone_array_deep(arr, policy, ctx),
        (Kind::Map, Value::Map(map)) => clone_map_deep(map, policy, ctx),
        (Kind::Set, Value::Set(set)) => clone_set_deep(set, policy, ctx),
        // Primitives and functions pass through unregistered; dates,
        // regexps, and errors take the leaf rule.
        _ => shallow::clone_leaf(value),
    }
}

fn clone_object_deep(
    value: &Value,
    obj: &Rc<GraphObject>,
    policy: &Instancing,
    ctx: &mut CloneContext,
) -> Value {
    let id = Rc::as_ptr(obj) as usize;
    if let Instancing::Hook(hook) = policy
        && ctx.hook_enter(id)
    {
        let result = hook(value, ctx);
        ctx.hook_exit(id);
        // Registered after the fact: the hook's result wins over any
        // provisional entry its re-entrant recursion produced.
        ctx.register(id, result.clone());
        return result;
    }
    let structural =
        matches!(policy, Instancing::Structural | Instancing::Hook(_)) || is_plain_object(value);
    if !structural {
        // Opaque instance under Off: the original stands in for its own
        // clone, so every later path to this node yields the same value.
        ctx.register(id, value.clone());
        return value.clone();
    }
    let copy = Rc::new(obj.empty_like());
    let result = Value::object(copy.clone());
    ctx.register(id, result.clone());
    copy_descriptors_deep(obj, &copy, policy, ctx);
    result
}

fn clone_array_deep(arr: &Rc<GraphObject>, policy: &Instancing, ctx: &mut CloneContext) -> Value {
    let copy = Rc::new(arr.empty_like());
    let result = Value::array(copy.clone());
    ctx.register(Rc::as_ptr(arr) as usize, result.clone());
    for i in 0..arr.array_length() {
        if let Some(element) = arr.element(i) {
            copy.set_element(i, clone_deep_in(&element, policy, ctx));
        }
    }
    copy_descriptors_deep(arr, &copy, policy, ctx);
    result
}

fn clone_map_deep(map: &Rc<MapValue>, policy: &Instancing, ctx: &mut CloneContext) -> Value {
    let copy = Rc::new(map.empty_like());
    let result = Value::map(copy.clone());
    ctx.register(Rc::as_ptr(map) as usize, result.clone());
    // Keys are shared by reference; only values are cloned.
    for (key, entry) in map.entries() {
        copy.set(key, clone_deep_in(&entry, policy, ctx));
    }
    copy_descriptors_deep(map.object(), copy.object(), policy, ctx);
    result
}

fn clone_set_deep(set: &Rc<SetValue>, policy: &Instancing, ctx: &mut CloneContext) -> Value {
    let copy = Rc::new(set.empty_like());
    let result = Value::set(copy.clone());
    ctx.register(Rc::as_ptr(set) as usize, result.clone());
    for member in set.members() {
        copy.add(clone_deep_in(&member, policy, ctx));
    }
    copy_descriptors_deep(set.object(), copy.object(), policy, ctx);
    result
}

/// Copy every own descriptor, recursively cloning data value slots.
/// Accessor pairs are preserved by reference, never invoked or cloned.
fn copy_descriptors_deep(
    src: &GraphObject,
    dst: &GraphObject,
    policy: &Instancing,
    ctx: &mut CloneContext,
) {
    for (key, desc) in src.own_descriptors() {
        let copied = match desc {
            PropertyDescriptor::Data { value, attributes } => PropertyDescriptor::Data {
                value: clone_deep_in(&value, policy, ctx),
                attributes,
            },
            accessor => accessor,
        };
        dst.define_property(key, copied);
    }
}
