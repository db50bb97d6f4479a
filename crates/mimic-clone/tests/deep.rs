//! Deep-mode behavior: independence, cycles, shared references, descriptor
//! fidelity, and the instancing-policy matrix.

use std::rc::Rc;

use mimic_clone::{CloneContext, Instancing, clone_deep, clone_deep_in, clone_deep_with};
use mimic_value::{
    DateValue, ErrorValue, GraphObject, MapValue, PropertyAttributes, PropertyDescriptor,
    PropertyKey, RegExpValue, SetValue, Symbol, SymbolRegistry, Value, deep_eq, kind_of,
};

fn obj() -> Rc<GraphObject> {
    Rc::new(GraphObject::new(None))
}

fn get(value: &Value, key: &str) -> Value {
    value
        .as_object()
        .or_else(|| value.as_array())
        .and_then(|o| o.get(&PropertyKey::string(key)))
        .unwrap_or(Value::undefined())
}

#[test]
fn nested_objects_become_independent() {
    let inner = obj();
    inner.set(PropertyKey::string("n"), Value::number(1.0));
    let outer = obj();
    outer.set(PropertyKey::string("inner"), Value::object(inner.clone()));
    let original = Value::object(outer);

    let copy = clone_deep(&original);
    assert!(deep_eq(&copy, &original));
    assert!(!copy.same_ref(&original));
    assert!(!get(&copy, "inner").same_ref(&get(&original, "inner")));

    // Mutating the copy leaves the original untouched, and vice versa.
    get(&copy, "inner")
        .as_object()
        .unwrap()
        .set(PropertyKey::string("n"), Value::number(99.0));
    assert_eq!(
        inner.get(&PropertyKey::string("n")).unwrap().as_number(),
        Some(1.0)
    );
    inner.set(PropertyKey::string("n"), Value::number(-5.0));
    assert_eq!(get(&get(&copy, "inner"), "n").as_number(), Some(99.0));
}

#[test]
fn self_reference_resolves_to_the_clone() {
    let node = obj();
    node.set(PropertyKey::string("value"), Value::number(1.0));
    node.set(PropertyKey::string("this"), Value::object(node.clone()));
    let original = Value::object(node);

    let copy = clone_deep(&original);
    assert!(!copy.same_ref(&original));
    let this = get(&copy, "this");
    assert!(this.same_ref(&copy));
    assert!(!this.same_ref(&original));
}

#[test]
fn mutually_cyclic_nodes_clone_once_each() {
    let a = obj();
    let b = obj();
    a.set(PropertyKey::string("other"), Value::object(b.clone()));
    b.set(PropertyKey::string("other"), Value::object(a.clone()));
    let original = Value::object(a);

    let copy = clone_deep(&original);
    let copy_b = get(&copy, "other");
    assert!(!copy_b.same_ref(&Value::object(b)));
    assert!(get(&copy_b, "other").same_ref(&copy));
}

#[test]
fn shared_references_stay_shared() {
    let shared = obj();
    let root = obj();
    root.set(PropertyKey::string("a"), Value::object(shared.clone()));
    root.set(PropertyKey::string("b"), Value::object(shared.clone()));

    let copy = clone_deep(&Value::object(root));
    let a = get(&copy, "a");
    let b = get(&copy, "b");
    assert!(a.same_ref(&b));
    assert!(!a.same_ref(&Value::object(shared)));
}

#[test]
fn primitives_and_functions_pass_through() {
    assert_eq!(clone_deep(&Value::number(0.0)).as_number(), Some(0.0));
    assert_eq!(clone_deep(&Value::string("foo")).as_str(), Some("foo"));
    assert!(clone_deep(&Value::null()).is_null());
    assert_eq!(clone_deep(&Value::boolean(true)).as_boolean(), Some(true));
    assert_eq!(clone_deep(&Value::bigint("42")).as_bigint().unwrap().digits, "42");

    let f = Value::native_function("id", |_, args| {
        args.first().cloned().unwrap_or(Value::undefined())
    });
    assert!(clone_deep(&f).same_ref(&f));

    let sym = Value::symbol(Symbol::new(Some("tag")));
    assert!(clone_deep(&sym).same_ref(&sym));
}

#[test]
fn arrays_clone_elements_and_extra_properties() {
    let inner = obj();
    inner.set(PropertyKey::string("x"), Value::number(1.0));
    let arr = Rc::new(GraphObject::array(0));
    arr.push(Value::number(1.0));
    arr.push(Value::object(inner.clone()));
    arr.set(PropertyKey::string("tag"), Value::object(obj()));
    let original = Value::array(arr.clone());

    let copy = clone_deep(&original);
    assert!(deep_eq(&copy, &original));
    assert!(!copy.same_ref(&original));

    let copied_inner = copy.as_array().unwrap().element(1).unwrap();
    assert!(!copied_inner.same_ref(&Value::object(inner)));
    assert!(!get(&copy, "tag").same_ref(&get(&original, "tag")));
}

#[test]
fn nested_arrays_are_independent() {
    let child = Rc::new(GraphObject::array(0));
    child.push(Value::number(1.0));
    let parent = Rc::new(GraphObject::array(0));
    parent.push(Value::array(child.clone()));
    let original = Value::array(parent);

    let copy = clone_deep(&original);
    copy.as_array()
        .unwrap()
        .element(0)
        .unwrap()
        .as_array()
        .unwrap()
        .set_element(0, Value::number(9.0));
    assert_eq!(child.element(0).unwrap().as_number(), Some(1.0));
}

#[test]
fn map_values_clone_but_keys_share() {
    let key = Value::object(obj());
    let entry = obj();
    entry.set(PropertyKey::string("x"), Value::number(5.0));
    let map = MapValue::new();
    map.set(key.clone(), Value::object(entry.clone()));
    map.set(Value::number(1.0), Value::number(5.0));
    let original = Value::map(Rc::new(map));

    let copy = clone_deep(&original);
    let copied = copy.as_map().unwrap();
    assert_eq!(copied.size(), 2);

    let (copied_key, copied_entry) = copied.entries().remove(0);
    assert!(copied_key.same_ref(&key));
    assert!(!copied_entry.same_ref(&Value::object(entry)));

    // Later mutation of the original is not reflected.
    original.as_map().unwrap().set(Value::number(2.0), Value::number(4.0));
    assert_eq!(copy.as_map().unwrap().size(), 2);
}

#[test]
fn set_members_are_cloned() {
    let member = obj();
    member.set(PropertyKey::string("x"), Value::number(1.0));
    let set = SetValue::new();
    set.add(Value::object(member.clone()));
    set.add(Value::number(3.0));
    let original = Value::set(Rc::new(set));

    let copy = clone_deep(&original);
    let members = copy.as_set().unwrap().members();
    assert_eq!(members.len(), 2);
    assert!(!members[0].same_ref(&Value::object(member.clone())));
    assert!(deep_eq(&members[0], &Value::object(member)));

    original.as_set().unwrap().add(Value::number(4.0));
    assert_eq!(copy.as_set().unwrap().size(), 2);
}

#[test]
fn collection_extra_properties_are_deep_cloned() {
    let tag = obj();
    let map = MapValue::new();
    map.object().define_property(
        PropertyKey::string("meta"),
        PropertyDescriptor::data_with_attrs(Value::object(tag.clone()), PropertyAttributes::hidden()),
    );
    let original = Value::map(Rc::new(map));

    let copy = clone_deep(&original);
    let desc = copy
        .as_map()
        .unwrap()
        .object()
        .get_own(&PropertyKey::string("meta"))
        .unwrap();
    assert!(!desc.attributes().enumerable);
    assert!(!desc.value().unwrap().same_ref(&Value::object(tag)));
}

#[test]
fn descriptor_attributes_survive_the_clone() {
    let source = obj();
    source.define_property(
        PropertyKey::string("hidden"),
        PropertyDescriptor::data_with_attrs(Value::number(7.0), PropertyAttributes::hidden()),
    );
    source.define_property(
        PropertyKey::string("pinned"),
        PropertyDescriptor::data_with_attrs(Value::number(8.0), PropertyAttributes::frozen()),
    );
    let sym = Symbol::new(Some("k"));
    source.set(PropertyKey::symbol(sym.clone()), Value::number(9.0));

    let copy = clone_deep(&Value::object(source));
    let copied = copy.as_object().unwrap();

    let hidden = copied.get_own(&PropertyKey::string("hidden")).unwrap();
    assert!(!hidden.attributes().enumerable);
    assert!(hidden.attributes().writable);

    let pinned = copied.get_own(&PropertyKey::string("pinned")).unwrap();
    assert_eq!(pinned.attributes(), PropertyAttributes::frozen());

    assert_eq!(
        copied.get(&PropertyKey::symbol(sym)).unwrap().as_number(),
        Some(9.0)
    );
}

#[test]
fn every_kind_clones_to_the_same_kind() {
    let array = Rc::new(GraphObject::array(1));
    let values = [
        Value::undefined(),
        Value::null(),
        Value::boolean(true),
        Value::number(1.0),
        Value::bigint("9"),
        Value::string("s"),
        Value::symbol(Symbol::new(None)),
        Value::native_function("f", |_, _| Value::undefined()),
        Value::object(obj()),
        Value::array(array),
        Value::map(Rc::new(MapValue::new())),
        Value::set(Rc::new(SetValue::new())),
        Value::date(Rc::new(DateValue::new(0.0))),
        Value::regexp(Rc::new(RegExpValue::new("a", "").unwrap())),
        Value::error(Rc::new(ErrorValue::new("e"))),
    ];
    for value in &values {
        assert_eq!(kind_of(&clone_deep(value)), kind_of(value));
    }
}

#[test]
fn interned_symbol_keys_reach_the_cloned_property() {
    let registry = SymbolRegistry::new();
    let source = obj();
    source.define_property(
        PropertyKey::symbol(registry.for_key("app.meta")),
        PropertyDescriptor::data_with_attrs(Value::number(5.0), PropertyAttributes::hidden()),
    );

    let copy = clone_deep(&Value::object(source));

    // The same interned symbol, looked up again, addresses the clone's
    // property; the descriptor keeps its attributes.
    let desc = copy
        .as_object()
        .unwrap()
        .get_own(&PropertyKey::symbol(registry.for_key("app.meta")))
        .unwrap();
    assert!(!desc.attributes().enumerable);
    assert_eq!(desc.value().unwrap().as_number(), Some(5.0));

    // An unrelated symbol with the same description is a different key.
    assert!(
        copy.as_object()
            .unwrap()
            .get_own(&PropertyKey::symbol(Symbol::new(Some("app.meta"))))
            .is_none()
    );
}

#[test]
fn accessor_pairs_stay_live_and_independent() {
    let source = obj();
    source.set(PropertyKey::string("celsius"), Value::number(0.0));
    let getter = Value::native_function("get f", |recv, _| {
        let c = recv
            .get(&PropertyKey::string("celsius"))
            .and_then(|v| v.as_number())
            .unwrap_or(0.0);
        Value::number(c * 9.0 / 5.0 + 32.0)
    });
    let setter = Value::native_function("set f", |recv, args| {
        if let Some(f) = args.first().and_then(|v| v.as_number()) {
            recv.set(
                PropertyKey::string("celsius"),
                Value::number((f - 32.0) * 5.0 / 9.0),
            );
        }
        Value::undefined()
    });
    source.define_property(
        PropertyKey::string("fahrenheit"),
        PropertyDescriptor::accessor(Some(getter), Some(setter), PropertyAttributes::accessor()),
    );

    let copy = clone_deep(&Value::object(source.clone()));
    let copied = copy.as_object().unwrap();
    assert_eq!(
        copied
            .read(&PropertyKey::string("fahrenheit"))
            .and_then(|v| v.as_number()),
        Some(32.0)
    );

    // Writing through the clone's setter touches only the clone's backing
    // field.
    assert!(copied.write(PropertyKey::string("fahrenheit"), Value::number(212.0)));
    assert_eq!(
        copied.get(&PropertyKey::string("celsius")).unwrap().as_number(),
        Some(100.0)
    );
    assert_eq!(
        source.get(&PropertyKey::string("celsius")).unwrap().as_number(),
        Some(0.0)
    );
}

fn instance_with_nested_field() -> (Value, Rc<GraphObject>, Rc<GraphObject>) {
    let proto = obj();
    let nested = obj();
    nested.set(PropertyKey::string("x"), Value::number(11.0));
    let instance = Rc::new(GraphObject::new(Some(proto.clone())));
    instance.set(PropertyKey::string("data"), Value::object(nested.clone()));
    (Value::object(instance), proto, nested)
}

#[test]
fn instancing_off_shares_the_instance() {
    let (original, _, nested) = instance_with_nested_field();
    let copy = clone_deep(&original);
    assert!(copy.same_ref(&original));
    assert!(get(&copy, "data").same_ref(&Value::object(nested)));
}

#[test]
fn instancing_off_keeps_identity_sharing_across_slots() {
    let (instance, _, _) = instance_with_nested_field();
    let root = obj();
    root.set(PropertyKey::string("a"), instance.clone());
    root.set(PropertyKey::string("b"), instance.clone());

    let copy = clone_deep(&Value::object(root));
    assert!(get(&copy, "a").same_ref(&instance));
    assert!(get(&copy, "a").same_ref(&get(&copy, "b")));
}

#[test]
fn instancing_structural_copies_and_keeps_prototype() {
    let (original, proto, nested) = instance_with_nested_field();
    let copy = clone_deep_with(&original, &Instancing::from(true));

    assert!(!copy.same_ref(&original));
    assert!(deep_eq(&copy, &original));
    assert!(Rc::ptr_eq(copy.as_object().unwrap().prototype().unwrap(), &proto));
    assert!(!get(&copy, "data").same_ref(&Value::object(nested)));
}

fn tagging_hook(value: &Value, ctx: &mut CloneContext) -> Value {
    let Some(source) = value.as_object() else {
        return value.clone();
    };
    let copy = Rc::new(source.empty_like());
    let result = Value::object(copy.clone());
    if let Some(id) = value.ptr_id() {
        ctx.register(id, result.clone());
    }
    for (key, desc) in source.own_descriptors() {
        if let Some(slot) = desc.value() {
            // Children are delegated back to the engine with this hook as
            // the policy, sharing the caller's context.
            copy.set(
                key,
                clone_deep_in(slot, &Instancing::Hook(Rc::new(tagging_hook)), ctx),
            );
        }
    }
    copy.set(PropertyKey::string("hooked"), Value::boolean(true));
    result
}

#[test]
fn custom_hook_builds_the_result_and_recurses() {
    let (original, _, nested) = instance_with_nested_field();
    let copy = clone_deep_with(&original, &Instancing::Hook(Rc::new(tagging_hook)));

    assert!(!copy.same_ref(&original));
    assert_eq!(get(&copy, "hooked").as_boolean(), Some(true));
    let data = get(&copy, "data");
    assert!(!data.same_ref(&Value::object(nested)));
    assert_eq!(get(&data, "hooked").as_boolean(), Some(true));
}

#[test]
fn custom_hook_sees_cycles_through_the_shared_context() {
    let node = obj();
    node.set(PropertyKey::string("this"), Value::object(node.clone()));
    let copy = clone_deep_with(
        &Value::object(node),
        &Instancing::Hook(Rc::new(tagging_hook)),
    );
    assert!(get(&copy, "this").same_ref(&copy));
}

fn delegating_hook(value: &Value, ctx: &mut CloneContext) -> Value {
    clone_deep_in(value, &Instancing::Hook(Rc::new(delegating_hook)), ctx)
}

#[test]
fn hook_that_delegates_immediately_terminates() {
    let (original, proto, _) = instance_with_nested_field();
    let copy = clone_deep_with(&original, &Instancing::Hook(Rc::new(delegating_hook)));

    // The re-entrant call takes the structural path for the guarded value.
    assert!(!copy.same_ref(&original));
    assert!(deep_eq(&copy, &original));
    assert!(Rc::ptr_eq(copy.as_object().unwrap().prototype().unwrap(), &proto));
}

#[test]
fn dates_get_fresh_instances_in_deep_mode() {
    let date = DateValue::new(86_400_000.0);
    date.object().set(PropertyKey::string("note"), Value::string("day one"));
    let original = Value::date(Rc::new(date));

    let copy = clone_deep(&original);
    assert!(!copy.same_ref(&original));
    assert_eq!(copy.as_date().unwrap().timestamp(), 86_400_000.0);
    assert_eq!(
        copy.as_date()
            .unwrap()
            .object()
            .get(&PropertyKey::string("note"))
            .unwrap()
            .as_str(),
        Some("day one")
    );

    copy.as_date().unwrap().set_timestamp(0.0);
    assert_eq!(original.as_date().unwrap().timestamp(), 86_400_000.0);
}

#[test]
fn regexps_keep_source_flags_and_last_index() {
    let re = RegExpValue::new("ab+", "gi").unwrap();
    re.set_last_index(3);
    let original = Value::regexp(Rc::new(re));

    let copy = clone_deep(&original);
    assert!(!copy.same_ref(&original));
    let copied = copy.as_regexp().unwrap();
    assert_eq!(copied.source(), "ab+");
    assert_eq!(copied.flags(), "gi");
    assert_eq!(copied.last_index(), 3);
    assert!(copied.is_match("xABBx"));
}

#[test]
fn errors_clone_with_name_and_message() {
    let err = ErrorValue::with_name("RangeError", "out of range");
    err.object().set(PropertyKey::string("code"), Value::number(34.0));
    let original = Value::error(Rc::new(err));

    let copy = clone_deep(&original);
    assert!(!copy.same_ref(&original));
    let copied = copy.as_error().unwrap();
    assert_eq!(copied.name().as_deref(), Some("RangeError"));
    assert_eq!(copied.message().as_deref(), Some("out of range"));
    assert_eq!(
        copied
            .object()
            .get(&PropertyKey::string("code"))
            .unwrap()
            .as_number(),
        Some(34.0)
    );
}
