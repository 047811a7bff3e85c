use std::sync::{Arc, Mutex};

use field_props::{
    Args, ErrorKind, FieldOptions, FieldPropsError, RecordBuilder, RecordType, Role, Value,
    unwrap_property,
};

fn stored_plus(this: &field_props::Instance, offset: i64) -> Result<Value, FieldPropsError> {
    let stored = unwrap_property(this).get("bar")?.as_i64().unwrap_or_default();
    Ok(Value::Int(stored + offset))
}

#[test]
fn default_accessors_use_backing_attribute() {
    let mut builder = RecordBuilder::new("Foo");
    builder.declare("bar", FieldOptions::new()).unwrap();
    let foo = builder.finalize().unwrap();

    let mut instance = foo.construct(Args::new().arg(0)).unwrap();
    assert_eq!(instance.attributes().get("_bar"), Some(&Value::Int(0)));
    assert_eq!(instance.attributes().len(), 1);
    assert_eq!(instance.get("bar").unwrap(), Value::Int(0));

    instance.delete("bar").unwrap();
    assert!(instance.attributes().is_empty());
    assert!(instance.get("bar").unwrap_err().is_attribute_error());
}

#[test]
fn user_roles_replace_backing_attribute() {
    let store: Arc<Mutex<Option<Value>>> = Arc::default();
    let (get_store, set_store, del_store) = (store.clone(), store.clone(), store.clone());

    let mut builder = RecordBuilder::new("Foo");
    let bar = builder.declare("bar", FieldOptions::new()).unwrap();
    builder
        .property(&bar)
        .unwrap()
        .bind(move |_| {
            get_store
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| FieldPropsError::missing_attribute("Foo", "bar"))
        })
        .setter(move |_, value| {
            *set_store.lock().unwrap() = Some(value);
            Ok(())
        })
        .deleter(move |_| {
            *del_store.lock().unwrap() = None;
            Ok(())
        });
    let foo = builder.finalize().unwrap();

    let mut instance = foo.construct(Args::new().arg(0)).unwrap();
    assert_eq!(instance.get("bar").unwrap(), Value::Int(0));
    assert_eq!(*store.lock().unwrap(), Some(Value::Int(0)));

    // Every role is user supplied, so nothing was stored on the instance.
    assert!(instance.attributes().is_empty());
    assert!(unwrap_property(&instance).get("bar").unwrap_err().is_attribute_error());

    instance.delete("bar").unwrap();
    assert!(instance.get("bar").unwrap_err().is_attribute_error());
    assert_eq!(*store.lock().unwrap(), None);
}

fn recording_record(
    name: &str,
    options: FieldOptions,
    calls: Arc<Mutex<Vec<Value>>>,
) -> Arc<RecordType> {
    let mut builder = RecordBuilder::new(name);
    let field = builder.declare("value", options.repr(false)).unwrap();
    builder.property(&field).unwrap().setter(move |_, value| {
        calls.lock().unwrap().push(value);
        Ok(())
    });
    builder.finalize().unwrap()
}

#[test]
fn setter_receives_default_value_or_factory_result() {
    let calls: Arc<Mutex<Vec<Value>>> = Arc::default();

    let with_default = recording_record(
        "WithDefault",
        FieldOptions::new().default_value(0),
        calls.clone(),
    );
    let instance = with_default.construct(Args::new()).unwrap();
    assert_eq!(calls.lock().unwrap().last(), Some(&Value::Int(0)));
    assert_eq!(instance.repr().unwrap(), "WithDefault()");

    let with_factory = recording_record(
        "WithDefaultFactory",
        FieldOptions::new().default_factory(|| Value::Int(1)),
        calls.clone(),
    );
    with_factory.construct(Args::new()).unwrap();
    assert_eq!(calls.lock().unwrap().last(), Some(&Value::Int(1)));

    let without_default = recording_record("WithoutDefault", FieldOptions::new(), calls.clone());
    let err = without_default.construct(Args::new()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingArgument { .. }));
    assert!(err.to_string().contains("missing parameter value"));
    assert_eq!(calls.lock().unwrap().len(), 2);
}

#[test]
fn conflicting_defaults_fail_at_declaration() {
    let mut builder = RecordBuilder::new("Foo");
    let err = builder
        .declare(
            "bar",
            FieldOptions::new()
                .default_value(0)
                .default_factory(|| Value::Int(0)),
        )
        .unwrap_err();
    assert!(err.is_configuration_error());
    assert_eq!(err.field.as_deref(), Some("bar"));
}

#[test]
fn default_construction_matches_explicit_default() {
    let mut builder = RecordBuilder::new("Foo");
    builder.declare("bar", FieldOptions::new().default_value(0)).unwrap();
    let foo = builder.finalize().unwrap();

    let implicit = foo.construct(Args::new()).unwrap();
    let explicit = foo.construct(Args::new().kwarg("bar", 0)).unwrap();
    assert_eq!(implicit.repr().unwrap(), explicit.repr().unwrap());
    assert_eq!(implicit.to_string(), "Foo(bar=0)");
    assert_eq!(implicit, explicit);
}

#[test]
fn subtype_getter_override_is_independent() {
    let mut builder = RecordBuilder::new("Foo");
    let bar = builder.declare("bar", FieldOptions::new().default_value(0)).unwrap();
    builder.property(&bar).unwrap().getter(|this| stored_plus(this, 1));
    let foo = builder.finalize().unwrap();

    let mut child = foo.extend("Foo2");
    let bar = child.declare("bar", FieldOptions::new().default_value(0)).unwrap();
    child.property(&bar).unwrap().getter(|this| stored_plus(this, 2));
    let foo2 = child.finalize().unwrap();

    assert_eq!(foo.construct(Args::new()).unwrap().get("bar").unwrap(), Value::Int(1));
    assert_eq!(foo2.construct(Args::new()).unwrap().get("bar").unwrap(), Value::Int(2));
    assert!(foo.field("bar").unwrap().property().unwrap().is_bound(Role::Get));
}

fn base_record(managed: bool) -> Arc<RecordType> {
    let mut builder = RecordBuilder::new("Foo");
    let options = FieldOptions::new().default_value(0).repr(false);
    if managed {
        builder.declare("bar", options).unwrap();
    } else {
        builder.field("bar", options).unwrap();
    }
    builder.finalize().unwrap()
}

fn overriding_record(base: &Arc<RecordType>, options: FieldOptions) -> Arc<RecordType> {
    let mut builder = base.extend("Foo2");
    let bar = builder.declare("bar", options).unwrap();
    builder.property(&bar).unwrap().getter(|this| stored_plus(this, 1));
    builder.finalize().unwrap()
}

#[test]
fn override_field_with_inherit() {
    for managed in [true, false] {
        let base = base_record(managed);
        assert_eq!(base.construct(Args::new()).unwrap().get("bar").unwrap(), Value::Int(0));

        let child = overriding_record(&base, FieldOptions::new().inherit(true));
        let instance = child.construct(Args::new()).unwrap();
        assert_eq!(instance.get("bar").unwrap(), Value::Int(1));
        assert_eq!(instance.repr().unwrap(), "Foo2()");
    }
}

#[test]
fn override_field_without_inherit() {
    for managed in [true, false] {
        let base = base_record(managed);
        let child = overriding_record(&base, FieldOptions::new().default_value(1));
        let instance = child.construct(Args::new()).unwrap();
        assert_eq!(instance.get("bar").unwrap(), Value::Int(2));
        assert_eq!(instance.repr().unwrap(), "Foo2(bar=2)");
    }
}

#[test]
fn overriding_a_role_keeps_inherited_roles() {
    for role in Role::ALL {
        let mut builder = RecordBuilder::new("Foo");
        builder.declare("bar", FieldOptions::new()).unwrap();
        let foo = builder.finalize().unwrap();

        let calls = Arc::new(Mutex::new(0usize));
        let mut child = foo.extend("Foo2");
        let bar = child.declare("bar", FieldOptions::new()).unwrap();
        let binder = child.property(&bar).unwrap();
        let counter = calls.clone();
        match role {
            Role::Get => {
                binder.getter(move |_| {
                    *counter.lock().unwrap() += 1;
                    Ok(Value::Null)
                });
            }
            Role::Set => {
                binder.setter(move |_, _| {
                    *counter.lock().unwrap() += 1;
                    Ok(())
                });
            }
            Role::Del => {
                binder.deleter(move |_| {
                    *counter.lock().unwrap() += 1;
                    Ok(())
                });
            }
        }
        let foo2 = child.finalize().unwrap();

        let mut instance = foo2.construct(Args::new().arg(0)).unwrap();
        let expected = match role {
            Role::Get => {
                instance.get("bar").unwrap();
                1
            }
            Role::Set => {
                instance.set("bar", 0).unwrap();
                2
            }
            Role::Del => {
                instance.delete("bar").unwrap();
                1
            }
        };
        assert_eq!(*calls.lock().unwrap(), expected, "role {role}");
    }
}

#[test]
fn inherited_setter_is_not_chained() {
    let calls: Arc<Mutex<Vec<Value>>> = Arc::default();
    let base = recording_record("WithDefault", FieldOptions::new().default_value(0), calls.clone());

    let mut child = base.extend("Inherited");
    child
        .declare("value", FieldOptions::new().default_value(0).repr(false))
        .unwrap();
    let inherited = child.finalize().unwrap();

    inherited.construct(Args::new()).unwrap();
    assert_eq!(*calls.lock().unwrap(), vec![Value::Int(0)]);
}

#[test]
fn frozen_record_rejects_assignment_and_deletion() {
    let mut builder = RecordBuilder::new("Foo").frozen(true);
    builder.declare("bar", FieldOptions::new()).unwrap();
    let foo = builder.finalize().unwrap();

    let mut instance = foo.construct(Args::new().arg(0)).unwrap();
    assert_eq!(instance.attributes().get("_bar"), Some(&Value::Int(0)));
    assert_eq!(instance.get("bar").unwrap(), Value::Int(0));

    let err = instance.set("bar", 1).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Frozen { action: "assign" }));
    let err = instance.delete("bar").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Frozen { action: "delete" }));
    assert_eq!(instance.get("bar").unwrap(), Value::Int(0));
}

#[test]
fn read_only_field() {
    let mut builder = RecordBuilder::new("Foo");
    let bar = builder
        .declare("bar", FieldOptions::new().init(false).raw(true))
        .unwrap();
    builder.property(&bar).unwrap().getter(|_| Ok(Value::Int(0)));
    let foo = builder.finalize().unwrap();

    let mut instance = foo.construct(Args::new()).unwrap();
    assert_eq!(instance.get("bar").unwrap(), Value::Int(0));

    let err = instance.set("bar", 1).unwrap_err();
    assert!(err.is_attribute_error());
    assert!(matches!(err.kind, ErrorKind::MissingRole { role: Role::Set }));
}

#[test]
fn raw_field_without_deleter() {
    let mut builder = RecordBuilder::new("Foo");
    let bar = builder.declare("bar", FieldOptions::new().raw(true)).unwrap();
    builder
        .property(&bar)
        .unwrap()
        .getter(|this| Ok(unwrap_property(this).get("bar")?.clone()))
        .setter(|this, value| {
            field_props::unwrap_property_mut(this).set("bar", value);
            Ok(())
        });
    let foo = builder.finalize().unwrap();

    let mut instance = foo.construct(Args::new().arg(3)).unwrap();
    instance.set("bar", 4).unwrap();
    assert_eq!(instance.get("bar").unwrap(), Value::Int(4));

    let err = instance.delete("bar").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingRole { role: Role::Del }));
    assert_eq!(instance.get("bar").unwrap(), Value::Int(4));
}

#[test]
fn raw_init_field_without_setter_fails_on_construction() {
    let mut builder = RecordBuilder::new("Foo");
    let bar = builder.declare("bar", FieldOptions::new().raw(true)).unwrap();
    builder.property(&bar).unwrap().getter(|_| Ok(Value::Int(0)));
    let foo = builder.finalize().unwrap();

    let err = foo.construct(Args::new().arg(1)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingRole { role: Role::Set }));
}

#[test]
fn metadata_is_inherited_on_request() {
    let mut builder = RecordBuilder::new("Foo");
    builder
        .declare("bar", FieldOptions::new().default_value(0).metadata("unit", "ms"))
        .unwrap();
    let foo = builder.finalize().unwrap();
    assert_eq!(
        foo.field("bar").unwrap().metadata().get("unit"),
        Some(&Value::from("ms"))
    );

    let mut child = foo.extend("Inherits");
    child.declare("bar", FieldOptions::new().inherit(true)).unwrap();
    let inherits = child.finalize().unwrap();
    assert_eq!(inherits.field("bar").unwrap().metadata().len(), 1);

    let mut child = foo.extend("Fresh");
    child.declare("bar", FieldOptions::new()).unwrap();
    let fresh = child.finalize().unwrap();
    assert!(fresh.field("bar").unwrap().metadata().is_empty());
}

#[test]
fn compare_false_fields_are_ignored_by_equality() {
    let mut builder = RecordBuilder::new("Foo");
    builder.declare("bar", FieldOptions::new().default_value(0)).unwrap();
    builder
        .declare("cache", FieldOptions::new().default_value(0).compare(false))
        .unwrap();
    let foo = builder.finalize().unwrap();

    let a = foo.construct(Args::new().kwarg("cache", 1)).unwrap();
    let b = foo.construct(Args::new().kwarg("cache", 2)).unwrap();
    assert_eq!(a, b);

    let c = foo.construct(Args::new().kwarg("bar", 1)).unwrap();
    assert_ne!(a, c);
}

#[test]
fn instances_of_different_records_are_unequal() {
    let mut builder = RecordBuilder::new("Foo");
    builder.declare("bar", FieldOptions::new().default_value(0)).unwrap();
    let foo = builder.finalize().unwrap();
    let foo2 = foo.extend("Foo2").finalize().unwrap();

    let a = foo.construct(Args::new()).unwrap();
    let b = foo2.construct(Args::new()).unwrap();
    assert!(!a.equals(&b).unwrap());
}

#[test]
fn record_type_is_shared_across_threads() {
    let mut builder = RecordBuilder::new("Foo");
    builder
        .declare("bar", FieldOptions::new().default_factory(|| Value::Array(Vec::new())))
        .unwrap();
    let foo = builder.finalize().unwrap();

    std::thread::scope(|scope| {
        for n in 0..4i64 {
            let foo = &foo;
            scope.spawn(move || {
                let mut instance = foo.construct(Args::new()).unwrap();
                instance.set("bar", vec![n]).unwrap();
                assert_eq!(instance.get("bar").unwrap(), Value::from(vec![n]));
            });
        }
    });
}
