//! Record type declaration.
//!
//! A [`RecordBuilder`] is the registration table for one record type: fields
//! are declared on it, user roles are bound to managed fields through
//! [`RecordBuilder::property`], and [`RecordBuilder::finalize`] resolves every
//! accessor before handing out the immutable [`RecordType`].

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::error::FieldPropsError;
use crate::instance::Instance;
use crate::options::{FieldDefault, FieldOptions, FieldSettings, RecordOptions};
use crate::property::{Deleter, FieldProperty, Getter, Role, Setter};
use crate::value::Value;

static NEXT_BUILDER_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Value lives in the backing attribute and is reached through the accessor.
    Managed(FieldProperty),
    /// Value lives in an attribute named after the field.
    Plain,
}

/// A declared field.
#[derive(Debug, Clone)]
pub struct FieldDef {
    name: String,
    kind: FieldKind,
    default: FieldDefault,
    settings: FieldSettings,
    raw: bool,
}

impl FieldDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn is_managed(&self) -> bool {
        matches!(self.kind, FieldKind::Managed(_))
    }

    pub fn property(&self) -> Option<&FieldProperty> {
        match &self.kind {
            FieldKind::Managed(property) => Some(property),
            FieldKind::Plain => None,
        }
    }

    pub fn default(&self) -> &FieldDefault {
        &self.default
    }

    pub fn settings(&self) -> &FieldSettings {
        &self.settings
    }

    pub fn init(&self) -> bool {
        self.settings.init
    }

    pub fn repr(&self) -> bool {
        self.settings.repr
    }

    pub fn compare(&self) -> bool {
        self.settings.compare
    }

    pub fn metadata(&self) -> &IndexMap<String, Value> {
        &self.settings.metadata
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }

    /// Managed fields always accept a missing argument at this stage;
    /// a missing default is reported when the instance is constructed.
    fn has_default(&self) -> bool {
        self.is_managed() || self.default.is_some()
    }
}

/// Reference to a field declared on a specific builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldHandle {
    builder: u64,
    name: String,
}

impl FieldHandle {
    pub fn name(&self) -> &str {
        &self.name
    }
}

pub struct RecordBuilder {
    id: u64,
    name: String,
    options: RecordOptions,
    parent: Option<Arc<RecordType>>,
    fields: IndexMap<String, FieldDef>,
    declared: IndexSet<String>,
}

impl RecordBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NEXT_BUILDER_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            options: RecordOptions::default(),
            parent: None,
            fields: IndexMap::new(),
            declared: IndexSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frozen(mut self, frozen: bool) -> Self {
        self.options.frozen = frozen;
        self
    }

    /// Declare a managed field; its accessor is resolved at [`finalize`](Self::finalize).
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        options: FieldOptions,
    ) -> Result<FieldHandle, FieldPropsError> {
        let name = name.into();
        self.check_declaration(&name, &options)?;

        let raw = options.raw;
        let inherited = self.fields.get(&name);
        let property = match inherited.map(|field| &field.kind) {
            Some(FieldKind::Managed(parent)) => FieldProperty::seeded_from(parent),
            _ => FieldProperty::new(),
        };
        let (default, settings) =
            options.resolve(inherited.map(|field| (&field.default, &field.settings)));

        self.insert(FieldDef {
            name: name.clone(),
            kind: FieldKind::Managed(property),
            default,
            settings,
            raw,
        });
        Ok(FieldHandle {
            builder: self.id,
            name,
        })
    }

    /// Declare an ordinary field stored under its own name.
    pub fn field(
        &mut self,
        name: impl Into<String>,
        options: FieldOptions,
    ) -> Result<FieldHandle, FieldPropsError> {
        let name = name.into();
        self.check_declaration(&name, &options)?;
        if options.raw {
            return Err(FieldPropsError::invalid_configuration(
                &self.name,
                &name,
                "raw only applies to managed fields",
            ));
        }

        let inherited = self.fields.get(&name);
        let (default, settings) =
            options.resolve(inherited.map(|field| (&field.default, &field.settings)));

        self.insert(FieldDef {
            name: name.clone(),
            kind: FieldKind::Plain,
            default,
            settings,
            raw: false,
        });
        Ok(FieldHandle {
            builder: self.id,
            name,
        })
    }

    /// Binder for the roles of a managed field declared on this builder.
    pub fn property(
        &mut self,
        handle: &FieldHandle,
    ) -> Result<PropertyBinder<'_>, FieldPropsError> {
        if handle.builder != self.id {
            return Err(FieldPropsError::invalid_property(
                &self.name,
                format!("field '{}' was not declared on this record", handle.name),
            ));
        }

        match self.fields.get_mut(&handle.name).map(|field| &mut field.kind) {
            Some(FieldKind::Managed(property)) => Ok(PropertyBinder { property }),
            _ => Err(FieldPropsError::invalid_property(
                &self.name,
                format!("field '{}' is not a managed field", handle.name),
            )),
        }
    }

    /// Resolve every accessor and produce the record type.
    pub fn finalize(self) -> Result<Arc<RecordType>, FieldPropsError> {
        if let Some(parent) = &self.parent {
            if parent.options.frozen != self.options.frozen {
                let reason = if parent.options.frozen {
                    "cannot inherit non-frozen record from a frozen one"
                } else {
                    "cannot inherit frozen record from a non-frozen one"
                };
                return Err(FieldPropsError::invalid_record(&self.name, reason));
            }
        }

        let mut seen_default = false;
        for field in self.fields.values().filter(|field| field.init()) {
            if field.has_default() {
                seen_default = true;
            } else if seen_default {
                return Err(FieldPropsError::invalid_configuration(
                    &self.name,
                    &field.name,
                    format!("non-default argument '{}' follows default argument", field.name),
                ));
            }
        }

        let fields: IndexMap<String, FieldDef> = self
            .fields
            .into_iter()
            .map(|(name, mut field)| {
                field.kind = match field.kind {
                    FieldKind::Managed(property) => {
                        FieldKind::Managed(property.resolve(&name, field.raw))
                    }
                    FieldKind::Plain => FieldKind::Plain,
                };
                (name, field)
            })
            .collect();

        debug!(
            record = %self.name,
            fields = fields.len(),
            frozen = self.options.frozen,
            "finalized record type"
        );

        Ok(Arc::new(RecordType {
            name: self.name,
            options: self.options,
            parent: self.parent,
            fields,
        }))
    }

    fn check_declaration(&self, name: &str, options: &FieldOptions) -> Result<(), FieldPropsError> {
        if !is_valid_field_name(name) {
            return Err(FieldPropsError::invalid_configuration(
                &self.name,
                name,
                "field name must be a non-empty identifier",
            ));
        }
        if self.declared.contains(name) {
            return Err(FieldPropsError::invalid_configuration(
                &self.name,
                name,
                "field is already declared on this record",
            ));
        }
        options.validate(&self.name, name)
    }

    fn insert(&mut self, field: FieldDef) {
        self.declared.insert(field.name.clone());
        // Overridden parent fields keep their position.
        self.fields.insert(field.name.clone(), field);
    }
}

impl fmt::Debug for RecordBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordBuilder")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("parent", &self.parent.as_ref().map(|parent| parent.name()))
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn is_valid_field_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {
            chars.all(|c| c == '_' || c.is_alphanumeric())
        }
        _ => false,
    }
}

/// Registers roles on one managed field; each call replaces that role.
pub struct PropertyBinder<'a> {
    property: &'a mut FieldProperty,
}

impl PropertyBinder<'_> {
    /// Bind the read role; the plain form of binding.
    pub fn bind<F>(self, get: F) -> Self
    where
        F: Fn(&Instance) -> Result<Value, FieldPropsError> + Send + Sync + 'static,
    {
        self.getter(get)
    }

    pub fn getter<F>(self, get: F) -> Self
    where
        F: Fn(&Instance) -> Result<Value, FieldPropsError> + Send + Sync + 'static,
    {
        let get: Getter = Arc::new(get);
        self.replace(|property| property.with_getter(get))
    }

    pub fn setter<F>(self, set: F) -> Self
    where
        F: Fn(&mut Instance, Value) -> Result<(), FieldPropsError> + Send + Sync + 'static,
    {
        let set: Setter = Arc::new(set);
        self.replace(|property| property.with_setter(set))
    }

    pub fn deleter<F>(self, del: F) -> Self
    where
        F: Fn(&mut Instance) -> Result<(), FieldPropsError> + Send + Sync + 'static,
    {
        let del: Deleter = Arc::new(del);
        self.replace(|property| property.with_deleter(del))
    }

    pub fn is_bound(&self, role: Role) -> bool {
        self.property.is_bound(role)
    }

    pub fn property(&self) -> &FieldProperty {
        self.property
    }

    fn replace(self, update: impl FnOnce(FieldProperty) -> FieldProperty) -> Self {
        let current = std::mem::take(self.property);
        *self.property = update(current);
        self
    }
}

/// A finalized record type. Shared by all its instances.
pub struct RecordType {
    name: String,
    options: RecordOptions,
    parent: Option<Arc<RecordType>>,
    fields: IndexMap<String, FieldDef>,
}

impl RecordType {
    /// Start a subtype. Fields of `self` are inherited in order; redeclaring
    /// one creates a new accessor seeded with the inherited roles.
    pub fn extend(self: &Arc<Self>, name: impl Into<String>) -> RecordBuilder {
        let mut builder = RecordBuilder::new(name).frozen(self.options.frozen);
        builder.parent = Some(Arc::clone(self));
        builder.fields = self.fields.clone();
        builder
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> RecordOptions {
        self.options
    }

    pub fn is_frozen(&self) -> bool {
        self.options.frozen
    }

    pub fn parent(&self) -> Option<&Arc<RecordType>> {
        self.parent.as_ref()
    }

    pub fn is_subtype_of(&self, other: &RecordType) -> bool {
        let mut current = Some(self);
        while let Some(record) = current {
            if std::ptr::eq(record, other) {
                return true;
            }
            current = record.parent.as_deref();
        }
        false
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.values()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordType")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("parent", &self.parent.as_ref().map(|parent| parent.name()))
            .field("fields", &self.fields.values().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyState;

    #[test]
    fn duplicate_declaration_is_rejected() {
        let mut builder = RecordBuilder::new("Foo");
        builder.declare("bar", FieldOptions::new()).unwrap();
        let err = builder.declare("bar", FieldOptions::new()).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn invalid_names_are_rejected() {
        let mut builder = RecordBuilder::new("Foo");
        assert!(builder.declare("", FieldOptions::new()).is_err());
        assert!(builder.declare("1bar", FieldOptions::new()).is_err());
        assert!(builder.declare("bar baz", FieldOptions::new()).is_err());
        assert!(builder.declare("_bar2", FieldOptions::new()).is_ok());
    }

    #[test]
    fn handle_from_another_builder_is_not_a_property() {
        let mut first = RecordBuilder::new("First");
        let mut second = RecordBuilder::new("Second");
        let bar = first.declare("bar", FieldOptions::new()).unwrap();
        second.declare("bar", FieldOptions::new()).unwrap();

        let err = second.property(&bar).err().unwrap();
        assert!(matches!(err.kind, crate::ErrorKind::InvalidProperty { .. }));
    }

    #[test]
    fn plain_field_handle_is_not_a_property() {
        let mut builder = RecordBuilder::new("Foo");
        let bar = builder.field("bar", FieldOptions::new()).unwrap();
        assert!(builder.property(&bar).is_err());
    }

    #[test]
    fn raw_plain_field_is_rejected() {
        let mut builder = RecordBuilder::new("Foo");
        let err = builder
            .field("bar", FieldOptions::new().raw(true))
            .unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn finalize_resolves_every_accessor() {
        let mut builder = RecordBuilder::new("Foo");
        let bar = builder.declare("bar", FieldOptions::new()).unwrap();
        builder.declare("baz", FieldOptions::new()).unwrap();
        {
            let binder = builder
                .property(&bar)
                .unwrap()
                .bind(|_| Ok(Value::Int(1)));
            assert!(binder.is_bound(Role::Get));
            assert_eq!(binder.property().state(), PropertyState::PartiallyBound);
        }

        let record = builder.finalize().unwrap();
        for field in record.fields() {
            let property = field.property().unwrap();
            assert_eq!(property.state(), PropertyState::Resolved);
            assert!(Role::ALL.iter().all(|role| property.has_role(*role)));
        }
    }

    #[test]
    fn non_default_plain_field_after_default_is_rejected() {
        let mut builder = RecordBuilder::new("Foo");
        builder.field("a", FieldOptions::new().default_value(1)).unwrap();
        builder.field("b", FieldOptions::new()).unwrap();
        let err = builder.finalize().unwrap_err();
        assert!(err.to_string().contains("non-default argument 'b'"));
    }

    #[test]
    fn frozen_mismatch_with_parent_is_rejected() {
        let parent = RecordBuilder::new("Base").frozen(true).finalize().unwrap();
        let err = parent.extend("Child").frozen(false).finalize().unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn subtype_keeps_field_order_on_override() {
        let mut builder = RecordBuilder::new("Base");
        builder.declare("a", FieldOptions::new().default_value(0)).unwrap();
        builder.declare("b", FieldOptions::new().default_value(0)).unwrap();
        let base = builder.finalize().unwrap();

        let mut child = base.extend("Child");
        child.declare("a", FieldOptions::new().default_value(1)).unwrap();
        child.declare("c", FieldOptions::new().default_value(2)).unwrap();
        let child = child.finalize().unwrap();

        assert_eq!(child.field_names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert!(child.is_subtype_of(&base));
        assert!(!base.is_subtype_of(&child));
        assert!(Arc::ptr_eq(child.parent().unwrap(), &base));
        assert!(base.parent().is_none());
    }

    #[test]
    fn subtype_inherits_record_options() {
        let base = RecordBuilder::new("Base").frozen(true).finalize().unwrap();
        let child = base.extend("Child").finalize().unwrap();
        assert_eq!(child.options(), RecordOptions { frozen: true });
        assert!(child.is_frozen());
    }

    #[test]
    fn raw_flag_is_kept_on_field_definition() {
        let mut builder = RecordBuilder::new("Foo");
        builder.declare("a", FieldOptions::new().raw(true)).unwrap();
        builder.declare("b", FieldOptions::new()).unwrap();
        let record = builder.finalize().unwrap();

        let a = record.field("a").unwrap();
        assert!(a.is_raw());
        assert!(!a.property().unwrap().has_role(Role::Get));
        assert!(!record.field("b").unwrap().is_raw());
    }
}
