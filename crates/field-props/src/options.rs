//! Declaration options for record fields and record types.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::FieldPropsError;
use crate::value::Value;

pub type DefaultFactory = Arc<dyn Fn() -> Value + Send + Sync>;

/// Options accepted when declaring a field.
///
/// Unset flags are resolved at declaration time, either from the parent
/// field (with `inherit(true)`) or from the defaults: `init`, `repr` and
/// `compare` all default to `true`.
#[derive(Clone, Default)]
pub struct FieldOptions {
    pub(crate) default: Option<Value>,
    pub(crate) default_factory: Option<DefaultFactory>,
    pub(crate) init: Option<bool>,
    pub(crate) repr: Option<bool>,
    pub(crate) compare: Option<bool>,
    pub(crate) metadata: Option<IndexMap<String, Value>>,
    pub(crate) raw: bool,
    pub(crate) inherit: bool,
}

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn default_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default_factory = Some(Arc::new(factory));
        self
    }

    pub fn init(mut self, init: bool) -> Self {
        self.init = Some(init);
        self
    }

    pub fn repr(mut self, repr: bool) -> Self {
        self.repr = Some(repr);
        self
    }

    pub fn compare(mut self, compare: bool) -> Self {
        self.compare = Some(compare);
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Leave unbound roles undefined instead of synthesising backing-attribute wrappers.
    ///
    /// Off by default, so every role a field does not bind reads, writes or
    /// deletes its backing attribute. `raw(true)` declares a read-only or
    /// write-only field: bind only the roles it should have, and the rest
    /// fail with [`ErrorKind::MissingRole`](crate::ErrorKind::MissingRole).
    pub fn raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    /// Take unspecified options and the default from the overridden parent field.
    pub fn inherit(mut self, inherit: bool) -> Self {
        self.inherit = inherit;
        self
    }

    pub(crate) fn validate(&self, record: &str, field: &str) -> Result<(), FieldPropsError> {
        if self.default.is_some() && self.default_factory.is_some() {
            return Err(FieldPropsError::invalid_configuration(
                record,
                field,
                "cannot specify both default and default_factory",
            ));
        }
        Ok(())
    }

    /// Split into the resolved default and settings, filling gaps from `parent` when inheriting.
    pub(crate) fn resolve(
        self,
        parent: Option<(&FieldDefault, &FieldSettings)>,
    ) -> (FieldDefault, FieldSettings) {
        let inherited = if self.inherit { parent } else { None };

        let mut default = match (self.default, self.default_factory) {
            (Some(value), _) => FieldDefault::Value(value),
            (None, Some(factory)) => FieldDefault::Factory(factory),
            (None, None) => FieldDefault::None,
        };
        if let (FieldDefault::None, Some((parent_default, _))) = (&default, inherited) {
            default = parent_default.clone();
        }

        let base = inherited.map(|(_, settings)| settings.clone()).unwrap_or_default();
        let settings = FieldSettings {
            init: self.init.unwrap_or(base.init),
            repr: self.repr.unwrap_or(base.repr),
            compare: self.compare.unwrap_or(base.compare),
            metadata: self.metadata.unwrap_or(base.metadata),
        };

        (default, settings)
    }
}

impl fmt::Debug for FieldOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldOptions")
            .field("default", &self.default)
            .field("default_factory", &self.default_factory.as_ref().map(|_| "<fn>"))
            .field("init", &self.init)
            .field("repr", &self.repr)
            .field("compare", &self.compare)
            .field("metadata", &self.metadata)
            .field("raw", &self.raw)
            .field("inherit", &self.inherit)
            .finish()
    }
}

/// Resolved per-field flags.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSettings {
    pub init: bool,
    pub repr: bool,
    pub compare: bool,
    pub metadata: IndexMap<String, Value>,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            init: true,
            repr: true,
            compare: true,
            metadata: IndexMap::new(),
        }
    }
}

/// Resolved default of a field.
#[derive(Clone, Default)]
pub enum FieldDefault {
    #[default]
    None,
    Value(Value),
    Factory(DefaultFactory),
}

impl FieldDefault {
    pub fn is_some(&self) -> bool {
        !matches!(self, FieldDefault::None)
    }

    /// Produce a fresh default value; factories run once per call.
    pub fn produce(&self) -> Option<Value> {
        match self {
            FieldDefault::None => None,
            FieldDefault::Value(value) => Some(value.clone()),
            FieldDefault::Factory(factory) => Some(factory()),
        }
    }
}

impl fmt::Debug for FieldDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldDefault::None => f.write_str("None"),
            FieldDefault::Value(value) => f.debug_tuple("Value").field(value).finish(),
            FieldDefault::Factory(_) => f.write_str("Factory(<fn>)"),
        }
    }
}

/// Options of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordOptions {
    /// Reject assignment and deletion once an instance is constructed.
    pub frozen: bool,
}
