//! Record instances and their construction.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::trace;

use crate::error::FieldPropsError;
use crate::property::Role;
use crate::record::{FieldKind, RecordType};
use crate::value::Value;

/// Constructor arguments: positional values first, then keyword values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    positional: Vec<Value>,
    keyword: IndexMap<String, Value>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.insert(name.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }
}

impl RecordType {
    /// Build an instance. Every init field receives its argument or default
    /// through its write role; managed fields with `init = false` are left
    /// uninitialised.
    pub fn construct(self: &Arc<Self>, args: Args) -> Result<Instance, FieldPropsError> {
        let Args {
            positional,
            mut keyword,
        } = args;

        let init_count = self.fields().filter(|field| field.init()).count();
        if positional.len() > init_count {
            return Err(FieldPropsError::invalid_argument(
                self.name(),
                format!(
                    "takes {init_count} positional arguments but {} were given",
                    positional.len()
                ),
            ));
        }
        if let Some(name) = keyword
            .keys()
            .find(|name| !self.field(name).is_some_and(|field| field.init()))
        {
            return Err(FieldPropsError::invalid_argument(
                self.name(),
                format!("unexpected keyword argument '{name}'"),
            ));
        }

        let mut positional = positional.into_iter();
        let mut provided: Vec<Option<Value>> = Vec::with_capacity(init_count);
        for field in self.fields().filter(|field| field.init()) {
            let value = match (positional.next(), keyword.shift_remove(field.name())) {
                (Some(_), Some(_)) => {
                    return Err(FieldPropsError::invalid_argument(
                        self.name(),
                        format!("got multiple values for argument '{}'", field.name()),
                    ));
                }
                (Some(value), None) | (None, Some(value)) => Some(value),
                (None, None) => None,
            };
            provided.push(value);
        }

        let mut instance = Instance {
            record: Arc::clone(self),
            attrs: IndexMap::new(),
        };
        let mut provided = provided.into_iter();

        for field in self.fields() {
            if !field.init() {
                if let (FieldKind::Plain, Some(value)) = (field.kind(), field.default().produce()) {
                    instance.attrs.insert(field.name().to_string(), value);
                }
                continue;
            }

            let value = provided.next().flatten();
            match field.kind() {
                FieldKind::Managed(property) => {
                    if !property.has_role(Role::Set) {
                        return Err(FieldPropsError::missing_role(
                            self.name(),
                            field.name(),
                            Role::Set,
                        ));
                    }
                    let value = value
                        .or_else(|| field.default().produce())
                        .ok_or_else(|| {
                            FieldPropsError::missing_argument(self.name(), field.name())
                        })?;
                    property.write(&mut instance, field.name(), value)?;
                }
                FieldKind::Plain => {
                    let value = value
                        .or_else(|| field.default().produce())
                        .ok_or_else(|| {
                            FieldPropsError::missing_argument(self.name(), field.name())
                        })?;
                    instance.attrs.insert(field.name().to_string(), value);
                }
            }
        }

        trace!(record = %self.name(), attrs = instance.attrs.len(), "constructed instance");
        Ok(instance)
    }
}

/// An instance of a [`RecordType`].
///
/// Managed fields are reached through their accessors; the attribute table
/// holds plain field values and the backing attributes of managed fields.
#[derive(Clone)]
pub struct Instance {
    record: Arc<RecordType>,
    pub(crate) attrs: IndexMap<String, Value>,
}

impl Instance {
    pub fn record(&self) -> &Arc<RecordType> {
        &self.record
    }

    pub fn record_name(&self) -> &str {
        self.record.name()
    }

    /// Raw attribute table, backing attributes included.
    pub fn attributes(&self) -> &IndexMap<String, Value> {
        &self.attrs
    }

    pub fn get(&self, name: &str) -> Result<Value, FieldPropsError> {
        match self.record.field(name).map(|field| field.kind()) {
            Some(FieldKind::Managed(property)) => property.read(self, name),
            Some(FieldKind::Plain) | None => self
                .attrs
                .get(name)
                .cloned()
                .ok_or_else(|| FieldPropsError::missing_attribute(self.record_name(), name)),
        }
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), FieldPropsError> {
        let record = Arc::clone(&self.record);
        if record.is_frozen() {
            return Err(FieldPropsError::frozen(record.name(), name, "assign"));
        }

        match record.field(name).map(|field| field.kind()) {
            Some(FieldKind::Managed(property)) => property.write(self, name, value.into()),
            Some(FieldKind::Plain) => {
                self.attrs.insert(name.to_string(), value.into());
                Ok(())
            }
            None => Err(FieldPropsError::missing_attribute(record.name(), name)),
        }
    }

    pub fn delete(&mut self, name: &str) -> Result<(), FieldPropsError> {
        let record = Arc::clone(&self.record);
        if record.is_frozen() {
            return Err(FieldPropsError::frozen(record.name(), name, "delete"));
        }

        match record.field(name).map(|field| field.kind()) {
            Some(FieldKind::Managed(property)) => property.remove(self, name),
            Some(FieldKind::Plain) | None => match self.attrs.shift_remove(name) {
                Some(_) => Ok(()),
                None => Err(FieldPropsError::missing_attribute(record.name(), name)),
            },
        }
    }

    /// Field values read through their accessors, in declaration order.
    pub fn values(&self) -> Result<IndexMap<String, Value>, FieldPropsError> {
        self.record
            .fields()
            .map(|field| Ok((field.name().to_string(), self.get(field.name())?)))
            .collect()
    }

    /// `Name(field=value, ...)` over the fields declared with `repr`.
    pub fn repr(&self) -> Result<String, FieldPropsError> {
        let mut parts = Vec::new();
        for field in self.record.fields().filter(|field| field.repr()) {
            parts.push(format!("{}={}", field.name(), self.get(field.name())?));
        }
        Ok(format!("{}({})", self.record_name(), parts.join(", ")))
    }

    /// Compare two instances of the same record type on their `compare` fields.
    pub fn equals(&self, other: &Instance) -> Result<bool, FieldPropsError> {
        if !Arc::ptr_eq(&self.record, &other.record) {
            return Ok(false);
        }
        for field in self.record.fields().filter(|field| field.compare()) {
            if self.get(field.name())? != other.get(field.name())? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other).unwrap_or(false)
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.repr() {
            Ok(repr) => f.write_str(&repr),
            Err(err) => write!(f, "{}(<unreadable: {}>)", self.record_name(), err.kind),
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("record", &self.record_name())
            .field("attrs", &self.attrs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::FieldOptions;
    use crate::record::RecordBuilder;

    fn point() -> Arc<RecordType> {
        let mut builder = RecordBuilder::new("Point");
        builder.field("x", FieldOptions::new()).unwrap();
        builder.declare("y", FieldOptions::new().default_value(0)).unwrap();
        builder.finalize().unwrap()
    }

    #[test]
    fn positional_and_keyword_arguments() {
        let record = point();
        let a = record.construct(Args::new().arg(1).arg(2)).unwrap();
        let b = record.construct(Args::new().kwarg("y", 2).kwarg("x", 1)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.repr().unwrap(), "Point(x=1, y=2)");
        assert_eq!(a.attributes().keys().collect::<Vec<_>>(), vec!["x", "_y"]);
    }

    #[test]
    fn argument_errors() {
        let record = point();
        let err = record.construct(Args::new().arg(1).arg(2).arg(3)).unwrap_err();
        assert!(err.to_string().contains("takes 2 positional arguments but 3 were given"));

        let err = record.construct(Args::new().arg(1).kwarg("x", 1)).unwrap_err();
        assert!(err.to_string().contains("multiple values for argument 'x'"));

        let err = record.construct(Args::new().arg(1).kwarg("z", 1)).unwrap_err();
        assert!(err.to_string().contains("unexpected keyword argument 'z'"));

        let err = record.construct(Args::new()).unwrap_err();
        assert!(matches!(err.kind, crate::ErrorKind::MissingArgument { .. }));
    }

    #[test]
    fn unknown_names_are_attribute_errors() {
        let mut instance = point().construct(Args::new().arg(1)).unwrap();
        assert!(instance.get("z").unwrap_err().is_attribute_error());
        assert!(instance.set("z", 1).unwrap_err().is_attribute_error());
        assert!(instance.delete("z").unwrap_err().is_attribute_error());
    }

    #[test]
    fn plain_field_deletion() {
        let mut instance = point().construct(Args::new().arg(1)).unwrap();
        instance.delete("x").unwrap();
        assert!(instance.get("x").unwrap_err().is_attribute_error());
        instance.set("x", 5).unwrap();
        assert_eq!(instance.get("x").unwrap(), Value::Int(5));
    }

    #[test]
    fn display_reports_unreadable_fields() {
        let mut instance = point().construct(Args::new().arg(1)).unwrap();
        instance.delete("y").unwrap();
        assert!(instance.to_string().starts_with("Point(<unreadable:"));
    }

    #[test]
    fn non_init_fields_skip_arguments() {
        let mut builder = RecordBuilder::new("Tally");
        builder
            .field("total", FieldOptions::new().init(false).default_value(10))
            .unwrap();
        builder.field("note", FieldOptions::new().init(false)).unwrap();
        builder
            .declare("count", FieldOptions::new().init(false).default_value(1))
            .unwrap();
        let record = builder.finalize().unwrap();

        let instance = record.construct(Args::new()).unwrap();
        assert_eq!(instance.get("total").unwrap(), Value::Int(10));
        assert!(instance.get("note").unwrap_err().is_attribute_error());
        assert!(instance.get("count").unwrap_err().is_attribute_error());
        assert_eq!(instance.attributes().keys().collect::<Vec<_>>(), vec!["total"]);

        let err = record.construct(Args::new().kwarg("total", 3)).unwrap_err();
        assert!(err.to_string().contains("unexpected keyword argument 'total'"));
    }
}
