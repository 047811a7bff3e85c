//! Direct access to backing attributes.
//!
//! Roles bound on a field receive the instance itself; reading the field
//! through [`Instance::get`] from inside its own getter would recurse. The
//! views returned here map a field name to its backing attribute and touch
//! the attribute table directly.

use crate::error::FieldPropsError;
use crate::instance::Instance;
use crate::value::Value;

/// Prefix of the attribute holding a managed field's value.
pub const BACKING_PREFIX: &str = "_";

pub fn backing_name(field: &str) -> String {
    format!("{BACKING_PREFIX}{field}")
}

pub fn unwrap_property(instance: &Instance) -> Unwrapped<'_> {
    Unwrapped { instance }
}

pub fn unwrap_property_mut(instance: &mut Instance) -> UnwrappedMut<'_> {
    UnwrappedMut { instance }
}

/// Read-only view of an instance's backing attributes.
#[derive(Debug, Clone, Copy)]
pub struct Unwrapped<'a> {
    instance: &'a Instance,
}

impl<'a> Unwrapped<'a> {
    pub fn get(&self, field: &str) -> Result<&'a Value, FieldPropsError> {
        read_backing(self.instance, field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.instance.attrs.contains_key(&backing_name(field))
    }
}

/// Read-write view of an instance's backing attributes.
#[derive(Debug)]
pub struct UnwrappedMut<'a> {
    instance: &'a mut Instance,
}

impl UnwrappedMut<'_> {
    pub fn get(&self, field: &str) -> Result<&Value, FieldPropsError> {
        read_backing(self.instance, field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.instance.attrs.contains_key(&backing_name(field))
    }

    /// Store `value`, returning the previous one.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Option<Value> {
        self.instance.attrs.insert(backing_name(field), value.into())
    }

    pub fn delete(&mut self, field: &str) -> Result<Value, FieldPropsError> {
        let name = backing_name(field);
        match self.instance.attrs.shift_remove(&name) {
            Some(value) => Ok(value),
            None => Err(FieldPropsError::missing_attribute(self.instance.record_name(), name)),
        }
    }
}

fn read_backing<'a>(instance: &'a Instance, field: &str) -> Result<&'a Value, FieldPropsError> {
    let name = backing_name(field);
    instance
        .attrs
        .get(&name)
        .ok_or_else(|| FieldPropsError::missing_attribute(instance.record_name(), name))
}
