use std::fmt;

use crate::error::FieldPropsError;
use crate::unwrap::backing_name;

/// Backing slot of a managed field on a `#[derive(FieldProperties)]` struct.
///
/// The slot starts vacant and is filled by the field's setter during
/// construction. Accessors bound by the user may bypass it entirely, in which
/// case it stays vacant.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Backing<T>(Option<T>);

impl<T> Backing<T> {
    pub const fn vacant() -> Self {
        Self(None)
    }

    pub const fn new(value: T) -> Self {
        Self(Some(value))
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    pub fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.0.as_mut()
    }

    /// Store `value`, returning the previous one.
    pub fn set(&mut self, value: T) -> Option<T> {
        self.0.replace(value)
    }

    pub fn take(&mut self) -> Option<T> {
        self.0.take()
    }

    /// The stored value, or the attribute error for `record.field`.
    pub fn require(&self, record: &str, field: &str) -> Result<&T, FieldPropsError> {
        self.0
            .as_ref()
            .ok_or_else(|| FieldPropsError::missing_attribute(record, backing_name(field)))
    }

    /// Remove the stored value, or the attribute error for `record.field`.
    pub fn remove(&mut self, record: &str, field: &str) -> Result<T, FieldPropsError> {
        self.0
            .take()
            .ok_or_else(|| FieldPropsError::missing_attribute(record, backing_name(field)))
    }
}

impl<T> Default for Backing<T> {
    fn default() -> Self {
        Self::vacant()
    }
}

impl<T> From<T> for Backing<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Backing<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => f.debug_tuple("Backing").field(value).finish(),
            None => f.write_str("Backing(<vacant>)"),
        }
    }
}
