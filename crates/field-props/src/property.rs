//! Managed field accessors.
//!
//! A [`FieldProperty`] holds up to three roles (read, write, delete). It is
//! created when a field is declared, receives user roles while the record is
//! being built, and is resolved exactly once when the record is finalized:
//! unbound roles are then either synthesised as wrappers around the field's
//! backing attribute or, for raw fields, left undefined.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::FieldPropsError;
use crate::instance::Instance;
use crate::unwrap::{unwrap_property, unwrap_property_mut};
use crate::value::Value;

pub type Getter = Arc<dyn Fn(&Instance) -> Result<Value, FieldPropsError> + Send + Sync>;
pub type Setter = Arc<dyn Fn(&mut Instance, Value) -> Result<(), FieldPropsError> + Send + Sync>;
pub type Deleter = Arc<dyn Fn(&mut Instance) -> Result<(), FieldPropsError> + Send + Sync>;

/// One of the three accessor roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Get,
    Set,
    Del,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Get, Role::Set, Role::Del];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Get => write!(f, "get"),
            Role::Set => write!(f, "set"),
            Role::Del => write!(f, "del"),
        }
    }
}

/// Lifecycle of an accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyState {
    /// Declared, no role bound explicitly.
    Unbound,
    /// Some roles bound explicitly, record not finalized yet.
    PartiallyBound,
    /// Finalized; the accessor no longer changes.
    Resolved,
}

#[derive(Clone, Default)]
pub struct FieldProperty {
    get: Option<Getter>,
    set: Option<Setter>,
    del: Option<Deleter>,
    bound: [bool; 3],
    resolved: bool,
}

fn slot(role: Role) -> usize {
    match role {
        Role::Get => 0,
        Role::Set => 1,
        Role::Del => 2,
    }
}

impl FieldProperty {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh accessor starting from the roles of an overridden one.
    ///
    /// Inherited roles are not counted as explicitly bound.
    pub(crate) fn seeded_from(parent: &FieldProperty) -> Self {
        Self {
            get: parent.get.clone(),
            set: parent.set.clone(),
            del: parent.del.clone(),
            bound: [false; 3],
            resolved: false,
        }
    }

    pub fn getter<F>(self, get: F) -> Self
    where
        F: Fn(&Instance) -> Result<Value, FieldPropsError> + Send + Sync + 'static,
    {
        self.with_getter(Arc::new(get))
    }

    pub fn setter<F>(self, set: F) -> Self
    where
        F: Fn(&mut Instance, Value) -> Result<(), FieldPropsError> + Send + Sync + 'static,
    {
        self.with_setter(Arc::new(set))
    }

    pub fn deleter<F>(self, del: F) -> Self
    where
        F: Fn(&mut Instance) -> Result<(), FieldPropsError> + Send + Sync + 'static,
    {
        self.with_deleter(Arc::new(del))
    }

    pub fn with_getter(mut self, get: Getter) -> Self {
        self.get = Some(get);
        self.bound[slot(Role::Get)] = true;
        self
    }

    pub fn with_setter(mut self, set: Setter) -> Self {
        self.set = Some(set);
        self.bound[slot(Role::Set)] = true;
        self
    }

    pub fn with_deleter(mut self, del: Deleter) -> Self {
        self.del = Some(del);
        self.bound[slot(Role::Del)] = true;
        self
    }

    /// Whether the role can be invoked.
    pub fn has_role(&self, role: Role) -> bool {
        match role {
            Role::Get => self.get.is_some(),
            Role::Set => self.set.is_some(),
            Role::Del => self.del.is_some(),
        }
    }

    /// Whether the role was bound by the user rather than inherited or synthesised.
    pub fn is_bound(&self, role: Role) -> bool {
        self.bound[slot(role)]
    }

    pub fn bound_roles(&self) -> Vec<Role> {
        Role::ALL.into_iter().filter(|role| self.is_bound(*role)).collect()
    }

    pub fn state(&self) -> PropertyState {
        if self.resolved {
            PropertyState::Resolved
        } else if self.bound.iter().any(|bound| *bound) {
            PropertyState::PartiallyBound
        } else {
            PropertyState::Unbound
        }
    }

    /// Install backing-attribute roles for every undefined role unless `raw`.
    pub fn resolve(mut self, field: &str, raw: bool) -> Self {
        if self.resolved {
            return self;
        }

        if !raw {
            if self.get.is_none() {
                let name = field.to_string();
                self.get = Some(Arc::new(move |this: &Instance| {
                    unwrap_property(this).get(&name).cloned()
                }));
                debug!(field, role = %Role::Get, "synthesised backing accessor");
            }
            if self.set.is_none() {
                let name = field.to_string();
                self.set = Some(Arc::new(move |this: &mut Instance, value: Value| {
                    unwrap_property_mut(this).set(&name, value);
                    Ok(())
                }));
                debug!(field, role = %Role::Set, "synthesised backing accessor");
            }
            if self.del.is_none() {
                let name = field.to_string();
                self.del = Some(Arc::new(move |this: &mut Instance| {
                    unwrap_property_mut(this).delete(&name).map(|_| ())
                }));
                debug!(field, role = %Role::Del, "synthesised backing accessor");
            }
        }

        self.resolved = true;
        self
    }

    pub(crate) fn read(&self, instance: &Instance, field: &str) -> Result<Value, FieldPropsError> {
        match &self.get {
            Some(get) => get(instance),
            None => Err(FieldPropsError::missing_role(instance.record_name(), field, Role::Get)),
        }
    }

    pub(crate) fn write(
        &self,
        instance: &mut Instance,
        field: &str,
        value: Value,
    ) -> Result<(), FieldPropsError> {
        match &self.set {
            Some(set) => set(instance, value),
            None => Err(FieldPropsError::missing_role(instance.record_name(), field, Role::Set)),
        }
    }

    pub(crate) fn remove(
        &self,
        instance: &mut Instance,
        field: &str,
    ) -> Result<(), FieldPropsError> {
        match &self.del {
            Some(del) => del(instance),
            None => Err(FieldPropsError::missing_role(instance.record_name(), field, Role::Del)),
        }
    }
}

impl fmt::Debug for FieldProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let roles: Vec<Role> = Role::ALL
            .into_iter()
            .filter(|role| self.has_role(*role))
            .collect();
        f.debug_struct("FieldProperty")
            .field("roles", &roles)
            .field("bound", &self.bound_roles())
            .field("state", &self.state())
            .finish()
    }
}
