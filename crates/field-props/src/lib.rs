//! Managed accessors for record fields.
//!
//! Two ways to declare them:
//!
//! - At runtime, with [`RecordBuilder`]: declare fields, bind read/write/delete
//!   roles to them, then [`finalize`](RecordBuilder::finalize) the record type.
//! - At compile time, with `#[derive(FieldProperties)]` on a struct whose
//!   managed fields are [`Backing`] slots.
//!
//! ```
//! use field_props::{Args, FieldOptions, RecordBuilder, Value, unwrap_property};
//!
//! let mut builder = RecordBuilder::new("Foo");
//! let bar = builder.declare("bar", FieldOptions::new().default_value(0)).unwrap();
//! builder.property(&bar).unwrap().getter(|this| {
//!     let stored = unwrap_property(this).get("bar")?.as_i64().unwrap_or_default();
//!     Ok(Value::Int(stored + 1))
//! });
//! let foo = builder.finalize().unwrap();
//!
//! let instance = foo.construct(Args::new()).unwrap();
//! assert_eq!(instance.get("bar").unwrap(), Value::Int(1));
//! ```

pub mod backing;
pub mod error;
pub mod instance;
pub mod options;
pub mod property;
pub mod record;
pub mod unwrap;
pub mod value;

pub use backing::Backing;
pub use error::{ErrorKind, FieldPropsError};
pub use instance::{Args, Instance};
pub use options::{DefaultFactory, FieldDefault, FieldOptions, FieldSettings, RecordOptions};
pub use property::{Deleter, FieldProperty, Getter, PropertyState, Role, Setter};
pub use record::{FieldDef, FieldHandle, FieldKind, PropertyBinder, RecordBuilder, RecordType};
pub use unwrap::{
    BACKING_PREFIX, Unwrapped, UnwrappedMut, backing_name, unwrap_property, unwrap_property_mut,
};
pub use value::Value;

/// Implemented by `#[derive(FieldProperties)]`.
pub trait FieldProperties {
    /// Struct name, used in error messages.
    const RECORD_NAME: &'static str;

    /// Declared fields, managed and plain, in declaration order.
    fn field_names() -> &'static [&'static str];
}

// Re-export the derive so users only need to depend on `field-props`
pub use field_props_derive::FieldProperties;
