//! Attribute parsing for the `FieldProperties` derive.
//!
//! # Module Structure
//!
//! - `container` - Struct-level `#[props(...)]` definitions
//! - `field` - Field-level `#[prop(...)]` definitions
//! - `field_info` - Processed field information for codegen
//! - `type_utils` - Type analysis utilities
//! - `parse` - Parsing entry points using `parse_nested_meta`

mod container;
mod field;
mod field_info;
mod parse;
mod type_utils;

pub use container::StructAttrs;
pub use field::DefaultSpec;
pub use field_info::FieldInfo;
pub use parse::parse_struct_attrs;
