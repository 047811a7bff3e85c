//! Field-level attribute definitions.

use proc_macro2::Span;
use syn::{Expr, Path};

/// Default of a field: an expression evaluated per construction, or a factory path.
#[derive(Debug, Clone)]
pub enum DefaultSpec {
    Expr(Expr),
    Factory(Path),
}

/// Processed field attributes.
#[derive(Debug, Clone)]
pub struct FieldAttrs {
    pub span: Span,
    pub default: Option<DefaultSpec>,
    pub get: Option<Path>,
    pub set: Option<Path>,
    pub del: Option<Path>,
    pub raw: bool,
    pub init: bool,
    pub repr: bool,
    pub compare: bool,
}

/// Raw parsed field attributes.
///
/// Populated by `parse_nested_meta` in `parse.rs`, then validated into
/// `FieldAttrs` via `into_field_attrs()`.
#[derive(Debug, Default)]
pub struct RawFieldAttrs {
    // === Defaults ===
    pub default: Option<Expr>,
    pub default_factory: Option<Path>,

    // === Roles ===
    pub get: Option<Path>,
    pub set: Option<Path>,
    pub del: Option<Path>,
    pub raw: Option<bool>,

    // === Participation ===
    pub init: Option<bool>,
    pub repr: Option<bool>,
    pub compare: Option<bool>,
}

impl RawFieldAttrs {
    pub fn has_roles(&self) -> bool {
        self.get.is_some() || self.set.is_some() || self.del.is_some() || self.raw.is_some()
    }

    pub fn into_field_attrs(self, span: Span) -> syn::Result<FieldAttrs> {
        let default = match (self.default, self.default_factory) {
            (Some(_), Some(_)) => {
                return Err(syn::Error::new(
                    span,
                    "cannot specify both default and default_factory",
                ));
            }
            (Some(expr), None) => Some(DefaultSpec::Expr(expr)),
            (None, Some(path)) => Some(DefaultSpec::Factory(path)),
            (None, None) => None,
        };

        Ok(FieldAttrs {
            span,
            default,
            get: self.get,
            set: self.set,
            del: self.del,
            raw: self.raw.unwrap_or(false),
            init: self.init.unwrap_or(true),
            repr: self.repr.unwrap_or(true),
            compare: self.compare.unwrap_or(true),
        })
    }
}
