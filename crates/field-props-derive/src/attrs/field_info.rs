//! Processed field information for code generation.

use quote::format_ident;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{Field, Ident, Type};

use super::field::{DefaultSpec, FieldAttrs};
use super::parse::parse_field_attrs;
use super::type_utils::{extract_backing_type, is_backing_type};

/// Processed field information used for code generation.
#[derive(Debug, Clone)]
pub struct FieldInfo {
    pub ident: Ident,
    /// Field name without any `r#` prefix.
    pub name: String,
    pub ty: Type,
    /// `T` of a managed `Backing<T>` field; `None` for plain fields.
    pub value_ty: Option<Type>,
    pub attrs: FieldAttrs,
}

impl FieldInfo {
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let ident = field.ident.clone().ok_or_else(|| {
            syn::Error::new(field.span(), "FieldProperties requires named fields")
        })?;
        let name = ident.unraw().to_string();

        let (raw, span) = parse_field_attrs(field)?;
        let value_ty = extract_backing_type(&field.ty);
        if is_backing_type(&field.ty) && value_ty.is_none() {
            return Err(syn::Error::new_spanned(
                &field.ty,
                "Backing fields need a value type, e.g. Backing<i64>",
            ));
        }
        if value_ty.is_none() && raw.has_roles() {
            return Err(syn::Error::new(
                span,
                format!("`{name}`: get, set, del and raw require a `Backing<T>` field"),
            ));
        }

        let attrs = raw.into_field_attrs(span)?;
        let info = Self {
            ident,
            name,
            ty: field.ty.clone(),
            value_ty,
            attrs,
        };

        if info.is_managed() && info.attrs.init && !info.has_setter() {
            return Err(syn::Error::new(
                info.attrs.span,
                format!(
                    "`{}` is set on construction but has no set role; bind `set`, drop `raw`, or use `init = false`",
                    info.name
                ),
            ));
        }

        Ok(info)
    }

    pub fn is_managed(&self) -> bool {
        self.value_ty.is_some()
    }

    pub fn has_getter(&self) -> bool {
        self.is_managed() && (self.attrs.get.is_some() || !self.attrs.raw)
    }

    pub fn has_setter(&self) -> bool {
        self.is_managed() && (self.attrs.set.is_some() || !self.attrs.raw)
    }

    pub fn has_deleter(&self) -> bool {
        self.is_managed() && (self.attrs.del.is_some() || !self.attrs.raw)
    }

    /// Whether the field is a parameter of the generated constructor.
    pub fn is_param(&self) -> bool {
        self.attrs.init && self.attrs.default.is_none()
    }

    pub fn default(&self) -> Option<&DefaultSpec> {
        self.attrs.default.as_ref()
    }

    /// Type handed to and returned by the accessors.
    pub fn value_ty(&self) -> &Type {
        self.value_ty.as_ref().unwrap_or(&self.ty)
    }

    pub fn getter_ident(&self) -> Ident {
        self.ident.clone()
    }

    pub fn setter_ident(&self) -> Ident {
        format_ident!("set_{}", self.name, span = self.ident.span())
    }

    pub fn deleter_ident(&self) -> Ident {
        format_ident!("del_{}", self.name, span = self.ident.span())
    }
}
