//! Attribute parsing functions.
//!
//! Uses manual `parse_nested_meta` for `#[props(...)]` and `#[prop(...)]`.

use syn::meta::ParseNestedMeta;
use syn::{Attribute, Expr, ExprLit, ExprPath, Field, Lit, LitBool, Path};

use super::container::StructAttrs;
use super::field::RawFieldAttrs;

/// Parse struct-level attributes from `#[props(...)]`.
pub fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut result = StructAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("props") {
            continue;
        }
        attr.parse_nested_meta(|meta| parse_struct_meta(&meta, &mut result))?;
    }

    Ok(result)
}

fn parse_struct_meta(meta: &ParseNestedMeta, result: &mut StructAttrs) -> syn::Result<()> {
    let ident = meta.path.get_ident().map(|i| i.to_string());

    match ident.as_deref() {
        Some("frozen") => result.frozen = parse_flag(meta)?,
        Some("repr") => result.repr = parse_flag(meta)?,
        Some("eq") => result.eq = parse_flag(meta)?,
        _ => {
            return Err(meta.error(
                "unknown props attribute, expected one of: frozen, repr, eq",
            ));
        }
    }
    Ok(())
}

/// Parse field-level attributes from `#[prop(...)]`.
///
/// Returns the raw attributes and the span of the last `#[prop]` attribute,
/// or the field span when there is none.
pub fn parse_field_attrs(field: &Field) -> syn::Result<(RawFieldAttrs, proc_macro2::Span)> {
    let mut raw = RawFieldAttrs::default();
    let mut primary_span = field
        .ident
        .as_ref()
        .map(|i| i.span())
        .unwrap_or_else(proc_macro2::Span::call_site);

    for attr in &field.attrs {
        if !attr.path().is_ident("prop") {
            continue;
        }
        primary_span = attr.bracket_token.span.join();
        attr.parse_nested_meta(|meta| parse_field_meta(&meta, &mut raw))?;
    }

    Ok((raw, primary_span))
}

fn parse_field_meta(meta: &ParseNestedMeta, raw: &mut RawFieldAttrs) -> syn::Result<()> {
    let ident = meta.path.get_ident().map(|i| i.to_string());

    match ident.as_deref() {
        Some("default") => {
            let value: Expr = meta.value()?.parse()?;
            set_once(meta, &mut raw.default, value, "default")
        }
        Some("default_factory") => {
            let path = parse_path_value(meta)?;
            set_once(meta, &mut raw.default_factory, path, "default_factory")
        }
        Some("get") => {
            let path = parse_path_value(meta)?;
            set_once(meta, &mut raw.get, path, "get")
        }
        Some("set") => {
            let path = parse_path_value(meta)?;
            set_once(meta, &mut raw.set, path, "set")
        }
        Some("del") => {
            let path = parse_path_value(meta)?;
            set_once(meta, &mut raw.del, path, "del")
        }
        Some("raw") => {
            let flag = parse_flag(meta)?;
            set_once(meta, &mut raw.raw, flag, "raw")
        }
        Some("init") => {
            let flag = parse_flag(meta)?;
            set_once(meta, &mut raw.init, flag, "init")
        }
        Some("repr") => {
            let flag = parse_flag(meta)?;
            set_once(meta, &mut raw.repr, flag, "repr")
        }
        Some("compare") => {
            let flag = parse_flag(meta)?;
            set_once(meta, &mut raw.compare, flag, "compare")
        }
        _ => Err(meta.error(
            "unknown prop attribute, expected one of: default, default_factory, get, set, del, raw, init, repr, compare",
        )),
    }
}

fn set_once<T>(
    meta: &ParseNestedMeta,
    slot: &mut Option<T>,
    value: T,
    key: &str,
) -> syn::Result<()> {
    if slot.is_some() {
        return Err(meta.error(format!("duplicate {key} attribute")));
    }
    *slot = Some(value);
    Ok(())
}

/// Bare `flag` means true; `flag = true|false` is explicit.
fn parse_flag(meta: &ParseNestedMeta) -> syn::Result<bool> {
    if meta.input.peek(syn::Token![=]) {
        let value: LitBool = meta.value()?.parse()?;
        Ok(value.value)
    } else {
        Ok(true)
    }
}

/// Accept `key = path::to::fn` or `key = "path::to::fn"`.
fn parse_path_value(meta: &ParseNestedMeta) -> syn::Result<Path> {
    let value: Expr = meta.value()?.parse()?;
    match value {
        Expr::Path(ExprPath { path, .. }) => Ok(path),
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => s.parse::<Path>(),
        other => Err(syn::Error::new_spanned(other, "expected a function path")),
    }
}
