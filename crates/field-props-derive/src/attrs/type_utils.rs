//! Type analysis utilities for field types.

use syn::{GenericArgument, PathArguments, Type, TypePath};

/// Check if a type is `Backing<T>`.
pub fn is_backing_type(ty: &Type) -> bool {
    match ty {
        Type::Path(TypePath { path, .. }) => path
            .segments
            .last()
            .map(|s| s.ident == "Backing")
            .unwrap_or(false),
        _ => false,
    }
}

/// Extract `T` from `Backing<T>`.
pub fn extract_backing_type(ty: &Type) -> Option<Type> {
    if !is_backing_type(ty) {
        return None;
    }
    extract_inner_type(ty)
}

/// Extract the first generic argument of the last path segment.
pub fn extract_inner_type(ty: &Type) -> Option<Type> {
    if let Type::Path(TypePath { path, .. }) = ty {
        if let Some(segment) = path.segments.last() {
            if let PathArguments::AngleBracketed(args) = &segment.arguments {
                if let Some(GenericArgument::Type(inner)) = args.args.first() {
                    return Some(inner.clone());
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backing_inner_type() {
        let ty: Type = syn::parse_quote!(::field_props::Backing<Vec<String>>);
        let inner = extract_backing_type(&ty).unwrap();
        let expected: Type = syn::parse_quote!(Vec<String>);
        assert_eq!(inner, expected);
    }

    #[test]
    fn other_types_are_not_backing() {
        let ty: Type = syn::parse_quote!(Option<i64>);
        assert!(!is_backing_type(&ty));
        assert!(extract_backing_type(&ty).is_none());
    }
}
