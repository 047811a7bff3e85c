use proc_macro2::TokenStream;
use quote::quote;
use syn::Ident;

use crate::attrs::{FieldInfo, StructAttrs};

/// Generate the get/set/del methods of every managed field.
///
/// Roles bound with a path delegate to it; unbound roles read, write or
/// clear the `Backing` slot unless the field is `raw`, in which case the
/// method is not generated at all.
pub fn generate_accessors(
    struct_name: &Ident,
    struct_attrs: &StructAttrs,
    fields: &[FieldInfo],
) -> Vec<TokenStream> {
    let record = struct_name.to_string();
    fields
        .iter()
        .filter(|field| field.is_managed())
        .flat_map(|field| {
            let mut methods = Vec::new();
            if field.has_getter() {
                methods.push(generate_getter(&record, field));
            }
            if field.has_setter() {
                methods.push(generate_setter(struct_attrs, field));
            }
            if field.has_deleter() {
                methods.push(generate_deleter(&record, struct_attrs, field));
            }
            methods
        })
        .collect()
}

fn generate_getter(record: &str, field: &FieldInfo) -> TokenStream {
    let ident = &field.ident;
    let name = &field.name;
    let getter = field.getter_ident();
    let ty = field.value_ty();
    let doc = format!("Reads `{name}` through its get role.");

    let body = match &field.attrs.get {
        Some(path) => quote! { #path(self) },
        None => quote! {
            self.#ident.require(#record, #name).map(::core::clone::Clone::clone)
        },
    };

    quote! {
        #[doc = #doc]
        pub fn #getter(&self) -> ::core::result::Result<#ty, ::field_props::FieldPropsError> {
            #body
        }
    }
}

fn generate_setter(struct_attrs: &StructAttrs, field: &FieldInfo) -> TokenStream {
    let ident = &field.ident;
    let name = &field.name;
    let setter = field.setter_ident();
    let ty = field.value_ty();
    let doc = format!("Writes `{name}` through its set role.");
    let vis = visibility(struct_attrs);

    let body = match &field.attrs.set {
        Some(path) => quote! { #path(self, value) },
        None => quote! {
            self.#ident.set(value);
            ::core::result::Result::Ok(())
        },
    };

    quote! {
        #[doc = #doc]
        #[allow(dead_code)]
        #vis fn #setter(
            &mut self,
            value: #ty,
        ) -> ::core::result::Result<(), ::field_props::FieldPropsError> {
            #body
        }
    }
}

fn generate_deleter(record: &str, struct_attrs: &StructAttrs, field: &FieldInfo) -> TokenStream {
    let ident = &field.ident;
    let name = &field.name;
    let deleter = field.deleter_ident();
    let doc = format!("Deletes `{name}` through its del role.");
    let vis = visibility(struct_attrs);

    let body = match &field.attrs.del {
        Some(path) => quote! { #path(self) },
        None => quote! {
            self.#ident.remove(#record, #name).map(|_| ())
        },
    };

    quote! {
        #[doc = #doc]
        #[allow(dead_code)]
        #vis fn #deleter(&mut self) -> ::core::result::Result<(), ::field_props::FieldPropsError> {
            #body
        }
    }
}

/// Frozen records keep their setters and deleters private; the generated
/// constructor is then the only writer.
fn visibility(struct_attrs: &StructAttrs) -> TokenStream {
    if struct_attrs.frozen {
        quote! {}
    } else {
        quote! { pub }
    }
}
