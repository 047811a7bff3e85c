use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::attrs::FieldInfo;

/// `Debug` over the `repr` fields, reading managed fields through their getter.
pub fn generate_debug_impl(input: &DeriveInput, fields: &[FieldInfo]) -> TokenStream {
    let struct_name = &input.ident;
    let record = struct_name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let entries: Vec<TokenStream> = fields
        .iter()
        .filter(|field| field.attrs.repr)
        .map(|field| {
            let name = &field.name;
            let ident = &field.ident;
            if !field.is_managed() {
                quote! { debug.field(#name, &self.#ident); }
            } else if field.has_getter() {
                let getter = field.getter_ident();
                quote! {
                    match self.#getter() {
                        ::core::result::Result::Ok(value) => {
                            debug.field(#name, &value);
                        }
                        ::core::result::Result::Err(_) => {
                            debug.field(#name, &::core::format_args!("<unreadable>"));
                        }
                    }
                }
            } else {
                quote! { debug.field(#name, &::core::format_args!("<unreadable>")); }
            }
        })
        .collect();

    quote! {
        impl #impl_generics ::core::fmt::Debug for #struct_name #ty_generics #where_clause {
            fn fmt(&self, __formatter: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                let mut debug = __formatter.debug_struct(#record);
                #(#entries)*
                debug.finish()
            }
        }
    }
}

/// `PartialEq` over the `compare` fields. A getter failing on either side
/// makes the values unequal.
pub fn generate_eq_impl(input: &DeriveInput, fields: &[FieldInfo]) -> TokenStream {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let comparisons: Vec<TokenStream> = fields
        .iter()
        .filter(|field| field.attrs.compare)
        .map(|field| {
            let ident = &field.ident;
            if field.has_getter() {
                let getter = field.getter_ident();
                quote! {
                    match (self.#getter(), other.#getter()) {
                        (
                            ::core::result::Result::Ok(left),
                            ::core::result::Result::Ok(right),
                        ) => left == right,
                        _ => false,
                    }
                }
            } else {
                quote! { self.#ident == other.#ident }
            }
        })
        .collect();

    quote! {
        impl #impl_generics ::core::cmp::PartialEq for #struct_name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn eq(&self, other: &Self) -> bool {
                true #(&& (#comparisons))*
            }
        }
    }
}
