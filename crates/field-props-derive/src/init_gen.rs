use proc_macro2::TokenStream;
use quote::quote;
use syn::Type;

use crate::attrs::{DefaultSpec, FieldInfo};

/// Generate `new`, taking every init field without a default in declaration
/// order. Managed fields start vacant and are filled through their setter.
pub fn generate_constructor(fields: &[FieldInfo]) -> TokenStream {
    let params: Vec<TokenStream> = fields
        .iter()
        .filter(|field| field.is_param())
        .map(|field| {
            let ident = &field.ident;
            let ty = field.value_ty();
            quote! { #ident: #ty }
        })
        .collect();

    let inits: Vec<TokenStream> = fields
        .iter()
        .map(|field| {
            let ident = &field.ident;
            if field.is_managed() {
                quote! { #ident: ::field_props::Backing::vacant() }
            } else if field.is_param() {
                quote! { #ident }
            } else if let Some(default) = field.default() {
                let value = default_value(default, &field.ty);
                quote! { #ident: #value }
            } else {
                quote! { #ident: ::core::default::Default::default() }
            }
        })
        .collect();

    let writes: Vec<TokenStream> = fields
        .iter()
        .filter(|field| field.is_managed() && field.attrs.init)
        .map(|field| {
            let setter = field.setter_ident();
            let value = match field.default() {
                Some(default) => default_value(default, field.value_ty()),
                None => {
                    let ident = &field.ident;
                    quote! { #ident }
                }
            };
            quote! { __this.#setter(#value)?; }
        })
        .collect();

    quote! {
        /// Construct a value, initialising managed fields through their set role.
        pub fn new(#(#params),*) -> ::core::result::Result<Self, ::field_props::FieldPropsError> {
            #[allow(unused_mut)]
            let mut __this = Self {
                #(#inits,)*
            };
            #(#writes)*
            ::core::result::Result::Ok(__this)
        }
    }
}

fn default_value(default: &DefaultSpec, ty: &Type) -> TokenStream {
    match default {
        DefaultSpec::Expr(expr) => quote! {
            {
                let value: #ty = #expr;
                value
            }
        },
        DefaultSpec::Factory(path) => quote! { #path() },
    }
}
