mod accessor_gen;
mod attrs;
mod init_gen;
mod repr_gen;

use std::collections::HashSet;

use proc_macro::TokenStream;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

use accessor_gen::generate_accessors;
use attrs::{FieldInfo, parse_struct_attrs};
use init_gen::generate_constructor;
use repr_gen::{generate_debug_impl, generate_eq_impl};

#[proc_macro_derive(FieldProperties, attributes(prop, props))]
pub fn derive_field_properties(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_field_properties_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_field_properties_impl(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;

    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named,
            Fields::Unnamed(_) | Fields::Unit => {
                return Err(syn::Error::new_spanned(
                    struct_name,
                    "FieldProperties requires a struct with named fields",
                ));
            }
        },
        Data::Enum(_) | Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "FieldProperties can only be derived for structs",
            ));
        }
    };

    let struct_attrs = parse_struct_attrs(&input.attrs)?;
    let fields = named
        .named
        .iter()
        .map(FieldInfo::from_field)
        .collect::<syn::Result<Vec<_>>>()?;
    check_method_names(&fields)?;

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let constructor = generate_constructor(&fields);
    let accessors = generate_accessors(struct_name, &struct_attrs, &fields);

    let record = struct_name.to_string();
    let field_names: Vec<&String> = fields.iter().map(|field| &field.name).collect();

    let debug_impl = if struct_attrs.repr {
        generate_debug_impl(input, &fields)
    } else {
        quote::quote! {}
    };
    let eq_impl = if struct_attrs.eq {
        generate_eq_impl(input, &fields)
    } else {
        quote::quote! {}
    };

    Ok(quote::quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #constructor
            #(#accessors)*
        }

        impl #impl_generics ::field_props::FieldProperties
            for #struct_name #ty_generics #where_clause
        {
            const RECORD_NAME: &'static str = #record;

            fn field_names() -> &'static [&'static str] {
                &[#(#field_names),*]
            }
        }

        #debug_impl
        #eq_impl
    })
}

/// Generated accessors share the inherent namespace; two fields must not
/// produce the same method name (e.g. `x` and `set_x`).
fn check_method_names(fields: &[FieldInfo]) -> syn::Result<()> {
    let mut seen: HashSet<String> = HashSet::new();
    seen.insert("new".to_string());

    for field in fields.iter().filter(|field| field.is_managed()) {
        let mut names = Vec::new();
        if field.has_getter() {
            names.push(field.getter_ident());
        }
        if field.has_setter() {
            names.push(field.setter_ident());
        }
        if field.has_deleter() {
            names.push(field.deleter_ident());
        }
        for name in names {
            if !seen.insert(name.to_string()) {
                return Err(syn::Error::new_spanned(
                    &field.ident,
                    format!("generated method `{name}` collides with another accessor"),
                ));
            }
        }
    }
    Ok(())
}
