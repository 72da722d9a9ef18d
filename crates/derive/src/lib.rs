//! `#[derive(Populate)]` for opfield
//!
//! Generates the binding table that `opfield::populate` walks. Fields tagged
//! `#[opfield("key")]` are bound in declaration order; untagged fields are left
//! out of the table entirely. Use through the `opfield` re-export.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, Type, parse_macro_input};

const ATTR: &str = "opfield";

const INTEGER_TYPES: &[&str] = &[
    "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize",
];

/// Derive `opfield::Populate` for a struct with named fields.
///
/// ```ignore
/// #[derive(opfield::Populate)]
/// struct Database {
///     #[opfield("host")]
///     host: String,
///     #[opfield("port")]
///     port: u16,
///     pool_size: usize,
/// }
/// ```
#[proc_macro_derive(Populate, attributes(opfield))]
pub fn derive_populate(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Populate can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Populate can only be derived for structs",
            ));
        }
    };

    let mut bindings = Vec::new();
    for field in fields {
        let Some(tag) = field_tag(field)? else {
            continue;
        };
        let Some(ident) = &field.ident else {
            continue;
        };
        let name = ident.to_string();
        let binding = match classify(&field.ty) {
            Kind::Text => quote! {
                ::opfield::FieldBinding::text(#name, #tag, &mut self.#ident)
            },
            Kind::Integer => quote! {
                ::opfield::FieldBinding::integer(#name, #tag, &mut self.#ident)
            },
            Kind::Unsupported(type_name) => quote! {
                ::opfield::FieldBinding::unsupported(#name, #tag, #type_name)
            },
        };
        bindings.push(binding);
    }

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::opfield::Populate for #ident #ty_generics #where_clause {
            fn bindings(&mut self) -> ::std::vec::Vec<::opfield::FieldBinding<'_>> {
                ::std::vec![#(#bindings),*]
            }
        }
    })
}

/// The key from `#[opfield("key")]`, if the field carries one.
fn field_tag(field: &syn::Field) -> syn::Result<Option<LitStr>> {
    let mut tag: Option<LitStr> = None;
    for attr in field.attrs.iter().filter(|a| a.path().is_ident(ATTR)) {
        if tag.is_some() {
            return Err(syn::Error::new_spanned(attr, "duplicate #[opfield] attribute"));
        }
        let lit: LitStr = attr.parse_args()?;
        if lit.value().is_empty() {
            return Err(syn::Error::new_spanned(lit, "opfield key must not be empty"));
        }
        tag = Some(lit);
    }
    Ok(tag)
}

enum Kind {
    Text,
    Integer,
    Unsupported(String),
}

fn classify(ty: &Type) -> Kind {
    if let Type::Path(path) = ty
        && path.qself.is_none()
        && let Some(last) = path.path.segments.last()
        && last.arguments.is_empty()
    {
        let name = last.ident.to_string();
        if name == "String" {
            return Kind::Text;
        }
        if INTEGER_TYPES.contains(&name.as_str()) {
            return Kind::Integer;
        }
    }
    Kind::Unsupported(quote!(#ty).to_string().replace(' ', ""))
}
