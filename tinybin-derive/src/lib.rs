//! # Tinybin Derive Macros
//!
//! This crate provides the procedural macro for `tinybin`. It implements
//! the `Serializable` trait for user-defined structs: a static type
//! descriptor (field names, types and tag flags in declaration order) plus
//! the encode/decode/size traversal over the non-ignored fields.
//!
//! ## Field attributes
//!
//! * `#[tinybin(ignore)]`: the field contributes zero bytes in both
//!   directions. Fields whose name starts with `_` are ignored implicitly.
//! * `#[tinybin(packed)]`: varint-encode this integer field; honored only
//!   once the struct is registered.
//!
//! Compatible with `syn 2.0`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitStr};

/// Derives `tinybin::Serializable` for a named-field struct.
#[proc_macro_derive(TinybinObject, attributes(tinybin))]
pub fn derive_tinybin_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = input.ident;

    // 1. Validation: only non-generic structs with named fields.
    if !input.generics.params.is_empty() {
        return syn::Error::new(name.span(), "TinybinObject does not support generic structs")
            .to_compile_error()
            .into();
    }
    let data_struct = match input.data {
        Data::Struct(ds) => ds,
        _ => {
            return syn::Error::new(name.span(), "TinybinObject only supports structs")
                .to_compile_error()
                .into()
        }
    };
    let named = match data_struct.fields {
        Fields::Named(named) => named.named,
        Fields::Unit => Default::default(),
        Fields::Unnamed(_) => {
            return syn::Error::new(name.span(), "TinybinObject requires named fields")
                .to_compile_error()
                .into()
        }
    };

    // 2. Field classification.
    let mut fields = Vec::new();
    for field in named {
        let (mut ignore, packed) = match parse_attributes(&field.attrs) {
            Ok(res) => res,
            Err(e) => return e.to_compile_error().into(),
        };
        let ident = match field.ident.clone() {
            Some(ident) => ident,
            None => {
                return syn::Error::new(name.span(), "TinybinObject requires named fields")
                    .to_compile_error()
                    .into()
            }
        };
        // A leading underscore plays the role of an unexported field name.
        if ident.to_string().starts_with('_') {
            ignore = true;
        }
        fields.push(FieldModel {
            ident,
            ty: field.ty,
            ignore,
            packed,
        });
    }

    // 3. Code generation.
    let desc = generate_desc(&name, &fields);
    let encode = generate_encode(&fields);
    let decode = generate_decode(&fields);
    let sizing = generate_size(&fields);

    // 4. Expansion.
    let expanded = quote! {
        impl tinybin::Serializable for #name {
            #desc
            #encode
            #decode
            #sizing
        }
    };

    TokenStream::from(expanded)
}

// --- Internal Data Structures ---

struct FieldModel {
    ident: syn::Ident,
    ty: syn::Type,
    ignore: bool,
    packed: bool,
}

// --- Parsing Logic (Syn 2.0) ---

/// Parses `#[tinybin(...)]` attributes. Returns `(ignore, packed)`.
fn parse_attributes(attrs: &[Attribute]) -> syn::Result<(bool, bool)> {
    let mut ignore = false;
    let mut packed = false;

    for attr in attrs {
        if attr.path().is_ident("tinybin") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("ignore") {
                    ignore = true;
                    return Ok(());
                }
                if meta.path.is_ident("packed") {
                    packed = true;
                    return Ok(());
                }
                Err(meta.error("Unknown tinybin attribute key. Supported: 'ignore', 'packed'"))
            })?;
        }
    }
    Ok((ignore, packed))
}

// --- Generator: type descriptor ---

fn generate_desc(name: &syn::Ident, fields: &[FieldModel]) -> proc_macro2::TokenStream {
    let name_lit = LitStr::new(&name.to_string(), name.span());
    let field_descs = fields.iter().map(|f| {
        let fname = LitStr::new(&f.ident.to_string(), f.ident.span());
        let fty = &f.ty;
        let ignore = f.ignore;
        let packed = f.packed;
        quote! {
            tinybin::desc::FieldDesc {
                name: #fname,
                desc: <#fty as tinybin::Serializable>::desc,
                ignore: #ignore,
                packed: #packed,
            }
        }
    });

    quote! {
        const DESC: &'static tinybin::desc::TypeDesc = &tinybin::desc::TypeDesc::new(
            tinybin::desc::Kind::Struct(&tinybin::desc::StructDesc {
                name: #name_lit,
                fields: &[#(#field_descs),*],
            }),
            ::std::any::TypeId::of::<#name>,
            ::std::any::type_name::<#name>,
        );
    }
}

// --- Generator: traversal hooks ---
//
// Ignored fields get no statements at all: zero bytes in both directions.
// The remaining fields consult the registry once per call; packed and
// serializer flags only take effect when the struct is registered.

fn generate_encode(fields: &[FieldModel]) -> proc_macro2::TokenStream {
    let stmts: Vec<_> = fields
        .iter()
        .enumerate()
        .filter(|(_, f)| !f.ignore)
        .map(|(i, f)| {
            let ident = &f.ident;
            quote! {
                tinybin::rt::encode_field(
                    _enc,
                    &self.#ident,
                    tinybin::rt::field_packed(info, #i),
                    tinybin::rt::field_switch(info, #i, _serializer),
                )?;
            }
        })
        .collect();

    let body = if stmts.is_empty() {
        quote! { Ok(()) }
    } else {
        quote! {
            let info = tinybin::rt::struct_info::<Self>();
            #(#stmts)*
            Ok(())
        }
    };

    quote! {
        fn encode_value(
            &self,
            _enc: &mut tinybin::Encoder<'_>,
            _packed: bool,
            _serializer: tinybin::SerializerSwitch,
        ) -> tinybin::Result<()> {
            #body
        }
    }
}

fn generate_decode(fields: &[FieldModel]) -> proc_macro2::TokenStream {
    let stmts: Vec<_> = fields
        .iter()
        .enumerate()
        .filter(|(_, f)| !f.ignore)
        .map(|(i, f)| {
            let ident = &f.ident;
            quote! {
                tinybin::rt::decode_field(
                    _dec,
                    &mut self.#ident,
                    tinybin::rt::field_packed(info, #i),
                    tinybin::rt::field_switch(info, #i, _serializer),
                )?;
            }
        })
        .collect();

    let body = if stmts.is_empty() {
        quote! { Ok(()) }
    } else {
        quote! {
            let info = tinybin::rt::struct_info::<Self>();
            #(#stmts)*
            Ok(())
        }
    };

    quote! {
        fn decode_value(
            &mut self,
            _dec: &mut tinybin::Decoder<'_>,
            _packed: bool,
            _serializer: tinybin::SerializerSwitch,
        ) -> tinybin::Result<()> {
            #body
        }
    }
}

fn generate_size(fields: &[FieldModel]) -> proc_macro2::TokenStream {
    let stmts: Vec<_> = fields
        .iter()
        .enumerate()
        .filter(|(_, f)| !f.ignore)
        .map(|(i, f)| {
            let ident = &f.ident;
            quote! {
                total += tinybin::rt::size_field(
                    &self.#ident,
                    tinybin::rt::field_packed(info, #i),
                    tinybin::rt::field_switch(info, #i, _serializer),
                )?;
            }
        })
        .collect();

    let body = if stmts.is_empty() {
        quote! { ::std::option::Option::Some(0) }
    } else {
        quote! {
            let info = tinybin::rt::struct_info::<Self>();
            let mut total = 0usize;
            #(#stmts)*
            ::std::option::Option::Some(total)
        }
    };

    quote! {
        fn size_value(
            &self,
            _packed: bool,
            _serializer: tinybin::SerializerSwitch,
        ) -> ::std::option::Option<usize> {
            #body
        }
    }
}
