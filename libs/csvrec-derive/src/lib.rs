use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

/// Derive macro for record shapes.
///
/// Generates an implementation of `csvrec::Record` for the annotated struct:
///
/// - `shape()` — ordered slot list (ordinal, column name, field kind).
/// - `decode_slot()` / `encode_slot()` — per-ordinal cell conversion.
/// - `clear_slot()` — resets one field to its zero value.
///
/// The struct must implement `Default`. Every field type must implement
/// `csvrec::Field` (built-in scalars, `String`, or any `TextCodec` type).
///
/// # Example
///
/// ```ignore
/// #[derive(Debug, Default, Clone, Record)]
/// pub struct Quote {
///     pub symbol: String,
///     pub bid: f64,
///
///     #[csv(rename = "ts")]
///     pub ts_ms: i64,
/// }
/// ```
///
/// Enums, unions and tuple structs are rejected.
#[proc_macro_derive(Record, attributes(csv))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn derive_impl(input: &DeriveInput) -> Result<proc_macro2::TokenStream, syn::Error> {
    let name = &input.ident;

    let fields: Vec<&syn::Field> = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields.named.iter().collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Record only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Record only supports structs",
            ))
        }
    };

    let mut slot_tokens = Vec::new();
    let mut decode_arms = Vec::new();
    let mut clear_arms = Vec::new();
    let mut encode_arms = Vec::new();

    for (ordinal, field) in fields.iter().enumerate() {
        let field_name = field.ident.as_ref().ok_or_else(|| {
            syn::Error::new_spanned(field, "expected named field")
        })?;
        let field_ty = &field.ty;

        // Parse #[csv(...)] attribute.
        let mut column = field_name.to_string();
        for attr in &field.attrs {
            if !attr.path().is_ident("csv") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    if value.value().is_empty() {
                        return Err(meta.error("column name must not be empty"));
                    }
                    column = value.value();
                    Ok(())
                } else {
                    Err(meta.error("unknown csv attribute (expected `rename`)"))
                }
            })?;
        }

        slot_tokens.push(quote! {
            ::csvrec::Slot::new(
                #ordinal,
                #column,
                <#field_ty as ::csvrec::Field>::KIND,
            )
        });

        decode_arms.push(quote! {
            #ordinal => {
                self.#field_name = <#field_ty as ::csvrec::Field>::decode_cell(text)?;
                ::core::result::Result::Ok(())
            }
        });

        clear_arms.push(quote! {
            #ordinal => self.#field_name = ::core::default::Default::default(),
        });

        encode_arms.push(quote! {
            #ordinal => ::csvrec::Field::encode_cell(&self.#field_name),
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::csvrec::Record for #name #ty_generics #where_clause {
            fn shape() -> ::core::result::Result<::csvrec::Shape, ::csvrec::ShapeError> {
                ::csvrec::Shape::new(::std::vec![
                    #(#slot_tokens),*
                ])
            }

            #[allow(unused_variables)]
            fn decode_slot(
                &mut self,
                ordinal: usize,
                text: &str,
            ) -> ::core::result::Result<(), ::csvrec::CellError> {
                match ordinal {
                    #(#decode_arms)*
                    _ => ::core::result::Result::Err(::csvrec::CellError::NoSlot(ordinal)),
                }
            }

            fn clear_slot(&mut self, ordinal: usize) {
                match ordinal {
                    #(#clear_arms)*
                    _ => {}
                }
            }

            fn encode_slot(
                &self,
                ordinal: usize,
            ) -> ::core::result::Result<::std::string::String, ::csvrec::CellError> {
                match ordinal {
                    #(#encode_arms)*
                    _ => ::core::result::Result::Err(::csvrec::CellError::NoSlot(ordinal)),
                }
            }
        }
    };

    Ok(expanded)
}
