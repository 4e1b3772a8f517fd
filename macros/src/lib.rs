use proc_macro::TokenStream;
use quote::quote;
use syn::parse::Parser;

/// Generate a color model struct from a struct definition holding exactly
/// three component fields. The generated struct gains an `alpha` component
/// and a set of `flags`, along with constructors and conversions to and from
/// `Components`.
#[proc_macro]
pub fn gen_model(input: TokenStream) -> TokenStream {
    let mut input = syn::parse_macro_input!(input as syn::ItemStruct);

    if input.fields.len() != 3 {
        return quote! {
            compile_error!("Models must have exactly 3 fields, one for each component of the color.")
        }
        .into();
    }

    if !input.generics.params.is_empty() {
        return quote! {
            compile_error!("Models can not be generic.")
        }
        .into();
    }

    let field_names = input
        .fields
        .iter()
        .map(|f| f.ident.clone())
        .collect::<Vec<_>>();
    debug_assert!(field_names.len() == 3);

    let field1 = &field_names[0];
    let field2 = &field_names[1];
    let field3 = &field_names[2];

    // Make sure the 3 specified fields are public.
    input.fields.iter_mut().for_each(|f| {
        f.vis = syn::Visibility::Public(Default::default());
    });

    let attr = match syn::Attribute::parse_outer.parse2(quote! {
        #[derive(Clone, Copy, Debug, PartialEq)]
    }) {
        Ok(attr) => attr,
        Err(err) => return err.to_compile_error().into(),
    };
    input.attrs.extend(attr);

    if let syn::Fields::Named(ref mut named) = input.fields {
        let extra = [
            quote! {
                /// The alpha component of the color.
                pub alpha: crate::color::Component
            },
            quote! {
                /// Holds any flags that might be enabled for this color.
                pub flags: crate::color::Flags
            },
        ];

        for tokens in extra {
            match syn::Field::parse_named.parse2(tokens) {
                Ok(field) => named.named.push(field),
                Err(err) => return err.to_compile_error().into(),
            }
        }
    } else {
        return quote! {
            compile_error!("Models must use named fields.")
        }
        .into();
    }

    let struct_name = input.ident.clone();

    let new_impl = quote! {
        impl #struct_name {
            /// Create a new color with this model. Passing `None` as the
            /// alpha marks it as omitted, which implies full opacity.
            pub fn new(
                #field1: crate::color::Component,
                #field2: crate::color::Component,
                #field3: crate::color::Component,
                alpha: impl Into<crate::color::AlphaDetails>,
            ) -> Self {
                let mut flags = crate::color::Flags::empty();
                let alpha = alpha
                    .into()
                    .value_and_flag(&mut flags, crate::color::Flags::IMPLICIT_ALPHA);

                Self {
                    #field1,
                    #field2,
                    #field3,
                    alpha,
                    flags,
                }
            }

            /// Convert this model into generic components.
            pub fn to_components(&self) -> crate::color::Components {
                crate::color::Components(self.#field1, self.#field2, self.#field3)
            }

            /// Return a copy of this color with the components replaced,
            /// keeping the alpha and flags.
            pub fn with_components(&self, components: crate::color::Components) -> Self {
                Self {
                    #field1: components.0,
                    #field2: components.1,
                    #field3: components.2,
                    alpha: self.alpha,
                    flags: self.flags,
                }
            }
        }

        impl From<crate::color::Components> for #struct_name {
            fn from(value: crate::color::Components) -> Self {
                Self::new(value.0, value.1, value.2, Option::<crate::color::Component>::None)
            }
        }
    };

    quote! {
        #input
        #new_impl
    }
    .into()
}
