// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! This crate provides procedural macros for the Kiln pipeline-state crates.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Index};

/// A derive macro that implements `kiln_core::renderer::StateKey` for a struct.
///
/// Every declared field takes part in the generated comparison and hash, in
/// declaration order. No attribute exists to exclude a field.
///
/// Alongside `StateKey`, the macro emits `PartialEq`, `Eq` and `Hash` impls that
/// delegate to it, so the struct must not derive those traits itself.
#[proc_macro_derive(StateKey)]
pub fn derive_state_key(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_state_key(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand_state_key(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        Data::Enum(_) | Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                name,
                "StateKey can only be derived for structs",
            ));
        }
    };

    // Member accessors (`self.foo` or `self.0`) and the names reported in `FIELDS`.
    let (members, field_names): (Vec<TokenStream2>, Vec<String>) = match fields {
        Fields::Named(named) => named
            .named
            .iter()
            .filter_map(|field| field.ident.as_ref())
            .map(|ident| (quote!(#ident), ident.to_string()))
            .unzip(),
        Fields::Unnamed(unnamed) => unnamed
            .unnamed
            .iter()
            .enumerate()
            .map(|(i, _)| {
                let index = Index::from(i);
                (quote!(#index), i.to_string())
            })
            .unzip(),
        Fields::Unit => (Vec::new(), Vec::new()),
    };

    let krate = quote!(::kiln_core::renderer);

    let expanded = quote! {
        impl #impl_generics #krate::StateKey for #name #ty_generics #where_clause {
            const FIELDS: &'static [&'static str] = &[#(#field_names),*];

            #[inline]
            #[allow(unused_variables)]
            fn state_eq(&self, other: &Self) -> bool {
                true #(&& #krate::StateKey::state_eq(&self.#members, &other.#members))*
            }

            #[inline]
            #[allow(unused_variables)]
            fn state_hash<__H: ::core::hash::Hasher>(&self, state: &mut __H) {
                #(#krate::StateKey::state_hash(&self.#members, state);)*
            }
        }

        impl #impl_generics ::core::cmp::PartialEq for #name #ty_generics #where_clause {
            #[inline]
            fn eq(&self, other: &Self) -> bool {
                #krate::StateKey::state_eq(self, other)
            }
        }

        impl #impl_generics ::core::cmp::Eq for #name #ty_generics #where_clause {}

        impl #impl_generics ::core::hash::Hash for #name #ty_generics #where_clause {
            #[inline]
            fn hash<__H: ::core::hash::Hasher>(&self, state: &mut __H) {
                #krate::StateKey::state_hash(self, state)
            }
        }
    };

    Ok(expanded)
}
