use crate::krate;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Index};

pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let ident = &input.ident;
    let krate = krate();

    let body = match &input.data {
        Data::Struct(data) => {
            let members: Vec<TokenStream> = match &data.fields {
                Fields::Named(named) => named
                    .named
                    .iter()
                    .filter_map(|f| f.ident.as_ref())
                    .map(|member| quote!(&self.#member))
                    .collect(),
                Fields::Unnamed(unnamed) => (0..unnamed.unnamed.len())
                    .map(|i| {
                        let index = Index::from(i);
                        quote!(&self.#index)
                    })
                    .collect(),
                Fields::Unit => Vec::new(),
            };
            quote!(0 #(+ #krate::MemSize::heap_size(#members))*)
        }
        Data::Enum(data) => {
            let mut arms = Vec::with_capacity(data.variants.len());
            for variant in &data.variants {
                let v = &variant.ident;
                let arm = match &variant.fields {
                    Fields::Unnamed(unnamed) if unnamed.unnamed.len() == 1 => {
                        quote!(#ident::#v(value) => #krate::MemSize::heap_size(value),)
                    }
                    Fields::Unit => quote!(#ident::#v => 0,),
                    _ => {
                        return Err(syn::Error::new_spanned(
                            variant,
                            "MemSize supports unit variants and single-field tuple variants",
                        ));
                    }
                };
                arms.push(arm);
            }
            quote! {
                match self {
                    #(#arms)*
                }
            }
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(ident, "unions are not supported"));
        }
    };

    Ok(quote! {
        impl #krate::MemSize for #ident {
            fn heap_size(&self) -> usize {
                #body
            }
        }
    })
}
