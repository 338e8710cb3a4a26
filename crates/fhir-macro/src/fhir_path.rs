use crate::krate;
use crate::shape::{Cardinality, Shape};
use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let ident = &input.ident;
    let support = {
        let krate = krate();
        quote!(#krate::__private::fhirpath_support)
    };

    Ok(match Shape::parse(input)? {
        Shape::Struct {
            resource,
            backbone,
            fields,
        } => {
            let type_name = match (resource, backbone) {
                (Some(resource), _) => resource,
                (None, true) => "BackboneElement".to_string(),
                (None, false) => ident.to_string(),
            };
            let pushes = fields.iter().map(|field| {
                let member = &field.ident;
                let name = &field.name;
                match field.cardinality {
                    Cardinality::One => quote! {
                        if let ::core::option::Option::Some(value) = &self.#member {
                            fields.push((#name, value as &dyn #support::FhirPathElement));
                        }
                    },
                    Cardinality::Many => quote! {
                        if let ::core::option::Option::Some(values) = &self.#member {
                            for value in values {
                                fields.push((#name, value as &dyn #support::FhirPathElement));
                            }
                        }
                    },
                }
            });
            quote! {
                impl #support::FhirPathElement for #ident {
                    fn type_info(&self) -> #support::TypeInfoResult {
                        #support::TypeInfoResult::fhir(#type_name)
                    }

                    fn fields(&self) -> ::std::vec::Vec<(&'static str, &dyn #support::FhirPathElement)> {
                        let mut fields: ::std::vec::Vec<(&'static str, &dyn #support::FhirPathElement)> =
                            ::std::vec::Vec::new();
                        #(#pushes)*
                        fields
                    }
                }
            }
        }
        Shape::Choice { variants } => {
            let idents: Vec<_> = variants.iter().map(|v| &v.ident).collect();
            quote! {
                impl #support::FhirPathElement for #ident {
                    fn type_info(&self) -> #support::TypeInfoResult {
                        match self {
                            #(#ident::#idents(value) => #support::FhirPathElement::type_info(value),)*
                        }
                    }

                    fn fields(&self) -> ::std::vec::Vec<(&'static str, &dyn #support::FhirPathElement)> {
                        match self {
                            #(#ident::#idents(value) => #support::FhirPathElement::fields(value),)*
                        }
                    }

                    fn system_value(&self) -> ::core::option::Option<#support::SystemValue> {
                        match self {
                            #(#ident::#idents(value) => #support::FhirPathElement::system_value(value),)*
                        }
                    }
                }
            }
        }
    })
}
