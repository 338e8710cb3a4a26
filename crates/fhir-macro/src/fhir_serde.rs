use crate::krate;
use crate::shape::{Cardinality, FieldSpec, Shape, VariantSpec};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{DeriveInput, Ident};

pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    Ok(match Shape::parse(input)? {
        Shape::Struct {
            resource, fields, ..
        } => expand_struct(&input.ident, resource.as_deref(), &fields),
        Shape::Choice { variants } => expand_choice(&input.ident, &variants),
    })
}

fn slot_var(field: &FieldSpec) -> Ident {
    format_ident!("__field_{}", field.ident.unraw())
}

fn slot_type(field: &FieldSpec) -> TokenStream {
    let ty = &field.ty;
    match field.cardinality {
        Cardinality::One => quote!(#ty),
        Cardinality::Many => quote!(::std::vec::Vec<#ty>),
    }
}

fn expand_struct(ident: &Ident, resource: Option<&str>, fields: &[FieldSpec]) -> TokenStream {
    let krate = krate();
    let private = quote!(#krate::__private);
    let type_name = ident.to_string();
    let expecting = format!("a JSON object for {type_name}");

    let idents: Vec<&Ident> = fields.iter().map(|f| &f.ident).collect();
    let vars: Vec<Ident> = fields.iter().map(slot_var).collect();
    let slot_types: Vec<TokenStream> = fields.iter().map(slot_type).collect();

    let json_writes = fields.iter().map(|field| {
        let ident = &field.ident;
        let ty = &field.ty;
        let name = &field.name;
        match field.cardinality {
            Cardinality::One => quote! {
                if let ::core::option::Option::Some(value) = &self.#ident {
                    <#ty as #krate::FhirJson>::write_one(value, #name, &mut map)?;
                }
            },
            Cardinality::Many => quote! {
                if let ::core::option::Option::Some(values) = &self.#ident {
                    if !values.is_empty() {
                        <#ty as #krate::FhirJson>::write_many(values, #name, &mut map)?;
                    }
                }
            },
        }
    });

    let json_reads = fields.iter().zip(&vars).map(|(field, var)| {
        let ty = &field.ty;
        let name = &field.name;
        let read = match field.cardinality {
            Cardinality::One => quote!(read_one),
            Cardinality::Many => quote!(read_many),
        };
        quote! {
            if <#ty as #krate::FhirJson>::#read(
                &mut #var,
                #krate::Field::new(#type_name, #name),
                &key,
                &mut map,
            )? {
                continue;
            }
        }
    });

    let resource_entry = resource.map(|rt| {
        quote! {
            #private::serde::ser::SerializeMap::serialize_entry(&mut map, "resourceType", #rt)?;
        }
    });

    let resource_check = resource.map(|rt| {
        quote! {
            if key == "resourceType" {
                let found: ::std::string::String =
                    #private::serde::de::MapAccess::next_value(&mut map)?;
                if found != #rt {
                    return ::core::result::Result::Err(#private::serde::de::Error::custom(
                        #krate::DecodeError::resource_type_mismatch(#rt, found),
                    ));
                }
                continue;
            }
        }
    });

    let xml_writes = fields.iter().map(|field| {
        let ident = &field.ident;
        let ty = &field.ty;
        let name = &field.name;
        if field.attribute {
            return quote! {
                if let ::core::option::Option::Some(value) = &self.#ident {
                    element.push_attribute(#name, ::std::clone::Clone::clone(value));
                }
            };
        }
        match field.cardinality {
            Cardinality::One => quote! {
                if let ::core::option::Option::Some(value) = &self.#ident {
                    <#ty as #krate::FhirXml>::write_xml(value, #name, element);
                }
            },
            Cardinality::Many => quote! {
                if let ::core::option::Option::Some(values) = &self.#ident {
                    for value in values {
                        <#ty as #krate::FhirXml>::write_xml(value, #name, element);
                    }
                }
            },
        }
    });

    let xml_slots = fields.iter().zip(&vars).zip(&slot_types).map(|((field, var), slot_ty)| {
        let name = &field.name;
        if field.attribute {
            quote! {
                let #var: ::core::option::Option<#slot_ty> =
                    element.attribute(#name).map(::std::borrow::ToOwned::to_owned);
            }
        } else {
            quote! {
                let mut #var: ::core::option::Option<#slot_ty> = ::core::option::Option::None;
            }
        }
    });

    let xml_attribute_names = fields
        .iter()
        .filter(|field| field.attribute)
        .map(|field| &field.name);

    let xml_reads = fields
        .iter()
        .zip(&vars)
        .filter(|(field, _)| !field.attribute)
        .map(|(field, var)| {
            let ty = &field.ty;
            let name = &field.name;
            let read = match field.cardinality {
                Cardinality::One => quote!(read_xml),
                Cardinality::Many => quote!(read_xml_many),
            };
            quote! {
                if <#ty as #krate::FhirXml>::#read(
                    &mut #var,
                    #krate::Field::new(#type_name, #name),
                    child,
                )? {
                    continue;
                }
            }
        });

    let resource_impls = resource.map(|rt| {
        quote! {
            impl #krate::FhirResource for #ident {
                fn resource_type(&self) -> &'static str {
                    #rt
                }

                fn resource_id(&self) -> ::core::option::Option<&str> {
                    self.id.as_ref().and_then(|id| id.value.as_deref())
                }
            }

            impl #krate::XmlResource for #ident {
                fn to_xml_resource(&self) -> #krate::XmlElement {
                    let mut element = #krate::XmlElement::new(#rt);
                    #krate::XmlFields::write_xml_fields(self, &mut element);
                    element
                }

                fn from_xml_resource(
                    element: &#krate::XmlElement,
                ) -> ::core::result::Result<Self, #krate::DecodeError> {
                    if element.name != #rt {
                        return ::core::result::Result::Err(
                            #krate::DecodeError::resource_type_mismatch(
                                #rt,
                                ::std::clone::Clone::clone(&element.name),
                            ),
                        );
                    }
                    <Self as #krate::XmlFields>::from_xml_fields(element)
                }
            }
        }
    });

    quote! {
        impl #private::serde::Serialize for #ident {
            fn serialize<__S>(&self, serializer: __S) -> ::core::result::Result<__S::Ok, __S::Error>
            where
                __S: #private::serde::Serializer,
            {
                let mut map = serializer.serialize_map(::core::option::Option::None)?;
                #resource_entry
                #(#json_writes)*
                #private::serde::ser::SerializeMap::end(map)
            }
        }

        impl<'de> #private::serde::Deserialize<'de> for #ident {
            fn deserialize<__D>(deserializer: __D) -> ::core::result::Result<Self, __D::Error>
            where
                __D: #private::serde::Deserializer<'de>,
            {
                struct __Visitor;

                impl<'de> #private::serde::de::Visitor<'de> for __Visitor {
                    type Value = #ident;

                    fn expecting(
                        &self,
                        formatter: &mut ::core::fmt::Formatter<'_>,
                    ) -> ::core::fmt::Result {
                        formatter.write_str(#expecting)
                    }

                    fn visit_map<__A>(
                        self,
                        mut map: __A,
                    ) -> ::core::result::Result<#ident, __A::Error>
                    where
                        __A: #private::serde::de::MapAccess<'de>,
                    {
                        #(
                            let mut #vars: ::core::option::Option<#slot_types> =
                                ::core::option::Option::None;
                        )*
                        while let ::core::option::Option::Some(key) =
                            #private::serde::de::MapAccess::next_key::<::std::string::String>(&mut map)?
                        {
                            #resource_check
                            #(#json_reads)*
                            return ::core::result::Result::Err(#private::serde::de::Error::custom(
                                #krate::DecodeError::unknown_field(key, #type_name),
                            ));
                        }
                        ::core::result::Result::Ok(#ident {
                            #(#idents: #vars,)*
                        })
                    }
                }

                deserializer.deserialize_map(__Visitor)
            }
        }

        impl #krate::FhirJson for #ident {
            fn write_one<__M>(&self, name: &str, map: &mut __M) -> ::core::result::Result<(), __M::Error>
            where
                __M: #private::serde::ser::SerializeMap,
            {
                map.serialize_entry(name, self)
            }

            fn write_many<__M>(
                items: &[Self],
                name: &str,
                map: &mut __M,
            ) -> ::core::result::Result<(), __M::Error>
            where
                __M: #private::serde::ser::SerializeMap,
            {
                map.serialize_entry(name, items)
            }

            fn read_one<'de, __A>(
                slot: &mut ::core::option::Option<Self>,
                field: #krate::Field<'_>,
                key: &str,
                map: &mut __A,
            ) -> ::core::result::Result<bool, __A::Error>
            where
                __A: #private::serde::de::MapAccess<'de>,
            {
                if key != field.name {
                    return ::core::result::Result::Ok(false);
                }
                *slot = ::core::option::Option::Some(map.next_value::<Self>()?);
                ::core::result::Result::Ok(true)
            }

            fn read_many<'de, __A>(
                slot: &mut ::core::option::Option<::std::vec::Vec<Self>>,
                field: #krate::Field<'_>,
                key: &str,
                map: &mut __A,
            ) -> ::core::result::Result<bool, __A::Error>
            where
                __A: #private::serde::de::MapAccess<'de>,
            {
                if key != field.name {
                    return ::core::result::Result::Ok(false);
                }
                *slot = ::core::option::Option::Some(#krate::next_items(map, field)?);
                ::core::result::Result::Ok(true)
            }
        }

        impl #krate::XmlFields for #ident {
            fn write_xml_fields(&self, element: &mut #krate::XmlElement) {
                #(#xml_writes)*
            }

            fn from_xml_fields(
                element: &#krate::XmlElement,
            ) -> ::core::result::Result<Self, #krate::DecodeError> {
                const ATTRIBUTES: &[&str] = &[#(#xml_attribute_names),*];
                for (name, _) in &element.attributes {
                    if !ATTRIBUTES.contains(&name.as_str()) {
                        return ::core::result::Result::Err(#krate::DecodeError::unknown_field(
                            ::std::clone::Clone::clone(name),
                            #type_name,
                        ));
                    }
                }
                #(#xml_slots)*
                for child in &element.children {
                    #(#xml_reads)*
                    return ::core::result::Result::Err(#krate::DecodeError::unknown_field(
                        ::std::clone::Clone::clone(&child.name),
                        #type_name,
                    ));
                }
                ::core::result::Result::Ok(#ident {
                    #(#idents: #vars,)*
                })
            }
        }

        impl #krate::FhirXml for #ident {
            fn write_xml(&self, name: &str, parent: &mut #krate::XmlElement) {
                let mut element = #krate::XmlElement::new(name);
                #krate::XmlFields::write_xml_fields(self, &mut element);
                if !element.is_empty() {
                    parent.push_child(element);
                }
            }

            fn read_xml(
                slot: &mut ::core::option::Option<Self>,
                field: #krate::Field<'_>,
                element: &#krate::XmlElement,
            ) -> ::core::result::Result<bool, #krate::DecodeError> {
                if element.name != field.name {
                    return ::core::result::Result::Ok(false);
                }
                *slot = ::core::option::Option::Some(
                    <Self as #krate::XmlFields>::from_xml_fields(element)?,
                );
                ::core::result::Result::Ok(true)
            }
        }

        #resource_impls

        impl ::core::fmt::Display for #ident {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                let json = #private::serde_json::to_string_pretty(self)
                    .map_err(|_| ::core::fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

fn expand_choice(ident: &Ident, variants: &[VariantSpec]) -> TokenStream {
    let krate = krate();
    let private = quote!(#krate::__private);

    let json_writes = variants.iter().map(|variant| {
        let v = &variant.ident;
        let ty = &variant.ty;
        let suffix = &variant.suffix;
        quote! {
            #ident::#v(value) => <#ty as #krate::FhirJson>::write_one(
                value,
                &#krate::choice_key(name, #suffix),
                map,
            ),
        }
    });

    let json_reads = variants.iter().map(|variant| {
        let v = &variant.ident;
        let ty = &variant.ty;
        let suffix = &variant.suffix;
        quote! {
            #suffix => {
                let mut current = match slot.take() {
                    ::core::option::Option::None => ::core::option::Option::None,
                    ::core::option::Option::Some(#ident::#v(value)) => {
                        ::core::option::Option::Some(value)
                    }
                    ::core::option::Option::Some(other) => {
                        *slot = ::core::option::Option::Some(other);
                        return ::core::result::Result::Err(#private::serde::de::Error::custom(
                            #krate::DecodeError::multiple_values(field.name, field.owner),
                        ));
                    }
                };
                let name = #krate::choice_key(field.name, #suffix);
                let claimed = <#ty as #krate::FhirJson>::read_one(
                    &mut current,
                    #krate::Field::new(field.owner, &name),
                    key,
                    map,
                )?;
                *slot = current.map(#ident::#v);
                ::core::result::Result::Ok(claimed)
            }
        }
    });

    let xml_writes = variants.iter().map(|variant| {
        let v = &variant.ident;
        let ty = &variant.ty;
        let suffix = &variant.suffix;
        quote! {
            #ident::#v(value) => <#ty as #krate::FhirXml>::write_xml(
                value,
                &#krate::choice_key(name, #suffix),
                parent,
            ),
        }
    });

    let xml_reads = variants.iter().map(|variant| {
        let v = &variant.ident;
        let ty = &variant.ty;
        let suffix = &variant.suffix;
        quote! {
            #suffix => {
                if slot.is_some() {
                    return ::core::result::Result::Err(
                        #krate::DecodeError::multiple_values(field.name, field.owner),
                    );
                }
                let name = #krate::choice_key(field.name, #suffix);
                let mut current = ::core::option::Option::None;
                let claimed = <#ty as #krate::FhirXml>::read_xml(
                    &mut current,
                    #krate::Field::new(field.owner, &name),
                    element,
                )?;
                *slot = current.map(#ident::#v);
                ::core::result::Result::Ok(claimed)
            }
        }
    });

    let display_arms = variants.iter().map(|variant| {
        let v = &variant.ident;
        quote!(#ident::#v(value) => ::core::fmt::Display::fmt(value, f),)
    });

    quote! {
        impl #krate::FhirJson for #ident {
            fn write_one<__M>(&self, name: &str, map: &mut __M) -> ::core::result::Result<(), __M::Error>
            where
                __M: #private::serde::ser::SerializeMap,
            {
                match self {
                    #(#json_writes)*
                }
            }

            fn write_many<__M>(
                _items: &[Self],
                name: &str,
                _map: &mut __M,
            ) -> ::core::result::Result<(), __M::Error>
            where
                __M: #private::serde::ser::SerializeMap,
            {
                ::core::result::Result::Err(#private::serde::ser::Error::custom(
                    ::core::format_args!("choice element {}[x] cannot repeat", name),
                ))
            }

            fn read_one<'de, __A>(
                slot: &mut ::core::option::Option<Self>,
                field: #krate::Field<'_>,
                key: &str,
                map: &mut __A,
            ) -> ::core::result::Result<bool, __A::Error>
            where
                __A: #private::serde::de::MapAccess<'de>,
            {
                let ::core::option::Option::Some(suffix) = #krate::choice_suffix(field.name, key) else {
                    return ::core::result::Result::Ok(false);
                };
                match suffix {
                    #(#json_reads)*
                    _ => ::core::result::Result::Ok(false),
                }
            }

            fn read_many<'de, __A>(
                _slot: &mut ::core::option::Option<::std::vec::Vec<Self>>,
                _field: #krate::Field<'_>,
                _key: &str,
                _map: &mut __A,
            ) -> ::core::result::Result<bool, __A::Error>
            where
                __A: #private::serde::de::MapAccess<'de>,
            {
                ::core::result::Result::Ok(false)
            }
        }

        impl #krate::FhirXml for #ident {
            fn write_xml(&self, name: &str, parent: &mut #krate::XmlElement) {
                match self {
                    #(#xml_writes)*
                }
            }

            fn read_xml(
                slot: &mut ::core::option::Option<Self>,
                field: #krate::Field<'_>,
                element: &#krate::XmlElement,
            ) -> ::core::result::Result<bool, #krate::DecodeError> {
                let ::core::option::Option::Some(suffix) =
                    #krate::choice_suffix(field.name, &element.name)
                else {
                    return ::core::result::Result::Ok(false);
                };
                match suffix {
                    #(#xml_reads)*
                    _ => ::core::result::Result::Ok(false),
                }
            }
        }

        impl ::core::fmt::Display for #ident {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                match self {
                    #(#display_arms)*
                }
            }
        }
    }
}
