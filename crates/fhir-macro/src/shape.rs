//! Reads a model type declaration into the shape the generators work from.

use heck::ToLowerCamelCase;
use syn::ext::IdentExt;
use syn::{
    Attribute, Data, DeriveInput, Fields, GenericArgument, Ident, LitStr, PathArguments, Type,
};

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cardinality {
    One,
    Many,
}

pub(crate) struct FieldSpec {
    pub ident: Ident,
    /// FHIR element name, e.g. `versionAlgorithm`.
    pub name: String,
    /// Item type: `T` for both `Option<T>` and `Option<Vec<T>>`.
    pub ty: Type,
    pub cardinality: Cardinality,
    /// Written as a plain JSON string and an XML attribute (`id`, `url`).
    pub attribute: bool,
}

pub(crate) struct VariantSpec {
    pub ident: Ident,
    /// Type suffix appended to the choice base name, e.g. `DateTime`.
    pub suffix: String,
    pub ty: Type,
}

pub(crate) enum Shape {
    Struct {
        resource: Option<String>,
        backbone: bool,
        fields: Vec<FieldSpec>,
    },
    Choice {
        variants: Vec<VariantSpec>,
    },
}

#[derive(Default)]
struct FhirAttrs {
    rename: Option<String>,
    attribute: bool,
    resource: Option<String>,
    backbone: bool,
}

fn parse_attrs(attrs: &[Attribute]) -> syn::Result<FhirAttrs> {
    let mut out = FhirAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident("fhir_serde") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                out.rename = Some(value.value());
                Ok(())
            } else if meta.path.is_ident("resource") {
                let value: LitStr = meta.value()?.parse()?;
                out.resource = Some(value.value());
                Ok(())
            } else if meta.path.is_ident("attribute") {
                out.attribute = true;
                Ok(())
            } else if meta.path.is_ident("backbone") {
                out.backbone = true;
                Ok(())
            } else {
                Err(meta.error("unsupported fhir_serde attribute"))
            }
        })?;
    }
    Ok(out)
}

impl Shape {
    pub(crate) fn parse(input: &DeriveInput) -> syn::Result<Self> {
        if !input.generics.params.is_empty() {
            return Err(syn::Error::new_spanned(
                &input.generics,
                "FHIR model types cannot be generic",
            ));
        }
        let container = parse_attrs(&input.attrs)?;
        match &input.data {
            Data::Struct(data) => {
                let Fields::Named(named) = &data.fields else {
                    return Err(syn::Error::new_spanned(
                        &input.ident,
                        "FHIR structs must have named fields",
                    ));
                };
                let mut fields = Vec::with_capacity(named.named.len());
                for field in &named.named {
                    let Some(ident) = field.ident.clone() else {
                        continue;
                    };
                    let attrs = parse_attrs(&field.attrs)?;
                    let (cardinality, ty) = classify(&field.ty)?;
                    if attrs.attribute && cardinality == Cardinality::Many {
                        return Err(syn::Error::new_spanned(
                            &field.ty,
                            "attribute fields cannot repeat",
                        ));
                    }
                    let name = attrs
                        .rename
                        .unwrap_or_else(|| ident.unraw().to_string().to_lower_camel_case());
                    fields.push(FieldSpec {
                        ident,
                        name,
                        ty,
                        cardinality,
                        attribute: attrs.attribute,
                    });
                }
                Ok(Shape::Struct {
                    resource: container.resource,
                    backbone: container.backbone,
                    fields,
                })
            }
            Data::Enum(data) => {
                let mut variants = Vec::with_capacity(data.variants.len());
                for variant in &data.variants {
                    let Fields::Unnamed(unnamed) = &variant.fields else {
                        return Err(syn::Error::new_spanned(
                            variant,
                            "choice variants must wrap exactly one type",
                        ));
                    };
                    if unnamed.unnamed.len() != 1 {
                        return Err(syn::Error::new_spanned(
                            variant,
                            "choice variants must wrap exactly one type",
                        ));
                    }
                    let attrs = parse_attrs(&variant.attrs)?;
                    variants.push(VariantSpec {
                        ident: variant.ident.clone(),
                        suffix: attrs.rename.unwrap_or_else(|| variant.ident.to_string()),
                        ty: unnamed.unnamed[0].ty.clone(),
                    });
                }
                Ok(Shape::Choice { variants })
            }
            Data::Union(_) => Err(syn::Error::new_spanned(
                &input.ident,
                "unions are not supported",
            )),
        }
    }
}

/// `Option<Vec<T>>` repeats, any other `Option<T>` is single.
fn classify(ty: &Type) -> syn::Result<(Cardinality, Type)> {
    let Some(inner) = generic_argument(ty, "Option") else {
        return Err(syn::Error::new_spanned(
            ty,
            "FHIR fields must be declared as Option<T> or Option<Vec<T>>",
        ));
    };
    match generic_argument(inner, "Vec") {
        Some(item) => Ok((Cardinality::Many, item.clone())),
        None => Ok((Cardinality::One, inner.clone())),
    }
}

fn generic_argument<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}
