use crate::attributes::{
    ComponentAttributes, DefaultDefinition, FieldAttributes, InjectAttributes, COMPONENT, INJECT,
};
use crate::thread_bounds;
use convert_case::{Case, Casing};
use itertools::Itertools;
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use std::ops::Deref;
use syn::spanned::Spanned;
use syn::{
    Attribute, Data, DataStruct, DeriveInput, Error, Expr, ExprArray, ExprLit, Field, Fields,
    Index, Item, ItemTrait, Lit, Member, Result, Type,
};

fn is_injected(field: &Field) -> bool {
    field.attrs.iter().any(|attr| attr.path().is_ident(INJECT))
}

fn generate_construction(field: &Field) -> Result<TokenStream> {
    for attr in &field.attrs {
        if attr.path().is_ident(COMPONENT) {
            let attributes = FieldAttributes::try_from(attr)?;
            if let Some(DefaultDefinition::Expr(path)) = &attributes.default {
                return Ok(quote!(#path()));
            }
        }
    }

    Ok(quote!(std::default::Default::default()))
}

fn generate_default_construction(ident: &Ident, fields: &Fields) -> Result<TokenStream> {
    Ok(match fields {
        Fields::Named(fields) => {
            let fields: Vec<_> = fields
                .named
                .iter()
                .map(|field| -> Result<TokenStream> {
                    let ident = &field.ident;
                    let instance = generate_construction(field)?;
                    Ok(quote! {
                        #ident: #instance
                    })
                })
                .try_collect()?;

            quote! {
                #ident {
                    #(#fields),*
                }
            }
        }
        Fields::Unnamed(fields) => {
            let fields: Vec<_> = fields
                .unnamed
                .iter()
                .map(generate_construction)
                .try_collect()?;

            quote! {
                #ident(#(#fields),*)
            }
        }
        Fields::Unit => quote! { #ident },
    })
}

fn generate_field_injection(
    ident: &Ident,
    index: usize,
    field: &Field,
) -> Result<(TokenStream, TokenStream)> {
    let attributes = field
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident(INJECT))
        .map(InjectAttributes::try_from)
        .transpose()?
        .unwrap_or_default();

    let (member, member_name) = match &field.ident {
        Some(field_ident) => (Member::Named(field_ident.clone()), field_ident.to_string()),
        None => (Member::Unnamed(Index::from(index)), index.to_string()),
    };

    let dependency_name = attributes
        .name
        .map(|name| name.value())
        .unwrap_or_else(|| member_name.clone());

    let ty = &field.ty;
    let inject = format_ident!("inject_field_{}", index);

    let function = quote! {
        fn #inject(
            instance: &simplyioc_di::instance_provider::ComponentInstanceAnyPtr,
            mut arguments: simplyioc_di::injection::InjectionArguments,
        ) -> Result<(), simplyioc_di::ContainerError> {
            use simplyioc_di::injection::InjectionSlot;
            let target = simplyioc_di::injection::downcast_target::<#ident>(instance)?;
            target
                .#member
                .inject(arguments.take::<<#ty as InjectionSlot>::Target>()?);
            Ok(())
        }
    };

    let definition = quote! {
        simplyioc_di::component_registry::FieldInjectionPoint {
            name: #member_name.to_string(),
            dependency: simplyioc_di::injection::Dependency::of::<
                <#ty as simplyioc_di::injection::InjectionSlot>::Target
            >(#dependency_name),
            inject: #inject,
        }
    };

    Ok((function, definition))
}

fn extract_component_attributes(attributes: &[Attribute]) -> Result<ComponentAttributes> {
    attributes
        .iter()
        .filter(|attribute| attribute.path().is_ident(COMPONENT))
        .map(ComponentAttributes::try_from)
        .next()
        .transpose()
        .map(Option::unwrap_or_default)
}

fn generate_names(attribute_names: Option<ExprArray>, ident: &Ident) -> Vec<String> {
    attribute_names
        .map(|names| {
            names
                .elems
                .iter()
                .filter_map(|elem| {
                    if let Expr::Lit(ExprLit {
                        lit: Lit::Str(string),
                        ..
                    }) = elem
                    {
                        Some(string.value())
                    } else {
                        None
                    }
                })
                .collect()
        })
        .unwrap_or_else(|| vec![ident.to_string().to_case(Case::Snake)])
}

pub fn expand_component(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(DataStruct { fields, .. }) = &input.data else {
        return Err(Error::new(
            input.span(),
            "Can only derive Component on structs!",
        ));
    };

    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "Generic components are not supported!",
        ));
    }

    let ident = &input.ident;
    let attributes = extract_component_attributes(&input.attrs)?;

    let default_constructor = if attributes.no_default_constructor {
        quote!(None)
    } else {
        let generation = match &attributes.constructor {
            Some(path) => quote!(#path()),
            None => generate_default_construction(ident, fields)?,
        };

        quote! {
            Some({
                fn construct(
                    _arguments: simplyioc_di::injection::InjectionArguments,
                ) -> Result<
                    simplyioc_di::instance_provider::ComponentInstanceAnyPtr,
                    simplyioc_di::ContainerError,
                > {
                    Ok(simplyioc_di::instance_provider::ComponentInstancePtr::new(#generation)
                        as simplyioc_di::instance_provider::ComponentInstanceAnyPtr)
                }

                construct
            })
        }
    };

    let (injectors, field_definitions): (Vec<_>, Vec<_>) = fields
        .iter()
        .enumerate()
        .filter(|(_, field)| is_injected(field))
        .map(|(index, field)| generate_field_injection(ident, index, field))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .unzip();

    let names = generate_names(attributes.names, ident);

    Ok(quote! {
        #[automatically_derived]
        impl simplyioc_di::component::Injectable for #ident {}

        #[automatically_derived]
        impl simplyioc_di::component::ComponentDowncast<#ident> for #ident {
            fn downcast(
                source: simplyioc_di::instance_provider::ComponentInstanceAnyPtr,
            ) -> Result<
                simplyioc_di::instance_provider::ComponentInstancePtr<Self>,
                simplyioc_di::instance_provider::ComponentInstanceAnyPtr,
            > {
                source.downcast()
            }
        }

        #[automatically_derived]
        impl simplyioc_di::component::Component for #ident {}

        const _: () = {
            #(#injectors)*

            fn cast(
                instance: simplyioc_di::instance_provider::ComponentInstanceAnyPtr,
            ) -> Result<Box<dyn std::any::Any>, simplyioc_di::instance_provider::ComponentInstanceAnyPtr> {
                <#ident as simplyioc_di::component::ComponentDowncast<#ident>>::downcast(instance)
                    .map(|p| Box::new(p) as Box<dyn std::any::Any>)
            }

            fn register() -> simplyioc_di::component_registry::internal::TypedComponentDefinition {
                simplyioc_di::component_registry::internal::TypedComponentDefinition {
                    target: std::any::TypeId::of::<#ident>(),
                    target_name: std::any::type_name::<#ident>(),
                    metadata: simplyioc_di::component_registry::ComponentMetadata {
                        names: vec![#(#names.to_string()),*],
                        namespace: module_path!().to_string(),
                        default_constructor: #default_constructor,
                        fields: vec![#(#field_definitions),*],
                        cast,
                    },
                }
            }

            simplyioc_di::component_registry::internal::submit! {
                simplyioc_di::component_registry::internal::ComponentDefinitionRegisterer {
                    register
                }
            };
        };
    })
}

pub fn expand_injectable(item: &ItemTrait) -> Result<TokenStream> {
    if !item.generics.params.is_empty() {
        return Err(Error::new(
            item.generics.span(),
            "Generic injectable traits are not supported!",
        ));
    }

    let ident = &item.ident;
    let bounds = thread_bounds();

    Ok(quote! {
        #item

        #[automatically_derived]
        impl simplyioc_di::component::Injectable for dyn #ident #bounds {}
    })
}

pub fn register_component_alias(item: &Item) -> Result<TokenStream> {
    let Item::Impl(item_impl) = item else {
        return Err(Error::new(
            item.span(),
            "Registering aliases for components is possible only on trait implementations!",
        ));
    };

    let trait_type = item_impl
        .trait_
        .as_ref()
        .map(|(_, path, ..)| path)
        .ok_or_else(|| Error::new(item.span(), "Missing trait identifier!"))?;

    let target_type = if let Type::Path(path) = item_impl.self_ty.deref() {
        &path.path
    } else {
        return Err(Error::new(
            item.span(),
            "Registering aliases is only available for components!",
        ));
    };

    let bounds = thread_bounds();

    Ok(quote! {
        #item

        #[automatically_derived]
        impl simplyioc_di::component::ComponentDowncast<#target_type> for dyn #trait_type #bounds {
            fn downcast(
                source: simplyioc_di::instance_provider::ComponentInstanceAnyPtr,
            ) -> Result<
                simplyioc_di::instance_provider::ComponentInstancePtr<Self>,
                simplyioc_di::instance_provider::ComponentInstanceAnyPtr,
            > {
                source
                    .downcast::<#target_type>()
                    .map(|p| p as simplyioc_di::instance_provider::ComponentInstancePtr<Self>)
            }
        }

        const _: () = {
            fn cast(
                instance: simplyioc_di::instance_provider::ComponentInstanceAnyPtr,
            ) -> Result<Box<dyn std::any::Any>, simplyioc_di::instance_provider::ComponentInstanceAnyPtr> {
                <dyn #trait_type #bounds as simplyioc_di::component::ComponentDowncast<#target_type>>::downcast(instance)
                    .map(|p| Box::new(p) as Box<dyn std::any::Any>)
            }

            fn register() -> simplyioc_di::component_registry::internal::ComponentAliasDefinition {
                simplyioc_di::component_registry::internal::ComponentAliasDefinition {
                    alias_type: std::any::TypeId::of::<dyn #trait_type #bounds>(),
                    target_type: std::any::TypeId::of::<#target_type>(),
                    alias_name: std::any::type_name::<dyn #trait_type #bounds>(),
                    target_name: std::any::type_name::<#target_type>(),
                    metadata: simplyioc_di::component_registry::ComponentAliasMetadata {
                        cast,
                    },
                }
            }

            simplyioc_di::component_registry::internal::submit! {
                simplyioc_di::component_registry::internal::ComponentAliasRegisterer {
                    register
                }
            };
        };
    })
}
