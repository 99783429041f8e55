use crate::attributes::{InjectAttributes, AUTOWIRED, INJECT};
use itertools::Itertools;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::spanned::Spanned;
use syn::{
    Error, FnArg, Ident, ImplItem, ImplItemFn, ItemImpl, Pat, Result, ReturnType, Signature, Type,
};

struct Parameter {
    name: String,
    ty: Type,
}

fn is_fallible(signature: &Signature) -> bool {
    match &signature.output {
        ReturnType::Type(_, ty) => match ty.as_ref() {
            Type::Path(path) => path
                .path
                .segments
                .last()
                .map(|segment| segment.ident == "Result")
                .unwrap_or(false),
            _ => false,
        },
        ReturnType::Default => false,
    }
}

fn collect_parameters(signature: &mut Signature) -> Result<Vec<Parameter>> {
    signature
        .inputs
        .iter_mut()
        .filter_map(|input| match input {
            FnArg::Typed(input) => Some(input),
            FnArg::Receiver(_) => None,
        })
        .map(|input| {
            let attributes = input
                .attrs
                .iter()
                .find(|attr| attr.path().is_ident(INJECT))
                .map(InjectAttributes::try_from)
                .transpose()?
                .unwrap_or_default();
            input.attrs.retain(|attr| !attr.path().is_ident(INJECT));

            if let Pat::Ident(pat) = input.pat.as_ref() {
                Ok(Parameter {
                    name: attributes
                        .name
                        .map(|name| name.value())
                        .unwrap_or_else(|| pat.ident.to_string()),
                    ty: input.ty.as_ref().clone(),
                })
            } else {
                Err(Error::new(
                    input.span(),
                    "Only simple identifiers are supported as injected parameters!",
                ))
            }
        })
        .try_collect()
}

fn take_marker(function: &mut ImplItemFn, marker: &str) -> bool {
    let count = function.attrs.len();
    function.attrs.retain(|attr| !attr.path().is_ident(marker));
    count != function.attrs.len()
}

fn generate_dependencies(parameters: &[Parameter]) -> Vec<TokenStream> {
    parameters
        .iter()
        .map(|Parameter { name, ty }| {
            quote! {
                simplyioc_di::injection::Dependency::of::<<#ty as std::ops::Deref>::Target>(#name)
            }
        })
        .collect()
}

fn generate_arguments(parameters: &[Parameter]) -> Vec<TokenStream> {
    parameters
        .iter()
        .map(|Parameter { ty, .. }| {
            quote! {
                arguments.take::<<#ty as std::ops::Deref>::Target>()?
            }
        })
        .collect()
}

fn generate_constructor(
    target: &Type,
    index: usize,
    function: &mut ImplItemFn,
) -> Result<(TokenStream, TokenStream)> {
    let signature = &mut function.sig;
    if signature.receiver().is_some() {
        return Err(Error::new(
            signature.span(),
            "Autowired constructors cannot take self!",
        ));
    }

    let parameters = collect_parameters(signature)?;
    let signature = &function.sig;
    let dependencies = generate_dependencies(&parameters);
    let arguments = generate_arguments(&parameters);

    let ident = &signature.ident;
    let name = ident.to_string();
    let constructor = format_ident!("construct_{}", index);

    let error_handling = if is_fallible(signature) {
        quote! {
            let instance = instance.map_err(|error| simplyioc_di::ContainerError::ConstructorError {
                type_name: std::any::type_name::<#target>().to_string(),
                error: std::convert::Into::into(error),
            })?;
        }
    } else {
        quote!()
    };

    let function = quote! {
        #[allow(unused_mut, unused_variables)]
        fn #constructor(
            mut arguments: simplyioc_di::injection::InjectionArguments,
        ) -> Result<
            simplyioc_di::instance_provider::ComponentInstanceAnyPtr,
            simplyioc_di::ContainerError,
        > {
            let instance = <#target>::#ident(#(#arguments),*);
            #error_handling
            Ok(simplyioc_di::instance_provider::ComponentInstancePtr::new(instance)
                as simplyioc_di::instance_provider::ComponentInstanceAnyPtr)
        }
    };

    let definition = quote! {
        simplyioc_di::component_registry::ConstructorDefinition {
            name: #name.to_string(),
            is_autowired: true,
            parameters: vec![#(#dependencies),*],
            constructor: #constructor,
        }
    };

    Ok((function, definition))
}

fn generate_method(
    target: &Type,
    index: usize,
    function: &mut ImplItemFn,
) -> Result<(TokenStream, TokenStream)> {
    let signature = &mut function.sig;
    if signature.receiver().is_none() {
        return Err(Error::new(
            signature.span(),
            "Injection methods need to take &self!",
        ));
    }

    let parameters = collect_parameters(signature)?;
    let signature = &function.sig;
    let dependencies = generate_dependencies(&parameters);
    let arguments = generate_arguments(&parameters);

    let ident = &signature.ident;
    let name = ident.to_string();
    let injector: Ident = format_ident!("inject_method_{}", index);

    let call = if is_fallible(signature) {
        quote! {
            target.#ident(#(#arguments),*).map_err(|error| {
                simplyioc_di::ContainerError::InjectionError {
                    type_name: std::any::type_name::<#target>().to_string(),
                    member: #name.to_string(),
                    error: std::convert::Into::into(error),
                }
            })?;
        }
    } else {
        quote! {
            target.#ident(#(#arguments),*);
        }
    };

    let function = quote! {
        #[allow(unused_mut, unused_variables)]
        fn #injector(
            instance: &simplyioc_di::instance_provider::ComponentInstanceAnyPtr,
            mut arguments: simplyioc_di::injection::InjectionArguments,
        ) -> Result<(), simplyioc_di::ContainerError> {
            let target = simplyioc_di::injection::downcast_target::<#target>(instance)?;
            #call
            Ok(())
        }
    };

    let definition = quote! {
        simplyioc_di::component_registry::MethodInjectionPoint {
            name: #name.to_string(),
            parameters: vec![#(#dependencies),*],
            inject: #injector,
        }
    };

    Ok((function, definition))
}

pub fn expand_component_impl(mut item: ItemImpl) -> Result<TokenStream> {
    if item.trait_.is_some() {
        return Err(Error::new(
            item.span(),
            "Component members can only be declared in inherent impl blocks!",
        ));
    }

    if !item.generics.params.is_empty() {
        return Err(Error::new(
            item.generics.span(),
            "Generic components are not supported!",
        ));
    }

    let target = item.self_ty.as_ref().clone();

    let mut constructors = vec![];
    let mut methods = vec![];

    for impl_item in &mut item.items {
        if let ImplItem::Fn(function) = impl_item {
            if take_marker(function, AUTOWIRED) {
                constructors.push(generate_constructor(&target, constructors.len(), function)?);
            } else if take_marker(function, INJECT) {
                methods.push(generate_method(&target, methods.len(), function)?);
            }
        }
    }

    let (constructor_functions, constructor_definitions): (Vec<_>, Vec<_>) =
        constructors.into_iter().unzip();
    let (method_functions, method_definitions): (Vec<_>, Vec<_>) = methods.into_iter().unzip();

    Ok(quote! {
        #item

        const _: () = {
            #(#constructor_functions)*
            #(#method_functions)*

            fn register() -> simplyioc_di::component_registry::internal::ComponentMembersDefinition {
                simplyioc_di::component_registry::internal::ComponentMembersDefinition {
                    target: std::any::TypeId::of::<#target>(),
                    target_name: std::any::type_name::<#target>(),
                    metadata: simplyioc_di::component_registry::ComponentMembersMetadata {
                        constructors: vec![#(#constructor_definitions),*],
                        methods: vec![#(#method_definitions),*],
                    },
                }
            }

            simplyioc_di::component_registry::internal::submit! {
                simplyioc_di::component_registry::internal::ComponentMembersRegisterer {
                    register
                }
            };
        };
    })
}
