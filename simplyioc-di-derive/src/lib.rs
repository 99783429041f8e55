use crate::component::{expand_component, expand_injectable, register_component_alias};
use crate::members::expand_component_impl;
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput, Error, Item, ItemImpl, ItemTrait};

mod attributes;
mod component;
mod members;

#[cfg(feature = "threadsafe")]
fn thread_bounds() -> proc_macro2::TokenStream {
    quote!(+ Send + Sync)
}

#[cfg(not(feature = "threadsafe"))]
fn thread_bounds() -> proc_macro2::TokenStream {
    quote!()
}

#[proc_macro_derive(Component, attributes(component, inject))]
pub fn generate_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_component(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

/// Marks a trait as injectable, so components can be requested as `dyn Trait`.
#[proc_macro_attribute]
pub fn injectable(_attr: TokenStream, input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as ItemTrait);
    expand_injectable(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

/// Registers a component as available via the implemented trait.
#[proc_macro_attribute]
pub fn component_alias(_attr: TokenStream, input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as Item);
    register_component_alias(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

/// Registers `#[autowired]` constructors and `#[inject]` methods of a component.
#[proc_macro_attribute]
pub fn component_impl(_attr: TokenStream, input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as ItemImpl);
    expand_component_impl(input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}
