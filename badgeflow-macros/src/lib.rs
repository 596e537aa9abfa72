//! Procedural macros for badgeflow

use darling::{FromDeriveInput, FromVariant};
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// Container-level attributes for #[derive(Action)]
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(action), supports(enum_any))]
struct ActionOpts {
    ident: syn::Ident,
    data: darling::ast::Data<ActionVariant, ()>,

    /// Enable automatic category inference from variant name prefixes
    #[darling(default)]
    infer_categories: bool,
}

/// Variant-level attributes
#[derive(Debug, FromVariant)]
#[darling(attributes(action))]
struct ActionVariant {
    ident: syn::Ident,

    /// Explicit type name override (defaults to SCREAMING_SNAKE_CASE)
    #[darling(default)]
    name: Option<String>,

    /// Explicit category override
    #[darling(default)]
    category: Option<String>,

    /// Exclude from category inference
    #[darling(default)]
    skip_category: bool,
}

// Words that end the "subject" part of a variant name.
// `ActiveActionUpdated` -> subject `ActiveAction`, `RouteChanged` -> `Route`
const ACTION_VERBS: &[&str] = &[
    "Get", "Fetch", "Submit", "Reset", "Patched", "Updated", "Cleared", "Changed", "Will",
    "Open", "Close", "Click", "Result", "Did",
];

/// Split a PascalCase string into parts
fn split_pascal_case(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();

    for ch in s.chars() {
        if ch.is_uppercase() && !current.is_empty() {
            parts.push(current);
            current = String::new();
        }
        current.push(ch);
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// Convert PascalCase to snake_case
fn to_snake_case(s: &str) -> String {
    split_pascal_case(s)
        .iter()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Convert PascalCase to SCREAMING_SNAKE_CASE
fn to_screaming_snake_case(s: &str) -> String {
    to_snake_case(s).to_uppercase()
}

/// Infer category from a variant name: the words before the first verb
///
/// `ApiGetDataDidLoad` -> `api`, `ActiveActionCleared` -> `active_action`,
/// `CloseModal` -> none (starts with a verb), `Tick` -> none (single word).
fn infer_category(name: &str) -> Option<String> {
    let parts = split_pascal_case(name);
    if parts.len() < 2 || ACTION_VERBS.contains(&parts[0].as_str()) {
        return None;
    }

    let prefix_end = parts
        .iter()
        .skip(1)
        .position(|part| ACTION_VERBS.contains(&part.as_str()))?
        + 1;

    Some(to_snake_case(&parts[..prefix_end].concat()))
}

/// Derive macro for the Action trait
///
/// Generates a `name()` method returning the variant name in
/// SCREAMING_SNAKE_CASE (`FormSubmit` -> `"FORM_SUBMIT"`), overridable with
/// `#[action(name = "...")]`.
///
/// Also implements `ActionCategory`. With `#[action(infer_categories)]` the
/// category is the words before the first verb of the variant name, otherwise
/// only variants tagged `#[action(category = "...")]` have one.
///
/// # Example
/// ```ignore
/// #[derive(Action, Clone, Debug)]
/// #[action(infer_categories)]
/// enum AppAction {
///     ApiGetData { url: String },
///     RouteChanged { href: String },
///     #[action(category = "form")]
///     FormDataPatched { form_id: String },
///     CloseModal,
/// }
///
/// let action = AppAction::RouteChanged { href: "/".into() };
/// assert_eq!(action.name(), "ROUTE_CHANGED");
/// assert_eq!(action.category(), Some("route"));
/// ```
#[proc_macro_derive(Action, attributes(action))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let opts = match ActionOpts::from_derive_input(&input) {
        Ok(opts) => opts,
        Err(e) => return e.write_errors().into(),
    };

    let name = &opts.ident;

    let variants = match &opts.data {
        darling::ast::Data::Enum(variants) => variants,
        _ => {
            return syn::Error::new_spanned(&input, "Action can only be derived for enums")
                .to_compile_error()
                .into();
        }
    };

    // `{ .. }` matches unit, tuple and struct variants alike
    let name_arms = variants.iter().map(|v| {
        let variant_name = &v.ident;
        let type_name = v
            .name
            .clone()
            .unwrap_or_else(|| to_screaming_snake_case(&variant_name.to_string()));
        quote! { #name::#variant_name { .. } => #type_name }
    });

    // Explicit `category = ".."` is honored with or without inference
    let category_arms = variants.iter().map(|v| {
        let variant_name = &v.ident;
        let category = if v.skip_category {
            None
        } else if let Some(ref explicit) = v.category {
            Some(explicit.clone())
        } else if opts.infer_categories {
            infer_category(&variant_name.to_string())
        } else {
            None
        };
        let category = match category {
            Some(c) => quote! { ::core::option::Option::Some(#c) },
            None => quote! { ::core::option::Option::None },
        };
        quote! { #name::#variant_name { .. } => #category }
    });

    let expanded = quote! {
        impl ::badgeflow::Action for #name {
            fn name(&self) -> &'static str {
                match self {
                    #(#name_arms),*
                }
            }
        }

        impl ::badgeflow::ActionCategory for #name {
            fn category(&self) -> ::core::option::Option<&'static str> {
                match self {
                    #(#category_arms),*
                }
            }
        }
    };

    TokenStream::from(expanded)
}
