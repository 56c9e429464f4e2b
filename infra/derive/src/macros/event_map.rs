use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{
    Attribute, Expr, Fields, Ident, ItemEnum, Lit, LitStr, Meta, Path, Token, Type, Variant,
    Visibility, parse_quote,
};

struct MapArgs {
    krate: Path,
    module: Option<Ident>,
}

struct EventVariant<'a> {
    ident: &'a Ident,
    name: LitStr,
    payload: Type,
    forwarded: Vec<&'a Attribute>,
}

pub fn expand_event_map(args: TokenStream, input: ItemEnum) -> TokenStream {
    match expand(args, &input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn expand(args: TokenStream, input: &ItemEnum) -> Result<TokenStream, syn::Error> {
    let MapArgs { krate, module } = parse_args(args)?;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "event maps cannot be generic; declare one map per payload set",
        ));
    }

    let map = &input.ident;
    let vis = &input.vis;
    let module = module.unwrap_or_else(|| format_ident!("{}", to_snake_case(&map.to_string())));
    let inner_vis = widen_for_child_module(vis);
    let map_attrs = input.attrs.iter().filter(|attr| !attr.path().is_ident("derive"));
    let map_name = LitStr::new(&map.to_string(), map.span());

    let variants = input.variants.iter().map(inspect_variant).collect::<Result<Vec<_>, _>>()?;

    let structs = variants.iter().map(|v| {
        let ident = v.ident;
        let forwarded = &v.forwarded;
        quote! {
            #(#forwarded)*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
            #inner_vis struct #ident;
        }
    });

    let impls = variants.iter().map(|v| {
        let ident = v.ident;
        let name = &v.name;
        let payload = &v.payload;
        let cfg_attrs = v.forwarded.iter().filter(|attr| attr.path().is_ident("cfg"));
        quote! {
            #(#cfg_attrs)*
            #[automatically_derived]
            impl #krate::Event<#map> for #module::#ident {
                type Payload = #payload;
                const NAME: &'static str = #name;
            }
        }
    });

    let names = variants.iter().map(|v| {
        let name = &v.name;
        let cfg_attrs = v.forwarded.iter().filter(|attr| attr.path().is_ident("cfg"));
        quote! { #(#cfg_attrs)* #name }
    });
    let module_doc = format!("Event names declared by [`{map}`].");

    Ok(quote! {
        #(#map_attrs)*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #vis enum #map {}

        #[automatically_derived]
        impl #krate::EventMap for #map {
            const NAME: &'static str = #map_name;
            const EVENT_NAMES: &'static [&'static str] = &[#(#names),*];
        }

        #[doc = #module_doc]
        #vis mod #module {
            #(#structs)*
        }

        #(#impls)*
    })
}

fn parse_args(args: TokenStream) -> Result<MapArgs, syn::Error> {
    let mut parsed = MapArgs { krate: parse_quote!(::tidings_dispatcher), module: None };
    let metas = Punctuated::<Meta, Token![,]>::parse_terminated.parse2(args)?;

    for meta in metas {
        let Meta::NameValue(pair) = meta else {
            return Err(syn::Error::new_spanned(
                meta,
                "expected `crate = path` or `module = ident`",
            ));
        };

        if pair.path.is_ident("crate") {
            let Expr::Path(path) = &pair.value else {
                return Err(syn::Error::new_spanned(&pair.value, "expected a crate path"));
            };
            parsed.krate = path.path.clone();
        } else if pair.path.is_ident("module") {
            let Expr::Path(path) = &pair.value else {
                return Err(syn::Error::new_spanned(&pair.value, "expected a module identifier"));
            };
            let Some(ident) = path.path.get_ident() else {
                return Err(syn::Error::new_spanned(&pair.value, "expected a module identifier"));
            };
            parsed.module = Some(ident.clone());
        } else {
            return Err(syn::Error::new_spanned(
                &pair.path,
                "unknown argument; supported: `crate`, `module`",
            ));
        }
    }

    Ok(parsed)
}

fn inspect_variant(variant: &Variant) -> Result<EventVariant<'_>, syn::Error> {
    if let Some((_, discriminant)) = &variant.discriminant {
        return Err(syn::Error::new_spanned(
            discriminant,
            "event variants cannot have discriminants",
        ));
    }

    let payload: Type = match &variant.fields {
        Fields::Unit => parse_quote!(()),
        Fields::Unnamed(fields) if fields.unnamed.len() == 1 => fields.unnamed[0].ty.clone(),
        Fields::Unnamed(fields) => {
            let types = fields.unnamed.iter().map(|field| &field.ty);
            parse_quote!((#(#types),*))
        },
        Fields::Named(fields) => {
            return Err(syn::Error::new_spanned(
                fields,
                "event payloads are declared positionally; wrap named fields in a struct",
            ));
        },
    };

    let mut name = None;
    for attr in variant.attrs.iter().filter(|attr| attr.path().is_ident("event")) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("name") {
                return Err(meta.error("unknown event attribute; supported: `name`"));
            }
            if name.is_some() {
                return Err(meta.error("duplicate `name` for event"));
            }
            let value = meta.value()?.parse::<Lit>()?;
            let Lit::Str(lit) = value else {
                return Err(meta.error("expected string literal for `name = \"...\"`"));
            };
            if lit.value().trim().is_empty() {
                return Err(syn::Error::new_spanned(lit, "event names cannot be empty"));
            }
            name = Some(lit);
            Ok(())
        })?;
    }

    Ok(EventVariant {
        ident: &variant.ident,
        name: name.unwrap_or_else(|| LitStr::new(&variant.ident.to_string(), variant.ident.span())),
        payload,
        forwarded: variant
            .attrs
            .iter()
            .filter(|attr| attr.path().is_ident("doc") || attr.path().is_ident("cfg"))
            .collect(),
    })
}

/// Items inside the generated module must stay reachable from the enum's own scope.
fn widen_for_child_module(vis: &Visibility) -> TokenStream {
    match vis {
        Visibility::Public(_) => quote! { pub },
        Visibility::Inherited => quote! { pub(super) },
        Visibility::Restricted(_) => quote! { pub(crate) },
    }
}

fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let chars: Vec<char> = name.chars().collect();

    for (index, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() {
            let prev_lower =
                index > 0 && (chars[index - 1].is_lowercase() || chars[index - 1].is_ascii_digit());
            let next_lower = chars.get(index + 1).is_some_and(|c| c.is_lowercase());
            let prev_upper = index > 0 && chars[index - 1].is_uppercase();
            if index > 0 && (prev_lower || (prev_upper && next_lower)) && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }

    out
}
