use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse::ParseStream, parse_macro_input, Expr, FnArg, ItemFn, LitStr, Token};

// ============================================================================
// Registration attributes
// ============================================================================

/// Register a free function as an event consumer.
///
/// Keeps the function and adds a sibling `<name>_registration()` returning a
/// `switchyard::Registration` for `Hub::install`.
///
/// ```ignore
/// #[consumer("user.login", priority = 10)]
/// fn audit(content: &Container) -> HandlerResult {
///     let user: String = content.unwrap::<String>()?.into_owned();
///     Ok(())
/// }
///
/// hub.install(audit_registration())?;
/// ```
///
/// A function taking one parameter becomes `Handler::payload`; one taking
/// `(src: &str, content: &Container)` becomes `Handler::routed`.
#[proc_macro_attribute]
pub fn consumer(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand(Kind::Consumer, false, attr, item)
}

/// Register a consumer for every event matching a glob.
///
/// ```ignore
/// #[consumer_re("msg.send-*")]
/// fn send(src: &str, content: &Container) -> HandlerResult {
///     Ok(())
/// }
/// ```
///
/// The function must take the routing key first; a one-parameter function
/// still expands, but installing its registration fails with
/// `RegistrationError::MissingRoutingKey`.
#[proc_macro_attribute]
pub fn consumer_re(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand(Kind::Consumer, true, attr, item)
}

/// Register an interceptor. Call `block_event()` inside it to stop delivery.
#[proc_macro_attribute]
pub fn interceptor(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand(Kind::Interceptor, false, attr, item)
}

#[proc_macro_attribute]
pub fn interceptor_re(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand(Kind::Interceptor, true, attr, item)
}

/// Register a pipeline handler. Call `continue_pipeline()` to let the next
/// handler run.
#[proc_macro_attribute]
pub fn pipe(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand(Kind::Pipeline, false, attr, item)
}

#[proc_macro_attribute]
pub fn pipe_re(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand(Kind::Pipeline, true, attr, item)
}

// ============================================================================
// Expansion
// ============================================================================

#[derive(Clone, Copy)]
enum Kind {
    Consumer,
    Interceptor,
    Pipeline,
}

impl Kind {
    fn constructor(self, pattern: bool) -> syn::Ident {
        let base = match self {
            Kind::Consumer => "consumer",
            Kind::Interceptor => "interceptor",
            Kind::Pipeline => "pipe",
        };
        if pattern {
            format_ident!("{}_pattern", base)
        } else {
            format_ident!("{}", base)
        }
    }
}

struct RouteArgs {
    route: LitStr,
    priority: Option<Expr>,
}

fn parse_route_args(input: ParseStream) -> syn::Result<RouteArgs> {
    let route: LitStr = input.parse()?;
    let mut priority = None;

    // Optional: `, priority = <expr>`
    if input.peek(Token![,]) {
        input.parse::<Token![,]>()?;
        if !input.is_empty() {
            let key: syn::Ident = input.parse()?;
            if key != "priority" {
                return Err(syn::Error::new(key.span(), "expected `priority = <i32>`"));
            }
            input.parse::<Token![=]>()?;
            priority = Some(input.parse()?);
        }
    }

    if !input.is_empty() {
        return Err(input.error("unexpected tokens after registration arguments"));
    }
    Ok(RouteArgs { route, priority })
}

fn expand(kind: Kind, pattern: bool, attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr with parse_route_args);
    let func = parse_macro_input!(item as ItemFn);

    match registration(kind, pattern, &args, &func) {
        Ok(registration) => TokenStream::from(quote! {
            #func
            #registration
        }),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn registration(kind: Kind, pattern: bool, args: &RouteArgs, func: &ItemFn) -> syn::Result<TokenStream2> {
    if let Some(FnArg::Receiver(receiver)) = func.sig.inputs.first() {
        return Err(syn::Error::new_spanned(
            receiver,
            "registration attributes only apply to free functions",
        ));
    }
    if let Some(asyncness) = &func.sig.asyncness {
        return Err(syn::Error::new_spanned(asyncness, "handlers must be synchronous"));
    }

    let name = &func.sig.ident;
    let handler = match func.sig.inputs.len() {
        1 => quote! { ::switchyard::Handler::payload(#name) },
        2 => quote! { ::switchyard::Handler::routed(#name) },
        _ => {
            return Err(syn::Error::new_spanned(
                &func.sig.inputs,
                "handler must take `(content: &Container)` or `(src: &str, content: &Container)`",
            ))
        }
    };

    let vis = &func.vis;
    let fn_name = format_ident!("{}_registration", name);
    let constructor = kind.constructor(pattern);
    let route = &args.route;
    let priority = match &args.priority {
        Some(expr) => quote! { #expr },
        None => quote! { ::switchyard::DEFAULT_PRIORITY },
    };
    let doc = format!("Registration generated for [`{}`].", name);

    Ok(quote! {
        #[doc = #doc]
        #vis fn #fn_name() -> ::switchyard::Registration {
            ::switchyard::Registration::#constructor(#route, #priority, #handler)
        }
    })
}
