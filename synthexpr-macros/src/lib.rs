use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{ToTokens, quote};
use syn::{BinOp, Expr, Lit, UnOp, parse_macro_input, spanned::Spanned};

/// Builds a channel from an infix expression at compile time.
///
/// The expression is lowered into the `synthexpr` combinator functions, so
/// it costs exactly as much as writing the calls by hand.
///
/// # Syntax
///
/// - `t` is the time (Identity) leaf
/// - numeric literals become Constant leaves
/// - any other identifier or path is cloned and coerced, so it may name a
///   `Channel` or an `f64`
/// - `+`, `-`, `*`, `/` and unary `-`
/// - `pow(a, b)`, `abs(a)`, `ln(a)`
/// - `sin(x)`, `cos(x)`, `tan(x)`, `saw(x)`, `square(x)`, `square(x, duty)`
///   feed `x` into the period-1 oscillators
/// - `f(x)` for any other `f` composes the channel `f` with `x`
///
/// # Examples
///
/// ```ignore
/// use synthexpr::{expr, Channel, ChannelExt};
///
/// let carrier = Channel::sine().frequency(1000.0);
/// // 0.5 * carrier(0.25 * sin(t)) + t^2
/// let voice = expr!(0.5 * carrier(0.25 * sin(t)) + pow(t, 2));
/// ```
#[proc_macro]
pub fn expr(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as Expr);

    match lower(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(e) => TokenStream::from(e.to_compile_error()),
    }
}

fn lower(expr: &Expr) -> syn::Result<TokenStream2> {
    match expr {
        Expr::Lit(lit) => match &lit.lit {
            Lit::Int(_) | Lit::Float(_) => {
                Ok(quote! { ::synthexpr::Channel::constant((#lit) as f64) })
            }
            other => Err(syn::Error::new(other.span(), "expected a numeric literal")),
        },
        Expr::Path(path) if path.path.is_ident("t") => {
            Ok(quote! { ::synthexpr::Channel::identity() })
        }
        Expr::Path(path) => Ok(quote! {
            ::synthexpr::coerce(::core::clone::Clone::clone(&#path))
        }),
        Expr::Paren(paren) => lower(&paren.expr),
        Expr::Group(group) => lower(&group.expr),
        Expr::Unary(unary) => match unary.op {
            UnOp::Neg(_) => {
                let operand = lower(&unary.expr)?;
                Ok(quote! { ::synthexpr::neg(#operand) })
            }
            _ => Err(syn::Error::new(unary.op.span(), "only unary `-` is supported")),
        },
        Expr::Binary(binary) => {
            let combinator = match binary.op {
                BinOp::Add(_) => quote! { ::synthexpr::add },
                BinOp::Sub(_) => quote! { ::synthexpr::sub },
                BinOp::Mul(_) => quote! { ::synthexpr::mul },
                BinOp::Div(_) => quote! { ::synthexpr::div },
                _ => {
                    return Err(syn::Error::new(
                        binary.op.span(),
                        "only `+`, `-`, `*` and `/` are supported",
                    ));
                }
            };
            let left = lower(&binary.left)?;
            let right = lower(&binary.right)?;
            Ok(quote! { #combinator(#left, #right) })
        }
        Expr::Call(call) => lower_call(call),
        other => Err(syn::Error::new(
            other.span(),
            "unsupported expression in channel",
        )),
    }
}

fn lower_call(call: &syn::ExprCall) -> syn::Result<TokenStream2> {
    let args: Vec<&Expr> = call.args.iter().collect();
    let name = match call.func.as_ref() {
        Expr::Path(path) => path.path.get_ident().map(|ident| ident.to_string()),
        _ => None,
    };
    let arity_error = |expected: usize| {
        syn::Error::new(
            call.span(),
            format!("expected {expected} argument(s), found {}", args.len()),
        )
    };

    match (name.as_deref(), args.as_slice()) {
        (Some("pow"), [base, exponent]) => {
            let base = lower(base)?;
            let exponent = lower(exponent)?;
            Ok(quote! { ::synthexpr::pow(#base, #exponent) })
        }
        (Some("pow"), _) => Err(arity_error(2)),
        (Some("abs"), [operand]) => {
            let operand = lower(operand)?;
            Ok(quote! { ::synthexpr::abs(#operand) })
        }
        (Some("ln"), [operand]) => {
            let operand = lower(operand)?;
            Ok(quote! { ::synthexpr::log(#operand) })
        }
        (Some("square"), [phase, duty]) => {
            let phase = lower(phase)?;
            let duty = duty.to_token_stream();
            Ok(quote! {
                ::synthexpr::compose(::synthexpr::Channel::square((#duty) as f64), #phase)
            })
        }
        (Some(name), [phase]) if oscillator(name).is_some() => {
            let waveform = oscillator(name).unwrap_or_default();
            let phase = lower(phase)?;
            Ok(quote! { ::synthexpr::compose(#waveform, #phase) })
        }
        (Some("abs" | "ln" | "sin" | "cos" | "tan" | "saw"), _) => Err(arity_error(1)),
        (_, [inner]) => {
            let outer = lower(&call.func)?;
            let inner = lower(inner)?;
            Ok(quote! { ::synthexpr::compose(#outer, #inner) })
        }
        _ => Err(arity_error(1)),
    }
}

/// Oscillator leaf for the waveform functions usable inside `expr!`.
fn oscillator(name: &str) -> Option<TokenStream2> {
    let leaf = match name {
        "sin" => quote! { ::synthexpr::Channel::sine() },
        "cos" => quote! { ::synthexpr::Channel::cosine() },
        "tan" => quote! { ::synthexpr::Channel::tangent() },
        "saw" => quote! { ::synthexpr::Channel::sawtooth() },
        "square" => quote! { ::synthexpr::Channel::square(0.5) },
        _ => return None,
    };
    Some(leaf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lowered(source: &str) -> String {
        let expr: Expr = syn::parse_str(source).unwrap();
        lower(&expr).unwrap().to_string()
    }

    fn normalized(tokens: TokenStream2) -> String {
        tokens.to_string()
    }

    #[test]
    fn test_time_and_literals() {
        assert_eq!(
            lowered("t"),
            normalized(quote! { ::synthexpr::Channel::identity() })
        );
        assert_eq!(
            lowered("2"),
            normalized(quote! { ::synthexpr::Channel::constant((2) as f64) })
        );
    }

    #[test]
    fn test_binary_operators_follow_precedence() {
        let t = quote! { ::synthexpr::Channel::identity() };
        let one = quote! { ::synthexpr::Channel::constant((1) as f64) };
        let two = quote! { ::synthexpr::Channel::constant((2) as f64) };
        assert_eq!(
            lowered("t + 2 * 1"),
            normalized(quote! { ::synthexpr::add(#t, ::synthexpr::mul(#two, #one)) })
        );
    }

    #[test]
    fn test_identifiers_are_cloned() {
        assert_eq!(
            lowered("carrier"),
            normalized(quote! {
                ::synthexpr::coerce(::core::clone::Clone::clone(&carrier))
            })
        );
    }

    #[test]
    fn test_unknown_call_composes() {
        let t = quote! { ::synthexpr::Channel::identity() };
        let f = quote! { ::synthexpr::coerce(::core::clone::Clone::clone(&f)) };
        assert_eq!(
            lowered("f(t)"),
            normalized(quote! { ::synthexpr::compose(#f, #t) })
        );
    }

    #[test]
    fn test_oscillator_calls() {
        let t = quote! { ::synthexpr::Channel::identity() };
        assert_eq!(
            lowered("sin(t)"),
            normalized(quote! { ::synthexpr::compose(::synthexpr::Channel::sine(), #t) })
        );
        assert_eq!(
            lowered("square(t)"),
            normalized(quote! { ::synthexpr::compose(::synthexpr::Channel::square(0.5), #t) })
        );
        assert!(oscillator("exp").is_none());
    }

    #[test]
    fn test_rejected_syntax() {
        for source in ["t % 2", "!t", "t.abs()", "pow(t)", "\"a\"", "sin(t, t)"] {
            let expr: Expr = syn::parse_str(source).unwrap();
            assert!(lower(&expr).is_err(), "{source} should be rejected");
        }
    }
}
