//! Introspection and miscellaneous built-ins (spec §4.4.5).

use codemap::Span;
use rand::Rng;
use rand::SeedableRng;

use crate::args::{CallArg, CallArgs};
use crate::common::QuoteKind;
use crate::error::{SassError, SassErrorKind, SassResult};
use crate::scope::Scope;
use crate::selector::SelectorList;
use crate::value::{SassNumber, Value};

/// Name of the hidden scope variable a mixin call stashes its
/// content-block presence under, read back by `content-exists()`.
pub(crate) const CONTENT_EXISTS_VAR: &str = "__grass_content_exists__";

fn as_text(v: &Value, span: Span) -> SassResult<String> {
    match v {
        Value::String(s) => Ok(s.text().to_string()),
        other => Err(SassError::new(
            SassErrorKind::TypeMismatch(format!("{} is not a string.", other.inspect())),
            span,
        )),
    }
}

/// `call($function, $args...)` (spec §4.4.5): the legacy string-named
/// dynamic dispatch — looks `$function` up as a user function first, then
/// a built-in, forwarding the remaining arguments (positional or named)
/// as-is.
fn call_dynamic(
    args: &CallArgs,
    scope: &Scope,
    super_selector: &SelectorList,
    span: Span,
) -> SassResult<Value> {
    let mut rest = args.0.clone();
    if rest.is_empty() {
        return Err(SassError::new(
            SassErrorKind::MissingArgument("Missing argument $function.".to_string()),
            span,
        ));
    }
    let first = rest.remove(0);
    let fn_name = match &first {
        CallArg::Positional(v) | CallArg::Named(_, v) => match &v.node {
            Value::String(s) => s.text().to_string(),
            other => {
                return Err(SassError::new(
                    SassErrorKind::TypeMismatch(format!("{} is not a string.", other.inspect())),
                    span,
                ))
            }
        },
        CallArg::Rest(_) => {
            return Err(SassError::new(
                SassErrorKind::InvalidArgument("call() requires a function name.".to_string()),
                span,
            ))
        }
    };
    let forwarded = CallArgs(rest);
    if let Some(func) = scope.get_fn(&fn_name) {
        return func.call(forwarded, scope, super_selector, span);
    }
    if let Some(result) = crate::builtin::call(&fn_name, &forwarded, scope, super_selector, span)? {
        return Ok(result);
    }
    Err(SassError::new(SassErrorKind::UndefinedFunction(fn_name), span))
}

pub(crate) fn call(
    name: &str,
    args: &CallArgs,
    scope: &Scope,
    super_selector: &SelectorList,
    span: Span,
) -> SassResult<Option<Value>> {
    if name == "call" {
        return Ok(Some(call_dynamic(args, scope, super_selector, span)?));
    }
    let p = args.to_positional(span)?;
    Ok(Some(match name {
        "type-of" => Value::string(p[0].type_name(), QuoteKind::None),
        "unit" => match &p[0] {
            Value::Number(n) => Value::string(n.unit_string(), QuoteKind::Double),
            other => {
                return Err(SassError::new(
                    SassErrorKind::TypeMismatch(format!("{} is not a number.", other.inspect())),
                    span,
                ))
            }
        },
        "unitless" => match &p[0] {
            Value::Number(n) => Value::Bool(n.is_unitless()),
            other => {
                return Err(SassError::new(
                    SassErrorKind::TypeMismatch(format!("{} is not a number.", other.inspect())),
                    span,
                ))
            }
        },
        "inspect" => Value::string(p[0].inspect(), QuoteKind::Double),
        "if" => {
            if p[0].is_truthy() {
                p[1].clone()
            } else {
                p.get(2).cloned().unwrap_or(Value::Null)
            }
        }
        "variable-exists" => Value::Bool(scope.var_exists(&as_text(&p[0], span)?)),
        "global-variable-exists" => Value::Bool(scope.global_var_exists(&as_text(&p[0], span)?)),
        "function-exists" => Value::Bool(scope.function_exists(&as_text(&p[0], span)?)),
        "mixin-exists" => Value::Bool(scope.mixin_exists(&as_text(&p[0], span)?)),
        "content-exists" => match scope.get_var(CONTENT_EXISTS_VAR) {
            Some(v) => v,
            None => {
                return Err(SassError::new(
                    SassErrorKind::InvalidSass(
                        "content-exists() may only be called within a mixin.".to_string(),
                    ),
                    span,
                ))
            }
        },
        "feature-exists" => Value::Bool(matches!(
            as_text(&p[0], span)?.as_str(),
            "global-variable-shadowing" | "extend-selector-pseudoclass" | "units-level-3" | "at-error"
        )),
        "random" => {
            let mut rng = rand_pcg::Pcg64::from_entropy();
            match p.first() {
                Some(Value::Number(limit)) => {
                    let n = limit.value as i64;
                    if n < 1 {
                        return Err(SassError::new(
                            SassErrorKind::InvalidArgument(
                                "$limit must be greater than or equal to 1.".to_string(),
                            ),
                            span,
                        ));
                    }
                    Value::Number(SassNumber::new_unitless(rng.gen_range(1..=n) as f64))
                }
                _ => Value::Number(SassNumber::new_unitless(rng.gen::<f64>())),
            }
        }
        _ => return Ok(None),
    }))
}
