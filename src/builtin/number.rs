//! Numeric built-ins (spec §4.4.3 `number functions`; `min`/`max`/
//! `comparable` per `SPEC_FULL.md` §4.6, grounded in libsass
//! `functions.cpp`'s `Functions::min`/`max`/`comparable`).

use codemap::Span;

use crate::args::CallArgs;
use crate::error::{SassError, SassErrorKind, SassResult};
use crate::value::{SassNumber, Value};

fn as_number(v: &Value, span: Span) -> SassResult<SassNumber> {
    match v {
        Value::Number(n) => Ok(n.clone()),
        other => Err(SassError::new(
            SassErrorKind::TypeMismatch(format!("{} is not a number.", other.inspect())),
            span,
        )),
    }
}

pub(crate) fn call(name: &str, args: &CallArgs, span: Span) -> SassResult<Option<Value>> {
    let positional = args.to_positional(span)?;
    Ok(Some(match name {
        "percentage" => {
            let n = as_number(&positional[0], span)?;
            Value::Number(SassNumber::with_unit(n.value * 100.0, crate::unit::Unit::new("%")))
        }
        "round" => {
            let n = as_number(&positional[0], span)?;
            Value::Number(SassNumber {
                value: n.value.round(),
                ..n
            })
        }
        "floor" => {
            let n = as_number(&positional[0], span)?;
            Value::Number(SassNumber {
                value: n.value.floor(),
                ..n
            })
        }
        "ceil" => {
            let n = as_number(&positional[0], span)?;
            Value::Number(SassNumber {
                value: n.value.ceil(),
                ..n
            })
        }
        "abs" => {
            let n = as_number(&positional[0], span)?;
            Value::Number(SassNumber {
                value: n.value.abs(),
                ..n
            })
        }
        "min" => {
            let mut best = as_number(&positional[0], span)?;
            for v in &positional[1..] {
                let n = as_number(v, span)?;
                if n.cmp(&best, span)?.is_lt() {
                    best = n;
                }
            }
            Value::Number(best)
        }
        "max" => {
            let mut best = as_number(&positional[0], span)?;
            for v in &positional[1..] {
                let n = as_number(v, span)?;
                if n.cmp(&best, span)?.is_gt() {
                    best = n;
                }
            }
            Value::Number(best)
        }
        "comparable" => {
            let a = as_number(&positional[0], span)?;
            let b = as_number(&positional[1], span)?;
            let comparable = a.is_unitless()
                || b.is_unitless()
                || matches!(
                    (a.single_unit(), b.single_unit()),
                    (Some(x), Some(y)) if crate::unit::comparable(x, y)
                );
            Value::Bool(comparable)
        }
        _ => return Ok(None),
    }))
}
