//! Map built-ins (spec §4.4.3 `map functions`).

use codemap::Span;

use crate::args::CallArgs;
use crate::common::{Brackets, ListSeparator};
use crate::error::{SassError, SassErrorKind, SassResult};
use crate::value::{SassMap, Value};

fn as_map(v: &Value, span: Span) -> SassResult<SassMap> {
    match v {
        Value::Map(m) => Ok(m.clone()),
        Value::List(elems, ..) if elems.is_empty() => Ok(SassMap::default()),
        other => Err(SassError::new(
            SassErrorKind::TypeMismatch(format!("{} is not a map.", other.inspect())),
            span,
        )),
    }
}

pub(crate) fn call(name: &str, args: &CallArgs, span: Span) -> SassResult<Option<Value>> {
    let p = args.to_positional(span)?;
    Ok(Some(match name {
        "map-get" => as_map(&p[0], span)?.get(&p[1], span)?.unwrap_or(Value::Null),
        "map-has-key" => Value::Bool(as_map(&p[0], span)?.has_key(&p[1], span)?),
        "map-keys" => Value::list(as_map(&p[0], span)?.keys(), ListSeparator::Comma, Brackets::None),
        "map-values" => Value::list(as_map(&p[0], span)?.values(), ListSeparator::Comma, Brackets::None),
        "map-remove" => {
            let mut m = as_map(&p[0], span)?;
            for key in &p[1..] {
                m.remove(key, span)?;
            }
            Value::Map(m)
        }
        "map-merge" => {
            let mut m = as_map(&p[0], span)?;
            let other = as_map(&p[1], span)?;
            m.merge(&other, span)?;
            Value::Map(m)
        }
        _ => return Ok(None),
    }))
}
