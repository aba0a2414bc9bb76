//! String built-ins (spec §4.4.3 `string functions`).

use codemap::Span;

use crate::args::CallArgs;
use crate::common::QuoteKind;
use crate::error::{SassError, SassErrorKind, SassResult};
use crate::value::{SassNumber, SassString, Value};

fn as_text(v: &Value, span: Span) -> SassResult<String> {
    match v {
        Value::String(s) => Ok(s.text().to_string()),
        other => Err(SassError::new(
            SassErrorKind::TypeMismatch(format!("{} is not a string.", other.inspect())),
            span,
        )),
    }
}

pub(crate) fn call(name: &str, args: &CallArgs, span: Span) -> SassResult<Option<Value>> {
    let p = args.to_positional(span)?;
    Ok(Some(match name {
        "quote" => Value::String(SassString::Quoted {
            text: as_text(&p[0], span)?,
            quote: QuoteKind::Double,
        }),
        "unquote" => Value::string(as_text(&p[0], span)?, QuoteKind::None),
        "to-upper-case" => Value::string(
            as_text(&p[0], span)?.to_uppercase(),
            string_quote(&p[0]),
        ),
        "to-lower-case" => Value::string(
            as_text(&p[0], span)?.to_lowercase(),
            string_quote(&p[0]),
        ),
        "str-length" => {
            let s = as_text(&p[0], span)?;
            Value::Number(SassNumber::new_unitless(s.chars().count() as f64))
        }
        "str-slice" => {
            let s: Vec<char> = as_text(&p[0], span)?.chars().collect();
            let len = s.len() as i64;
            let norm = |i: i64| -> usize {
                let idx = if i < 0 { len + i + 1 } else { i };
                idx.clamp(1, len.max(1)) as usize
            };
            let start = match &p[1] {
                Value::Number(n) => norm(n.value as i64),
                _ => 1,
            };
            let end = match p.get(2) {
                Some(Value::Number(n)) => norm(n.value as i64),
                _ => s.len(),
            };
            let slice: String = if start > end || s.is_empty() {
                String::new()
            } else {
                s[start - 1..end.min(s.len())].iter().collect()
            };
            Value::string(slice, string_quote(&p[0]))
        }
        "str-insert" => {
            let mut s: Vec<char> = as_text(&p[0], span)?.chars().collect();
            let insert = as_text(&p[1], span)?;
            let idx = match &p[2] {
                Value::Number(n) => n.value as i64,
                _ => 1,
            };
            let pos = if idx < 0 {
                (s.len() as i64 + idx + 1).max(0) as usize
            } else {
                (idx - 1).max(0) as usize
            }
            .min(s.len());
            for (offset, c) in insert.chars().enumerate() {
                s.insert(pos + offset, c);
            }
            Value::string(s.into_iter().collect::<String>(), string_quote(&p[0]))
        }
        "str-index" => {
            let s = as_text(&p[0], span)?;
            let needle = as_text(&p[1], span)?;
            match s.find(&needle) {
                Some(byte_idx) => Value::Number(SassNumber::new_unitless(
                    s[..byte_idx].chars().count() as f64 + 1.0,
                )),
                None => Value::Null,
            }
        }
        _ => return Ok(None),
    }))
}

fn string_quote(v: &Value) -> QuoteKind {
    match v {
        Value::String(SassString::Quoted { .. }) => QuoteKind::Double,
        _ => QuoteKind::None,
    }
}
