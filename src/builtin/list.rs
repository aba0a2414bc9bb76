//! List built-ins (spec §4.4.3 `list functions`).

use codemap::Span;

use crate::args::CallArgs;
use crate::common::{Brackets, ListSeparator};
use crate::error::{SassError, SassErrorKind, SassResult};
use crate::value::{SassNumber, Value};

fn separator_of(v: &Value) -> ListSeparator {
    match v.separator() {
        ListSeparator::Undecided => ListSeparator::Space,
        sep => sep,
    }
}

/// 1-based, negative-from-end index into a list, per spec §4.4.3.
fn normalize_index(n: &SassNumber, len: usize, span: Span) -> SassResult<usize> {
    let i = n.value as i64;
    let idx = if i < 0 { i + len as i64 + 1 } else { i };
    if idx < 1 || idx as usize > len {
        return Err(SassError::new(
            SassErrorKind::InvalidArgument(format!(
                "Invalid index {i} for a list of length {len}."
            )),
            span,
        ));
    }
    Ok(idx as usize - 1)
}

pub(crate) fn call(name: &str, args: &CallArgs, span: Span) -> SassResult<Option<Value>> {
    let p = args.to_positional(span)?;
    Ok(Some(match name {
        "length" => Value::Number(SassNumber::new_unitless(p[0].as_list().len() as f64)),
        "nth" => {
            let list = p[0].as_list();
            let n = match &p[1] {
                Value::Number(n) => n,
                other => {
                    return Err(SassError::new(
                        SassErrorKind::TypeMismatch(format!("{} is not a number.", other.inspect())),
                        span,
                    ))
                }
            };
            let idx = normalize_index(n, list.len(), span)?;
            list[idx].clone()
        }
        "set-nth" => {
            let mut list = p[0].as_list();
            let n = match &p[1] {
                Value::Number(n) => n,
                other => {
                    return Err(SassError::new(
                        SassErrorKind::TypeMismatch(format!("{} is not a number.", other.inspect())),
                        span,
                    ))
                }
            };
            let idx = normalize_index(n, list.len(), span)?;
            list[idx] = p[2].clone();
            Value::list(list, separator_of(&p[0]), Brackets::None)
        }
        "list-separator" => Value::string(
            match p[0].separator() {
                ListSeparator::Comma => "comma",
                ListSeparator::Space => "space",
                ListSeparator::Undecided => "space",
            },
            crate::common::QuoteKind::None,
        ),
        "join" => {
            let mut a = p[0].as_list();
            let b = p[1].as_list();
            a.extend(b);
            let sep = match p.get(2) {
                Some(Value::String(s)) if s.text() == "comma" => ListSeparator::Comma,
                Some(Value::String(s)) if s.text() == "space" => ListSeparator::Space,
                _ => {
                    if p[0].as_list().is_empty() {
                        separator_of(&p[1])
                    } else {
                        separator_of(&p[0])
                    }
                }
            };
            Value::list(a, sep, Brackets::None)
        }
        "append" => {
            let mut list = p[0].as_list();
            list.push(p[1].clone());
            let sep = match p.get(2) {
                Some(Value::String(s)) if s.text() == "comma" => ListSeparator::Comma,
                Some(Value::String(s)) if s.text() == "space" => ListSeparator::Space,
                _ => separator_of(&p[0]),
            };
            Value::list(list, sep, Brackets::None)
        }
        "index" => {
            let list = p[0].as_list();
            let mut found = None;
            for (i, v) in list.iter().enumerate() {
                if v.equals(&p[1], span)? {
                    found = Some(i + 1);
                    break;
                }
            }
            match found {
                Some(i) => Value::Number(SassNumber::new_unitless(i as f64)),
                None => Value::Null,
            }
        }
        "is-bracketed" => Value::Bool(p[0].is_bracketed()),
        "zip" => {
            let lists: Vec<Vec<Value>> = p.iter().map(Value::as_list).collect();
            let min_len = lists.iter().map(Vec::len).min().unwrap_or(0);
            let mut out = Vec::with_capacity(min_len);
            for i in 0..min_len {
                let tuple: Vec<Value> = lists.iter().map(|l| l[i].clone()).collect();
                out.push(Value::list(tuple, ListSeparator::Space, Brackets::None));
            }
            Value::list(out, ListSeparator::Comma, Brackets::None)
        }
        _ => return Ok(None),
    }))
}
