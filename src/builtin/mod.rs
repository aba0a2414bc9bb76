//! Built-in SassScript functions (spec §4.4.3–§4.4.5, `SPEC_FULL.md` §4.6).
//! Dispatch order from `eval::eval_call` is user-defined first, then this
//! module, then literal CSS-function passthrough.

mod color;
pub(crate) mod introspection;
mod list;
mod map;
mod number;
mod string;

use codemap::Span;

use crate::args::CallArgs;
use crate::error::SassResult;
use crate::scope::Scope;
use crate::selector::SelectorList;
use crate::value::Value;

/// Returns `Ok(None)` for an unrecognized name so the caller can fall
/// through to literal passthrough.
pub(crate) fn call(
    name: &str,
    args: &CallArgs,
    scope: &Scope,
    super_selector: &SelectorList,
    span: Span,
) -> SassResult<Option<Value>> {
    if let Some(r) = number::call(name, args, span)? {
        return Ok(Some(r));
    }
    if let Some(r) = color::call(name, args, span)? {
        return Ok(Some(r));
    }
    if let Some(r) = string::call(name, args, span)? {
        return Ok(Some(r));
    }
    if let Some(r) = list::call(name, args, span)? {
        return Ok(Some(r));
    }
    if let Some(r) = map::call(name, args, span)? {
        return Ok(Some(r));
    }
    if let Some(r) = introspection::call(name, args, scope, super_selector, span)? {
        return Ok(Some(r));
    }
    Ok(None)
}
