//! `Value::Map` — an insertion-ordered mapping value -> value (spec §3.2).
//! Kept from the teacher's `Vec<(Value, Value)>` representation, which
//! gives insertion order for free and keeps key lookup consistent with
//! Sass's structural-equality key comparison rather than `Hash`.

use std::slice::Iter;
use std::vec::IntoIter;

use codemap::Span;

use crate::common::{Brackets, ListSeparator};
use crate::error::SassResult;
use crate::value::Value;

#[derive(Debug, Clone, Default)]
pub struct SassMap(Vec<(Value, Value)>);

impl SassMap {
    pub const fn new() -> SassMap {
        SassMap(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &Value, span: Span) -> SassResult<Option<Value>> {
        for (k, v) in &self.0 {
            if k.equals(key, span)? {
                return Ok(Some(v.clone()));
            }
        }
        Ok(None)
    }

    pub fn has_key(&self, key: &Value, span: Span) -> SassResult<bool> {
        Ok(self.get(key, span)?.is_some())
    }

    pub fn remove(&mut self, key: &Value, span: Span) -> SassResult<()> {
        let mut idx = None;
        for (i, (k, ..)) in self.0.iter().enumerate() {
            if k.equals(key, span)? {
                idx = Some(i);
                break;
            }
        }
        if let Some(i) = idx {
            self.0.remove(i);
        }
        Ok(())
    }

    pub fn merge(&mut self, other: &SassMap, span: Span) -> SassResult<()> {
        for (key, value) in other.0.clone() {
            self.insert(key, value, span)?;
        }
        Ok(())
    }

    pub fn iter(&self) -> Iter<(Value, Value)> {
        self.0.iter()
    }

    pub fn keys(self) -> Vec<Value> {
        self.0.into_iter().map(|(k, ..)| k).collect()
    }

    pub fn values(self) -> Vec<Value> {
        self.0.into_iter().map(|(.., v)| v).collect()
    }

    pub fn as_list(self) -> Vec<Value> {
        self.0
            .into_iter()
            .map(|(k, v)| Value::list(vec![k, v], ListSeparator::Space, Brackets::None))
            .collect()
    }

    pub fn entries(self) -> Vec<(Value, Value)> {
        self.0
    }

    /// Returns true if the key already existed (and so was overwritten
    /// rather than appended). Duplicate-key detection during map
    /// *construction* from a literal is the parser's job (spec §3.2
    /// invariant: "duplicate-key detection is part of construction"); this
    /// method is the shared primitive both the parser and `map-merge` use.
    pub fn insert(&mut self, key: Value, value: Value, span: Span) -> SassResult<bool> {
        for (k, v) in &mut self.0 {
            if k.equals(&key, span)? {
                *v = value;
                return Ok(true);
            }
        }
        self.0.push((key, value));
        Ok(false)
    }
}

impl IntoIterator for SassMap {
    type Item = (Value, Value);
    type IntoIter = IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
