// SPDX-License-Identifier: MIT

//! Serialized payload documents and dotted path resolution
//!
//! Paths are `.`-separated components resolved against the serialized
//! payload, whose object keys are kept sorted:
//! - `a.b.c` walks object keys
//! - `items.0.name` indexes into arrays
//! - `items.#` is the array length, `items.#.name` collects `name` from
//!   every element
//! - `*` and `?` match object keys (first match in sorted key order)
//! - `\` escapes the next character, e.g. `file\.txt`

use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;

use crate::runner::error::CheckError;

/// Payload serialized once for path lookups
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Value,
}

impl Document {
    /// Serialize a payload into a document
    pub fn from_payload<T>(payload: &T) -> Result<Self, CheckError>
    where
        T: Serialize + ?Sized,
    {
        let root = serde_json::to_value(payload).map_err(CheckError::Serialization)?;
        Ok(Self { root })
    }

    /// Resolve a path; `None` when any component is missing
    pub fn get(&self, path: &str) -> Option<Cow<'_, Value>> {
        if path.is_empty() {
            return None;
        }
        let components = parse_path(path);
        resolve(&self.root, &components)
    }

    /// String form of the value at `path`, empty when absent
    pub fn get_string(&self, path: &str) -> String {
        self.get(path)
            .map(|v| value_string(&v))
            .unwrap_or_default()
    }
}

/// String form used for comparisons: strings raw, `null` empty,
/// containers as compact JSON
pub fn value_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => number_string(n),
        Value::Bool(b) => b.to_string(),
        // Numbers nested in containers keep serde_json's own formatting
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Integers as written; floats in plain decimal (`1e21` ->
/// `1000000000000000000000`, `200.0` -> `200`)
fn number_string(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    n.as_f64()
        .map(|f| f.to_string())
        .unwrap_or_else(|| n.to_string())
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Char(char),
    AnyOne,
    AnyMany,
}

#[derive(Debug, Default)]
struct Component {
    tokens: Vec<Token>,
    wildcard: bool,
    /// Component is a bare unescaped `#`
    count: bool,
}

impl Component {
    fn literal(&self) -> String {
        self.tokens
            .iter()
            .map(|t| match t {
                Token::Char(c) => *c,
                Token::AnyOne => '?',
                Token::AnyMany => '*',
            })
            .collect()
    }

    fn matches(&self, key: &str) -> bool {
        let chars: Vec<char> = key.chars().collect();
        glob_match(&self.tokens, &chars)
    }
}

fn parse_path(path: &str) -> Vec<Component> {
    let mut components = Vec::new();
    let mut current = Component::default();
    let mut bare_hash = false;
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    current.tokens.push(Token::Char(escaped));
                }
            }
            '.' => {
                current.count = bare_hash && current.tokens.len() == 1;
                components.push(std::mem::take(&mut current));
                bare_hash = false;
            }
            '*' => {
                current.tokens.push(Token::AnyMany);
                current.wildcard = true;
            }
            '?' => {
                current.tokens.push(Token::AnyOne);
                current.wildcard = true;
            }
            '#' => {
                bare_hash = current.tokens.is_empty();
                current.tokens.push(Token::Char('#'));
            }
            other => current.tokens.push(Token::Char(other)),
        }
    }
    current.count = bare_hash && current.tokens.len() == 1;
    components.push(current);

    components
}

fn resolve<'v>(current: &'v Value, components: &[Component]) -> Option<Cow<'v, Value>> {
    let Some((head, rest)) = components.split_first() else {
        return Some(Cow::Borrowed(current));
    };

    match current {
        Value::Object(map) => {
            let child = if head.wildcard {
                map.iter().find(|(k, _)| head.matches(k)).map(|(_, v)| v)
            } else {
                map.get(&head.literal())
            };
            resolve(child?, rest)
        }
        Value::Array(items) => {
            if head.count {
                if rest.is_empty() {
                    return Some(Cow::Owned(Value::from(items.len())));
                }
                let collected: Vec<Value> = items
                    .iter()
                    .filter_map(|item| resolve(item, rest))
                    .map(Cow::into_owned)
                    .collect();
                return Some(Cow::Owned(Value::Array(collected)));
            }
            let index: usize = head.literal().parse().ok()?;
            resolve(items.get(index)?, rest)
        }
        _ => None,
    }
}

fn glob_match(tokens: &[Token], text: &[char]) -> bool {
    match tokens.split_first() {
        None => text.is_empty(),
        Some((Token::AnyMany, rest)) => (0..=text.len()).any(|i| glob_match(rest, &text[i..])),
        Some((Token::AnyOne, rest)) => !text.is_empty() && glob_match(rest, &text[1..]),
        Some((Token::Char(c), rest)) => text.first() == Some(c) && glob_match(rest, &text[1..]),
    }
}
