//! Record normalizer: turns heterogeneous raw fields into canonical name lists.
//!
//! Source columns such as `genres` or `crew` arrive as stringified
//! lists of mappings, e.g. `[{"id": 28, "name": "Action"}]`, sometimes with
//! Python-style single quotes, sometimes as a bare name. Parsing happens in
//! two explicit steps:
//!
//! 1. [`RawField::parse`] classifies the text as `Structured` (a literal
//!    that parsed), `Opaque` (plain text, kept as one name) or `Empty`.
//! 2. The extraction functions walk the structure and pull out names.
//!
//! Non-conforming items are dropped silently; nothing here returns an error.

use serde_json::{Map, Number, Value};

/// Maximum number of cast members kept per movie
pub const MAX_CAST: usize = 3;

/// A raw field after classification at the ingestion boundary
#[derive(Debug, Clone, PartialEq)]
pub enum RawField {
    /// Blank input, or text that looked like a literal but did not parse
    Empty,
    /// A literal structure (list, mapping, scalar) that parsed cleanly
    Structured(Value),
    /// Plain text, treated as a single-element list
    Opaque(String),
}

impl RawField {
    /// Classify raw text.
    ///
    /// JSON is tried first, then Python literal syntax. Text that starts and
    /// ends like a list or mapping but fails both parsers is malformed and
    /// yields `Empty`; any other non-blank text is `Opaque`.
    pub fn parse(raw: &str) -> RawField {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return RawField::Empty;
        }

        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            return RawField::Structured(value);
        }
        if let Some(value) = parse_python_literal(trimmed) {
            return RawField::Structured(value);
        }

        if looks_structured(trimmed) {
            RawField::Empty
        } else {
            RawField::Opaque(trimmed.to_string())
        }
    }

    /// Items this field contributes, in source order
    fn items(&self) -> Vec<&Value> {
        match self {
            RawField::Empty => Vec::new(),
            RawField::Structured(Value::Array(items)) => items.iter().collect(),
            RawField::Structured(value) => vec![value],
            RawField::Opaque(_) => Vec::new(),
        }
    }

    fn opaque_name(&self) -> Option<&str> {
        match self {
            RawField::Opaque(text) => Some(text),
            _ => None,
        }
    }
}

impl From<Vec<String>> for RawField {
    /// An already-native list of names
    fn from(names: Vec<String>) -> Self {
        RawField::Structured(Value::Array(names.into_iter().map(Value::String).collect()))
    }
}

fn looks_structured(text: &str) -> bool {
    (text.starts_with('[') || text.starts_with('{')) && (text.ends_with(']') || text.ends_with('}'))
}

// =============================================================================
// Extraction
// =============================================================================

/// Extract names from a raw field.
///
/// Mapping items contribute their `name_key` value; string items are used
/// verbatim; anything else is dropped.
pub fn parse_entity_list(raw: &RawField, name_key: &str) -> Vec<String> {
    let mut names: Vec<String> = raw
        .items()
        .into_iter()
        .filter_map(|item| item_name(item, name_key))
        .collect();

    if let Some(name) = raw.opaque_name() {
        names.push(name.to_string());
    }
    names
}

/// Genre names, unbounded
pub fn extract_genres(raw: &RawField) -> Vec<String> {
    parse_entity_list(raw, "name")
}

/// Keyword names, unbounded
pub fn extract_keywords(raw: &RawField) -> Vec<String> {
    parse_entity_list(raw, "name")
}

/// First three cast names in billing order
pub fn extract_cast(raw: &RawField) -> Vec<String> {
    let mut cast = parse_entity_list(raw, "name");
    cast.truncate(MAX_CAST);
    cast
}

/// Every crew member whose `job` is "Director". A movie may have none or several.
pub fn extract_directors(raw: &RawField) -> Vec<String> {
    let mut directors: Vec<String> = raw
        .items()
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => {
                let is_director = map.get("job").and_then(Value::as_str) == Some("Director");
                if is_director { item_name(item, "name") } else { None }
            }
            Value::String(name) => Some(name.clone()),
            _ => None,
        })
        .collect();

    if let Some(name) = raw.opaque_name() {
        directors.push(name.to_string());
    }
    directors
}

fn item_name(item: &Value, name_key: &str) -> Option<String> {
    match item {
        Value::Object(map) => match map.get(name_key)? {
            Value::String(name) => Some(name.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        },
        Value::String(name) => Some(name.clone()),
        _ => None,
    }
}

// =============================================================================
// Python literal parser
// =============================================================================

/// Parse a Python literal (lists, tuples, dicts, sets, quoted strings,
/// numbers, `True`/`False`/`None`) into a JSON value. Returns `None` unless
/// the whole input is one literal.
pub fn parse_python_literal(text: &str) -> Option<Value> {
    let mut parser = LiteralParser {
        chars: text.chars().collect(),
        pos: 0,
    };
    let value = parser.value()?;
    parser.skip_whitespace();
    if parser.pos == parser.chars.len() {
        Some(value)
    } else {
        None
    }
}

struct LiteralParser {
    chars: Vec<char>,
    pos: usize,
}

impl LiteralParser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn value(&mut self) -> Option<Value> {
        self.skip_whitespace();
        match self.peek()? {
            '[' => self.sequence('[', ']'),
            '(' => self.sequence('(', ')'),
            '{' => self.mapping(),
            '\'' | '"' => self.string().map(Value::String),
            c if c == '-' || c == '+' || c.is_ascii_digit() || c == '.' => self.number(),
            c if c.is_ascii_alphabetic() => self.keyword_or_prefixed_string(),
            _ => None,
        }
    }

    fn sequence(&mut self, open: char, close: char) -> Option<Value> {
        debug_assert_eq!(self.peek(), Some(open));
        self.pos += 1;
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek()? == close {
                self.pos += 1;
                return Some(Value::Array(items));
            }
            items.push(self.value()?);
            self.skip_whitespace();
            match self.bump()? {
                ',' => continue,
                c if c == close => return Some(Value::Array(items)),
                _ => return None,
            }
        }
    }

    /// `{...}` is a dict, or a set when the first item has no colon
    fn mapping(&mut self) -> Option<Value> {
        self.pos += 1;
        let mut map = Map::new();
        let mut set_items = Vec::new();
        let mut is_set = None;

        loop {
            self.skip_whitespace();
            if self.peek()? == '}' {
                self.pos += 1;
                break;
            }

            let key = self.value()?;
            self.skip_whitespace();
            let has_colon = self.peek() == Some(':');
            match is_set {
                None => is_set = Some(!has_colon),
                Some(set) if set == has_colon => return None,
                Some(_) => {}
            }

            if has_colon {
                self.pos += 1;
                let value = self.value()?;
                map.insert(key_to_string(&key)?, value);
            } else {
                set_items.push(key);
            }

            self.skip_whitespace();
            match self.bump()? {
                ',' => continue,
                '}' => break,
                _ => return None,
            }
        }

        if is_set == Some(true) {
            Some(Value::Array(set_items))
        } else {
            Some(Value::Object(map))
        }
    }

    fn string(&mut self) -> Option<String> {
        let quote = self.bump()?;
        let mut out = String::new();
        loop {
            match self.bump()? {
                c if c == quote => return Some(out),
                '\\' => {
                    let escaped = self.bump()?;
                    match escaped {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        '0' => out.push('\0'),
                        'u' => {
                            let code: String = (0..4).filter_map(|_| self.bump()).collect();
                            let c = u32::from_str_radix(&code, 16).ok().and_then(char::from_u32)?;
                            out.push(c);
                        }
                        '\\' | '\'' | '"' => out.push(escaped),
                        other => {
                            out.push('\\');
                            out.push(other);
                        }
                    }
                }
                c => out.push(c),
            }
        }
    }

    fn number(&mut self) -> Option<Value> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E' | '_'))
        {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().filter(|c| **c != '_').collect();

        if let Ok(int) = text.parse::<i64>() {
            return Some(Value::Number(Number::from(int)));
        }
        let float = text.parse::<f64>().ok()?;
        Number::from_f64(float).map(Value::Number)
    }

    fn keyword_or_prefixed_string(&mut self) -> Option<Value> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();

        match word.as_str() {
            "True" => Some(Value::Bool(true)),
            "False" => Some(Value::Bool(false)),
            "None" => Some(Value::Null),
            "u" | "r" | "b" if matches!(self.peek(), Some('\'' | '"')) => {
                self.string().map(Value::String)
            }
            _ => None,
        }
    }
}

fn key_to_string(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
        _ => None,
    }
}
