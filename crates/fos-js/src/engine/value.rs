//! Script values
//!
//! Primitive values with JavaScript conversion rules, and the host objects
//! a handler can reach.

use std::fmt;

use fos_dom::NodeId;

/// Value returned to the host
#[derive(Debug, Clone, PartialEq)]
pub enum JsValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// A host object (event, element, console)
    Object,
    Function,
}

/// Runtime value inside the interpreter
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// The dispatched event, or the event `depth` hops down its
    /// `detail`/`nativeEvent` chain
    Event { depth: usize },
    Element(NodeId),
    Console,
    /// Bound host method, as read by `event.preventDefault`
    Method { receiver: Box<Value>, name: Box<str> },
}

impl Value {
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Value::Undefined | Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
        )
    }

    /// `typeof` result
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Method { .. } => "function",
            Value::Event { .. } | Value::Element(_) | Value::Console => "object",
        }
    }

    /// ToNumber
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => if *b { 1.0 } else { 0.0 },
            Value::Number(n) => *n,
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
                    u64::from_str_radix(hex, 16).map(|n| n as f64).unwrap_or(f64::NAN)
                } else {
                    match trimmed {
                        "Infinity" | "+Infinity" => f64::INFINITY,
                        "-Infinity" => f64::NEG_INFINITY,
                        // Rust accepts "inf"/"nan" spellings that JavaScript does not
                        t if t.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => f64::NAN,
                        t => t.parse().unwrap_or(f64::NAN),
                    }
                }
            }
            _ => f64::NAN,
        }
    }

    /// Strict equality (`===`)
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Method { .. }, Value::Method { .. }) => false,
            (a, b) => a == b,
        }
    }

    /// Loose equality (`==`)
    pub fn loose_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (a, b) if a.is_nullish() && b.is_nullish() => true,
            (a, b) if a.is_nullish() || b.is_nullish() => false,
            (a, b) if std::mem::discriminant(a) == std::mem::discriminant(b) => a.strict_equals(b),
            (a, b) if a.is_primitive() && b.is_primitive() => a.to_number() == b.to_number(),
            (a, b) if a.is_primitive() => a.loose_equals(&Value::String(b.to_string())),
            (a, b) if b.is_primitive() => Value::String(a.to_string()).loose_equals(b),
            _ => false,
        }
    }

    pub fn into_js(self) -> JsValue {
        match self {
            Value::Undefined => JsValue::Undefined,
            Value::Null => JsValue::Null,
            Value::Bool(b) => JsValue::Bool(b),
            Value::Number(n) => JsValue::Number(n),
            Value::String(s) => JsValue::String(s),
            Value::Method { .. } => JsValue::Function,
            Value::Event { .. } | Value::Element(_) | Value::Console => JsValue::Object,
        }
    }
}

/// ToString
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => f.write_str(&number_to_string(*n)),
            Value::String(s) => f.write_str(s),
            Value::Event { .. } => f.write_str("[object Event]"),
            Value::Element(_) => f.write_str("[object HTMLElement]"),
            Value::Console => f.write_str("[object console]"),
            Value::Method { name, .. } => write!(f, "function {}() {{ [native code] }}", name),
        }
    }
}

/// Number formatting as JavaScript prints it
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".into()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity".into() } else { "-Infinity".into() }
    } else if n == 0.0 {
        "0".into()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for JsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsValue::Undefined => f.write_str("undefined"),
            JsValue::Null => f.write_str("null"),
            JsValue::Bool(b) => write!(f, "{}", b),
            JsValue::Number(n) => f.write_str(&number_to_string(*n)),
            JsValue::String(s) => f.write_str(s),
            JsValue::Object => f.write_str("[object Object]"),
            JsValue::Function => f.write_str("function () { [native code] }"),
        }
    }
}
