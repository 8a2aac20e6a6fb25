//! Interpreter
//!
//! Walks the AST of a compiled handler for a single event dispatch. The
//! document is read-only; the only writable state is the event's
//! canceled/stopped flags.

use fos_dom::{Document, Event, EventDetail, NodeId};

use super::ast::{Ast, AstNodeKind, BinaryOp, LiteralValue, LogicalOp, MemberProperty, NodeId as AstId, UnaryOp};
use super::value::Value;
use crate::console::{ConsoleLevel, ConsoleMessage, log_with_level};
use crate::error::ScriptError;

/// Element properties exposed as booleans rather than strings
const BOOLEAN_PROPERTIES: &[&str] = &["required", "disabled"];

const STRING_METHODS: &[&str] = &["trim", "toUpperCase", "toLowerCase", "includes", "startsWith", "endsWith"];

enum Completion {
    Normal,
    Return(Value),
}

pub(crate) struct Interpreter<'a> {
    ast: &'a Ast,
    doc: &'a Document,
    event: &'a mut Event,
    this: NodeId,
    console: Vec<ConsoleMessage>,
}

impl<'a> Interpreter<'a> {
    pub fn new(ast: &'a Ast, doc: &'a Document, event: &'a mut Event, this: NodeId) -> Self {
        Self {
            ast,
            doc,
            event,
            this,
            console: Vec::new(),
        }
    }

    /// Run the program; yields the `return` value and console output
    pub fn run(mut self) -> Result<(Value, Vec<ConsoleMessage>), ScriptError> {
        let value = match self.ast.root() {
            Some(root) => match self.exec(root)? {
                Completion::Return(value) => value,
                Completion::Normal => Value::Undefined,
            },
            None => Value::Undefined,
        };
        Ok((value, self.console))
    }

    fn kind(&self, id: AstId) -> Result<&'a AstNodeKind, ScriptError> {
        let ast: &'a Ast = self.ast;
        ast.get(id)
            .map(|n| &n.kind)
            .ok_or_else(|| ScriptError::TypeError(format!("dangling AST node {:?}", id)))
    }

    fn exec(&mut self, id: AstId) -> Result<Completion, ScriptError> {
        match self.kind(id)? {
            AstNodeKind::Program { body } | AstNodeKind::BlockStatement { body } => {
                for &stmt in body {
                    if let Completion::Return(value) = self.exec(stmt)? {
                        return Ok(Completion::Return(value));
                    }
                }
                Ok(Completion::Normal)
            }
            AstNodeKind::ExpressionStatement { expr } => {
                self.eval(*expr)?;
                Ok(Completion::Normal)
            }
            AstNodeKind::EmptyStatement => Ok(Completion::Normal),
            AstNodeKind::ReturnStatement { argument } => {
                let value = match argument {
                    Some(arg) => self.eval(*arg)?,
                    None => Value::Undefined,
                };
                Ok(Completion::Return(value))
            }
            AstNodeKind::IfStatement { test, consequent, alternate } => {
                if self.eval(*test)?.is_truthy() {
                    self.exec(*consequent)
                } else if let Some(alt) = alternate {
                    self.exec(*alt)
                } else {
                    Ok(Completion::Normal)
                }
            }
            _ => {
                self.eval(id)?;
                Ok(Completion::Normal)
            }
        }
    }

    fn eval(&mut self, id: AstId) -> Result<Value, ScriptError> {
        match self.kind(id)? {
            AstNodeKind::Identifier { name } => match &**name {
                "event" => Ok(Value::Event { depth: 0 }),
                "console" => Ok(Value::Console),
                other => Err(ScriptError::TypeError(format!("{} is not defined", other))),
            },
            AstNodeKind::Literal { value } => Ok(match value {
                LiteralValue::Undefined => Value::Undefined,
                LiteralValue::Null => Value::Null,
                LiteralValue::Bool(b) => Value::Bool(*b),
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::String(s) => Value::String(s.to_string()),
            }),
            AstNodeKind::ThisExpression => Ok(Value::Element(self.this)),
            AstNodeKind::UnaryExpression { operator, argument } => {
                let value = self.eval(*argument)?;
                Ok(match operator {
                    UnaryOp::Not => Value::Bool(!value.is_truthy()),
                    UnaryOp::Minus => Value::Number(-value.to_number()),
                    UnaryOp::Plus => Value::Number(value.to_number()),
                    UnaryOp::Typeof => Value::String(value.type_of().to_string()),
                    UnaryOp::Void => Value::Undefined,
                })
            }
            AstNodeKind::BinaryExpression { operator, left, right } => {
                let left = self.eval(*left)?;
                let right = self.eval(*right)?;
                Ok(binary(*operator, left, right))
            }
            AstNodeKind::LogicalExpression { operator, left, right } => {
                let left = self.eval(*left)?;
                let short_circuit = match operator {
                    LogicalOp::And => !left.is_truthy(),
                    LogicalOp::Or => left.is_truthy(),
                    LogicalOp::NullishCoalescing => !left.is_nullish(),
                };
                if short_circuit { Ok(left) } else { self.eval(*right) }
            }
            AstNodeKind::ConditionalExpression { test, consequent, alternate } => {
                if self.eval(*test)?.is_truthy() {
                    self.eval(*consequent)
                } else {
                    self.eval(*alternate)
                }
            }
            AstNodeKind::MemberExpression { object, property, optional } => {
                let object = self.eval(*object)?;
                if *optional && object.is_nullish() {
                    return Ok(Value::Undefined);
                }
                let key = self.property_key(property)?;
                self.get_member(&object, &key)
            }
            AstNodeKind::CallExpression { callee, arguments } => {
                let AstNodeKind::MemberExpression { object, property, optional } = self.kind(*callee)? else {
                    return Err(ScriptError::TypeError("only method calls are allowed".into()));
                };
                let receiver = self.eval(*object)?;
                if *optional && receiver.is_nullish() {
                    return Ok(Value::Undefined);
                }
                let name = self.property_key(property)?;
                let mut args = Vec::with_capacity(arguments.len());
                for &arg in arguments {
                    args.push(self.eval(arg)?);
                }
                self.call_method(receiver, &name, args)
            }
            other => Err(ScriptError::TypeError(format!("{:?} is not an expression", other))),
        }
    }

    fn property_key(&mut self, property: &MemberProperty) -> Result<String, ScriptError> {
        match property {
            MemberProperty::Named(name) => Ok(name.to_string()),
            MemberProperty::Computed(expr) => Ok(self.eval(*expr)?.to_string()),
        }
    }

    /// The event `depth` hops down the detail chain
    fn event_at(&self, depth: usize) -> Option<&Event> {
        let mut event: &Event = &*self.event;
        for _ in 0..depth {
            event = event.detail_event()?;
        }
        Some(event)
    }

    fn get_member(&self, object: &Value, key: &str) -> Result<Value, ScriptError> {
        let method = || Value::Method {
            receiver: Box::new(object.clone()),
            name: key.into(),
        };

        Ok(match object {
            Value::Undefined | Value::Null => {
                return Err(ScriptError::TypeError(format!(
                    "Cannot read properties of {} (reading '{}')",
                    object, key
                )));
            }
            Value::String(s) => match key {
                "length" => Value::Number(s.encode_utf16().count() as f64),
                k if STRING_METHODS.contains(&k) => method(),
                _ => Value::Undefined,
            },
            Value::Bool(_) | Value::Number(_) | Value::Method { .. } => Value::Undefined,
            Value::Console => match ConsoleLevel::from_method(key) {
                Some(_) => method(),
                None => Value::Undefined,
            },
            Value::Element(node) => self.element_member(*node, key),
            Value::Event { depth } => {
                let Some(event) = self.event_at(*depth) else {
                    return Ok(Value::Undefined);
                };
                let nested = || Value::Event { depth: depth + 1 };
                match key {
                    "type" => Value::String(event.event_type.clone()),
                    "detail" => match &event.detail {
                        EventDetail::Custom(_) => nested(),
                        EventDetail::Keyboard(_) => Value::Number(0.0),
                        EventDetail::None => Value::Null,
                    },
                    "nativeEvent" => match &event.detail {
                        EventDetail::Custom(_) => nested(),
                        _ => Value::Undefined,
                    },
                    "target" => event.target().map(Value::Element).unwrap_or(Value::Null),
                    "currentTarget" => event.current_target().map(Value::Element).unwrap_or(Value::Null),
                    "bubbles" => Value::Bool(event.bubbles),
                    "cancelable" => Value::Bool(event.cancelable),
                    "composed" => Value::Bool(event.composed),
                    "defaultPrevented" => Value::Bool(event.is_default_prevented()),
                    "key" => event.keyboard().map(|k| Value::String(k.key.clone())).unwrap_or(Value::Undefined),
                    "code" => event.keyboard().map(|k| Value::String(k.code.clone())).unwrap_or(Value::Undefined),
                    "keyCode" | "which" => event
                        .keyboard()
                        .map(|k| Value::Number(f64::from(k.key_code)))
                        .unwrap_or(Value::Undefined),
                    "preventDefault" | "stopPropagation" => method(),
                    _ => Value::Undefined,
                }
            }
        })
    }

    fn element_member(&self, node: NodeId, key: &str) -> Value {
        match self.doc.property(node, key) {
            Some(value) if BOOLEAN_PROPERTIES.contains(&key) => Value::Bool(value == "true"),
            Some(value) => Value::String(value),
            None if BOOLEAN_PROPERTIES.contains(&key) => Value::Bool(self.doc.has_attribute(node, key)),
            None => Value::Undefined,
        }
    }

    fn call_method(&mut self, receiver: Value, name: &str, args: Vec<Value>) -> Result<Value, ScriptError> {
        let not_a_function = || ScriptError::TypeError(format!("{} is not a function", name));

        match receiver {
            Value::Undefined | Value::Null => Err(ScriptError::TypeError(format!(
                "Cannot read properties of {} (reading '{}')",
                receiver, name
            ))),
            Value::Event { depth } => {
                // nested events are snapshots; their flags are not observable
                match name {
                    "preventDefault" if depth == 0 => self.event.prevent_default(),
                    "stopPropagation" if depth == 0 => self.event.stop_propagation(),
                    "preventDefault" | "stopPropagation" => {}
                    _ => return Err(not_a_function()),
                }
                Ok(Value::Undefined)
            }
            Value::Console => {
                let level = ConsoleLevel::from_method(name).ok_or_else(not_a_function)?;
                let texts: Vec<String> = args.iter().map(Value::to_string).collect();
                self.console.push(log_with_level(level, &texts));
                Ok(Value::Undefined)
            }
            Value::String(s) => {
                let arg = args.first().map(Value::to_string).unwrap_or_else(|| "undefined".into());
                Ok(match name {
                    "trim" => Value::String(s.trim().to_string()),
                    "toUpperCase" => Value::String(s.to_uppercase()),
                    "toLowerCase" => Value::String(s.to_lowercase()),
                    "includes" => Value::Bool(s.contains(arg.as_str())),
                    "startsWith" => Value::Bool(s.starts_with(arg.as_str())),
                    "endsWith" => Value::Bool(s.ends_with(arg.as_str())),
                    _ => return Err(not_a_function()),
                })
            }
            _ => Err(not_a_function()),
        }
    }
}

fn to_primitive(value: Value) -> Value {
    if value.is_primitive() {
        value
    } else {
        Value::String(value.to_string())
    }
}

fn binary(operator: BinaryOp, left: Value, right: Value) -> Value {
    match operator {
        BinaryOp::StrictEqual => return Value::Bool(left.strict_equals(&right)),
        BinaryOp::StrictNotEqual => return Value::Bool(!left.strict_equals(&right)),
        BinaryOp::Equal => return Value::Bool(left.loose_equals(&right)),
        BinaryOp::NotEqual => return Value::Bool(!left.loose_equals(&right)),
        _ => {}
    }

    let left = to_primitive(left);
    let right = to_primitive(right);

    match operator {
        BinaryOp::Add => match (&left, &right) {
            (Value::String(_), _) | (_, Value::String(_)) => Value::String(format!("{}{}", left, right)),
            _ => Value::Number(left.to_number() + right.to_number()),
        },
        BinaryOp::Sub => Value::Number(left.to_number() - right.to_number()),
        BinaryOp::Mul => Value::Number(left.to_number() * right.to_number()),
        BinaryOp::Div => Value::Number(left.to_number() / right.to_number()),
        BinaryOp::Mod => Value::Number(left.to_number() % right.to_number()),
        BinaryOp::LessThan | BinaryOp::LessThanEq | BinaryOp::GreaterThan | BinaryOp::GreaterThanEq => {
            let ordering = match (&left, &right) {
                (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
                _ => left.to_number().partial_cmp(&right.to_number()),
            };
            let Some(ordering) = ordering else {
                return Value::Bool(false);
            };
            Value::Bool(match operator {
                BinaryOp::LessThan => ordering.is_lt(),
                BinaryOp::LessThanEq => ordering.is_le(),
                BinaryOp::GreaterThan => ordering.is_gt(),
                _ => ordering.is_ge(),
            })
        }
        // equality handled above
        _ => Value::Bool(false),
    }
}
