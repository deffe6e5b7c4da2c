use std::cmp::Ordering;
use std::sync::Arc;

use ordered_float::OrderedFloat;

use super::{RuntimeError, Value};

pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Unit, Value::Unit) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => (*a as f64) == *b,
        (Value::Text(a), Value::Text(b)) => a == b,
        (Value::List(a), Value::List(b)) => sequences_equal(a, b),
        (Value::Tuple(a), Value::Tuple(b)) => sequences_equal(a, b),
        (Value::Map(a), Value::Map(b)) => {
            a.len() == b.len()
                && a.iter().all(|(key, value)| {
                    b.get(key)
                        .map(|other| values_equal(value, other))
                        .unwrap_or(false)
                })
        }
        (Value::Builtin(a), Value::Builtin(b)) => Arc::ptr_eq(a, b),
        (Value::Seq(a), Value::Seq(b)) => Arc::ptr_eq(a, b),
        _ => false,
    }
}

fn sequences_equal(left: &[Value], right: &[Value]) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right.iter())
            .all(|(left, right)| values_equal(left, right))
}

/// Totally ordered projection of an orderable [`Value`].
///
/// Bools order as integers and integers compare numerically against floats.
/// Lists and tuples compare lexicographically.
#[derive(Debug, Clone)]
pub enum OrderKey {
    Int(i64),
    Float(OrderedFloat<f64>),
    Text(String),
    Seq(Vec<OrderKey>),
}

impl OrderKey {
    pub fn try_from_value(value: &Value, ctx: &str) -> Result<Self, RuntimeError> {
        match value {
            Value::Bool(value) => Ok(OrderKey::Int(i64::from(*value))),
            Value::Int(value) => Ok(OrderKey::Int(*value)),
            Value::Float(value) => Ok(OrderKey::Float(OrderedFloat(*value))),
            Value::Text(text) => Ok(OrderKey::Text(text.clone())),
            Value::List(items) => Self::sequence(items, ctx),
            Value::Tuple(items) => Self::sequence(items, ctx),
            other => Err(RuntimeError::type_mismatch(ctx, "an orderable value", other)),
        }
    }

    fn sequence(items: &[Value], ctx: &str) -> Result<Self, RuntimeError> {
        items
            .iter()
            .map(|item| Self::try_from_value(item, ctx))
            .collect::<Result<Vec<_>, _>>()
            .map(OrderKey::Seq)
    }

    fn rank(&self) -> u8 {
        match self {
            OrderKey::Int(_) | OrderKey::Float(_) => 0,
            OrderKey::Text(_) => 1,
            OrderKey::Seq(_) => 2,
        }
    }
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (OrderKey::Int(a), OrderKey::Int(b)) => a.cmp(b),
            (OrderKey::Float(a), OrderKey::Float(b)) => a.cmp(b),
            (OrderKey::Int(a), OrderKey::Float(b)) => OrderedFloat(*a as f64).cmp(b),
            (OrderKey::Float(a), OrderKey::Int(b)) => a.cmp(&OrderedFloat(*b as f64)),
            (OrderKey::Text(a), OrderKey::Text(b)) => a.cmp(b),
            (OrderKey::Seq(a), OrderKey::Seq(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OrderKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderKey {}

/// Coarse kind used to refuse comparisons between unrelated values, such as
/// text against numbers.
pub(crate) fn order_kind(value: &Value) -> &'static str {
    match value {
        Value::Bool(_) | Value::Int(_) | Value::Float(_) => "number",
        other => other.type_name(),
    }
}

pub fn format_value(value: &Value) -> String {
    match value {
        Value::Unit => "Unit".to_string(),
        Value::Bool(v) => v.to_string(),
        Value::Int(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::Text(v) => v.clone(),
        Value::List(items) => {
            let inner = items.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{}]", inner)
        }
        Value::Tuple(items) => {
            let inner = items.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("({})", inner)
        }
        Value::Map(map) => {
            let mut entries = map
                .iter()
                .map(|(key, value)| {
                    format!("{}: {}", format_value(&key.to_value()), format_value(value))
                })
                .collect::<Vec<_>>();
            entries.sort();
            format!("{{{}}}", entries.join(", "))
        }
        Value::Builtin(imp) => format!("<builtin {}>", imp.name),
        Value::Curried(curried) => format!(
            "<curried {}/{}>",
            curried.target.callable_name().unwrap_or("<anonymous>"),
            curried.arity
        ),
        Value::Seq(_) => "<seq>".to_string(),
    }
}
