use std::sync::Arc;

use super::util::{between, exactly, expect_callable, no_options};
use crate::curry::{builtin, Param, Signature};
use crate::values::{RuntimeError, SeqIter, SeqValue, Value, R};

/// Opens a single pass over an iterable value. Lists and tuples are walked
/// by position, text by character, maps by key, and sequences share their
/// cursor with every other holder.
pub fn iterate(value: &Value, ctx: &str) -> Result<SeqIter, RuntimeError> {
    match value {
        Value::List(items) => {
            let items = Arc::clone(items);
            Ok(boxed((0..items.len()).map(move |index| Ok(items[index].clone()))))
        }
        Value::Tuple(items) => Ok(boxed(items.clone().into_iter().map(Ok))),
        Value::Text(text) => {
            let chars = text
                .chars()
                .map(|ch| Value::Text(ch.to_string()))
                .collect::<Vec<_>>();
            Ok(boxed(chars.into_iter().map(Ok)))
        }
        Value::Map(map) => {
            let keys = map.keys().map(|key| key.to_value()).collect::<Vec<_>>();
            Ok(boxed(keys.into_iter().map(Ok)))
        }
        Value::Seq(seq) => {
            let seq = Arc::clone(seq);
            Ok(boxed(std::iter::from_fn(move || seq.pull())))
        }
        other => Err(RuntimeError::type_mismatch(ctx, "an iterable", other)),
    }
}

fn boxed(iter: impl Iterator<Item = R> + Send + 'static) -> SeqIter {
    Box::new(iter)
}

pub fn collect_items(value: &Value, ctx: &str) -> Result<Vec<Value>, RuntimeError> {
    iterate(value, ctx)?.collect()
}

pub fn to_list(xs: &Value) -> R {
    Ok(Value::list(collect_items(xs, "to_list")?))
}

pub fn to_tuple(xs: &Value) -> R {
    Ok(Value::Tuple(collect_items(xs, "to_tuple")?))
}

/// Lazily yields every accumulator of a left fold, starting with `init` or,
/// without one, the first element.
pub fn reductions(f: &Value, xs: &Value, init: Option<Value>) -> R {
    let func = expect_callable(f, "reductions")?;
    let items = iterate(xs, "reductions")?;
    Ok(Value::Seq(SeqValue::new(Reductions {
        func,
        items,
        step: ReductionStep::Start(init),
    })))
}

struct Reductions {
    func: Value,
    items: SeqIter,
    step: ReductionStep,
}

enum ReductionStep {
    Start(Option<Value>),
    Running(Value),
    Done,
}

impl Iterator for Reductions {
    type Item = R;

    fn next(&mut self) -> Option<R> {
        let result = match std::mem::replace(&mut self.step, ReductionStep::Done) {
            ReductionStep::Done => return None,
            ReductionStep::Start(Some(init)) => Ok(init),
            ReductionStep::Start(None) => self.items.next()?,
            ReductionStep::Running(acc) => match self.items.next()? {
                Ok(item) => self.func.call(vec![acc, item]),
                Err(err) => Err(err),
            },
        };
        if let Ok(value) = &result {
            self.step = ReductionStep::Running(value.clone());
        }
        Some(result)
    }
}

/// Arithmetic mean ignoring NaN; NaN when nothing is left to average.
pub fn mean(xs: &Value) -> R {
    let mut sum = 0.0;
    let mut count = 0usize;
    for item in iterate(xs, "mean")? {
        let value = match item? {
            Value::Bool(value) => f64::from(u8::from(value)),
            Value::Int(value) => value as f64,
            Value::Float(value) if value.is_nan() => continue,
            Value::Float(value) => value,
            other => return Err(RuntimeError::type_mismatch("mean", "a number", &other)),
        };
        sum += value;
        count += 1;
    }
    if count == 0 {
        return Ok(Value::Float(f64::NAN));
    }
    Ok(Value::Float(sum / count as f64))
}

/// Forces every element of `xs`, discarding them.
pub fn drain(xs: &Value) -> R {
    for item in iterate(xs, "do")? {
        item?;
    }
    Ok(Value::Unit)
}

pub fn first(xs: &Value) -> R {
    match iterate(xs, "first")?.next() {
        Some(item) => item,
        None => Ok(Value::Unit),
    }
}

pub fn last(xs: &Value) -> R {
    let empty = RuntimeError::IndexOutOfRange { index: -1, len: 0 };
    match xs {
        Value::List(items) => items.last().cloned().ok_or(empty),
        Value::Tuple(items) => items.last().cloned().ok_or(empty),
        Value::Text(text) => text
            .chars()
            .last()
            .map(|ch| Value::Text(ch.to_string()))
            .ok_or(empty),
        other => {
            let mut last = None;
            for item in iterate(other, "last")? {
                last = Some(item?);
            }
            last.ok_or(empty)
        }
    }
}

fn single(name: &'static str, op: fn(&Value) -> R) -> (&'static str, Value) {
    let value = builtin(name, Signature::positional(&["xs"]), move |args| {
        let ([xs], options) = exactly::<1>(args, name)?;
        no_options(&options, name)?;
        op(&xs)
    });
    (name, value)
}

pub(super) fn build_seq_builtins() -> Vec<(&'static str, Value)> {
    let reductions_value = builtin(
        "reductions",
        Signature::new(vec![Param::required("f"), Param::required("xs")]).with_rest("init"),
        |args| {
            let (positional, options) = between(args, "reductions", 2, Some(3))?;
            no_options(&options, "reductions")?;
            reductions(&positional[0], &positional[1], positional.get(2).cloned())
        },
    );
    vec![
        ("reductions", reductions_value),
        single("mean", mean),
        single("do", drain),
        single("first", first),
        single("last", last),
        single("to_list", to_list),
        single("to_tuple", to_tuple),
    ]
}
