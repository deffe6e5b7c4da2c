use std::sync::Arc;

use im::HashMap as ImHashMap;

use crate::values::{Args, KeyValue, Options, RuntimeError, Value};

pub(super) fn exactly<const N: usize>(
    args: Args,
    ctx: &str,
) -> Result<([Value; N], Options), RuntimeError> {
    let Args {
        positional,
        options,
    } = args;
    let got = positional.len();
    let values = <[Value; N]>::try_from(positional).map_err(|_| RuntimeError::ArgumentCount {
        ctx: ctx.to_string(),
        expected: N.to_string(),
        got,
    })?;
    Ok((values, options))
}

pub(super) fn between(
    args: Args,
    ctx: &str,
    min: usize,
    max: Option<usize>,
) -> Result<(Vec<Value>, Options), RuntimeError> {
    let got = args.positional.len();
    if got < min || max.is_some_and(|max| got > max) {
        let expected = match max {
            Some(max) if max == min => min.to_string(),
            Some(max) => format!("{min} to {max}"),
            None => format!("at least {min}"),
        };
        return Err(RuntimeError::ArgumentCount {
            ctx: ctx.to_string(),
            expected,
            got,
        });
    }
    Ok((args.positional, args.options))
}

pub(super) fn no_options(options: &Options, ctx: &str) -> Result<(), RuntimeError> {
    options.reject_unknown(ctx, &[])
}

pub(super) fn expect_int(value: &Value, ctx: &str) -> Result<i64, RuntimeError> {
    match value {
        Value::Int(value) => Ok(*value),
        other => Err(RuntimeError::type_mismatch(ctx, "Int", other)),
    }
}

pub(super) fn expect_callable(value: &Value, ctx: &str) -> Result<Value, RuntimeError> {
    if value.is_callable() {
        Ok(value.clone())
    } else {
        Err(RuntimeError::type_mismatch(ctx, "a function", value))
    }
}

/// `Unit` stands for "no function", as an absent key does in sorting.
pub(super) fn optional_callable(value: &Value, ctx: &str) -> Result<Option<Value>, RuntimeError> {
    match value {
        Value::Unit => Ok(None),
        other => expect_callable(other, ctx).map(Some),
    }
}

pub(super) fn expect_map(
    value: &Value,
    ctx: &str,
) -> Result<Arc<ImHashMap<KeyValue, Value>>, RuntimeError> {
    match value {
        Value::Map(map) => Ok(map.clone()),
        other => Err(RuntimeError::type_mismatch(ctx, "Map", other)),
    }
}

pub(super) fn expect_key(value: &Value) -> Result<KeyValue, RuntimeError> {
    KeyValue::try_from_value(value)
        .ok_or_else(|| RuntimeError::Unhashable(crate::values::format_value(value)))
}
