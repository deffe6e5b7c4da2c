use std::sync::Arc;

use tracing::debug;

use super::seq::{collect_items, iterate};
use super::util::{
    between, exactly, expect_callable, expect_int, expect_key, no_options, optional_callable,
};
use crate::curry::{curried, curried_builtin, native, Param, Signature};
use crate::values::{
    format_value, order_kind, Args, OrderKey, Options, RuntimeError, SeqValue, Value, R,
};

/// `xs[index]`, falling back to the `default` option when the index or key
/// is missing.
pub fn at(index: &Value, xs: &Value, options: &Options) -> R {
    match lookup(index, xs) {
        Err(err @ (RuntimeError::IndexOutOfRange { .. } | RuntimeError::KeyNotFound(_))) => {
            match options.get("default") {
                Some(default) => {
                    debug!(index = %format_value(index), %err, "at: using default");
                    Ok(default.clone())
                }
                None => Err(err),
            }
        }
        other => other,
    }
}

fn lookup(index: &Value, xs: &Value) -> R {
    match xs {
        Value::List(items) => Ok(items[position(index, items.len())?].clone()),
        Value::Tuple(items) => Ok(items[position(index, items.len())?].clone()),
        Value::Text(text) => {
            let chars = text.chars().collect::<Vec<_>>();
            let ch = chars[position(index, chars.len())?];
            Ok(Value::Text(ch.to_string()))
        }
        Value::Map(map) => map
            .get(&expect_key(index)?)
            .cloned()
            .ok_or_else(|| RuntimeError::KeyNotFound(format_value(index))),
        other => Err(RuntimeError::type_mismatch("at", "an indexable value", other)),
    }
}

/// Resolves a possibly negative index against `len`.
fn position(index: &Value, len: usize) -> Result<usize, RuntimeError> {
    let raw = expect_int(index, "at")?;
    let signed_len = i64::try_from(len).unwrap_or(i64::MAX);
    let resolved = if raw < 0 { raw + signed_len } else { raw };
    if resolved < 0 || resolved >= signed_len {
        return Err(RuntimeError::IndexOutOfRange { index: raw, len });
    }
    usize::try_from(resolved).map_err(|_| RuntimeError::IndexOutOfRange { index: raw, len })
}

/// A function returning, as a tuple, what each of `fs` returns for the same
/// arguments. Functions run in order; the first failure stops the rest.
pub fn juxt(fs: Vec<Value>) -> R {
    let fs = fs
        .iter()
        .map(|f| expect_callable(f, "juxt"))
        .collect::<Result<Vec<_>, _>>()?;
    let fs = Arc::new(fs);
    Ok(native("juxt", move |args: Args| {
        let results = fs
            .iter()
            .map(|f| f.call_with(args.positional.clone(), args.options.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Tuple(results))
    }))
}

/// Lazily applies `func` across `sources` in lockstep, stopping with the
/// shortest source.
pub fn map(func: &Value, sources: &[Value]) -> R {
    let func = expect_callable(func, "map")?;
    if sources.is_empty() {
        return Err(RuntimeError::ArgumentCount {
            ctx: "map".to_string(),
            expected: "at least 2".to_string(),
            got: 1,
        });
    }
    let mut iters = sources
        .iter()
        .map(|source| iterate(source, "map"))
        .collect::<Result<Vec<_>, _>>()?;
    let mapped = std::iter::from_fn(move || {
        let mut row = Vec::with_capacity(iters.len());
        for iter in iters.iter_mut() {
            match iter.next()? {
                Ok(item) => row.push(item),
                Err(err) => return Some(Err(err)),
            }
        }
        Some(func.call(row))
    });
    Ok(Value::Seq(SeqValue::new(mapped)))
}

/// Lazily keeps the elements of `xs` for which `pred` is truthy. A `Unit`
/// predicate tests the elements themselves.
pub fn filter(pred: &Value, xs: &Value) -> R {
    let pred = optional_callable(pred, "filter")?;
    let mut items = iterate(xs, "filter")?;
    let kept = std::iter::from_fn(move || loop {
        let item = match items.next()? {
            Ok(item) => item,
            Err(err) => return Some(Err(err)),
        };
        let keep = match &pred {
            Some(pred) => match pred.call(vec![item.clone()]) {
                Ok(verdict) => verdict.is_truthy(),
                Err(err) => return Some(Err(err)),
            },
            None => item.is_truthy(),
        };
        if keep {
            return Some(Ok(item));
        }
    });
    Ok(Value::Seq(SeqValue::new(kept)))
}

/// Sorting options shared by `sort_by` and `zipsort`.
#[derive(Debug, Clone, Default)]
pub struct SortOptions {
    pub key: Option<Value>,
    pub reverse: bool,
}

impl SortOptions {
    pub fn from_options(
        options: &Options,
        ctx: &str,
        allow_key: bool,
    ) -> Result<Self, RuntimeError> {
        let allowed: &[&str] = if allow_key { &["key", "reverse"] } else { &["reverse"] };
        options.reject_unknown(ctx, allowed)?;
        let key = match options.get("key") {
            Some(key) => optional_callable(key, ctx)?,
            None => None,
        };
        let reverse = options.get("reverse").is_some_and(Value::is_truthy);
        Ok(Self { key, reverse })
    }

    /// Stable sort computing each key once. `reverse` flips the comparison,
    /// so equal elements keep their original order either way.
    pub fn sort(&self, items: Vec<Value>) -> Result<Vec<Value>, RuntimeError> {
        let mut keyed = Vec::with_capacity(items.len());
        let mut kind = None;
        for item in items {
            let key = match &self.key {
                Some(key) => key.call(vec![item.clone()])?,
                None => item.clone(),
            };
            let item_kind = order_kind(&key);
            match kind {
                None => kind = Some(item_kind),
                Some(expected) if expected != item_kind => {
                    return Err(RuntimeError::TypeMismatch {
                        ctx: "sort".to_string(),
                        expected: expected.to_string(),
                        got: item_kind.to_string(),
                    });
                }
                Some(_) => {}
            }
            keyed.push((OrderKey::try_from_value(&key, "sort")?, item));
        }
        if self.reverse {
            keyed.sort_by(|(a, _), (b, _)| b.cmp(a));
        } else {
            keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
        }
        Ok(keyed.into_iter().map(|(_, item)| item).collect())
    }
}

pub fn sort_by(key: &Value, xs: &Value, options: &Options) -> R {
    let mut sort = SortOptions::from_options(options, "sort_by", false)?;
    sort.key = optional_callable(key, "sort_by")?;
    let items = collect_items(xs, "sort_by")?;
    Ok(Value::list(sort.sort(items)?))
}

/// Sorts several sequences together by their positional tuples and returns
/// one list per input. Inputs are read in lockstep and truncated to the
/// shortest.
pub fn zipsort(sources: &[Value], options: &Options) -> R {
    let sort = SortOptions::from_options(options, "zipsort", true)?;
    if sources.is_empty() {
        return Ok(Value::Tuple(Vec::new()));
    }
    let mut iters = sources
        .iter()
        .map(|source| iterate(source, "zipsort"))
        .collect::<Result<Vec<_>, _>>()?;
    let mut rows = Vec::new();
    'rows: loop {
        let mut row = Vec::with_capacity(iters.len());
        for iter in iters.iter_mut() {
            match iter.next() {
                Some(item) => row.push(item?),
                None => break 'rows,
            }
        }
        rows.push(Value::Tuple(row));
    }
    let mut unzipped = (0..iters.len())
        .map(|_| Vec::with_capacity(rows.len()))
        .collect::<Vec<_>>();
    for row in sort.sort(rows)? {
        if let Value::Tuple(cells) = row {
            for (column, cell) in unzipped.iter_mut().zip(cells) {
                column.push(cell);
            }
        }
    }
    Ok(Value::Tuple(unzipped.into_iter().map(Value::list).collect()))
}

pub(super) fn build_combinator_builtins() -> Vec<(&'static str, Value)> {
    let at_value = curried_builtin("at", Signature::positional(&["n", "xs"]), |args| {
        let ([index, xs], options) = exactly::<2>(args, "at")?;
        at(&index, &xs, &options)
    });

    let juxt_value = native("juxt", |args| {
        no_options(&args.options, "juxt")?;
        juxt(args.positional)
    });

    // Variadic natives declare no signature, so their arity is given here.
    let map_value = curried("map", 2, |args| {
        let (positional, options) = between(args, "map", 2, None)?;
        no_options(&options, "map")?;
        map(&positional[0], &positional[1..])
    });

    let filter_value = curried("filter", 2, |args| {
        let ([pred, xs], options) = exactly::<2>(args, "filter")?;
        no_options(&options, "filter")?;
        filter(&pred, &xs)
    });

    let sort_by_value = curried_builtin(
        "sort_by",
        Signature::positional(&["key", "xs"]),
        |args| {
            let ([key, xs], options) = exactly::<2>(args, "sort_by")?;
            sort_by(&key, &xs, &options)
        },
    );

    let zipsort_value = curried_builtin(
        "zipsort",
        Signature::new(vec![Param::required("xs")]).with_rest("more"),
        |args| {
            let (positional, options) = between(args, "zipsort", 1, None)?;
            zipsort(&positional, &options)
        },
    );

    vec![
        ("at", at_value),
        ("juxt", juxt_value),
        ("map", map_value),
        ("filter", filter_value),
        ("sort_by", sort_by_value),
        ("zipsort", zipsort_value),
    ]
}
