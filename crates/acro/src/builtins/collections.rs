use std::collections::HashMap;

use im::HashMap as ImHashMap;

use super::seq::iterate;
use super::util::{between, expect_callable, expect_key, expect_map, no_options, optional_callable};
use crate::curry::{builtin, native, Param, Signature};
use crate::values::{KeyValue, Value, R};

/// Groups `xs` by `key(x)` into a map of lists, passing each group through
/// `op` when one is given. Groups hold elements in encounter order.
pub fn group_by(key: &Value, xs: &Value, op: Option<&Value>) -> R {
    let key = expect_callable(key, "group_by")?;
    let op = match op {
        Some(op) => optional_callable(op, "group_by")?,
        None => None,
    };
    let mut order: Vec<(KeyValue, Vec<Value>)> = Vec::new();
    let mut slots: HashMap<KeyValue, usize> = HashMap::new();
    for item in iterate(xs, "group_by")? {
        let item = item?;
        let group = expect_key(&key.call(vec![item.clone()])?)?;
        match slots.get(&group) {
            Some(&slot) => order[slot].1.push(item),
            None => {
                slots.insert(group.clone(), order.len());
                order.push((group, vec![item]));
            }
        }
    }
    let mut out = ImHashMap::new();
    for (group, items) in order {
        let items = Value::list(items);
        let value = match &op {
            Some(op) => op.call(vec![items])?,
            None => items,
        };
        out.insert(group, value);
    }
    Ok(Value::Map(out.into()))
}

/// Merges maps left to right; later maps win on shared keys.
pub fn merge(maps: &[Value]) -> R {
    let mut out = ImHashMap::new();
    for map in maps {
        for (key, value) in expect_map(map, "merge")?.iter() {
            out.insert(key.clone(), value.clone());
        }
    }
    Ok(Value::Map(out.into()))
}

pub(super) fn build_collection_builtins() -> Vec<(&'static str, Value)> {
    let group_by_value = builtin(
        "group_by",
        Signature::new(vec![
            Param::required("key"),
            Param::required("xs"),
            Param::optional("op"),
        ]),
        |args| {
            let (positional, options) = between(args, "group_by", 2, Some(3))?;
            let op = positional.get(2).or_else(|| options.get("op"));
            options.reject_unknown("group_by", &["op"])?;
            group_by(&positional[0], &positional[1], op)
        },
    );

    let merge_value = native("merge", |args| {
        no_options(&args.options, "merge")?;
        merge(&args.positional)
    });

    vec![("group_by", group_by_value), ("merge", merge_value)]
}
