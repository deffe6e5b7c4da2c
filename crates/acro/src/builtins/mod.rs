mod collections;
mod combinators;
mod seq;
mod util;

use std::collections::HashMap;
use std::sync::OnceLock;

use tracing::debug;

use crate::curry::{builtin, curry, Param, Signature};
use crate::values::{RuntimeError, Value};

pub use collections::{group_by, merge};
pub use combinators::{at, filter, juxt, map, sort_by, zipsort, SortOptions};
pub use seq::{collect_items, drain, first, iterate, last, mean, reductions, to_list, to_tuple};

use util::{between, expect_int, no_options};

/// Looks up a toolkit function by name.
pub fn get_builtin(name: &str) -> Option<Value> {
    builtin_table().get(name).cloned()
}

fn builtin_table() -> &'static HashMap<&'static str, Value> {
    static TABLE: OnceLock<HashMap<&'static str, Value>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = HashMap::new();
        table.insert("curry", build_curry_builtin());
        table.extend(combinators::build_combinator_builtins());
        table.extend(seq::build_seq_builtins());
        table.extend(collections::build_collection_builtins());
        debug!(count = table.len(), "registered builtins");
        table
    })
}

fn build_curry_builtin() -> Value {
    builtin(
        "curry",
        Signature::new(vec![Param::required("f"), Param::optional("n")]),
        |args| {
            let (positional, options) = between(args, "curry", 1, Some(2))?;
            no_options(&options, "curry")?;
            let n = match positional.get(1) {
                None | Some(Value::Unit) => None,
                Some(n) => {
                    let raw = expect_int(n, "curry")?;
                    Some(usize::try_from(raw).map_err(|_| RuntimeError::TypeMismatch {
                        ctx: "curry".to_string(),
                        expected: "a non-negative arity".to_string(),
                        got: raw.to_string(),
                    })?)
                }
            };
            curry(positional[0].clone(), n)
        },
    )
}
