//! Functional helpers for interactive data transformation.
//!
//! Script values are dynamically typed [`Value`]s. Any callable value can be
//! curried with [`curry`], and the toolkit functions (`at`, `juxt`, `map`,
//! `filter`, `sort_by`, `zipsort`, ...) are available both as Rust functions
//! and as curried callable values through [`get_builtin`].

mod builtins;
mod curry;
mod values;

pub use builtins::{
    at, collect_items, drain, filter, first, get_builtin, group_by, iterate, juxt, last, map,
    mean, merge, reductions, sort_by, to_list, to_tuple, zipsort, SortOptions,
};
pub use curry::{builtin, curried, curried_builtin, curry, native, Param, Signature};
pub use values::{
    apply, format_value, values_equal, Args, BuiltinFunc, BuiltinImpl, CurriedValue, KeyValue,
    OrderKey, Options, RuntimeError, SeqIter, SeqValue, Value, R,
};
