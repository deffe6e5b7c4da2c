//! Currying and partial application over callable [`Value`]s.
//!
//! A curried value collects positional arguments and options across calls and
//! invokes its target once at least `arity` positional arguments are present.
//! Every call returns a fresh accumulation; nothing is shared between chains.

use std::sync::Arc;

use im::Vector as ImVector;
use tracing::trace;

use crate::values::{
    format_value, Args, BuiltinImpl, CurriedValue, Options, RuntimeError, Value, R,
};

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub optional: bool,
}

impl Param {
    pub fn required(name: &str) -> Self {
        Self {
            name: name.to_string(),
            optional: false,
        }
    }

    pub fn optional(name: &str) -> Self {
        Self {
            name: name.to_string(),
            optional: true,
        }
    }
}

/// Declared positional parameters of a builtin, optionally followed by a
/// variadic rest parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<Param>,
    pub rest: Option<String>,
}

impl Signature {
    pub fn new(params: Vec<Param>) -> Self {
        Self { params, rest: None }
    }

    pub fn positional(names: &[&str]) -> Self {
        Self::new(names.iter().map(|name| Param::required(name)).collect())
    }

    pub fn with_rest(mut self, name: &str) -> Self {
        self.rest = Some(name.to_string());
        self
    }

    /// Positional parameters without a default.
    pub fn required_arity(&self) -> usize {
        self.params.iter().filter(|param| !param.optional).count()
    }
}

/// Builtin with a declared signature; `curry(value, None)` derives its arity.
pub fn builtin(
    name: &str,
    signature: Signature,
    func: impl Fn(Args) -> R + Send + Sync + 'static,
) -> Value {
    Value::Builtin(Arc::new(BuiltinImpl {
        name: name.to_string(),
        signature: Some(signature),
        func: Arc::new(func),
    }))
}

/// Builtin without a declared signature. Currying it needs an explicit arity.
pub fn native(name: &str, func: impl Fn(Args) -> R + Send + Sync + 'static) -> Value {
    Value::Builtin(Arc::new(BuiltinImpl {
        name: name.to_string(),
        signature: None,
        func: Arc::new(func),
    }))
}

/// Wraps `func` and curries it at the given arity.
pub fn curried(
    name: &str,
    arity: usize,
    func: impl Fn(Args) -> R + Send + Sync + 'static,
) -> Value {
    wrap(native(name, func), arity)
}

/// Declared builtin curried at the arity its signature derives.
pub fn curried_builtin(
    name: &str,
    signature: Signature,
    func: impl Fn(Args) -> R + Send + Sync + 'static,
) -> Value {
    let arity = signature.required_arity();
    wrap(builtin(name, signature, func), arity)
}

/// Curries `f` up to `n` positional arguments. When `n` is omitted it is
/// derived from the declared signature, or for a curried value from the
/// arguments it still lacks. A resolved arity of zero returns `f` unchanged.
pub fn curry(f: Value, n: Option<usize>) -> R {
    if !f.is_callable() {
        return Err(RuntimeError::NotCallable(format_value(&f)));
    }
    let arity = match (n, &f) {
        (Some(n), _) => n,
        (None, Value::Curried(partial)) => partial.remaining(),
        (None, _) => f
            .signature()
            .map(Signature::required_arity)
            .ok_or_else(|| RuntimeError::UnknownArity(format_value(&f)))?,
    };
    Ok(wrap(f, arity))
}

fn wrap(target: Value, arity: usize) -> Value {
    if arity == 0 {
        trace!(callable = %format_value(&target), "nothing to curry");
        return target;
    }
    trace!(callable = %format_value(&target), arity, "curry");
    Value::Curried(CurriedValue {
        target: Arc::new(target),
        arity,
        args: ImVector::new(),
        options: Options::new(),
    })
}

pub(crate) fn apply_curried(curried: &CurriedValue, args: Args) -> R {
    let mut accumulated = curried.args.clone();
    accumulated.extend(args.positional);
    let options = curried.options.merge(&args.options);
    if accumulated.len() >= curried.arity {
        trace!(
            callable = %format_value(&curried.target),
            supplied = accumulated.len(),
            "curried call complete"
        );
        return curried
            .target
            .call_with(accumulated.into_iter().collect(), options);
    }
    trace!(
        callable = %format_value(&curried.target),
        supplied = accumulated.len(),
        arity = curried.arity,
        "partial application"
    );
    Ok(Value::Curried(CurriedValue {
        target: curried.target.clone(),
        arity: curried.arity,
        args: accumulated,
        options,
    }))
}
