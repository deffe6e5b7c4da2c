use std::sync::{Arc, Mutex, TryLockError};

use im::{HashMap as ImHashMap, Vector as ImVector};
use thiserror::Error;

use crate::curry::{self, Signature};

mod equality;
mod json;
mod keys;
mod options;

pub(crate) use self::equality::order_kind;
pub use self::equality::{format_value, values_equal, OrderKey};
pub use self::keys::KeyValue;
pub use self::options::Options;

pub type R = Result<Value, RuntimeError>;

pub type BuiltinFunc = dyn Fn(Args) -> R + Send + Sync;

/// Single-pass source of values backing a lazy sequence.
pub type SeqIter = Box<dyn Iterator<Item = R> + Send>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("cannot derive the arity of {0}: it declares no signature")]
    UnknownArity(String),
    #[error("expected function, got {0}")]
    NotCallable(String),
    #[error("{ctx} expects {expected} arguments, got {got}")]
    ArgumentCount {
        ctx: String,
        expected: String,
        got: usize,
    },
    #[error("{ctx} expects {expected}, got {got}")]
    TypeMismatch {
        ctx: String,
        expected: String,
        got: String,
    },
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },
    #[error("key not found: {0}")]
    KeyNotFound(String),
    #[error("unhashable value: {0}")]
    Unhashable(String),
    #[error("{ctx} got an unexpected option `{key}`")]
    InvalidOption { ctx: String, key: String },
    #[error("{0}")]
    Message(String),
}

impl RuntimeError {
    pub fn type_mismatch(ctx: &str, expected: &str, got: &Value) -> Self {
        RuntimeError::TypeMismatch {
            ctx: ctx.to_string(),
            expected: expected.to_string(),
            got: got.type_name().to_string(),
        }
    }
}

/// Positional arguments plus keyword options for one call.
#[derive(Clone, Default)]
pub struct Args {
    pub positional: Vec<Value>,
    pub options: Options,
}

impl Args {
    pub fn new(positional: Vec<Value>) -> Self {
        Self {
            positional,
            options: Options::new(),
        }
    }

    pub fn with_options(positional: Vec<Value>, options: Options) -> Self {
        Self {
            positional,
            options,
        }
    }
}

#[derive(Clone)]
pub enum Value {
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Arc<Vec<Value>>),
    Tuple(Vec<Value>),
    Map(Arc<ImHashMap<KeyValue, Value>>),
    Builtin(Arc<BuiltinImpl>),
    Curried(CurriedValue),
    Seq(Arc<SeqValue>),
}

pub struct BuiltinImpl {
    pub name: String,
    pub signature: Option<Signature>,
    pub func: Arc<BuiltinFunc>,
}

/// A callable waiting for `arity` positional arguments. `args` and `options`
/// hold what earlier partial calls supplied.
#[derive(Clone)]
pub struct CurriedValue {
    pub target: Arc<Value>,
    pub arity: usize,
    pub args: ImVector<Value>,
    pub options: Options,
}

impl CurriedValue {
    /// Positional arguments still missing before the target runs.
    pub fn remaining(&self) -> usize {
        self.arity.saturating_sub(self.args.len())
    }
}

/// Lazy, single-pass sequence. Clones share one cursor, so a drained
/// sequence stays drained.
pub struct SeqValue {
    cursor: Mutex<SeqIter>,
}

impl SeqValue {
    pub fn new(iter: impl Iterator<Item = R> + Send + 'static) -> Arc<Self> {
        Arc::new(Self {
            cursor: Mutex::new(Box::new(iter)),
        })
    }

    /// Next element. Pulling from inside the sequence's own step fails
    /// instead of waiting on the cursor.
    pub fn pull(&self) -> Option<R> {
        match self.cursor.try_lock() {
            Ok(mut cursor) => cursor.next(),
            Err(TryLockError::WouldBlock) => Some(Err(RuntimeError::Message(
                "sequence already executing".to_string(),
            ))),
            Err(TryLockError::Poisoned(_)) => Some(Err(RuntimeError::Message(
                "sequence cursor poisoned".to_string(),
            ))),
        }
    }
}

impl Value {
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Arc::new(items))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Value::Text(text.into())
    }

    pub fn map(entries: impl IntoIterator<Item = (KeyValue, Value)>) -> Self {
        Value::Map(Arc::new(entries.into_iter().collect()))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Unit => "Unit",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Text(_) => "Text",
            Value::List(_) => "List",
            Value::Tuple(_) => "Tuple",
            Value::Map(_) => "Map",
            Value::Builtin(_) | Value::Curried(_) => "Function",
            Value::Seq(_) => "Seq",
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Builtin(_) | Value::Curried(_))
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Unit => false,
            Value::Bool(value) => *value,
            Value::Int(value) => *value != 0,
            Value::Float(value) => *value != 0.0,
            Value::Text(text) => !text.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Tuple(items) => !items.is_empty(),
            Value::Map(map) => !map.is_empty(),
            Value::Builtin(_) | Value::Curried(_) | Value::Seq(_) => true,
        }
    }

    /// Name of a callable; a curried wrapper reports the name of what it wraps.
    pub fn callable_name(&self) -> Option<&str> {
        match self {
            Value::Builtin(imp) => Some(&imp.name),
            Value::Curried(curried) => curried.target.callable_name(),
            _ => None,
        }
    }

    /// Declared signature of a callable, looking through curried wrappers.
    pub fn signature(&self) -> Option<&Signature> {
        match self {
            Value::Builtin(imp) => imp.signature.as_ref(),
            Value::Curried(curried) => curried.target.signature(),
            _ => None,
        }
    }

    pub fn call(&self, positional: Vec<Value>) -> R {
        apply(self, Args::new(positional))
    }

    pub fn call_with(&self, positional: Vec<Value>, options: Options) -> R {
        apply(self, Args::with_options(positional, options))
    }
}

pub fn apply(func: &Value, args: Args) -> R {
    match func {
        Value::Builtin(imp) => (imp.func)(args),
        Value::Curried(curried) => curry::apply_curried(curried, args),
        other => Err(RuntimeError::NotCallable(format_value(other))),
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        values_equal(self, other)
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_value(self))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::list(items.into_iter().map(Into::into).collect())
    }
}
