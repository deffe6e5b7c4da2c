use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::*;

fn int(value: &Value) -> i64 {
    match value {
        Value::Int(value) => *value,
        other => panic!("expected Int, got {}", format_value(other)),
    }
}

/// `a * 100 + b * 10 + c`, so argument order is visible in the result.
fn digits() -> Value {
    native("digits", |args| {
        let [a, b, c] = args.positional.as_slice() else {
            return Err(RuntimeError::ArgumentCount {
                ctx: "digits".to_string(),
                expected: "3".to_string(),
                got: args.positional.len(),
            });
        };
        Ok(Value::Int(int(a) * 100 + int(b) * 10 + int(c)))
    })
}

/// Returns its options as a tuple of `(key, value)` pairs.
fn echo_options() -> Value {
    native("echo_options", |args| {
        Ok(Value::Tuple(
            args.options
                .iter()
                .map(|(key, value)| Value::Tuple(vec![Value::text(key), value.clone()]))
                .collect(),
        ))
    })
}

fn pair(key: &str, value: i64) -> Value {
    Value::Tuple(vec![Value::text(key), Value::Int(value)])
}

#[test]
fn every_split_of_arguments_gives_the_same_result() {
    let f = digits();
    let expected = f.call(vec![Value::Int(1), Value::Int(2), Value::Int(3)]).unwrap();
    let curried = curry(f, Some(3)).unwrap();

    let all_at_once = curried.call(vec![Value::Int(1), Value::Int(2), Value::Int(3)]).unwrap();
    let one_by_one = curried
        .call(vec![Value::Int(1)])
        .and_then(|g| g.call(vec![Value::Int(2)]))
        .and_then(|g| g.call(vec![Value::Int(3)]))
        .unwrap();
    let two_then_one = curried
        .call(vec![Value::Int(1), Value::Int(2)])
        .and_then(|g| g.call(vec![Value::Int(3)]))
        .unwrap();
    let one_then_two = curried
        .call(vec![Value::Int(1)])
        .and_then(|g| g.call(vec![Value::Int(2), Value::Int(3)]))
        .unwrap();

    assert_eq!(expected, Value::Int(123));
    for result in [all_at_once, one_by_one, two_then_one, one_then_two] {
        assert_eq!(result, expected);
    }
}

#[test]
fn empty_calls_do_not_advance_the_chain() {
    let curried = curry(digits(), Some(3)).unwrap();
    let result = curried
        .call(vec![])
        .and_then(|g| g.call(vec![Value::Int(7)]))
        .and_then(|g| g.call(vec![]))
        .and_then(|g| g.call(vec![Value::Int(8), Value::Int(9)]))
        .unwrap();
    assert_eq!(result, Value::Int(789));
}

#[test]
fn zero_arity_returns_the_callable_itself() {
    let f = digits();
    let same = curry(f.clone(), Some(0)).unwrap();
    assert!(matches!(same, Value::Builtin(_)));
    assert_eq!(same, f);
}

#[test]
fn arity_is_derived_from_required_parameters() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();
    let f = builtin(
        "scaled",
        Signature::new(vec![
            Param::required("x"),
            Param::required("y"),
            Param::optional("scale"),
        ]),
        move |args| {
            seen.fetch_add(1, Ordering::SeqCst);
            let scale = args.positional.get(2).map(int).unwrap_or(1);
            Ok(Value::Int((int(&args.positional[0]) + int(&args.positional[1])) * scale))
        },
    );
    let curried = curry(f, None).unwrap();

    let partial = curried.call(vec![Value::Int(2)]).unwrap();
    assert!(matches!(partial, Value::Curried(_)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert_eq!(partial.call(vec![Value::Int(3)]).unwrap(), Value::Int(5));
    assert_eq!(
        curried.call(vec![Value::Int(2), Value::Int(3), Value::Int(10)]).unwrap(),
        Value::Int(50)
    );
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn signature_with_only_defaults_is_not_wrapped() {
    let f = builtin(
        "defaults",
        Signature::new(vec![Param::optional("a")]),
        |_| Ok(Value::Unit),
    );
    assert!(matches!(curry(f, None).unwrap(), Value::Builtin(_)));
}

#[test]
fn undeclared_signature_needs_explicit_arity() {
    let err = curry(digits(), None).unwrap_err();
    assert!(matches!(err, RuntimeError::UnknownArity(_)));
    assert!(curry(digits(), Some(3)).is_ok());
}

#[test]
fn only_callables_can_be_curried() {
    let err = curry(Value::Int(4), Some(1)).unwrap_err();
    assert!(matches!(err, RuntimeError::NotCallable(_)));
}

#[test]
fn options_merge_with_later_values_winning() {
    let curried = curry(echo_options(), Some(2)).unwrap();
    let first = Options::new().with("a", 1i64).with("b", 2i64);
    let second = Options::new().with("b", 3i64).with("c", 4i64);

    let result = curried
        .call_with(vec![Value::Unit], first)
        .and_then(|g| g.call_with(vec![Value::Unit], second))
        .unwrap();

    assert_eq!(
        result,
        Value::Tuple(vec![pair("a", 1), pair("b", 3), pair("c", 4)])
    );
}

#[test]
fn partial_applications_are_independent() {
    let curried = curry(digits(), Some(3)).unwrap();
    let base = curried.call(vec![Value::Int(1)]).unwrap();

    let left = base.call(vec![Value::Int(2)]).unwrap();
    let right = base.call(vec![Value::Int(5)]).unwrap();

    assert_eq!(left.call(vec![Value::Int(3)]).unwrap(), Value::Int(123));
    assert_eq!(right.call(vec![Value::Int(6)]).unwrap(), Value::Int(156));
    assert_eq!(
        base.call(vec![Value::Int(9), Value::Int(9)]).unwrap(),
        Value::Int(199)
    );
}

#[test]
fn surplus_arguments_reach_the_target() {
    let curried = curry(digits(), Some(1)).unwrap();
    assert_eq!(
        curried.call(vec![Value::Int(4), Value::Int(5), Value::Int(6)]).unwrap(),
        Value::Int(456)
    );
    let err = curried.call(vec![Value::Int(4), Value::Int(5)]).unwrap_err();
    assert!(matches!(err, RuntimeError::ArgumentCount { got: 2, .. }));
}

#[test]
fn wrapper_reports_the_wrapped_name_and_signature() {
    let signature = Signature::positional(&["key", "xs"]);
    let f = builtin("pick", signature.clone(), |_| Ok(Value::Unit));
    let curried = curry(f, None).unwrap();
    let partial = curried.call(vec![Value::Unit]).unwrap();

    assert_eq!(curried.callable_name(), Some("pick"));
    assert_eq!(partial.callable_name(), Some("pick"));
    assert_eq!(partial.signature(), Some(&signature));
    assert_eq!(format_value(&partial), "<curried pick/2>");
}

#[test]
fn target_errors_propagate_unchanged() {
    let failing = curried("failing", 2, |_| Err(RuntimeError::KeyNotFound("k".to_string())));
    let err = failing
        .call(vec![Value::Unit])
        .and_then(|g| g.call(vec![Value::Unit]))
        .unwrap_err();
    assert_eq!(err, RuntimeError::KeyNotFound("k".to_string()));
}

#[test]
fn curried_builtin_uses_its_signature() {
    let f = curried_builtin(
        "tag",
        Signature::new(vec![Param::required("k")]).with_rest("rest"),
        |args| Ok(Value::Int(args.positional.len() as i64)),
    );
    assert_eq!(f.call(vec![Value::Int(1)]).unwrap(), Value::Int(1));
    assert_eq!(f.call(vec![Value::Int(1), Value::Int(2)]).unwrap(), Value::Int(2));
}

#[test]
fn partial_application_derives_its_remaining_arity() {
    let partial = curry(digits(), Some(3))
        .and_then(|f| f.call(vec![Value::Int(1)]))
        .unwrap();
    let recurried = curry(partial.clone(), None).unwrap();
    let step = recurried.call(vec![Value::Int(2)]).unwrap();
    assert_eq!(step.call(vec![Value::Int(3)]).unwrap(), Value::Int(123));

    let nearly_done = partial.call(vec![Value::Int(2)]).unwrap();
    let same = curry(nearly_done, None).unwrap();
    assert_eq!(same.call(vec![Value::Int(4)]).unwrap(), Value::Int(124));
}

#[test]
fn recurried_partial_builtin_waits_only_for_the_rest() {
    let at_value = crate::builtins::get_builtin("at").unwrap();
    let second = at_value.call(vec![Value::Int(1)]).unwrap();
    let rest = curry(second, None).unwrap();
    assert_eq!(
        rest.call(vec![Value::list(vec![Value::Int(10), Value::Int(20)])]),
        Ok(Value::Int(20))
    );
}
