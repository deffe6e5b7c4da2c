use acro::{curry, get_builtin, juxt, native, to_list, Options, RuntimeError, Value};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn toolkit(name: &str) -> Value {
    get_builtin(name).unwrap_or_else(|| panic!("missing builtin {name}"))
}

fn ints(values: &[i64]) -> Value {
    Value::list(values.iter().copied().map(Value::Int).collect())
}

fn texts(values: &[&str]) -> Value {
    Value::list(values.iter().map(|text| Value::text(*text)).collect())
}

fn sub() -> Value {
    native("sub", |args| match args.positional.as_slice() {
        [Value::Int(a), Value::Int(b)] => Ok(Value::Int(a - b)),
        _ => Err(RuntimeError::Message("sub expects two Ints".to_string())),
    })
}

fn len() -> Value {
    native("len", |args| match args.positional.first() {
        Some(Value::Text(text)) => Ok(Value::Int(text.len() as i64)),
        _ => Err(RuntimeError::Message("len expects Text".to_string())),
    })
}

#[test]
fn partial_application_is_associative() {
    init_tracing();
    let f = sub();
    let curried = curry(f.clone(), Some(2)).unwrap();

    let direct = f.call(vec![Value::Int(10), Value::Int(4)]).unwrap();
    let together = curried.call(vec![Value::Int(10), Value::Int(4)]).unwrap();
    let apart = curried
        .call(vec![Value::Int(10)])
        .and_then(|g| g.call(vec![Value::Int(4)]))
        .unwrap();

    assert_eq!(direct, Value::Int(6));
    assert_eq!(together, direct);
    assert_eq!(apart, direct);
}

#[test]
fn currying_at_zero_is_identity() {
    let f = sub();
    assert_eq!(curry(f.clone(), Some(0)).unwrap(), f);
}

#[test]
fn juxt_pairs_results_in_call_order() {
    let negate = native("negate", |args| match args.positional.first() {
        Some(Value::Int(value)) => Ok(Value::Int(-value)),
        _ => Err(RuntimeError::Message("negate expects an Int".to_string())),
    });
    let both = juxt(vec![negate, len()]);
    let err = both.unwrap().call(vec![Value::Int(5)]).unwrap_err();
    assert_eq!(err, RuntimeError::Message("len expects Text".to_string()));

    let juxt_value = toolkit("juxt");
    let both = juxt_value.call(vec![len(), toolkit("first")]).unwrap();
    assert_eq!(
        both.call(vec![Value::text("Huey")]).unwrap(),
        Value::Tuple(vec![Value::Int(4), Value::text("H")])
    );
}

#[test]
fn at_reads_with_and_without_default() {
    init_tracing();
    let at = toolkit("at");
    let xs = ints(&[10, 20, 30]);

    assert_eq!(at.call(vec![Value::Int(1), xs.clone()]).unwrap(), Value::Int(20));
    assert_eq!(
        at.call_with(
            vec![Value::Int(5), xs.clone()],
            Options::new().with("default", "missing")
        )
        .unwrap(),
        Value::text("missing")
    );
    assert_eq!(
        at.call(vec![Value::Int(5), xs]).unwrap_err(),
        RuntimeError::IndexOutOfRange { index: 5, len: 3 }
    );
}

#[test]
fn sort_by_length() {
    let sorted = toolkit("sort_by")
        .call(vec![len(), texts(&["ccc", "a", "bb"])])
        .unwrap();
    assert_eq!(sorted, texts(&["a", "bb", "ccc"]));
}

#[test]
fn zipsort_unzips_sorted_columns() {
    let result = toolkit("zipsort")
        .call(vec![ints(&[3, 1, 2]), texts(&["c", "a", "b"])])
        .unwrap();
    assert_eq!(
        result,
        Value::Tuple(vec![ints(&[1, 2, 3]), texts(&["a", "b", "c"])])
    );
}

#[test]
fn curried_map_yields_once() {
    let double = native("double", |args| match args.positional.first() {
        Some(Value::Int(value)) => Ok(Value::Int(value * 2)),
        _ => Err(RuntimeError::Message("double expects an Int".to_string())),
    });
    let doubler = toolkit("map").call(vec![double]).unwrap();
    let seq = doubler.call(vec![ints(&[1, 2, 3])]).unwrap();

    assert_eq!(to_list(&seq).unwrap(), ints(&[2, 4, 6]));
    assert_eq!(to_list(&seq).unwrap(), ints(&[]));
}

#[test]
fn pipeline_over_json_records() {
    init_tracing();
    let places = Value::from_json(&serde_json::json!([
        ["Helsinki", 60.17],
        ["Turku", 60.45],
        ["Oulu", 65.01],
        ["Tampere", 61.5]
    ]));
    let latitude = toolkit("at").call(vec![Value::Int(1)]).unwrap();
    let name = toolkit("at").call(vec![Value::Int(0)]).unwrap();

    let northmost = toolkit("sort_by")
        .call_with(vec![latitude.clone()], Options::new().with("reverse", true))
        .and_then(|by_latitude| by_latitude.call(vec![places.clone()]))
        .and_then(|sorted| toolkit("map").call(vec![name, sorted]))
        .and_then(|names| to_list(&names))
        .unwrap();
    assert_eq!(
        northmost.to_json().unwrap(),
        serde_json::json!(["Oulu", "Tampere", "Turku", "Helsinki"])
    );

    let latitudes = toolkit("map").call(vec![latitude, places]).unwrap();
    let mean = toolkit("mean").call(vec![latitudes]).unwrap();
    match mean {
        Value::Float(value) => assert!((value - 61.7825).abs() < 1e-9),
        other => panic!("expected Float, got {other:?}"),
    }
}
