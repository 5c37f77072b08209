use super::*;
use crate::activation::throw;

#[test]
fn test_format_number_matches_host_spelling() {
    assert_eq!(format_number(1.0), "1");
    assert_eq!(format_number(-2.5), "-2.5");
    assert_eq!(format_number(0.0), "0");
    assert_eq!(format_number(-0.0), "0");
    assert_eq!(format_number(f64::NAN), "NaN");
    assert_eq!(format_number(f64::INFINITY), "Infinity");
    assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    assert_eq!(format_number(1e21), "1e+21");
    assert_eq!(format_number(-1.5e300), "-1.5e+300");
    assert_eq!(format_number(1e-7), "1e-7");
    assert_eq!(format_number(2.5e-9), "2.5e-9");
    assert_eq!(format_number(1e20), "100000000000000000000");
    assert_eq!(format_number(0.000001), "0.000001");
}

#[test]
fn test_strict_equality_is_identity_for_composites() {
    let a = Instance::plain();
    let b = Instance::plain();
    assert_eq!(Value::from(a.clone()), Value::from(a.clone()));
    assert_ne!(Value::from(a), Value::from(b));

    assert_eq!(Value::from("x"), Value::string("x"));
    assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    assert_ne!(Value::Undefined, Value::Null);
}

#[test]
fn test_truthiness() {
    assert!(!Value::Undefined.is_truthy());
    assert!(!Value::Null.is_truthy());
    assert!(!Value::from(0).is_truthy());
    assert!(!Value::Number(f64::NAN).is_truthy());
    assert!(!Value::from("").is_truthy());
    assert!(Value::from("0").is_truthy());
    assert!(Value::from(Instance::plain()).is_truthy());
}

#[test]
fn test_composite_classification() {
    assert!(Value::from(Instance::plain()).is_composite());
    assert!(Value::from(Function::native("f", |_| Ok(Value::Undefined))).is_composite());
    assert!(!Value::from("text").is_composite());
    assert!(!Value::Null.is_composite());
}

#[test]
fn test_native_function_receives_this_and_args() {
    let f = Function::native("pick", |cx| {
        assert_eq!(cx.this(), &Value::from("receiver"));
        assert!(cx.arg(5).is_undefined());
        Ok(cx.arg(1))
    });
    let result = f
        .call(Value::from("receiver"), &[Value::from(1), Value::from(2)])
        .unwrap();
    assert_eq!(result, Value::from(2));
    assert_eq!(f.name(), "pick");
    assert_eq!(f.kind(), FunctionKind::Normal);
}

#[test]
fn test_unbounded_recursion_hits_call_depth_limit() {
    let f = Function::native("loop", |cx| {
        let me = Value::Function(cx.callee().clone());
        cx.call(&me, &[])
    });
    let err = f.call(Value::Undefined, &[]).unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::CallDepthExceeded { limit } if limit == DesugarOptions::default().max_call_depth
    ));
}

#[test]
fn test_yield_outside_generator_is_type_error() {
    let f = Function::native("notGen", |cx| {
        cx.yield_value(1)?;
        Ok(Value::Undefined)
    });
    let err = f.call(Value::Undefined, &[]).unwrap_err();
    assert!(matches!(err, RuntimeError::Type(_)));
}

#[test]
fn test_generator_function_buffers_yields() {
    let scope = Scope::root();
    let gen_fn = Function::member(
        "count",
        FunctionKind::Generator,
        &[],
        body(|cx| {
            for i in 1..=3 {
                cx.yield_value(i)?;
            }
            Ok(Value::from("done"))
        }),
        &scope,
        DesugarOptions::default(),
    );
    assert!(gen_fn.is_generator());

    let generator = gen_fn.call(Value::Undefined, &[]).unwrap();
    let generator = generator.as_generator().unwrap();
    assert_eq!(generator.next().value, Value::from(1));
    assert_eq!(generator.remaining(), vec![Value::from(2), Value::from(3)]);
    assert!(generator.is_exhausted());

    let last = generator.next();
    assert!(last.done);
    assert_eq!(last.value, Value::from("done"));
    // The completion value is handed out once.
    assert_eq!(generator.next().value, Value::Undefined);
}

#[test]
fn test_generator_yield_limit() {
    let scope = Scope::root();
    let options = DesugarOptions::default().with_max_generator_yields(2);
    let gen_fn = Function::member(
        "many",
        FunctionKind::Generator,
        &[],
        body(|cx| {
            loop {
                cx.yield_value(0)?;
            }
        }),
        &scope,
        options,
    );
    let err = gen_fn.call(Value::Undefined, &[]).unwrap_err();
    assert!(matches!(err, RuntimeError::GeneratorOverflow { limit: 2 }));
}

#[test]
fn test_function_properties_via_activation() {
    let target = Function::native("target", |_| Ok(Value::Undefined));
    let probe = Function::native("probe", move |cx| {
        let name = cx.get(&Value::Function(target.clone()), "name")?;
        let length = cx.get(&Value::from("abc"), "length")?;
        Ok(Value::from(format!("{name}:{length}")))
    });
    assert_eq!(
        probe.call(Value::Undefined, &[]).unwrap(),
        Value::from("target:3")
    );
}

#[test]
fn test_property_read_on_undefined_is_type_error() {
    let probe = Function::native("probe", |cx| cx.get(&Value::Undefined, "x"));
    let err = probe.call(Value::Undefined, &[]).unwrap_err();
    assert!(err.to_string().contains("Cannot read properties of undefined"));
}

#[test]
fn test_thrown_values_propagate_unmodified() {
    let thrower = Function::native("boom", |_| Err(throw("boom")));
    let err = thrower.call(Value::Undefined, &[]).unwrap_err();
    assert_eq!(err.thrown_value(), Some(&Value::from("boom")));
    assert_eq!(err.to_string(), "Uncaught boom");
}
