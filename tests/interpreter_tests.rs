use combicalc::interpreter::{FunctionRegistry, evaluate, run};
use combicalc::parser::Grammar;

fn eval(input: &str) -> f64 {
    let functions = FunctionRegistry::with_builtins();
    match run(input, &functions) {
        Ok(value) => value,
        Err(err) => panic!("evaluating {input:?} failed: {err}"),
    }
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn eval_literals() {
    assert_eq!(eval("123"), 123.0);
    assert_eq!(eval("123,456"), 123456.0);
    assert_eq!(eval("123,456.5"), 123456.5);
    assert_eq!(eval(".25"), 0.25);
}

#[test]
fn eval_arithmetic() {
    assert_eq!(eval("1+2+3"), 6.0);
    assert_eq!(eval("2*(6+3)"), 18.0);
    assert_eq!(eval("2+3*4"), 14.0);
    assert_eq!(eval("2*3-1"), 5.0);
    assert_eq!(eval("2^3^2"), 512.0);
    assert_eq!(eval("7 % 4"), 3.0);
}

#[test]
fn eval_right_grouping() {
    assert_eq!(eval("8-4-2"), 6.0);
    assert_eq!(eval("8/4/2"), 4.0);
}

#[test]
fn eval_host_remainder_sign() {
    assert_eq!(eval("mod(7,4)"), 3.0);
    assert_eq!(eval("(0-7)%4"), -3.0);
}

#[test]
fn eval_division_by_zero_propagates() {
    assert!(eval("1/0").is_infinite());
    assert!(eval("0/0").is_nan());
    assert!(eval("sqrt(0-1)").is_nan());
}

#[test]
fn eval_functions() {
    assert_close(eval("atan2(1,1)"), 1f64.atan2(1.0));
    assert_close(eval("log(2,8)"), 3.0);
    assert_close(eval("log10(1000)"), 3.0);
    assert_close(eval("sqrt(16)+floor(2.7)+ceil(0.2)"), 7.0);
    assert_close(eval("max(3, 9, 4) - min(3, 9, 4)"), 6.0);
    assert_close(eval("round(2.5)"), 3.0);
}

#[test]
fn eval_arguments_keep_order() {
    assert_close(eval("atan2(1,2)"), 1f64.atan2(2.0));
    assert_close(eval("log(3,81)"), 4.0);
}

#[test]
fn eval_rand_in_unit_interval() {
    let value = eval("rand()");
    assert!((0.0..1.0).contains(&value));
}

#[test]
fn eval_custom_function() {
    let mut functions = FunctionRegistry::with_builtins();
    functions.register("sum", |args| args.iter().sum());
    let parsed = Grammar::new(&functions)
        .parse("sum(1, 2, 3, 4) * 2")
        .expect("parse failed");
    assert_eq!(evaluate(&parsed.value, &functions), 20.0);
}

#[test]
fn eval_unknown_function_is_zero() {
    // The grammar knows the name, the evaluating registry does not
    let mut known = FunctionRegistry::new();
    known.register("ghost", |_| 42.0);
    let parsed = Grammar::new(&known).parse("ghost() + 1").expect("parse failed");
    assert_eq!(evaluate(&parsed.value, &FunctionRegistry::new()), 1.0);
}
