use std::time::{Duration, Instant};

use combicalc::ast::{BinOp, Node};
use combicalc::interpreter::{FunctionRegistry, evaluate};
use combicalc::parser::{Grammar, MatchResult, ParseError};

fn grammar() -> Grammar {
    Grammar::new(&FunctionRegistry::with_builtins())
}

fn parse_tree(input: &str) -> Node {
    match grammar().parse(input) {
        Ok(parsed) => parsed.value,
        Err(err) => panic!("parsing {input:?} failed: {err}"),
    }
}

fn parse_error(input: &str) -> ParseError {
    match grammar().parse(input) {
        Ok(parsed) => panic!("expected {input:?} to fail, got {}", parsed.value),
        Err(err) => err,
    }
}

#[test]
fn parse_integer() {
    assert_eq!(parse_tree("123"), Node::Num(123.0));
}

#[test]
fn parse_grouped_number() {
    assert_eq!(parse_tree("123,456.5"), Node::Num(123456.5));
}

#[test]
fn parse_addition() {
    assert_eq!(
        parse_tree("1+2"),
        Node::binary(BinOp::Add, Node::Num(1.0), Node::Num(2.0))
    );
}

#[test]
fn same_operator_groups_right() {
    assert_eq!(parse_tree("1+2+3").to_string(), "(1 + (2 + 3))");
    assert_eq!(parse_tree("8-4-2").to_string(), "(8 - (4 - 2))");
}

#[test]
fn looser_operator_becomes_root() {
    assert_eq!(parse_tree("2*3+4").to_string(), "((2 * 3) + 4)");
    assert_eq!(parse_tree("2+3*4").to_string(), "(2 + (3 * 4))");
    assert_eq!(parse_tree("1-2+3").to_string(), "((1 - 2) + 3)");
    assert_eq!(parse_tree("2^3*2").to_string(), "((2 ^ 3) * 2)");
}

#[test]
fn parentheses_override_grouping() {
    assert_eq!(parse_tree("2*(6+3)").to_string(), "(2 * (6 + 3))");
    assert_eq!(parse_tree("(1+2)+3").to_string(), "((1 + 2) + 3)");
}

#[test]
fn all_bracket_kinds_group() {
    assert_eq!(parse_tree("[1+2]*{3}").to_string(), "((1 + 2) * 3)");
    assert_eq!(parse_tree("( 4 )"), Node::Num(4.0));
}

#[test]
fn whitespace_around_operators() {
    assert_eq!(parse_tree("  1 +\t2 ").to_string(), "(1 + 2)");
}

#[test]
fn operator_words() {
    assert_eq!(parse_tree("6 add 2").to_string(), "(6 + 2)");
    assert_eq!(parse_tree("6 sub 2").to_string(), "(6 - 2)");
    assert_eq!(parse_tree("6 mul 2").to_string(), "(6 * 2)");
    assert_eq!(parse_tree("6@2").to_string(), "(6 * 2)");
    assert_eq!(parse_tree("6 div 2").to_string(), "(6 / 2)");
    assert_eq!(parse_tree("6 mod 4").to_string(), "(6 % 4)");
    assert_eq!(parse_tree("2**3").to_string(), "(2 ^ 3)");
    assert_eq!(parse_tree("2 pow 3").to_string(), "(2 ^ 3)");
}

#[test]
fn power_spellings_agree() {
    assert_eq!(parse_tree("2**3*4").to_string(), "((2 ^ 3) * 4)");
    assert_eq!(parse_tree("2**3*4"), parse_tree("2^3*4"));
    assert_eq!(parse_tree("2*3**2*2").to_string(), "(2 * ((3 ^ 2) * 2))");
    assert_eq!(parse_tree("2*3**2*2"), parse_tree("2*3^2*2"));
}

#[test]
fn deep_nesting_parses_quickly() {
    let depth = 20;
    let input = format!("{}1{}", "(1+".repeat(depth), ")".repeat(depth));

    let started = Instant::now();
    let tree = parse_tree(&input);
    let elapsed = started.elapsed();

    let functions = FunctionRegistry::with_builtins();
    assert_eq!(evaluate(&tree, &functions), (depth + 1) as f64);
    assert!(
        elapsed < Duration::from_secs(10),
        "depth {depth} took {elapsed:?}"
    );
}

#[test]
fn repeated_parses_do_not_share_results() {
    let grammar = grammar();
    let first = grammar.parse("1+2").map(|parsed| parsed.value);
    let second = grammar.parse("3*4").map(|parsed| parsed.value);
    assert_eq!(first.map(|tree| tree.to_string()), Ok("(1 + 2)".to_string()));
    assert_eq!(second.map(|tree| tree.to_string()), Ok("(3 * 4)".to_string()));
}

#[test]
fn function_call_arguments() {
    let tree = parse_tree("atan2(1,1)");
    assert_eq!(
        tree,
        Node::func("atan2", Node::arg_list([Node::Num(1.0), Node::Num(1.0)]))
    );
}

#[test]
fn function_call_with_spacing_and_brackets() {
    assert_eq!(parse_tree(" sqrt [ 16 ] ").to_string(), "sqrt(16)");
    assert_eq!(parse_tree("max(1, 2 , 3)").to_string(), "max(1, 2, 3)");
}

#[test]
fn function_call_without_arguments() {
    assert_eq!(parse_tree("rand()"), Node::func("rand", Node::ArgEnd));
}

#[test]
fn nested_calls() {
    assert_eq!(
        parse_tree("mod(atan2(1,1),2)").to_string(),
        "mod(atan2(1, 1), 2)"
    );
}

#[test]
fn calls_inside_expressions() {
    assert_eq!(parse_tree("2*sqrt(9)+1").to_string(), "((2 * sqrt(9)) + 1)");
}

#[test]
fn unknown_function_is_rejected() {
    parse_error("nope(1)");
}

#[test]
fn late_registration_is_not_seen() {
    let mut functions = FunctionRegistry::new();
    let grammar = Grammar::new(&functions);
    functions.register("twice", |args| args[0] * 2.0);
    assert!(grammar.parse("twice(2)").failed());
    assert!(Grammar::new(&functions).parse("twice(2)").success());
}

#[test]
fn empty_input_fails() {
    let err = parse_error("");
    assert_eq!(err.expected.as_deref(), Some("number"));
    parse_error("   ");
}

#[test]
fn trailing_input_fails() {
    let err = parse_error("1+2)");
    assert_eq!(err.found.as_deref(), Some("\")\""));
    assert_eq!(err.position.column, 4);
}

#[test]
fn degenerate_numbers_fail() {
    parse_error(",");
    parse_error(".");
    parse_error("1+");
    parse_error("(1");
    parse_error("sqrt(1,)");
}

#[test]
fn failures_are_repeatable() {
    assert_eq!(parse_error("2*x"), parse_error("2*x"));
}

#[test]
fn trees_are_deterministic() {
    assert_eq!(parse_tree("log(2,8)*(3-1)"), parse_tree("log(2,8)*(3-1)"));
}
