//! Literal parsers

use crate::ast::Node;

use crate::parser::combinators::{
    BoxedParser, inclusive_or, one_or_more_with, zero_or_more_until, zero_or_more_with, zero_or_one,
};
use crate::parser::primitives::{any_char, digit, exact};

fn concat(a: String, b: String) -> String {
    a + &b
}

fn digits() -> BoxedParser<String> {
    one_or_more_with(digit() >> String::from, concat)
}

/// number := integer ('.' digits)? | '.' digits
/// integer := digit (','? digit)*
///
/// Commas group digits and are dropped before conversion, so `1,000.5`
/// reads as `1000.5`. A comma must sit between two digits.
pub fn number() -> BoxedParser<Node> {
    let group = (zero_or_one(exact(',')) + digit())
        .map(|(comma, d)| comma.into_iter().chain([d]).collect::<String>());
    let integer = (digit() >> String::from).then_with(zero_or_more_with(group, concat), concat);
    let fraction = (exact('.') >> String::from).then_with(digits(), concat);

    inclusive_or(integer, fraction, concat)
        .try_map(|text| {
            text.replace(',', "")
                .parse::<f64>()
                .map(Node::Num)
                .map_err(|err| format!("invalid number {text:?}: {err}"))
        })
        .label("number")
}

/// string := '"' (escape | char)* '"'
///
/// Supports `\n`, `\t` and escaping any other character with a backslash.
pub fn string_literal() -> BoxedParser<String> {
    let escaped = (exact('\\') * any_char()).map(|c| match c {
        'n' => '\n',
        't' => '\t',
        other => other,
    });
    let item = (escaped | any_char()) >> String::from;
    let closing = exact('"').replace(String::new());

    exact('"') * zero_or_more_until(item, closing, concat)
}
