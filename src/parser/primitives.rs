//! Character-level matchers. Every grammar rule bottoms out in one of these.

use std::rc::Rc;

use super::combinators::{BoxedParser, always_with, chain, zero_or_more_with};
use super::state::{Input, ParseError, Parsed};

/// Low-level character parser with custom error - for internal use
fn char_with_error<F>(predicate: F, expected: String) -> BoxedParser<char>
where
    F: Fn(char) -> bool + 'static,
{
    BoxedParser::new(move |input: Input| match input.advance() {
        Some((c, rest)) if predicate(c) => Ok(Parsed::new(c, input.position(), rest)),
        Some((c, _)) => Err(ParseError::new("unexpected character")
            .expected(expected.clone())
            .found(format!("'{c}'"))
            .at(input.position())),
        None => Err(ParseError::end_of_input()
            .expected(expected.clone())
            .at(input.position())),
    })
}

/// Consume exactly one character satisfying `predicate`
pub fn read_if<F: Fn(char) -> bool + 'static>(predicate: F) -> BoxedParser<char> {
    char_with_error(predicate, "a matching character".to_string())
}

pub fn one_of(chars: &'static str) -> BoxedParser<char> {
    char_with_error(move |c| chars.contains(c), format!("one of {chars:?}"))
}

pub fn exact(expected: char) -> BoxedParser<char> {
    char_with_error(move |c| c == expected, format!("character '{expected}'"))
}

pub fn any_char() -> BoxedParser<char> {
    char_with_error(|_| true, "any character".to_string())
}

pub fn digit() -> BoxedParser<char> {
    char_with_error(|c| c.is_ascii_digit(), "digit".to_string())
}

/// Match `word` one character at a time
pub fn keyword(word: &str) -> BoxedParser<String> {
    if word.is_empty() {
        return always_with(String::new);
    }
    let word: Rc<str> = Rc::from(word);
    let letters = word
        .chars()
        .map(|expected| {
            let word = Rc::clone(&word);
            exact(expected)
                .map_err(move |err| err.expected(format!("'{expected}' of keyword {word:?}")))
                >> String::from
        })
        .collect();
    chain(letters, |a, b| a + &b)
}

/// A single whitespace character
pub fn air() -> BoxedParser<char> {
    one_of(" \t\r\n")
}

/// Any run of whitespace, possibly empty
pub fn airs() -> BoxedParser<String> {
    zero_or_more_with(air() >> String::from, |a, b| a + &b)
}
