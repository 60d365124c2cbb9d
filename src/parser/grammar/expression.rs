//! Expression parsers
//!
//! Operator precedence is not encoded in the grammar. Each infix rule finds
//! a split point (shortest left operand first) where the operator and a
//! right operand follow a complete left operand, and the rules are tried
//! in a fixed order: `+`, `-`, `*`, `/`, `%`, `^`, calls,
//! grouping, numbers. Since the loosest operators are tried first, they end
//! up at the root of the tree. Operands on the right-hand side recurse into
//! the full expression rule, so chains of the same operator group to the
//! right: `8 - 4 - 2` is `8 - (4 - 2)`.

use std::rc::Rc;

use crate::ast::{BinOp, Node};

use crate::parser::combinators::{
    BoxedParser, alternative_chain, always_with, backtracking_search, select_chain,
};
use crate::parser::primitives::{airs, exact, keyword, one_of};
use crate::parser::state::{Input, Parser};

use super::Grammar;
use super::literal::number;

const BINARY_OPERATORS: [BinOp; 6] = [
    BinOp::Add,
    BinOp::Sub,
    BinOp::Mul,
    BinOp::Div,
    BinOp::Mod,
    BinOp::Pow,
];

/// Accepted spellings per operator: single characters, then words
fn spellings(op: BinOp) -> (&'static str, &'static [&'static str]) {
    match op {
        BinOp::Add => ("+", &["add"]),
        BinOp::Sub => ("-", &["sub"]),
        BinOp::Mul => ("*@", &["mul"]),
        BinOp::Div => ("/", &["div"]),
        BinOp::Mod => ("%", &["mod"]),
        BinOp::Pow => ("^", &["**", "pow"]),
    }
}

/// operator := air* (symbol | word) air*
fn operator(op: BinOp) -> BoxedParser<String> {
    let (symbols, words) = spellings(op);
    let mut forms = vec![one_of(symbols) >> String::from];
    forms.extend(words.iter().map(|word| keyword(word)));
    airs() * alternative_chain(forms) - airs()
}

/// separator := air* "," air*
fn separator() -> BoxedParser<char> {
    airs() * exact(',') - airs()
}

fn open() -> BoxedParser<char> {
    one_of("([{")
}

fn close() -> BoxedParser<char> {
    one_of(")]}")
}

fn skip<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Option<Node>> {
    parser.map(|_| None)
}

fn keep(parser: BoxedParser<Node>) -> BoxedParser<Option<Node>> {
    parser >> Some
}

/// Keep the one expression out of a delimited sequence
fn pick(pieces: Vec<BoxedParser<Option<Node>>>, index: usize) -> BoxedParser<Node> {
    select_chain(pieces, index)
        .try_map(|node| node.ok_or_else(|| "selected piece carries no expression".to_string()))
}

impl Grammar {
    /// expression := infix | call | group | number
    pub fn expression(&self) -> BoxedParser<Node> {
        let grammar = self.clone();
        BoxedParser::new(move |input: Input| grammar.alternatives().parse(input))
            .memoize(Rc::clone(&self.expressions))
    }

    fn alternatives(&self) -> BoxedParser<Node> {
        let mut rules: Vec<BoxedParser<Node>> =
            BINARY_OPERATORS.iter().map(|op| self.infix(*op)).collect();
        rules.extend(self.functions().iter().map(|name| self.call(name)));
        rules.push(self.group());
        rules.push(number());
        alternative_chain(rules)
    }

    /// infix := expression operator expression
    ///
    /// Operator and right operand are searched for together, so a split that
    /// only matches part of a longer spelling (`*` of `**`) is passed over.
    fn infix(&self, op: BinOp) -> BoxedParser<Node> {
        let operand = operator(op) * self.expression();
        backtracking_search(self.expression(), operand, move |left, right| {
            Node::binary(op, left, right)
        })
    }

    /// call := air* name air* open air* arguments air* close air*
    fn call(&self, name: &str) -> BoxedParser<Node> {
        let callee = name.to_string();
        pick(
            vec![
                skip(airs()),
                skip(keyword(name)),
                skip(airs()),
                skip(open()),
                skip(airs()),
                keep(self.arguments()),
                skip(airs()),
                skip(close()),
                skip(airs()),
            ],
            5,
        )
        .map(move |args| Node::func(callee.clone(), args))
    }

    /// arguments := argument_list | ε
    fn arguments(&self) -> BoxedParser<Node> {
        self.argument_list() | always_with(|| Node::ArgEnd)
    }

    /// argument_list := expression separator argument_list | expression
    ///
    /// The separator is located with a split search, so a comma is only
    /// taken as digit grouping when it cannot end an argument.
    fn argument_list(&self) -> BoxedParser<Node> {
        let grammar = self.clone();
        BoxedParser::new(move |input: Input| {
            let tail = separator() * grammar.argument_list();
            let more = backtracking_search(grammar.expression(), tail, Node::arg);
            let last = grammar.expression().map(|value| Node::arg(value, Node::ArgEnd));
            (more | last).parse(input)
        })
        .memoize(Rc::clone(&self.argument_lists))
    }

    /// group := open air* expression air* close
    fn group(&self) -> BoxedParser<Node> {
        pick(
            vec![
                skip(open()),
                skip(airs()),
                keep(self.expression()),
                skip(airs()),
                skip(close()),
            ],
            2,
        )
    }
}
