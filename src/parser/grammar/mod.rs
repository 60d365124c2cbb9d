//! Grammar for arithmetic expressions
//!
//! This module contains the parsing rules organized by category:
//! - `literal`: numbers and strings
//! - `expression`: infix operators, function calls, grouping

mod expression;
mod literal;

use std::rc::Rc;

use log::trace;

use crate::ast::Node;
use crate::interpreter::FunctionRegistry;

use super::combinators::{Memo, MemoTable};
use super::primitives::airs;
use super::state::{Input, ParseResult, Parser};

pub use literal::{number, string_literal};

/// The expression grammar, specialised to a fixed set of callable names.
///
/// The names are copied out of the registry on construction; functions
/// registered afterwards are not recognised by this grammar.
///
/// Expression and argument-list results are memoized per input window, so
/// the split search re-reads each window at most once per source text.
#[derive(Debug, Clone)]
pub struct Grammar {
    functions: Rc<[String]>,
    expressions: MemoTable<Node>,
    argument_lists: MemoTable<Node>,
}

impl Grammar {
    pub fn new(registry: &FunctionRegistry) -> Self {
        Self::with_functions(registry.names().map(String::from).collect())
    }

    fn with_functions(functions: Rc<[String]>) -> Self {
        Self {
            functions,
            expressions: Memo::table(),
            argument_lists: Memo::table(),
        }
    }

    /// Names this grammar accepts as calls
    pub fn functions(&self) -> &[String] {
        &self.functions
    }

    /// Parse a complete expression. Surrounding whitespace is allowed,
    /// anything else left over is an error.
    pub fn parse(&self, text: &str) -> ParseResult<Node> {
        trace!("parsing {text:?}");
        // fresh tables so nothing outlives this call
        let session = Self::with_functions(Rc::clone(&self.functions));
        let top = (airs() * session.expression() - airs()).consume_all();
        top.parse(Input::new(text))
    }
}
