//! # Combicalc - Arithmetic through Parser Combinators
//!
//! Combicalc evaluates arithmetic expressions such as `2 * (6 + 3)` or
//! `log(2, 8) + atan2(1, 1)`. The grammar is built entirely from a small set
//! of composable, character-level parsing primitives, and the resulting tree
//! is evaluated to an `f64`.
//!
//! ## Pipeline Flow
//!
//! ```text
//! Source Text (&str)
//!     ↓
//! [Primitives] → single characters and keywords
//!     ↓
//! [Combinators] → sequences, choices, repetitions, split searches
//!     ↓
//! [Grammar] → Expression Tree (ast::Node)
//!     ↓
//! [Interpreter] → f64
//! ```
//!
//! ## Key Design Decisions
//!
//! ### No Tokenizer
//! Parsers work directly on characters. Whitespace is handled where it may
//! appear (around operators, inside calls and groups) instead of being
//! stripped up front.
//!
//! ### Failure is a Value
//! Every parser returns a [`parser::ParseResult`]. Failures carry a message
//! and a position and never consume input: choices always retry from the
//! original input.
//!
//! ### Precedence by Ordering
//! There are no precedence levels. Infix rules locate their operator with
//! [`parser::backtracking_search`], which takes the shortest left operand
//! that parses completely, and the rules are tried loosest operator first.
//! Chains of one operator therefore group to the right.
//!
//! ### Explicit Function Registry
//! Callable functions live in an [`interpreter::FunctionRegistry`] that is
//! passed to both the grammar (to know which names are calls) and the
//! interpreter (to compute them).
//!
//! ## Module Structure
//!
//! - [`ast`] - Expression tree definitions
//! - [`parser`] - Primitives, combinators and the expression grammar
//! - [`interpreter`] - Function registry and tree evaluation
//! - [`fmt`] - Parenthesised pretty-printing of trees
//!
//! ## Getting Started
//!
//! 1. Build a registry with [`interpreter::FunctionRegistry::with_builtins()`]
//! 2. Build a grammar with [`parser::Grammar::new()`]
//! 3. Parse with [`parser::Grammar::parse()`]
//! 4. Evaluate with [`interpreter::evaluate()`]

pub mod ast;
pub mod fmt;
pub mod interpreter;
pub mod parser;
