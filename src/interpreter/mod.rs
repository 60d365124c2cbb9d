mod eval;
mod registry;

pub use registry::{Builtin, FunctionRegistry};

use crate::ast::Node;
use crate::parser::{Grammar, ParseError};

/// Evaluate a successfully parsed tree
pub fn evaluate(node: &Node, functions: &FunctionRegistry) -> f64 {
    node.eval(functions)
}

/// Parse `input` with a grammar built from `functions` and evaluate it
pub fn run(input: &str, functions: &FunctionRegistry) -> Result<f64, ParseError> {
    let parsed = Grammar::new(functions).parse(input)?;
    Ok(evaluate(&parsed.value, functions))
}
