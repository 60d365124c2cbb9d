use log::warn;

use crate::ast::Node;

use super::registry::FunctionRegistry;

impl Node {
    /// Compute the value of this tree.
    ///
    /// Evaluation always yields a number. Calls to unknown functions and
    /// argument cells found outside a call are logged and count as `0.0`.
    pub fn eval(&self, functions: &FunctionRegistry) -> f64 {
        match self {
            Node::Num(value) => *value,
            Node::Binary { op, left, right } => {
                op.apply(left.eval(functions), right.eval(functions))
            }
            Node::Func { name, args } => match functions.get(name) {
                Some(f) => {
                    let evaluated: Vec<f64> = args.args().map(|a| a.eval(functions)).collect();
                    f(evaluated.as_slice())
                }
                None => {
                    warn!("unrecognized function: {name}");
                    0.0
                }
            },
            Node::Arg { .. } | Node::ArgEnd => {
                warn!("unrecognized tag: argument list evaluated outside of a call: {:?}", self);
                0.0
            }
        }
    }
}
