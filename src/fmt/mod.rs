//! Pretty printer for expression trees
//!
//! Every binary operation is wrapped in parentheses, so the printed form
//! shows exactly how operands were grouped by the parser.

use std::fmt::{self, Display};

use crate::ast::{BinOp, Node};

impl Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Num(value) => write!(f, "{value}"),
            Node::Binary { op, left, right } => write!(f, "({left} {op} {right})"),
            Node::Func { name, args } => {
                write!(f, "{name}(")?;
                write_args(f, args)?;
                f.write_str(")")
            }
            Node::Arg { .. } | Node::ArgEnd => {
                f.write_str("[")?;
                write_args(f, self)?;
                f.write_str("]")
            }
        }
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, list: &Node) -> fmt::Result {
    for (i, arg) in list.args().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{arg}")?;
    }
    Ok(())
}
