//! # Expression Tree
//!
//! The grammar produces a [`Node`] tree; the interpreter walks it.
//!
//! Binary operators share one variant keyed by [`BinOp`], so a `match` over
//! `Node` and `BinOp` is exhaustive over every tag the grammar can emit.
//!
//! Call arguments form a singly linked list: a chain of [`Node::Arg`] cells
//! terminated by [`Node::ArgEnd`]. A call with no arguments carries a bare
//! `ArgEnd`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl BinOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Pow => "^",
        }
    }

    /// Apply the operator with host floating-point semantics. Division by
    /// zero yields infinity or NaN; `%` keeps the sign of the dividend.
    pub fn apply(&self, left: f64, right: f64) -> f64 {
        match self {
            BinOp::Add => left + right,
            BinOp::Sub => left - right,
            BinOp::Mul => left * right,
            BinOp::Div => left / right,
            BinOp::Mod => left % right,
            BinOp::Pow => left.powf(right),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Numeric literal
    Num(f64),
    /// Infix operation
    Binary {
        op: BinOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// Call of a registered function; `args` is the head of the argument list
    Func { name: String, args: Box<Node> },
    /// One argument cell
    Arg { value: Box<Node>, next: Box<Node> },
    /// End of an argument list
    ArgEnd,
}

impl Node {
    pub fn binary(op: BinOp, left: Node, right: Node) -> Self {
        Node::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn func(name: impl Into<String>, args: Node) -> Self {
        Node::Func {
            name: name.into(),
            args: Box::new(args),
        }
    }

    pub fn arg(value: Node, next: Node) -> Self {
        Node::Arg {
            value: Box::new(value),
            next: Box::new(next),
        }
    }

    /// Build an argument list from already parsed values
    pub fn arg_list(values: impl IntoIterator<Item = Node>) -> Self {
        let values: Vec<Node> = values.into_iter().collect();
        values
            .into_iter()
            .rev()
            .fold(Node::ArgEnd, |next, value| Node::arg(value, next))
    }

    /// Iterate over the values of an argument list. Stops at `ArgEnd` or at
    /// the first node that is not an `Arg` cell.
    pub fn args(&self) -> ArgIter<'_> {
        ArgIter { cursor: self }
    }
}

pub struct ArgIter<'a> {
    cursor: &'a Node,
}

impl<'a> Iterator for ArgIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        match self.cursor {
            Node::Arg { value, next } => {
                self.cursor = &**next;
                Some(&**value)
            }
            _ => None,
        }
    }
}
