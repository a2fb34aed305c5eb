//! AST node definitions and their debug-printing conventions.
use std::fmt::{self, Display};

use crate::token::Token;

/// A single AST node. Statements and expressions share this node space —
/// a "statement" is simply any node appearing directly inside a `Block`.
#[derive(Debug, Clone)]
pub enum Node {
    Block {
        statements: Vec<Node>,
        token: Token,
    },
    Return {
        value: Box<Node>,
        token: Token,
    },
    Declaration {
        name: Box<Node>,
        value: Box<Node>,
        token: Token,
    },
    If {
        condition: Box<Node>,
        consequence: Box<Node>,
        alternative: Option<Box<Node>>,
        token: Token,
    },
    Index {
        left: Box<Node>,
        index: Box<Node>,
        token: Token,
    },
    Call {
        callee: Box<Node>,
        args: Vec<Node>,
        token: Token,
    },
    Unary {
        op: Token,
        right: Box<Node>,
        token: Token,
    },
    Binary {
        left: Box<Node>,
        op: Token,
        right: Box<Node>,
        token: Token,
    },
    Identifier {
        name: String,
        token: Token,
    },
    BooleanLiteral {
        value: bool,
        token: Token,
    },
    IntegerLiteral {
        value: i32,
        token: Token,
    },
    StringLiteral {
        value: String,
        token: Token,
    },
    ArrayLiteral {
        elements: Vec<Node>,
        token: Token,
    },
    HashLiteral {
        pairs: Vec<(Node, Node)>,
        token: Token,
    },
    FunctionLiteral {
        params: Vec<String>,
        body: Box<Node>,
        token: Token,
    },
}

impl Node {
    /// The token this node was parsed from, for diagnostics.
    pub fn token(&self) -> &Token {
        match self {
            Node::Block { token, .. }
            | Node::Return { token, .. }
            | Node::Declaration { token, .. }
            | Node::If { token, .. }
            | Node::Index { token, .. }
            | Node::Call { token, .. }
            | Node::Unary { token, .. }
            | Node::Binary { token, .. }
            | Node::Identifier { token, .. }
            | Node::BooleanLiteral { token, .. }
            | Node::IntegerLiteral { token, .. }
            | Node::StringLiteral { token, .. }
            | Node::ArrayLiteral { token, .. }
            | Node::HashLiteral { token, .. }
            | Node::FunctionLiteral { token, .. } => token,
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Block { statements, .. } => {
                for s in statements {
                    write!(f, "{s}")?;
                }
                Ok(())
            }
            Node::Return { value, .. } => write!(f, "return {value};"),
            Node::Declaration { name, value, .. } => write!(f, "so {name} = {value};"),
            Node::Identifier { name, .. } => write!(f, "{name}"),
            Node::BooleanLiteral { value, .. } => write!(f, "{value}"),
            Node::IntegerLiteral { value, .. } => write!(f, "{value}"),
            Node::StringLiteral { value, .. } => write!(f, "{value}"),
            Node::Unary { op, right, .. } => write!(f, "({}{right})", op.literal),
            Node::Binary { left, op, right, .. } => write!(f, "({left} {} {right})", op.literal),
            Node::Index { left, index, .. } => write!(f, "({left}[{index}])"),
            Node::Call { callee, args, .. } => {
                let args = args.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", ");
                write!(f, "{callee}({args})")
            }
            Node::If {
                condition,
                consequence,
                alternative,
                ..
            } => match alternative {
                Some(alt) => write!(f, "if {condition} {consequence} else {alt}"),
                None => write!(f, "if {condition} {consequence}"),
            },
            Node::ArrayLiteral { elements, .. } => {
                let elements = elements.iter().map(|e| e.to_string()).collect::<Vec<_>>().join(", ");
                write!(f, "[{elements}]")
            }
            Node::HashLiteral { pairs, .. } => {
                let pairs = pairs
                    .iter()
                    .map(|(k, v)| format!("{k}:{v}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{{{pairs}}}")
            }
            Node::FunctionLiteral { params, body, .. } => {
                write!(f, "fn({}){{{body}}}", params.join(", "))
            }
        }
    }
}
