//! Expression nodes — the first of the two closed AST variant sets.
//!
//! Nodes are pure data; all behavior lives in the interpreter. The lifetime
//! `'a` ties token references back to the token buffer held by the caller.

use serde::Serialize;

use crate::token::Token;

/// **Abstract-syntax-tree node** representing every kind of *expression*.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr<'a> {
    /// A literal constant: integer, string, `true`, `false`, or `none`.
    /// The token itself carries the text; no conversion happens at parse
    /// time because the runtime representation is text anyway.
    Literal(&'a Token<'a>),

    /// Variable access — resolves to the identifier's current value at
    /// runtime, or to the function's own name if only a function is bound.
    Variable(&'a Token<'a>),

    /// Assignment expression: `identifier "=" expression`.
    /// Writes into the *current* scope only (shadowing, never write-through).
    Assign {
        name: &'a Token<'a>,
        value: Box<Expr<'a>>,
    },

    /// Prefix unary operator expression: `!ready` or `-42`.
    Unary {
        /// The operator token (`!` or `-`).
        operator: &'a Token<'a>,
        right: Box<Expr<'a>>,
    },

    /// Infix binary operator expression: `a + b`, `x <= y`.
    Binary {
        left: Box<Expr<'a>>,
        operator: &'a Token<'a>,
        right: Box<Expr<'a>>,
    },

    /// Short-circuiting logical operators `and` / `or`.
    Logical {
        left: Box<Expr<'a>>,
        operator: &'a Token<'a>,
        right: Box<Expr<'a>>,
    },

    /// Parenthesised sub-expression: `"(" expression ")"`.
    Grouping(Box<Expr<'a>>),

    /// Function-call expression: `f(1, 2)`. Chained calls `f(1)(2)` parse,
    /// though only named functions resolve at runtime.
    Call {
        callee: Box<Expr<'a>>,
        /// The closing `)` token — retained for error reporting.
        paren: &'a Token<'a>,
        arguments: Vec<Expr<'a>>,
    },
}

impl<'a> Expr<'a> {
    /// The source line this expression originates from.
    pub fn line(&self) -> usize {
        match self {
            Expr::Literal(token) => token.line,

            Expr::Variable(token) => token.line,

            Expr::Assign { name, .. } => name.line,

            Expr::Unary { operator, .. } => operator.line,

            Expr::Binary { operator, .. } => operator.line,

            Expr::Logical { operator, .. } => operator.line,

            Expr::Grouping(expr) => expr.line(),

            Expr::Call { paren, .. } => paren.line,
        }
    }
}
