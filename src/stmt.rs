//! Statement nodes — the second closed AST variant set.

use std::rc::Rc;

use crate::expr::Expr;
use crate::token::Token;

/// **Abstract-syntax-tree node** for *statements*.  A program is the ordered
/// sequence of these nodes returned by the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt<'a> {
    /// Stand-alone expression evaluated for its side effects.
    Expression(Expr<'a>),

    /// `print(e1, e2, …)` — at least one argument, written space-separated.
    Print(Vec<Expr<'a>>),

    /// Variable declaration: a line of the form `IDENT` or `IDENT = expr`.
    /// Without an initializer the variable binds to the empty text.
    Var {
        name: &'a Token<'a>,
        initializer: Option<Expr<'a>>,
    },

    /// A statement list executed in a *fresh* child scope.  No surface
    /// syntax produces this today; it exists for embedders and keeps the
    /// scoped/unscoped block asymmetry explicit.
    Block(Vec<Stmt<'a>>),

    /// An `if`/`else` body: executed in the *caller's* scope, unlike
    /// [`Stmt::Block`].  Branches are unscoped; calls and explicit blocks
    /// are scoped.
    IfElseBlock(Vec<Stmt<'a>>),

    /// `if` / `else` conditional.  Both branches are `IfElseBlock`s.
    If {
        condition: Expr<'a>,
        then_branch: Box<Stmt<'a>>,
        else_branch: Option<Box<Stmt<'a>>>,
    },

    /// Function declaration.  The body is shared behind `Rc` so the template
    /// stays intact across an unbounded number of (possibly recursive)
    /// activations.
    Function {
        name: &'a Token<'a>,

        /// Parameter name tokens (arity ≤ 255).
        params: Vec<&'a Token<'a>>,

        body: Rc<Vec<Stmt<'a>>>,
    },

    /// `return` statement.  Absent value ⇒ the empty text is returned.
    Return {
        /// The `return` keyword token (for runtime error locations).
        keyword: &'a Token<'a>,

        value: Option<Expr<'a>>,
    },
}
