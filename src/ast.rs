//! Lisp-style AST rendering for the `parse` subcommand and for debugging
//! parser output in tests.

use crate::expr::Expr;
use crate::stmt::Stmt;
use crate::token::TokenType;

pub struct Ast;

impl Ast {
    /// Render a whole program, one top-level statement per line.
    pub fn print_program(&self, statements: &[Stmt]) -> String {
        statements
            .iter()
            .map(|stmt| self.print_stmt(stmt))
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn print_stmt(&self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::Expression(expr) => self.print(expr),

            Stmt::Print(expressions) => {
                format!("(print {})", self.print_list(expressions))
            }

            Stmt::Var { name, initializer } => match initializer {
                Some(expr) => format!("(var {} {})", name.lexeme, self.print(expr)),
                None => format!("(var {})", name.lexeme),
            },

            Stmt::Block(statements) => {
                format!("(block {})", self.print_stmts(statements))
            }

            Stmt::IfElseBlock(statements) => self.print_stmts(statements),

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => match else_branch {
                Some(else_stmt) => format!(
                    "(if {} {} {})",
                    self.print(condition),
                    self.print_stmt(then_branch),
                    self.print_stmt(else_stmt)
                ),
                None => format!(
                    "(if {} {})",
                    self.print(condition),
                    self.print_stmt(then_branch)
                ),
            },

            Stmt::Function { name, params, body } => {
                let params: Vec<&str> = params.iter().map(|p| p.lexeme).collect();

                format!(
                    "(def {} ({}) {})",
                    name.lexeme,
                    params.join(" "),
                    self.print_stmts(body)
                )
            }

            Stmt::Return { value, .. } => match value {
                Some(expr) => format!("(return {})", self.print(expr)),
                None => "(return)".to_string(),
            },
        }
    }

    pub fn print(&self, expr: &Expr) -> String {
        match expr {
            Expr::Literal(token) => match &token.token_type {
                TokenType::STRING(s) => s.clone(),
                TokenType::TRUE => "true".to_string(),
                TokenType::FALSE => "false".to_string(),
                TokenType::NONE => "null".to_string(),
                _ => token.lexeme.to_string(),
            },

            Expr::Variable(token) => token.lexeme.to_string(),

            Expr::Assign { name, value } => {
                format!("(= {} {})", name.lexeme, self.print(value))
            }

            Expr::Unary { operator, right } => {
                format!("({} {})", operator.lexeme, self.print(right))
            }

            Expr::Binary {
                left,
                operator,
                right,
            }
            | Expr::Logical {
                left,
                operator,
                right,
            } => format!(
                "({} {} {})",
                operator.lexeme,
                self.print(left),
                self.print(right)
            ),

            Expr::Grouping(inner) => format!("(group {})", self.print(inner)),

            Expr::Call {
                callee, arguments, ..
            } => {
                if arguments.is_empty() {
                    format!("(call {})", self.print(callee))
                } else {
                    format!("(call {} {})", self.print(callee), self.print_list(arguments))
                }
            }
        }
    }

    fn print_list(&self, expressions: &[Expr]) -> String {
        expressions
            .iter()
            .map(|expr| self.print(expr))
            .collect::<Vec<String>>()
            .join(" ")
    }

    fn print_stmts(&self, statements: &[Stmt]) -> String {
        statements
            .iter()
            .map(|stmt| self.print_stmt(stmt))
            .collect::<Vec<String>>()
            .join(" ")
    }
}
