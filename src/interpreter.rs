//! Tree-walking evaluator.
//!
//! Walks the statement/expression tree, owns the chain of lexical
//! environments, and realizes calls as new activations linked into that
//! chain.  Statement execution threads an explicit [`Flow`] outcome instead
//! of a thrown return signal, so the `return`-escapes-to-top-level behavior
//! stays visible and testable.  Errors go through the crate-wide `Result`:
//! the first runtime failure aborts the remaining program, leaving any
//! output already printed in place.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use log::{debug, info};

use crate::environment::Environment;
use crate::error::{MinipyError, Result};
use crate::expr::Expr;
use crate::stmt::Stmt;
use crate::token::{Token, TokenType};
use crate::value::Value;

/// The immutable template for one user-defined function: name, parameter
/// names, shared body.  Never mutated or consumed by execution — safe for
/// unbounded repeated and recursive invocation.
#[derive(Debug)]
pub struct Function<'a> {
    pub name: String,
    pub params: Vec<String>,
    pub body: Rc<Vec<Stmt<'a>>>,
}

impl<'a> Function<'a> {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Outcome of executing one statement: either control continues normally or
/// a `return` is unwinding toward the nearest call boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal,
    Return(Value),
}

/// The evaluator.  Generic over its output sink so program output can be
/// captured in tests; diagnostics are not printed here.
pub struct Interpreter<'a, W> {
    environment: Rc<RefCell<Environment<'a>>>,
    out: W,
}

impl<'a, W: Write> Interpreter<'a, W> {
    pub fn new(out: W) -> Self {
        info!("Initializing interpreter");

        Self {
            environment: Rc::new(RefCell::new(Environment::new())),
            out,
        }
    }

    /// Recover the output sink, consuming the interpreter.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Interprets a list of statements (a "program").
    ///
    /// A `return` at top level abandons the remaining statements without
    /// failing.  A runtime error stops execution at the failing statement.
    pub fn interpret(&mut self, statements: &[Stmt<'a>]) -> Result<()> {
        debug!("Interpreting {} statements", statements.len());

        for stmt in statements {
            if let Flow::Return(_) = self.execute(stmt)? {
                info!("Top-level return, abandoning remaining statements");

                break;
            }
        }

        info!("Interpretation completed");

        Ok(())
    }

    /// Executes a single statement.
    pub fn execute(&mut self, stmt: &Stmt<'a>) -> Result<Flow> {
        match stmt {
            Stmt::Expression(expr) => {
                let _ = self.evaluate(expr)?;

                Ok(Flow::Normal)
            }

            Stmt::Print(expressions) => {
                // Arguments evaluate left to right before anything is
                // written, so a failing argument prints nothing.
                let mut parts: Vec<String> = Vec::with_capacity(expressions.len());

                for expr in expressions {
                    parts.push(self.evaluate(expr)?.text().to_owned());
                }

                writeln!(self.out, "{}", parts.join(" "))?;

                Ok(Flow::Normal)
            }

            Stmt::Var { name, initializer } => {
                let value: Value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::empty(),
                };

                debug!("Variable '{}' bound to {:?}", name.lexeme, value);

                self.environment.borrow_mut().define(name.lexeme, value);

                Ok(Flow::Normal)
            }

            Stmt::Block(statements) => {
                debug!("Entering block with {} statements", statements.len());

                let previous: Rc<RefCell<Environment<'a>>> = self.environment.clone();

                self.environment =
                    Rc::new(RefCell::new(Environment::with_enclosing(previous.clone())));

                let result: Result<Flow> = self.execute_sequence(statements);

                self.environment = previous;

                result
            }

            // Branch bodies run in the caller's scope; only explicit blocks
            // and calls push a fresh one.
            Stmt::IfElseBlock(statements) => self.execute_sequence(statements),

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_stmt) = else_branch {
                    self.execute(else_stmt)
                } else {
                    Ok(Flow::Normal)
                }
            }

            Stmt::Function { name, params, body } => {
                debug!(
                    "Defining function '{}' with {} parameters",
                    name.lexeme,
                    params.len()
                );

                let function = Function {
                    name: name.lexeme.to_string(),
                    params: params.iter().map(|p| p.lexeme.to_string()).collect(),
                    body: body.clone(),
                };

                self.environment
                    .borrow_mut()
                    .define_function(name.lexeme, Rc::new(function));

                Ok(Flow::Normal)
            }

            Stmt::Return { keyword: _, value } => {
                let value: Value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::empty(),
                };

                debug!("Returning {:?}", value);

                Ok(Flow::Return(value))
            }
        }
    }

    /// Run a statement list in the current scope, propagating an unwinding
    /// `return` as soon as it appears.
    fn execute_sequence(&mut self, statements: &[Stmt<'a>]) -> Result<Flow> {
        for stmt in statements {
            if let Flow::Return(value) = self.execute(stmt)? {
                return Ok(Flow::Return(value));
            }
        }

        Ok(Flow::Normal)
    }

    /// Evaluates an expression and returns a [`Value`].
    pub fn evaluate(&mut self, expr: &Expr<'a>) -> Result<Value> {
        match expr {
            Expr::Literal(token) => self.evaluate_literal(token),

            Expr::Variable(token) => self
                .environment
                .borrow()
                .get(token.lexeme, token.line),

            Expr::Assign { name, value } => {
                let value: Value = self.evaluate(value)?;

                // Assignment writes into the current scope only; the result
                // is the stored value.
                self.environment
                    .borrow_mut()
                    .define(name.lexeme, value.clone());

                Ok(value)
            }

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Logical {
                left,
                operator,
                right,
            } => self.evaluate_logical(left, operator, right),

            Expr::Unary { operator, right } => self.evaluate_unary(operator, right),

            Expr::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, operator, right),

            Expr::Call {
                callee,
                paren,
                arguments,
            } => self.evaluate_call(callee, paren, arguments),
        }
    }

    /// Evaluates a literal token.  `true`/`false`/`none` map onto their
    /// boolean/null texts; numbers and strings carry their own text.
    fn evaluate_literal(&self, token: &Token<'a>) -> Result<Value> {
        match &token.token_type {
            TokenType::NUMBER => Ok(Value::from(token.lexeme)),
            TokenType::STRING(s) => Ok(Value::from(s.as_str())),
            TokenType::TRUE => Ok(Value::from("true")),
            TokenType::FALSE => Ok(Value::from("false")),
            TokenType::NONE => Ok(Value::from("null")),
            _ => Err(MinipyError::runtime(token.line, "Invalid literal.")),
        }
    }

    /// Short-circuit evaluation: `or` returns a truthy left operand,
    /// `and` returns a falsy one, without touching the right side.
    fn evaluate_logical(
        &mut self,
        left: &Expr<'a>,
        operator: &Token<'a>,
        right: &Expr<'a>,
    ) -> Result<Value> {
        let left_val: Value = self.evaluate(left)?;

        match operator.token_type {
            TokenType::OR if left_val.is_truthy() => Ok(left_val),
            TokenType::AND if !left_val.is_truthy() => Ok(left_val),
            _ => self.evaluate(right),
        }
    }

    /// `!` negates truthiness into the `true`/`false` text domain; `-`
    /// negates a numeric-valid operand.
    fn evaluate_unary(&mut self, operator: &Token<'a>, right: &Expr<'a>) -> Result<Value> {
        let right_val: Value = self.evaluate(right)?;

        match operator.token_type {
            TokenType::BANG => Ok(Value::from_bool(!right_val.is_truthy())),

            TokenType::MINUS => {
                self.check_number_operand(operator, &right_val)?;

                self.checked(
                    operator.line,
                    right_val.as_int(operator.line)?.checked_neg(),
                )
            }

            _ => Err(MinipyError::runtime(operator.line, "Invalid unary operator.")),
        }
    }

    fn evaluate_binary(
        &mut self,
        left: &Expr<'a>,
        operator: &Token<'a>,
        right: &Expr<'a>,
    ) -> Result<Value> {
        let left_val: Value = self.evaluate(left)?;
        let right_val: Value = self.evaluate(right)?;
        let line: usize = operator.line;

        match operator.token_type {
            // `+` is integer addition when both sides are numeric-valid and
            // plain concatenation otherwise — never an error by itself.
            TokenType::PLUS => {
                if left_val.is_numeric() && right_val.is_numeric() {
                    self.checked(
                        line,
                        left_val.as_int(line)?.checked_add(right_val.as_int(line)?),
                    )
                } else {
                    Ok(Value::from(format!(
                        "{}{}",
                        left_val.text(),
                        right_val.text()
                    )))
                }
            }

            TokenType::MINUS => {
                self.check_number_operands(operator, &left_val, &right_val)?;

                self.checked(
                    line,
                    left_val.as_int(line)?.checked_sub(right_val.as_int(line)?),
                )
            }

            TokenType::STAR => {
                self.check_number_operands(operator, &left_val, &right_val)?;

                self.checked(
                    line,
                    left_val.as_int(line)?.checked_mul(right_val.as_int(line)?),
                )
            }

            TokenType::SLASH => {
                self.check_number_operands(operator, &left_val, &right_val)?;

                let divisor: i64 = right_val.as_int(line)?;

                if divisor == 0 {
                    return Err(MinipyError::runtime(line, "Division by zero."));
                }

                // i64 division truncates toward zero; `checked_div` still
                // rejects the one overflowing quotient (i64::MIN / -1).
                self.checked(line, left_val.as_int(line)?.checked_div(divisor))
            }

            TokenType::GREATER => self.compare(operator, &left_val, &right_val, |o| o.is_gt()),

            TokenType::GREATER_EQUAL => self.compare(operator, &left_val, &right_val, |o| o.is_ge()),

            TokenType::LESS => self.compare(operator, &left_val, &right_val, |o| o.is_lt()),

            TokenType::LESS_EQUAL => self.compare(operator, &left_val, &right_val, |o| o.is_le()),

            // Equality is plain text equality with no coercion, always legal.
            TokenType::EQUAL_EQUAL => Ok(Value::from_bool(left_val == right_val)),

            TokenType::BANG_EQUAL => Ok(Value::from_bool(left_val != right_val)),

            _ => Err(MinipyError::runtime(line, "Invalid binary operator.")),
        }
    }

    /// Ordering comparison: integers when both operands are numeric-valid,
    /// lexicographic when both are not, a type error when mixed.
    fn compare(
        &self,
        operator: &Token<'a>,
        left: &Value,
        right: &Value,
        accept: fn(std::cmp::Ordering) -> bool,
    ) -> Result<Value> {
        let ordering: std::cmp::Ordering = match (left.is_numeric(), right.is_numeric()) {
            (true, true) => left
                .as_int(operator.line)?
                .cmp(&right.as_int(operator.line)?),

            (false, false) => left.text().cmp(right.text()),

            _ => {
                return Err(MinipyError::runtime(
                    operator.line,
                    "Operands must have matching types!",
                ));
            }
        };

        Ok(Value::from_bool(accept(ordering)))
    }

    /// Resolve the callee to a function name, evaluate arguments left to
    /// right, and invoke with a fresh activation scope enclosing the scope
    /// active *at the call site*.
    fn evaluate_call(
        &mut self,
        callee: &Expr<'a>,
        paren: &Token<'a>,
        arguments: &[Expr<'a>],
    ) -> Result<Value> {
        let callee_val: Value = self.evaluate(callee)?;

        let function: Rc<Function<'a>> = self
            .environment
            .borrow()
            .get_function(callee_val.text(), paren.line)?;

        let mut arg_values: Vec<Value> = Vec::with_capacity(arguments.len());

        for arg in arguments {
            arg_values.push(self.evaluate(arg)?);
        }

        if arg_values.len() != function.arity() {
            return Err(MinipyError::runtime(
                paren.line,
                format!(
                    "Expected {} arguments but got {}.",
                    function.arity(),
                    arg_values.len()
                ),
            ));
        }

        debug!(
            "Calling function '{}' with {} arguments",
            function.name,
            arg_values.len()
        );

        // Activation: parameters and locals live in a new scope whose
        // enclosing link is the call-site scope.  No closures.
        let previous: Rc<RefCell<Environment<'a>>> = self.environment.clone();

        self.environment = Rc::new(RefCell::new(Environment::with_enclosing(previous.clone())));

        for (param, arg_value) in function.params.iter().zip(arg_values) {
            self.environment.borrow_mut().define(param, arg_value);
        }

        let result: Result<Flow> = self.execute_sequence(&function.body);

        self.environment = previous;

        match result? {
            // Falling off the end without `return` yields the empty text.
            Flow::Normal => Ok(Value::empty()),

            Flow::Return(value) => {
                info!("Function '{}' returned {:?}", function.name, value);

                Ok(value)
            }
        }
    }

    /// Map a checked `i64` operation onto a value, or the overflow failure
    /// for the source line.
    fn checked(&self, line: usize, result: Option<i64>) -> Result<Value> {
        match result {
            Some(n) => Ok(Value::from_int(n)),
            None => Err(MinipyError::runtime(line, "Integer overflow.")),
        }
    }

    fn check_number_operand(&self, operator: &Token<'a>, operand: &Value) -> Result<()> {
        if operand.is_numeric() {
            return Ok(());
        }

        Err(MinipyError::runtime(
            operator.line,
            "Operand must be a number!",
        ))
    }

    fn check_number_operands(
        &self,
        operator: &Token<'a>,
        left: &Value,
        right: &Value,
    ) -> Result<()> {
        if left.is_numeric() && right.is_numeric() {
            return Ok(());
        }

        Err(MinipyError::runtime(
            operator.line,
            "Operands must be numbers!",
        ))
    }
}
