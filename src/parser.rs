/*!
Recursive-descent parser over an immutable token slice.

Grammar (EBNF — condensed)
--------------------------

```text
program        → line* EOF ;
line           → INDENT* declaration ;
declaration    → funDecl | varDecl | statement ;
funDecl        → "def" IDENT "(" parameters? ")" ":" block ;
varDecl        → IDENT ( "=" expression )? line-end ;
statement      → ifStmt | returnStmt | printStmt | exprStmt ;
ifStmt         → "if" expression ":" block ( else-line ":" block )? ;
returnStmt     → "return" expression? line-end ;
printStmt      → "print" "(" expression ( "," expression )* ")" ;
exprStmt       → expression line-end ;
parameters     → IDENT ( "," IDENT )* ;            // at most 255
expression     → assignment ;
assignment     → IDENT "=" assignment | logic_or ;
logic_or       → logic_and ( "or" logic_and )* ;
logic_and      → equality  ( "and" equality )* ;
equality       → comparison ( ( "!=" | "==" ) comparison )* ;
comparison     → term ( ( ">" | ">=" | "<" | "<=" ) term )* ;
term           → factor ( ( "-" | "+" ) factor )* ;
factor         → unary ( ( "/" | "*" ) unary )* ;
unary          → ( "!" | "-" ) unary | call ;
call           → primary ( "(" arguments? ")" )* ;
arguments      → expression ( "," expression )* ;
primary        → NUMBER | STRING | "true" | "false" | "none"
               | IDENT | "(" expression ")" ;
```

There are no block delimiters.  Every newline produces an `INDENT(width)`
token and the parser keeps a running depth: a block opened with minimum
depth `d` consumes whole lines while the next pending line's depth is ≥ `d`,
and stops on a shallower line or end of input.  Consecutive `INDENT` tokens
are blank lines and collapse into the last one.  An `else` belongs to an
`if` only when the next non-blank line sits at the `if` line's own depth and
starts with the `else` keyword; at end of input there is no else clause.

A malformed declaration is recorded with its line and the parser
resynchronizes to the next indentation boundary, so one bad statement does
not abort the rest of the file.  `parse()` hands back both the statement
list and the collected errors.
*/

use std::mem;
use std::rc::Rc;

use crate::error::{MinipyError, Result};
use crate::expr::Expr;
use crate::stmt::Stmt;
use crate::token::{Token, TokenType};

use log::{debug, info};

/// Top-level parser over an immutable slice of tokens.
pub struct Parser<'a> {
    tokens: &'a [Token<'a>],
    current: usize,

    /// Indentation depth of the line currently being parsed.
    depth: usize,

    /// Declaration-level errors collected during recovery.
    errors: Vec<MinipyError>,
}

impl<'a> Parser<'a> {
    /// Construct a new parser.
    ///
    /// The token slice is expected to end with an `EOF` token, as the
    /// scanner guarantees; an empty slice parses to an empty program.
    pub fn new(tokens: &'a [Token<'a>]) -> Self {
        info!("Parser created with {} tokens", tokens.len());

        Self {
            tokens,
            current: 0,
            depth: 0,
            errors: Vec::new(),
        }
    }

    // ───────────────────────── public API ─────────────────────────

    /// Parse an entire program.  Returns the top-level statement list along
    /// with every declaration-level error encountered; statements that
    /// failed to parse are absent from the list.
    pub fn parse(&mut self) -> (Vec<Stmt<'a>>, Vec<MinipyError>) {
        info!("Beginning parse phase");

        let mut statements: Vec<Stmt<'a>> = Vec::new();

        while self.peek_line_depth().is_some() {
            self.begin_line();

            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        info!(
            "Parse phase complete: {} statements, {} errors",
            statements.len(),
            self.errors.len()
        );

        (statements, mem::take(&mut self.errors))
    }

    // ──────────────────────── line & depth protocol ───────────────

    /// Depth of the next non-blank line without consuming anything, or
    /// `None` at end of input (including trailing blank lines).
    ///
    /// When the cursor already sits on a real token (start of file), the
    /// current depth is still in effect.
    fn peek_line_depth(&self) -> Option<usize> {
        let mut i = self.current;
        let mut staged: Option<usize> = None;

        while let Some(TokenType::INDENT(width)) = self.tokens.get(i).map(|t| &t.token_type) {
            staged = Some(*width);
            i += 1;
        }

        match self.tokens.get(i) {
            Some(token) if !matches!(token.token_type, TokenType::EOF) => {
                Some(staged.unwrap_or(self.depth))
            }

            _ => None,
        }
    }

    /// First non-indentation token from the cursor, without consuming.
    fn peek_past_indents(&self) -> &'a Token<'a> {
        let mut i = self.current;

        while matches!(self.tokens[i].token_type, TokenType::INDENT(_)) {
            i += 1;
        }

        &self.tokens[i]
    }

    /// Consume the indentation run in front of the next statement, updating
    /// the running depth.  Consecutive indentation tokens are blank lines
    /// and collapse into the last one.
    fn begin_line(&mut self) {
        while let TokenType::INDENT(width) = self.peek().token_type {
            self.depth = width;
            self.advance();
        }
    }

    /// Does the cursor sit at a line boundary (indentation or end of input)?
    fn check_line_end(&self) -> bool {
        matches!(
            self.peek().token_type,
            TokenType::INDENT(_) | TokenType::EOF
        )
    }

    /// Parse statements while the pending line depth stays at or beyond
    /// `min_depth`.  Stops on a shallower line or end of input.
    fn block(&mut self, min_depth: usize) -> Vec<Stmt<'a>> {
        debug!("Entering block at min depth {}", min_depth);

        let mut statements: Vec<Stmt<'a>> = Vec::new();

        while let Some(depth) = self.peek_line_depth() {
            if depth < min_depth {
                break;
            }

            self.begin_line();

            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        statements
    }

    // ──────────────────────── declaration rules ───────────────────

    /// Parse one declaration, recovering locally on error: the failure is
    /// recorded and the cursor skips to the next indentation boundary.
    fn declaration(&mut self) -> Option<Stmt<'a>> {
        match self.declaration_inner() {
            Ok(stmt) => Some(stmt),

            Err(e) => {
                debug!("Declaration error, resynchronizing: {}", e);

                self.errors.push(e);
                self.synchronize();

                None
            }
        }
    }

    fn declaration_inner(&mut self) -> Result<Stmt<'a>> {
        debug!("Entering declaration at depth {}", self.depth);

        if self.matches(TokenType::DEF) {
            return self.function();
        }

        // A line of the form `IDENT` or `IDENT = …` declares (or rebinds) a
        // variable in the current scope.  Anything else, including a bare
        // call like `f(1)`, is an ordinary statement.
        if self.check(TokenType::IDENTIFIER) {
            match self.peek_next().token_type {
                TokenType::EQUAL | TokenType::INDENT(_) | TokenType::EOF => {
                    return self.var_declaration();
                }

                _ => {}
            }
        }

        self.statement()
    }

    fn function(&mut self) -> Result<Stmt<'a>> {
        let name: &Token<'_> = self.consume(TokenType::IDENTIFIER, "Expected function name")?;

        self.consume(TokenType::LEFT_PAREN, "Expected '(' after function name")?;

        let mut params: Vec<&Token<'_>> = Vec::new();

        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                if params.len() >= 255 {
                    return Err(MinipyError::parse(
                        name.line,
                        "Cannot have more than 255 parameters",
                    ));
                }

                params.push(self.consume(TokenType::IDENTIFIER, "Expected parameter name")?);

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after parameters")?;
        self.consume(TokenType::COLON, "Expected ':' before function body")?;

        // The body block sits at whatever depth its first line uses.
        let body: Vec<Stmt<'a>> = match self.peek_line_depth() {
            Some(depth) => self.block(depth),
            None => Vec::new(),
        };

        info!(
            "Parsed function '{}' with {} parameters, {} body statements",
            name.lexeme,
            params.len(),
            body.len()
        );

        Ok(Stmt::Function {
            name,
            params,
            body: Rc::new(body),
        })
    }

    fn var_declaration(&mut self) -> Result<Stmt<'a>> {
        let name: &Token<'_> = self.consume(TokenType::IDENTIFIER, "Expected variable name")?;

        let initializer: Option<Expr<'a>> = if self.matches(TokenType::EQUAL) {
            Some(self.expression()?)
        } else {
            None
        };

        Ok(Stmt::Var { name, initializer })
    }

    // ───────────────────────── statement rules ────────────────────

    fn statement(&mut self) -> Result<Stmt<'a>> {
        if self.matches(TokenType::IF) {
            self.if_statement()
        } else if self.matches(TokenType::RETURN) {
            self.return_statement()
        } else if self.matches(TokenType::PRINT) {
            self.print_statement()
        } else {
            self.expression_statement()
        }
    }

    fn if_statement(&mut self) -> Result<Stmt<'a>> {
        // Remember the depth of the `if` line itself; a matching `else`
        // must come back out to exactly this depth.
        let if_depth: usize = self.depth;

        let condition: Expr<'a> = self.expression()?;

        self.consume(TokenType::COLON, "Expected ':' after condition")?;

        let then_body: Vec<Stmt<'a>> = match self.peek_line_depth() {
            Some(depth) => self.block(depth),
            None => Vec::new(),
        };

        // Branch bodies share the caller's scope, hence IfElseBlock and not
        // Block.
        let then_branch: Box<Stmt<'a>> = Box::new(Stmt::IfElseBlock(then_body));

        let else_branch: Option<Box<Stmt<'a>>> = if self.peek_line_depth() == Some(if_depth)
            && matches!(self.peek_past_indents().token_type, TokenType::ELSE)
        {
            self.begin_line();
            self.advance(); // the `else` keyword

            self.consume(TokenType::COLON, "Expected ':' after 'else'")?;

            let else_body: Vec<Stmt<'a>> = match self.peek_line_depth() {
                Some(depth) => self.block(depth),
                None => Vec::new(),
            };

            Some(Box::new(Stmt::IfElseBlock(else_body)))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn return_statement(&mut self) -> Result<Stmt<'a>> {
        let keyword: &Token<'_> = self.previous();

        let value: Option<Expr<'a>> = if self.check_line_end() {
            None
        } else {
            Some(self.expression()?)
        };

        Ok(Stmt::Return { keyword, value })
    }

    fn print_statement(&mut self) -> Result<Stmt<'a>> {
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'print'")?;

        let mut expressions: Vec<Expr<'a>> = vec![self.expression()?];

        while self.matches(TokenType::COMMA) {
            expressions.push(self.expression()?);
        }

        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after arguments")?;

        Ok(Stmt::Print(expressions))
    }

    fn expression_statement(&mut self) -> Result<Stmt<'a>> {
        let expr: Expr<'a> = self.expression()?;

        Ok(Stmt::Expression(expr))
    }

    // ─────────────────────── expression rules ─────────────────────

    fn expression(&mut self) -> Result<Expr<'a>> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<Expr<'a>> {
        let expr: Expr<'a> = self.logical_or()?;

        if self.matches(TokenType::EQUAL) {
            let equals: &Token<'_> = self.previous();
            let value: Expr<'a> = self.assignment()?;

            // Only a bare variable reference is a valid target.
            if let Expr::Variable(name) = expr {
                return Ok(Expr::Assign {
                    name,
                    value: Box::new(value),
                });
            }

            return Err(MinipyError::parse(equals.line, "Invalid assignment target"));
        }

        Ok(expr)
    }

    fn logical_or(&mut self) -> Result<Expr<'a>> {
        let mut expr: Expr<'a> = self.logical_and()?;

        while self.matches(TokenType::OR) {
            let operator: &Token<'_> = self.previous();
            let right: Expr<'a> = self.logical_and()?;

            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn logical_and(&mut self) -> Result<Expr<'a>> {
        let mut expr: Expr<'a> = self.equality()?;

        while self.matches(TokenType::AND) {
            let operator: &Token<'_> = self.previous();
            let right: Expr<'a> = self.equality()?;

            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr<'a>> {
        let mut expr: Expr<'a> = self.comparison()?;

        while self.matches(TokenType::BANG_EQUAL) || self.matches(TokenType::EQUAL_EQUAL) {
            let operator: &Token<'_> = self.previous();
            let right: Expr<'a> = self.comparison()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr<'a>> {
        let mut expr: Expr<'a> = self.term()?;

        while self.matches(TokenType::GREATER)
            || self.matches(TokenType::GREATER_EQUAL)
            || self.matches(TokenType::LESS)
            || self.matches(TokenType::LESS_EQUAL)
        {
            let operator: &Token<'_> = self.previous();
            let right: Expr<'a> = self.term()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr<'a>> {
        let mut expr: Expr<'a> = self.factor()?;

        while self.matches(TokenType::MINUS) || self.matches(TokenType::PLUS) {
            let operator: &Token<'_> = self.previous();
            let right: Expr<'a> = self.factor()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr<'a>> {
        let mut expr: Expr<'a> = self.unary()?;

        while self.matches(TokenType::STAR) || self.matches(TokenType::SLASH) {
            let operator: &Token<'_> = self.previous();
            let right: Expr<'a> = self.unary()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr<'a>> {
        if self.matches(TokenType::BANG) || self.matches(TokenType::MINUS) {
            let operator: &Token<'_> = self.previous();
            let right: Expr<'a> = self.unary()?;

            return Ok(Expr::Unary {
                operator,
                right: Box::new(right),
            });
        }

        self.call()
    }

    fn call(&mut self) -> Result<Expr<'a>> {
        let mut expr: Expr<'a> = self.primary()?;

        while self.matches(TokenType::LEFT_PAREN) {
            expr = self.finish_call(expr)?;
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr<'a>) -> Result<Expr<'a>> {
        let mut arguments: Vec<Expr<'a>> = Vec::new();

        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                arguments.push(self.expression()?);

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        let paren: &Token<'_> =
            self.consume(TokenType::RIGHT_PAREN, "Expected ')' after arguments")?;

        Ok(Expr::Call {
            callee: Box::new(callee),
            paren,
            arguments,
        })
    }

    fn primary(&mut self) -> Result<Expr<'a>> {
        if self.matches(TokenType::FALSE)
            || self.matches(TokenType::TRUE)
            || self.matches(TokenType::NONE)
            || self.matches(TokenType::NUMBER)
        {
            return Ok(Expr::Literal(self.previous()));
        }

        if let TokenType::STRING(_) = self.peek().token_type {
            self.advance();

            return Ok(Expr::Literal(self.previous()));
        }

        if self.matches(TokenType::IDENTIFIER) {
            return Ok(Expr::Variable(self.previous()));
        }

        if self.matches(TokenType::LEFT_PAREN) {
            let expr: Expr<'a> = self.expression()?;

            self.consume(TokenType::RIGHT_PAREN, "Expected ')' after expression")?;

            return Ok(Expr::Grouping(Box::new(expr)));
        }

        Err(MinipyError::parse(self.error_line(), "Expected expression"))
    }

    // ────────────────────── utility helpers ───────────────────────

    #[inline(always)]
    fn matches(&mut self, ttype: TokenType) -> bool {
        if self.check(ttype) {
            self.advance();

            return true;
        }

        false
    }

    #[inline(always)]
    fn consume(&mut self, ttype: TokenType, message: &str) -> Result<&'a Token<'a>> {
        if self.check(ttype) {
            return Ok(self.advance());
        }

        Err(MinipyError::parse(self.error_line(), message))
    }

    /// Line to report an error against.  When the cursor already moved onto
    /// the next line's indentation (or EOF), the offending statement is the
    /// one that just ended.
    fn error_line(&self) -> usize {
        match self.peek().token_type {
            TokenType::INDENT(_) | TokenType::EOF if self.current > 0 => self.previous().line,
            _ => self.peek().line,
        }
    }

    #[inline(always)]
    fn check(&self, ttype: TokenType) -> bool {
        if self.is_at_end() {
            return false;
        }

        self.peek().token_type == ttype
    }

    #[inline(always)]
    fn advance(&mut self) -> &'a Token<'a> {
        if !self.is_at_end() {
            self.current += 1;
        }

        self.previous()
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        matches!(self.peek().token_type, TokenType::EOF)
    }

    #[inline(always)]
    fn peek(&self) -> &'a Token<'a> {
        &self.tokens[self.current]
    }

    #[inline(always)]
    fn peek_next(&self) -> &'a Token<'a> {
        let i: usize = (self.current + 1).min(self.tokens.len() - 1);

        &self.tokens[i]
    }

    #[inline(always)]
    fn previous(&self) -> &'a Token<'a> {
        &self.tokens[self.current - 1]
    }

    /// Skip tokens until the next indentation boundary so parsing resumes
    /// with the following line.
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            if matches!(self.peek().token_type, TokenType::INDENT(_)) {
                return;
            }

            self.advance();
        }
    }
}
