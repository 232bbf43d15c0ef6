/*!
Recursive-descent parser for the Loxide dialect.

Grammar (EBNF — condensed)
--------------------------

```text
program        → declaration* EOF ;

declaration    → classDecl | funDecl | varDecl | statement ;
classDecl      → "class" IDENT ( "<" IDENT )? "{" memberDecl* "}" ;
memberDecl     → "class" function            // static method
               | IDENT block                 // getter (no parameter list)
               | function ;                  // instance method
funDecl        → "fun" function ;
function       → IDENT "(" parameters? ")" block ;
parameters     → IDENT ( "," IDENT )* ;
varDecl        → "var" IDENT ( "=" comma )? ";" ;

statement      → exprStmt | printStmt | whileStmt | forStmt | doWhileStmt
               | breakStmt | continueStmt | returnStmt | ifStmt | block ;
whileStmt      → "while" "(" comma ")" statement ;
forStmt        → "for" "(" ( varDecl | exprStmt | ";" )
                     comma? ";" comma? ")" statement ;
doWhileStmt    → "do" statement "while" "(" comma ")" ";" ;
breakStmt      → "break" ";" ;
continueStmt   → "continue" ";" ;
returnStmt     → "return" comma? ";" ;
ifStmt         → "if" "(" comma ")" statement ( "else" statement )? ;
exprStmt       → comma ";" ;
printStmt      → "print" comma ";" ;
block          → "{" declaration* "}" ;

comma          → ternary ( "," ternary )* ;
ternary        → expression ( "?" ternary ":" ternary )? ;
expression     → assignment ;
assignment     → ( call "." )? IDENT "=" assignment | logic_or ;
logic_or       → logic_and ( "or" logic_and )* ;
logic_and      → equality ( "and" equality )* ;
equality       → logic ( ( "!=" | "==" ) logic )* ;
logic          → comparison ( ( "&" | "|" ) comparison )* ;
comparison     → term ( ( ">" | ">=" | "<" | "<=" ) term )* ;
term           → factor ( ( "-" | "+" ) factor )* ;
factor         → unary ( ( "/" | "*" ) unary )* ;
unary          → ( "!" | "-" ) unary | lambda | postfix ;
lambda         → "fun" "(" parameters? ")" block ;
postfix        → call ( "++" | "--" )? ;
call           → primary ( "(" arguments? ")" | "." IDENT )* ;
arguments      → ternary ( "," ternary )* ;
primary        → NUMBER | STRING | "true" | "false" | "nil"
               | "(" comma ")" | IDENT | "this"
               | "super" "." IDENT ;
```

`for` and `do-while` are desugared on the spot: `for` into an optional
initializer block wrapping a `while` whose body appends the increment, and
`do-while` into a block running the body once before the equivalent `while`.

Error handling is two-tier.  Hard errors propagate as `Err` and trigger
panic-mode recovery in `declaration` (tokens are discarded up to the next
statement boundary, then parsing resumes).  An invalid assignment target is
soft: it is recorded at the `=` token and the malformed assignment parses as
its right-hand expression.  `parse` therefore always returns a statement
list; callers must check [`Parser::errors`] before executing anything.
*/

use std::rc::Rc;

use crate::ast::{Expr, ExprId, FunctionDecl, LiteralValue, Stmt};
use crate::error::{LoxError, Result};
use crate::token::{Token, TokenType};

use log::{debug, info};

/// Top-level parser over an immutable slice of tokens.
pub struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
    next_id: ExprId,
    errors: Vec<LoxError>,
}

impl<'a> Parser<'a> {
    /// Construct a new parser.  Node ids start at zero.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self::with_base_id(tokens, 0)
    }

    /// Construct a parser whose node ids start at `base`.  The prompt loop
    /// uses this so ids stay unique across successively parsed lines (stale
    /// closures keep their resolved ids alive).
    pub fn with_base_id(tokens: &'a [Token], base: ExprId) -> Self {
        info!("Parser created with {} tokens", tokens.len());

        Self {
            tokens,
            current: 0,
            next_id: base,
            errors: Vec::new(),
        }
    }

    // ───────────────────────── public API ─────────────────────────

    /// Parse an entire program and return its statement list.  Statements
    /// that failed to parse are dropped after recovery; the corresponding
    /// errors are retained in [`Parser::errors`].
    pub fn parse(&mut self) -> Vec<Stmt> {
        info!("Beginning parse phase");

        let mut statements: Vec<Stmt> = Vec::new();

        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        statements
    }

    /// Syntax errors recorded so far.
    pub fn errors(&self) -> &[LoxError] {
        &self.errors
    }

    /// Drain the recorded syntax errors.
    pub fn take_errors(&mut self) -> Vec<LoxError> {
        std::mem::take(&mut self.errors)
    }

    /// One past the highest node id handed out.
    pub fn next_id(&self) -> ExprId {
        self.next_id
    }

    /// Allocate a fresh resolvable-node id.
    #[inline]
    fn new_id(&mut self) -> ExprId {
        let id: ExprId = self.next_id;
        self.next_id += 1;

        id
    }

    // ──────────────────────── declaration rules ───────────────────

    fn declaration(&mut self) -> Option<Stmt> {
        debug!("Entering declaration");

        let result = if self.matches(TokenType::CLASS) {
            self.class_declaration()
        } else if self.check(TokenType::FUN) && self.check_next(TokenType::IDENTIFIER) {
            self.advance(); // consume 'fun'
            self.function("function").map(Stmt::Function)
        } else if self.matches(TokenType::VAR) {
            self.var_declaration()
        } else {
            self.statement()
        };

        match result {
            Ok(stmt) => Some(stmt),

            Err(e) => {
                debug!("Parse error, synchronizing: {}", e);

                self.errors.push(e);
                self.synchronize();

                None
            }
        }
    }

    fn class_declaration(&mut self) -> Result<Stmt> {
        let name: Token = self
            .consume(TokenType::IDENTIFIER, "Expected class name")?
            .clone();

        let superclass: Option<Expr> = if self.matches(TokenType::LESS) {
            let super_name: Token = self
                .consume(TokenType::IDENTIFIER, "Expected superclass name")?
                .clone();
            let id: ExprId = self.new_id();

            Some(Expr::Variable {
                name: super_name,
                id,
            })
        } else {
            None
        };

        self.consume(TokenType::LEFT_BRACE, "Expected '{' before class body")?;

        let mut methods: Vec<Rc<FunctionDecl>> = Vec::new();
        let mut static_methods: Vec<Rc<FunctionDecl>> = Vec::new();
        let mut getters: Vec<Rc<FunctionDecl>> = Vec::new();

        while !self.check(TokenType::RIGHT_BRACE) && !self.is_at_end() {
            if self.matches(TokenType::CLASS) {
                // 'class'-prefixed member: a static method
                static_methods.push(self.function("static method")?);
            } else if self.check(TokenType::IDENTIFIER) && self.check_next(TokenType::LEFT_BRACE) {
                // identifier directly followed by '{': a getter
                let getter_name: Token = self.advance().clone();

                self.consume(TokenType::LEFT_BRACE, "Expected '{' before getter body")?;
                let body: Vec<Stmt> = self.block()?;

                getters.push(Rc::new(FunctionDecl {
                    name: Some(getter_name),
                    params: Vec::new(),
                    body,
                }));
            } else {
                methods.push(self.function("method")?);
            }
        }

        self.consume(TokenType::RIGHT_BRACE, "Expected '}' after class body")?;

        Ok(Stmt::Class {
            name,
            methods,
            static_methods,
            getters,
            superclass,
        })
    }

    fn function(&mut self, kind: &str) -> Result<Rc<FunctionDecl>> {
        let name: Token = self
            .consume(TokenType::IDENTIFIER, format!("Expected {} name", kind))?
            .clone();

        self.consume(
            TokenType::LEFT_PAREN,
            format!("Expected '(' after {} name", kind),
        )?;
        let params: Vec<Token> = self.parameters()?;

        self.consume(
            TokenType::LEFT_BRACE,
            format!("Expected '{{' before {} body", kind),
        )?;
        let body: Vec<Stmt> = self.block()?;

        Ok(Rc::new(FunctionDecl {
            name: Some(name),
            params,
            body,
        }))
    }

    /// Parse `parameters? ")"` — the shared tail of named functions,
    /// methods, and lambdas.
    fn parameters(&mut self) -> Result<Vec<Token>> {
        let mut params: Vec<Token> = Vec::new();

        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                if params.len() >= 255 {
                    return Err(LoxError::parse(
                        self.peek().line,
                        "Cannot have more than 255 parameters",
                    ));
                }

                params.push(
                    self.consume(TokenType::IDENTIFIER, "Expected parameter name")?
                        .clone(),
                );

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after parameters")?;

        Ok(params)
    }

    fn var_declaration(&mut self) -> Result<Stmt> {
        let name: Token = self
            .consume(TokenType::IDENTIFIER, "Expected variable name")?
            .clone();

        let initializer: Option<Expr> = if self.matches(TokenType::EQUAL) {
            Some(self.comma()?)
        } else {
            None
        };

        self.consume(
            TokenType::SEMICOLON,
            "Expected ';' after variable declaration",
        )?;

        Ok(Stmt::Var { name, initializer })
    }

    // ───────────────────────── statement rules ────────────────────

    fn statement(&mut self) -> Result<Stmt> {
        debug!("Entering statement");

        if self.matches(TokenType::DO) {
            self.do_while_statement()
        } else if self.matches(TokenType::BREAK) {
            self.break_statement()
        } else if self.matches(TokenType::CONTINUE) {
            self.continue_statement()
        } else if self.matches(TokenType::RETURN) {
            self.return_statement()
        } else if self.matches(TokenType::WHILE) {
            self.while_statement()
        } else if self.matches(TokenType::FOR) {
            self.for_statement()
        } else if self.matches(TokenType::IF) {
            self.if_statement()
        } else if self.matches(TokenType::PRINT) {
            self.print_statement()
        } else if self.matches(TokenType::LEFT_BRACE) {
            Ok(Stmt::Block(self.block()?))
        } else {
            self.expression_statement()
        }
    }

    /// `for` desugars immediately:
    /// `for (init; cond; incr) body` ⇒ `{ init; while (cond) { body; incr; } }`
    fn for_statement(&mut self) -> Result<Stmt> {
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'for'")?;

        let initializer: Option<Stmt> = if self.matches(TokenType::SEMICOLON) {
            None
        } else if self.matches(TokenType::VAR) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition: Option<Expr> = if !self.check(TokenType::SEMICOLON) {
            Some(self.comma()?)
        } else {
            None
        };
        self.consume(TokenType::SEMICOLON, "Expected ';' after loop condition")?;

        let increment: Option<Expr> = if !self.check(TokenType::RIGHT_PAREN) {
            Some(self.comma()?)
        } else {
            None
        };
        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after for clauses")?;

        let mut body: Stmt = self.statement()?;

        if let Some(incr) = increment {
            body = Stmt::Block(vec![body, Stmt::Expression(incr)]);
        }

        let condition: Expr = condition.unwrap_or(Expr::Literal(LiteralValue::True));

        body = Stmt::While {
            condition,
            body: Box::new(body),
        };

        if let Some(init) = initializer {
            body = Stmt::Block(vec![init, body]);
        }

        Ok(body)
    }

    /// `do body while (cond);` ⇒ `{ body while (cond) body }` — the body
    /// runs once, then the ordinary `while` takes over.  The clone shares
    /// node ids with the original, so resolution covers both copies.
    fn do_while_statement(&mut self) -> Result<Stmt> {
        let body: Stmt = self.statement()?;

        self.consume(TokenType::WHILE, "Expected 'while' after do body")?;
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'while'")?;
        let condition: Expr = self.comma()?;
        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after while condition")?;
        self.consume(TokenType::SEMICOLON, "Expected ';' after while clauses")?;

        let repeat: Stmt = Stmt::While {
            condition,
            body: Box::new(body.clone()),
        };

        Ok(Stmt::Block(vec![body, repeat]))
    }

    fn break_statement(&mut self) -> Result<Stmt> {
        let keyword: Token = self.previous().clone();

        self.consume(TokenType::SEMICOLON, "Expected ';' after 'break'")?;

        Ok(Stmt::Break(keyword))
    }

    fn continue_statement(&mut self) -> Result<Stmt> {
        let keyword: Token = self.previous().clone();

        self.consume(TokenType::SEMICOLON, "Expected ';' after 'continue'")?;

        Ok(Stmt::Continue(keyword))
    }

    fn return_statement(&mut self) -> Result<Stmt> {
        let keyword: Token = self.previous().clone();

        let value: Option<Expr> = if !self.check(TokenType::SEMICOLON) {
            Some(self.comma()?)
        } else {
            None
        };

        self.consume(TokenType::SEMICOLON, "Expected ';' after return value")?;

        Ok(Stmt::Return { keyword, value })
    }

    fn while_statement(&mut self) -> Result<Stmt> {
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'while'")?;
        let condition: Expr = self.comma()?;
        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after condition")?;

        let body: Box<Stmt> = Box::new(self.statement()?);

        Ok(Stmt::While { condition, body })
    }

    fn if_statement(&mut self) -> Result<Stmt> {
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'if'")?;
        let condition: Expr = self.comma()?;
        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after condition")?;

        let then_branch: Box<Stmt> = Box::new(self.statement()?);
        let else_branch: Option<Box<Stmt>> = if self.matches(TokenType::ELSE) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn print_statement(&mut self) -> Result<Stmt> {
        let value: Expr = self.comma()?;

        self.consume(TokenType::SEMICOLON, "Expected ';' after value")?;

        Ok(Stmt::Print(value))
    }

    fn expression_statement(&mut self) -> Result<Stmt> {
        let expr: Expr = self.comma()?;

        self.consume(TokenType::SEMICOLON, "Expected ';' after expression")?;

        Ok(Stmt::Expression(expr))
    }

    fn block(&mut self) -> Result<Vec<Stmt>> {
        let mut statements: Vec<Stmt> = Vec::new();

        while !self.check(TokenType::RIGHT_BRACE) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        self.consume(TokenType::RIGHT_BRACE, "Expected '}' after block")?;

        Ok(statements)
    }

    // ───────────────────────── expression rules ───────────────────

    /// The comma operator: a left-associated Binary chain whose operator is
    /// the comma token itself.  The interpreter special-cases it to
    /// "evaluate left, discard, return right".
    fn comma(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.ternary()?;

        while self.matches(TokenType::COMMA) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.ternary()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    /// Ternary branches recurse at ternary level, so
    /// `a ? b ? c : d : e` nests to the right.  The scanner already
    /// guarantees question-mark/colon balance.
    fn ternary(&mut self) -> Result<Expr> {
        let expr: Expr = self.expression()?;

        if self.matches(TokenType::TERNARY_QUESTION_MARK) {
            let then_branch: Expr = self.ternary()?;

            self.consume(
                TokenType::TERNARY_COLON,
                "Expected ':' after ternary branch",
            )?;

            let else_branch: Expr = self.ternary()?;

            return Ok(Expr::Ternary {
                condition: Box::new(expr),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            });
        }

        Ok(expr)
    }

    fn expression(&mut self) -> Result<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<Expr> {
        let expr: Expr = self.logical_or()?;

        if self.matches(TokenType::EQUAL) {
            let equals: Token = self.previous().clone();
            let value: Expr = self.assignment()?;

            match expr {
                Expr::Variable { name, .. } => {
                    let id: ExprId = self.new_id();

                    return Ok(Expr::Assign {
                        name,
                        value: Box::new(value),
                        id,
                    });
                }

                Expr::Get { object, name } => {
                    return Ok(Expr::Set {
                        object,
                        name,
                        value: Box::new(value),
                    });
                }

                _ => {
                    // Soft error: record it and keep the right-hand tree so
                    // parsing continues without panic-mode recovery.
                    self.errors
                        .push(LoxError::parse(equals.line, "Invalid assignment target"));

                    return Ok(value);
                }
            }
        }

        Ok(expr)
    }

    fn logical_or(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.logical_and()?;

        while self.matches(TokenType::OR) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.logical_and()?;

            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn logical_and(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.equality()?;

        while self.matches(TokenType::AND) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.equality()?;

            expr = Expr::Logical {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.logic()?;

        while self.matches(TokenType::BANG_EQUAL) || self.matches(TokenType::EQUAL_EQUAL) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.logic()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    /// Non-short-circuit `&` / `|`: one left-associative tier between
    /// equality and comparison.
    fn logic(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.comparison()?;

        while self.matches(TokenType::LOGIC_AND) || self.matches(TokenType::LOGIC_OR) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.comparison()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.term()?;

        while self.matches(TokenType::GREATER)
            || self.matches(TokenType::GREATER_EQUAL)
            || self.matches(TokenType::LESS)
            || self.matches(TokenType::LESS_EQUAL)
        {
            let operator: Token = self.previous().clone();
            let right: Expr = self.term()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.factor()?;

        while self.matches(TokenType::MINUS) || self.matches(TokenType::PLUS) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.factor()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.unary()?;

        while self.matches(TokenType::STAR) || self.matches(TokenType::SLASH) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.unary()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr> {
        if self.matches(TokenType::BANG) || self.matches(TokenType::MINUS) {
            let operator: Token = self.previous().clone();
            let right: Expr = self.unary()?;

            return Ok(Expr::Unary {
                operator,
                right: Box::new(right),
            });
        }

        // A 'fun' reaching expression position is always anonymous: named
        // declarations were claimed by `declaration` via two-token lookahead.
        if self.matches(TokenType::FUN) {
            return self.lambda();
        }

        self.postfix()
    }

    fn lambda(&mut self) -> Result<Expr> {
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'fun'")?;
        let params: Vec<Token> = self.parameters()?;

        self.consume(TokenType::LEFT_BRACE, "Expected '{' before lambda body")?;
        let body: Vec<Stmt> = self.block()?;

        Ok(Expr::Lambda(Rc::new(FunctionDecl {
            name: None,
            params,
            body,
        })))
    }

    /// Postfix `++` / `--` sits above call/property access so property
    /// targets (`obj.count++`) work.  Only Variable and Get targets are
    /// legal, mirroring parse-time assignment-target validation.
    fn postfix(&mut self) -> Result<Expr> {
        let expr: Expr = self.call()?;

        if self.matches(TokenType::PLUS_PLUS) || self.matches(TokenType::MINUS_MINUS) {
            let operator: Token = self.previous().clone();

            return match expr {
                Expr::Variable { .. } | Expr::Get { .. } => Ok(Expr::SelfIncOrDecr {
                    operator,
                    target: Box::new(expr),
                }),

                _ => Err(LoxError::parse(operator.line, "Invalid increment target")),
            };
        }

        Ok(expr)
    }

    fn call(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.primary()?;

        loop {
            if self.matches(TokenType::LEFT_PAREN) {
                expr = self.finish_call(expr)?;
            } else if self.matches(TokenType::DOT) {
                let name: Token = self
                    .consume(TokenType::IDENTIFIER, "Expected property name after '.'")?
                    .clone();

                expr = Expr::Get {
                    object: Box::new(expr),
                    name,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Arguments parse at ternary level; the comma is the separator here,
    /// not the operator.
    fn finish_call(&mut self, callee: Expr) -> Result<Expr> {
        let mut arguments: Vec<Expr> = Vec::new();

        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                if arguments.len() >= 255 {
                    return Err(LoxError::parse(
                        self.peek().line,
                        "Cannot have more than 255 arguments",
                    ));
                }

                arguments.push(self.ternary()?);

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        let paren: Token = self
            .consume(TokenType::RIGHT_PAREN, "Expected ')' after arguments")?
            .clone();

        Ok(Expr::Call {
            callee: Box::new(callee),
            paren,
            arguments,
        })
    }

    fn primary(&mut self) -> Result<Expr> {
        if self.matches(TokenType::FALSE) {
            return Ok(Expr::Literal(LiteralValue::False));
        }
        if self.matches(TokenType::TRUE) {
            return Ok(Expr::Literal(LiteralValue::True));
        }
        if self.matches(TokenType::NIL) {
            return Ok(Expr::Literal(LiteralValue::Nil));
        }

        if self.matches(TokenType::NUMBER(0.0)) {
            if let TokenType::NUMBER(n) = &self.previous().token_type {
                return Ok(Expr::Literal(LiteralValue::Number(*n)));
            }
        }

        if let TokenType::STRING(s) = &self.peek().token_type {
            let literal: String = s.clone();
            self.advance();

            return Ok(Expr::Literal(LiteralValue::Str(literal)));
        }

        if self.matches(TokenType::SUPER) {
            let keyword: Token = self.previous().clone();

            self.consume(TokenType::DOT, "Expected '.' after 'super'")?;
            let method: Token = self
                .consume(TokenType::IDENTIFIER, "Expected superclass method name")?
                .clone();
            let id: ExprId = self.new_id();

            return Ok(Expr::Super {
                keyword,
                method,
                id,
            });
        }

        if self.matches(TokenType::THIS) {
            let keyword: Token = self.previous().clone();
            let id: ExprId = self.new_id();

            return Ok(Expr::This { keyword, id });
        }

        if self.matches(TokenType::IDENTIFIER) {
            let name: Token = self.previous().clone();
            let id: ExprId = self.new_id();

            return Ok(Expr::Variable { name, id });
        }

        if self.matches(TokenType::LEFT_PAREN) {
            let expr: Expr = self.comma()?;

            self.consume(TokenType::RIGHT_PAREN, "Expected ')' after expression")?;

            return Ok(Expr::Grouping(Box::new(expr)));
        }

        Err(LoxError::parse(self.peek().line, "Expected expression"))
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
    fn consume<S: Into<String>>(&mut self, ttype: TokenType, message: S) -> Result<&'a Token> {
        if self.check(ttype) {
            return Ok(self.advance());
        }

        Err(LoxError::parse(self.peek().line, message.into()))
    }

    #[inline(always)]
    fn check(&self, ttype: TokenType) -> bool {
        if self.is_at_end() {
            return false;
        }

        self.peek().token_type == ttype
    }

    /// Exception-free two-token lookahead; distinguishes `fun name(...)`
    /// from an anonymous `fun (...)` and a getter from a method.
    #[inline(always)]
    fn check_next(&self, ttype: TokenType) -> bool {
        if self.is_at_end() || self.current + 1 >= self.tokens.len() {
            return false;
        }

        self.tokens[self.current + 1].token_type == ttype
    }

    #[inline(always)]
    fn advance(&mut self) -> &'a Token {
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
    fn peek(&self) -> &'a Token {
        &self.tokens[self.current]
    }

    #[inline(always)]
    fn previous(&self) -> &'a Token {
        &self.tokens[self.current - 1]
    }

    /// Discards tokens until it thinks it is at a statement boundary.
    fn synchronize(&mut self) {
        self.advance(); // skip the token that caused the error

        while !self.is_at_end() {
            if matches!(self.previous().token_type, TokenType::SEMICOLON) {
                return;
            }

            match self.peek().token_type {
                TokenType::CLASS
                | TokenType::FUN
                | TokenType::VAR
                | TokenType::FOR
                | TokenType::IF
                | TokenType::WHILE
                | TokenType::PRINT
                | TokenType::RETURN => return,
                _ => {}
            }

            self.advance();
        }
    }
}
