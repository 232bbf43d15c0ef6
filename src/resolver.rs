//! Static resolver pass.
//!
//! One AST walk that does three things:
//! 1. Builds lexical scopes (a stack of `HashMap<String, bool>` tracking
//!    declared/defined) mirroring exactly the environment chain the
//!    interpreter will build.
//! 2. Reports static errors (redeclaration, self-referential initializer,
//!    misplaced `return`/`break`/`continue`/`this`/`super`) and keeps going —
//!    the driver refuses to execute if anything was reported.
//! 3. Records, for each Variable/Assign/This/Super occurrence found in some
//!    scope, the number of environment hops from the innermost scope to the
//!    declaring one, keyed by the node's parser-assigned id.  Names found in
//!    no scope get no entry and fall back to dynamic global lookup at
//!    runtime.

use std::collections::HashMap;

use log::{debug, info};

use crate::ast::{Expr, ExprId, FunctionDecl, Stmt};
use crate::error::LoxError;
use crate::token::Token;

/// Side table mapping resolvable node ids to environment hop counts.
#[derive(Debug, Default)]
pub struct Resolutions {
    depths: HashMap<ExprId, usize>,
}

impl Resolutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ExprId, depth: usize) {
        self.depths.insert(id, depth);
    }

    /// Hop count for `id`, if the node resolved to a local.
    pub fn depth_of(&self, id: ExprId) -> Option<usize> {
        self.depths.get(&id).copied()
    }

    /// Merge another table in (the prompt loop accumulates one table across
    /// successively resolved lines).
    pub fn extend(&mut self, other: Resolutions) {
        self.depths.extend(other.depths);
    }
}

/// Which callable (and loop) context encloses the code being resolved.
/// `return`/`break`/`continue` legality is decided from this state alone.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FunctionType {
    None,
    Function,
    Method,
    StaticMethod,
    Initializer,
    /// Loop body with no enclosing function.
    While,
    /// Loop body inside a function or lambda.
    FunctionWhile,
    /// Loop body inside a method-like context.
    MethodWhile,
}

/// Are we inside a class body, and does it have a superclass?
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

/// Resolver: tracks scopes, enforces static rules, and records binding
/// distances (locals vs. globals) into a [`Resolutions`] table.
pub struct Resolver {
    scopes: Vec<HashMap<String, bool>>, // false=declared, true=defined
    resolutions: Resolutions,
    errors: Vec<LoxError>,
    current_function: FunctionType,
    current_class: ClassType,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    pub fn new() -> Self {
        info!("Resolver instantiated");

        Resolver {
            scopes: Vec::new(),
            resolutions: Resolutions::new(),
            errors: Vec::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
        }
    }

    /// Walk all top-level statements.  Returns the hop-count table and every
    /// static error found; callers must not execute if errors is non-empty.
    pub fn resolve(mut self, statements: &[Stmt]) -> (Resolutions, Vec<LoxError>) {
        info!(
            "Beginning resolve pass over {} statement(s)",
            statements.len()
        );

        for stmt in statements {
            self.resolve_stmt(stmt);
        }

        (self.resolutions, self.errors)
    }

    fn error<S: Into<String>>(&mut self, token: &Token, msg: S) {
        self.errors.push(LoxError::resolve(token.line, msg));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statement resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        debug!("Resolving stmt: {:?}", stmt);

        match stmt {
            Stmt::Block(statements) => {
                self.begin_scope();
                for s in statements {
                    self.resolve_stmt(s);
                }
                self.end_scope();
            }

            Stmt::Var { name, initializer } => {
                // declare → resolve initializer → define, so `var a = a;`
                // trips the declared-but-not-defined check below
                self.declare(name);
                if let Some(expr) = initializer {
                    self.resolve_expr(expr);
                }
                self.define(name);
            }

            Stmt::Function(decl) => {
                // the name is visible inside its own body (recursion)
                if let Some(name) = &decl.name {
                    self.declare(name);
                    self.define(name);
                }
                self.resolve_function(decl, FunctionType::Function);
            }

            Stmt::Expression(expr) | Stmt::Print(expr) => {
                self.resolve_expr(expr);
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(eb) = else_branch.as_deref() {
                    self.resolve_stmt(eb);
                }
            }

            Stmt::While { condition, body } => {
                let enclosing: FunctionType = self.current_function;

                self.current_function = match enclosing {
                    FunctionType::Function | FunctionType::FunctionWhile => {
                        FunctionType::FunctionWhile
                    }

                    FunctionType::Method
                    | FunctionType::MethodWhile
                    | FunctionType::StaticMethod
                    | FunctionType::Initializer => FunctionType::MethodWhile,

                    FunctionType::None | FunctionType::While => FunctionType::While,
                };

                self.resolve_expr(condition);
                self.resolve_stmt(body);

                self.current_function = enclosing;
            }

            Stmt::Return { keyword, value } => {
                if matches!(
                    self.current_function,
                    FunctionType::None | FunctionType::While
                ) {
                    self.error(keyword, "Can't return from top-level code");
                }

                if let Some(expr) = value {
                    if self.current_function == FunctionType::Initializer {
                        self.error(keyword, "Can't return a value from an initializer");
                    }
                    self.resolve_expr(expr);
                }
            }

            Stmt::Break(keyword) => {
                if !matches!(
                    self.current_function,
                    FunctionType::While | FunctionType::FunctionWhile | FunctionType::MethodWhile
                ) {
                    self.error(keyword, "Can't use 'break' outside of a loop");
                }
            }

            Stmt::Continue(keyword) => {
                if !matches!(
                    self.current_function,
                    FunctionType::While | FunctionType::FunctionWhile | FunctionType::MethodWhile
                ) {
                    self.error(keyword, "Can't use 'continue' outside of a loop");
                }
            }

            Stmt::Class {
                name,
                methods,
                static_methods,
                getters,
                superclass,
            } => {
                let enclosing_class: ClassType = self.current_class;
                self.current_class = ClassType::Class;

                self.declare(name);
                self.define(name);

                if let Some(superclass_expr) = superclass {
                    if let Expr::Variable {
                        name: super_name, ..
                    } = superclass_expr
                    {
                        if super_name.lexeme == name.lexeme {
                            self.error(super_name, "A class can't inherit from itself");
                        }
                    }

                    self.current_class = ClassType::Subclass;
                    self.resolve_expr(superclass_expr);

                    // methods of a subclass see 'super' one scope out
                    self.begin_scope();
                    if let Some(scope) = self.scopes.last_mut() {
                        scope.insert("super".to_string(), true);
                    }
                }

                self.begin_scope();
                if let Some(scope) = self.scopes.last_mut() {
                    scope.insert("this".to_string(), true);
                }

                for method in methods {
                    let declaration: FunctionType = match &method.name {
                        Some(n) if n.lexeme == "init" => FunctionType::Initializer,
                        _ => FunctionType::Method,
                    };

                    self.resolve_function(method, declaration);
                }

                for getter in getters {
                    self.resolve_function(getter, FunctionType::Method);
                }

                self.end_scope();

                // Static methods are never bound to an instance, so their
                // bodies see no 'this' scope: resolving them here keeps the
                // scope stack aligned with the runtime environment chain.
                for method in static_methods {
                    self.resolve_function(method, FunctionType::StaticMethod);
                }

                if superclass.is_some() {
                    self.end_scope();
                }

                self.current_class = enclosing_class;
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expression resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(_) => {}

            Expr::Grouping(inner) => {
                self.resolve_expr(inner);
            }

            Expr::Unary { right, .. } => {
                self.resolve_expr(right);
            }

            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }

            Expr::Ternary {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                self.resolve_expr(then_branch);
                self.resolve_expr(else_branch);
            }

            Expr::Variable { name, id } => {
                if let Some(scope) = self.scopes.last() {
                    if scope.get(name.lexeme.as_str()) == Some(&false) {
                        self.error(name, "Can't read local variable in its own initializer");
                    }
                }

                self.resolve_local(*id, name);
            }

            Expr::Assign { name, value, id } => {
                // resolve RHS first, then bind the target
                self.resolve_expr(value);
                self.resolve_local(*id, name);
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                self.resolve_expr(callee);
                for arg in arguments {
                    self.resolve_expr(arg);
                }
            }

            Expr::Get { object, .. } => self.resolve_expr(object),

            Expr::Set { object, value, .. } => {
                self.resolve_expr(value);
                self.resolve_expr(object);
            }

            Expr::This { keyword, id } => {
                if self.current_class == ClassType::None {
                    self.error(keyword, "Can't use 'this' outside of a class");
                    return;
                }

                if self.current_function == FunctionType::StaticMethod {
                    self.error(keyword, "Can't use 'this' in a static method");
                    return;
                }

                self.resolve_local(*id, keyword);
            }

            Expr::Super { keyword, id, .. } => {
                match self.current_class {
                    ClassType::None => {
                        self.error(keyword, "Can't use 'super' outside of a class");
                        return;
                    }

                    ClassType::Class => {
                        self.error(keyword, "Can't use 'super' in a class with no superclass");
                        return;
                    }

                    ClassType::Subclass => {}
                }

                self.resolve_local(*id, keyword);
            }

            Expr::SelfIncOrDecr { target, .. } => {
                self.resolve_expr(target);
            }

            Expr::Lambda(decl) => {
                self.resolve_function(decl, FunctionType::Function);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Function helper
    // ─────────────────────────────────────────────────────────────────────────

    /// Enter a fresh scope for a function's parameters + body.
    fn resolve_function(&mut self, decl: &FunctionDecl, ftype: FunctionType) {
        let enclosing: FunctionType = self.current_function;
        self.current_function = ftype;

        self.begin_scope();
        for param in &decl.params {
            self.declare(param);
            self.define(param);
        }
        for stmt in &decl.body {
            self.resolve_stmt(stmt);
        }
        self.end_scope();

        self.current_function = enclosing;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scope management
    // ─────────────────────────────────────────────────────────────────────────

    #[inline]
    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    #[inline]
    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &Token) {
        let mut duplicate: bool = false;

        if let Some(scope) = self.scopes.last_mut() {
            if scope.contains_key(name.lexeme.as_str()) {
                duplicate = true;
            } else {
                scope.insert(name.lexeme.clone(), false);
            }
        }

        if duplicate {
            self.error(name, "Already a variable with this name in this scope");
        }
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Binding-distance helper
    // ─────────────────────────────────────────────────────────────────────────

    /// Record this occurrence as a local at depth `d` (innermost scope that
    /// declares the name), or leave it unrecorded ⇒ a global at runtime.
    fn resolve_local(&mut self, id: ExprId, name: &Token) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(name.lexeme.as_str()) {
                debug!("Resolved '{}' at depth {}", name.lexeme, depth);

                self.resolutions.insert(id, depth);
                return;
            }
        }

        debug!("Resolved '{}' as global", name.lexeme);
    }
}
