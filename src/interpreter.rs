//! Tree-walking evaluator.
//!
//! Statements are executed for effect, expressions evaluated for value.
//! `return`/`break`/`continue` are **not** exceptions: statement execution
//! yields a [`Flow`] that every composite statement inspects, loops absorb
//! `Break`/`Continue`, and call boundaries absorb `Return`.  Only genuine
//! runtime errors travel through `Err`, and the first one aborts the run.
//!
//! Variable access follows the resolver's hop-count table when a node was
//! resolved to a local (`get_at`/`assign_at`, never a chain search) and the
//! global environment otherwise.  The global scope is deliberately dynamic:
//! Lox allows forward references that only materialize at runtime.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, info};

use crate::ast::{Expr, ExprId, FunctionDecl, LiteralValue, Stmt};
use crate::environment::Environment;
use crate::error::{LoxError, Result};
use crate::resolver::Resolutions;
use crate::token::{Token, TokenType};
use crate::value::{LoxClass, LoxFunction, LoxInstance, NativeFunction, Value};

/// How a statement finished.  Threaded up through every composite statement
/// so non-local exits never need an unwinding mechanism.
#[derive(Debug)]
pub enum Flow {
    /// Fell off the end; keep going.
    Normal,

    /// A `return` is unwinding toward the nearest call boundary.
    Return(Value),

    /// A `break` is unwinding toward the nearest loop.
    Break,

    /// A `continue` is unwinding toward the nearest loop's condition check.
    Continue,
}

pub struct Interpreter {
    globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    resolutions: Resolutions,
    output: Box<dyn Write>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Interpreter printing to stdout, with native functions installed.
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// Interpreter printing to a caller-supplied sink.
    pub fn with_output(output: Box<dyn Write>) -> Self {
        info!("Initializing Interpreter");

        let environment: Rc<RefCell<Environment>> = Rc::new(RefCell::new(Environment::new()));

        environment.borrow_mut().define(
            "clock",
            Value::NativeFunction(Rc::new(NativeFunction {
                name: "clock".to_string(),
                arity: 0,
                func: |_args: &[Value]| {
                    let timestamp: f64 = SystemTime::now()
                        .duration_since(UNIX_EPOCH)
                        .map_err(|e| format!("Clock error: {}", e))?
                        .as_secs_f64();

                    Ok(Value::Number(timestamp))
                },
            })),
        );

        Self {
            globals: Rc::clone(&environment),
            environment,
            resolutions: Resolutions::new(),
            output,
        }
    }

    /// Merge a resolver pass's hop-count table in.  The prompt loop calls
    /// this once per resolved line; node ids never collide across lines.
    pub fn add_resolutions(&mut self, resolutions: Resolutions) {
        self.resolutions.extend(resolutions);
    }

    /// Interprets a list of statements (a "program").
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<()> {
        debug!("Interpreting {} statements", statements.len());

        for stmt in statements {
            self.execute(stmt)?;
        }

        info!("Interpretation completed successfully");

        Ok(())
    }

    // ───────────────────────── statement execution ──────────────────────────

    fn execute(&mut self, stmt: &Stmt) -> Result<Flow> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;

                Ok(Flow::Normal)
            }

            Stmt::Print(expr) => {
                let value: Value = self.evaluate(expr)?;

                writeln!(self.output, "{}", value)?;

                Ok(Flow::Normal)
            }

            Stmt::Var { name, initializer } => {
                let value: Value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };

                debug!("Defining variable '{}' = {}", name.lexeme, value);

                self.environment.borrow_mut().define(&name.lexeme, value);

                Ok(Flow::Normal)
            }

            Stmt::Block(statements) => {
                let env: Environment = Environment::with_enclosing(Rc::clone(&self.environment));

                self.execute_block(statements, Rc::new(RefCell::new(env)))
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let cond: Value = self.evaluate(condition)?;

                if is_truthy(&cond) {
                    self.execute(then_branch)
                } else if let Some(else_stmt) = else_branch {
                    self.execute(else_stmt)
                } else {
                    Ok(Flow::Normal)
                }
            }

            Stmt::While { condition, body } => {
                debug!("Entering while loop");

                loop {
                    let cond: Value = self.evaluate(condition)?;
                    if !is_truthy(&cond) {
                        break;
                    }

                    match self.execute(body)? {
                        Flow::Normal | Flow::Continue => {}
                        Flow::Break => break,
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                    }
                }

                Ok(Flow::Normal)
            }

            Stmt::Break(_) => Ok(Flow::Break),

            Stmt::Continue(_) => Ok(Flow::Continue),

            Stmt::Return { value, .. } => {
                let value: Value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };

                Ok(Flow::Return(value))
            }

            Stmt::Function(decl) => {
                let function = LoxFunction::new(Rc::clone(decl), Rc::clone(&self.environment), false);
                let name: &Token = decl.name.as_ref().expect("declaration statements are named");

                debug!("Defining function '{}'", name.lexeme);

                self.environment
                    .borrow_mut()
                    .define(&name.lexeme, Value::Function(Rc::new(function)));

                Ok(Flow::Normal)
            }

            Stmt::Class {
                name,
                methods,
                static_methods,
                getters,
                superclass,
            } => self.execute_class(name, methods, static_methods, getters, superclass),
        }
    }

    /// Run `statements` in `env`, restoring the previous environment on every
    /// exit path.  The first non-`Normal` flow (or error) stops the block.
    fn execute_block(
        &mut self,
        statements: &[Stmt],
        env: Rc<RefCell<Environment>>,
    ) -> Result<Flow> {
        let previous: Rc<RefCell<Environment>> = Rc::clone(&self.environment);
        self.environment = env;

        let mut flow: Result<Flow> = Ok(Flow::Normal);

        for stmt in statements {
            match self.execute(stmt) {
                Ok(Flow::Normal) => {}
                other => {
                    flow = other;
                    break;
                }
            }
        }

        self.environment = previous;

        flow
    }

    fn execute_class(
        &mut self,
        name: &Token,
        methods: &[Rc<FunctionDecl>],
        static_methods: &[Rc<FunctionDecl>],
        getters: &[Rc<FunctionDecl>],
        superclass: &Option<Expr>,
    ) -> Result<Flow> {
        let superclass_value: Option<Rc<LoxClass>> = match superclass {
            Some(expr) => {
                let value: Value = self.evaluate(expr)?;

                match value {
                    Value::Class(class) => Some(class),
                    _ => {
                        let line: usize = match expr {
                            Expr::Variable { name, .. } => name.line,
                            _ => name.line,
                        };

                        return Err(LoxError::runtime(line, "Superclass must be a class"));
                    }
                }
            }
            None => None,
        };

        self.environment.borrow_mut().define(&name.lexeme, Value::Nil);

        // Methods of a subclass close over an extra environment binding
        // 'super'; the resolver mirrors this with an extra scope.
        let class_env: Rc<RefCell<Environment>> = match &superclass_value {
            Some(sc) => {
                let mut env: Environment =
                    Environment::with_enclosing(Rc::clone(&self.environment));
                env.define("super", Value::Class(Rc::clone(sc)));

                Rc::new(RefCell::new(env))
            }
            None => Rc::clone(&self.environment),
        };

        let mut method_map: HashMap<String, Rc<LoxFunction>> = HashMap::new();
        for decl in methods {
            let method_name: String = decl
                .name
                .as_ref()
                .map(|n| n.lexeme.clone())
                .unwrap_or_default();
            let is_initializer: bool = method_name == "init";

            method_map.insert(
                method_name,
                Rc::new(LoxFunction::new(
                    Rc::clone(decl),
                    Rc::clone(&class_env),
                    is_initializer,
                )),
            );
        }

        let mut static_map: HashMap<String, Rc<LoxFunction>> = HashMap::new();
        for decl in static_methods {
            let method_name: String = decl
                .name
                .as_ref()
                .map(|n| n.lexeme.clone())
                .unwrap_or_default();

            static_map.insert(
                method_name,
                Rc::new(LoxFunction::new(
                    Rc::clone(decl),
                    Rc::clone(&class_env),
                    false,
                )),
            );
        }

        let mut getter_map: HashMap<String, Rc<LoxFunction>> = HashMap::new();
        for decl in getters {
            let getter_name: String = decl
                .name
                .as_ref()
                .map(|n| n.lexeme.clone())
                .unwrap_or_default();

            getter_map.insert(
                getter_name,
                Rc::new(LoxFunction::new(
                    Rc::clone(decl),
                    Rc::clone(&class_env),
                    false,
                )),
            );
        }

        let class = LoxClass::new(
            name.lexeme.clone(),
            method_map,
            static_map,
            getter_map,
            superclass_value,
        );

        debug!("Defined class '{}'", name.lexeme);

        self.environment
            .borrow_mut()
            .assign(&name.lexeme, Value::Class(Rc::new(class)));

        Ok(Flow::Normal)
    }

    // ───────────────────────── expression evaluation ────────────────────────

    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Str(s) => Value::Str(s.clone()),
                LiteralValue::True => Value::Bool(true),
                LiteralValue::False => Value::Bool(false),
                LiteralValue::Nil => Value::Nil,
            }),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Unary { operator, right } => self.evaluate_unary(operator, right),

            Expr::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, operator, right),

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left_val: Value = self.evaluate(left)?;

                // short circuit on the left operand's truthiness
                if operator.token_type == TokenType::OR {
                    if is_truthy(&left_val) {
                        return Ok(left_val);
                    }
                } else if !is_truthy(&left_val) {
                    return Ok(left_val);
                }

                self.evaluate(right)
            }

            Expr::Ternary {
                condition,
                then_branch,
                else_branch,
            } => {
                let cond: Value = self.evaluate(condition)?;

                if is_truthy(&cond) {
                    self.evaluate(then_branch)
                } else {
                    self.evaluate(else_branch)
                }
            }

            Expr::Variable { name, id } => self.look_up_variable(name, *id),

            Expr::Assign { name, value, id } => {
                let value: Value = self.evaluate(value)?;

                self.assign_variable(name, *id, value.clone())?;

                Ok(value)
            }

            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee_val: Value = self.evaluate(callee)?;

                let mut args: Vec<Value> = Vec::with_capacity(arguments.len());
                for arg in arguments {
                    args.push(self.evaluate(arg)?);
                }

                self.call_value(callee_val, args, paren)
            }

            Expr::Get { object, name } => {
                let object_val: Value = self.evaluate(object)?;

                match object_val {
                    Value::Instance(instance) => self.instance_get(&instance, name),

                    // static methods hang off the class value itself
                    Value::Class(class) => class.find_static(&name.lexeme).map(Value::Function).ok_or_else(|| {
                        LoxError::runtime(
                            name.line,
                            format!("Undefined property '{}'", name.lexeme),
                        )
                    }),

                    _ => Err(LoxError::runtime(
                        name.line,
                        "Only instances have properties",
                    )),
                }
            }

            Expr::Set {
                object,
                name,
                value,
            } => {
                let object_val: Value = self.evaluate(object)?;

                let Value::Instance(instance) = object_val else {
                    return Err(LoxError::runtime(name.line, "Only instances have fields"));
                };

                let value: Value = self.evaluate(value)?;
                instance
                    .borrow_mut()
                    .set_field(&name.lexeme, value.clone());

                Ok(value)
            }

            Expr::This { keyword, id } => self.look_up_variable(keyword, *id),

            Expr::Super {
                keyword,
                method,
                id,
            } => self.evaluate_super(keyword, method, *id),

            Expr::SelfIncOrDecr { operator, target } => {
                self.evaluate_self_inc_or_decr(operator, target)
            }

            Expr::Lambda(decl) => {
                let function =
                    LoxFunction::new(Rc::clone(decl), Rc::clone(&self.environment), false);

                Ok(Value::Function(Rc::new(function)))
            }
        }
    }

    fn evaluate_unary(&mut self, operator: &Token, right: &Expr) -> Result<Value> {
        let right_val: Value = self.evaluate(right)?;

        match operator.token_type {
            TokenType::MINUS => {
                if let Value::Number(n) = right_val {
                    Ok(Value::Number(-n))
                } else {
                    Err(LoxError::runtime(operator.line, "Operand must be a number"))
                }
            }

            TokenType::BANG => Ok(Value::Bool(!is_truthy(&right_val))),

            _ => Err(LoxError::runtime(operator.line, "Invalid unary operator")),
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> Result<Value> {
        // The comma operator: evaluate left for its side effects, yield the
        // right operand.
        if operator.token_type == TokenType::COMMA {
            self.evaluate(left)?;

            return self.evaluate(right);
        }

        let left_val: Value = self.evaluate(left)?;
        let right_val: Value = self.evaluate(right)?;

        match operator.token_type {
            TokenType::PLUS => match (left_val, right_val) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
                _ => Err(LoxError::runtime(
                    operator.line,
                    "Operands must be two numbers or two strings",
                )),
            },

            TokenType::MINUS => match (left_val, right_val) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a - b)),
                _ => Err(LoxError::runtime(operator.line, "Operands must be numbers")),
            },

            TokenType::STAR => match (left_val, right_val) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a * b)),
                _ => Err(LoxError::runtime(operator.line, "Operands must be numbers")),
            },

            TokenType::SLASH => match (left_val, right_val) {
                (Value::Number(a), Value::Number(b)) => {
                    if b == 0.0 {
                        Err(LoxError::runtime(operator.line, "Division by zero"))
                    } else {
                        Ok(Value::Number(a / b))
                    }
                }
                _ => Err(LoxError::runtime(operator.line, "Operands must be numbers")),
            },

            // '&' / '|': both operands always evaluated, truthiness combined
            TokenType::LOGIC_AND => Ok(Value::Bool(is_truthy(&left_val) && is_truthy(&right_val))),
            TokenType::LOGIC_OR => Ok(Value::Bool(is_truthy(&left_val) || is_truthy(&right_val))),

            TokenType::EQUAL_EQUAL => Ok(Value::Bool(is_equal(&left_val, &right_val))),
            TokenType::BANG_EQUAL => Ok(Value::Bool(!is_equal(&left_val, &right_val))),

            TokenType::LESS => match (left_val, right_val) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a < b)),
                _ => Err(LoxError::runtime(operator.line, "Operands must be numbers")),
            },

            TokenType::LESS_EQUAL => match (left_val, right_val) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a <= b)),
                _ => Err(LoxError::runtime(operator.line, "Operands must be numbers")),
            },

            TokenType::GREATER => match (left_val, right_val) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a > b)),
                _ => Err(LoxError::runtime(operator.line, "Operands must be numbers")),
            },

            TokenType::GREATER_EQUAL => match (left_val, right_val) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a >= b)),
                _ => Err(LoxError::runtime(operator.line, "Operands must be numbers")),
            },

            _ => Err(LoxError::runtime(operator.line, "Invalid binary operator")),
        }
    }

    /// Postfix `++`/`--`: read the current numeric value, write value±1 back
    /// through the same path an ordinary assignment would take, and yield
    /// the *original* value.
    fn evaluate_self_inc_or_decr(&mut self, operator: &Token, target: &Expr) -> Result<Value> {
        let delta: f64 = if operator.token_type == TokenType::PLUS_PLUS {
            1.0
        } else {
            -1.0
        };

        match target {
            Expr::Variable { name, id } => {
                let old: Value = self.look_up_variable(name, *id)?;

                let Value::Number(n) = old else {
                    return Err(LoxError::runtime(operator.line, "Operand must be a number"));
                };

                self.assign_variable(name, *id, Value::Number(n + delta))?;

                Ok(Value::Number(n))
            }

            Expr::Get { object, name } => {
                let object_val: Value = self.evaluate(object)?;

                let Value::Instance(instance) = object_val else {
                    return Err(LoxError::runtime(name.line, "Only instances have fields"));
                };

                let old: Value = self.instance_get(&instance, name)?;

                let Value::Number(n) = old else {
                    return Err(LoxError::runtime(operator.line, "Operand must be a number"));
                };

                instance
                    .borrow_mut()
                    .set_field(&name.lexeme, Value::Number(n + delta));

                Ok(Value::Number(n))
            }

            // the parser only builds Variable/Get targets
            _ => Err(LoxError::runtime(operator.line, "Invalid increment target")),
        }
    }

    // ───────────────────────── variable access ──────────────────────────────

    /// Resolved nodes read exactly `distance` links up; unresolved ones are
    /// global reads.
    fn look_up_variable(&self, name: &Token, id: ExprId) -> Result<Value> {
        let value: Option<Value> = match self.resolutions.depth_of(id) {
            Some(distance) => Environment::get_at(&self.environment, distance, &name.lexeme),
            None => self.globals.borrow().get(&name.lexeme),
        };

        value.ok_or_else(|| {
            LoxError::runtime(name.line, format!("Undefined variable '{}'", name.lexeme))
        })
    }

    /// Assignment mirrors [`look_up_variable`].
    fn assign_variable(&mut self, name: &Token, id: ExprId, value: Value) -> Result<()> {
        let assigned: bool = match self.resolutions.depth_of(id) {
            Some(distance) => {
                Environment::assign_at(&self.environment, distance, &name.lexeme, value)
            }
            None => self.globals.borrow_mut().assign(&name.lexeme, value),
        };

        if assigned {
            Ok(())
        } else {
            Err(LoxError::runtime(
                name.line,
                format!("Undefined variable '{}'", name.lexeme),
            ))
        }
    }

    // ───────────────────────── call protocol ────────────────────────────────

    fn call_value(&mut self, callee: Value, arguments: Vec<Value>, paren: &Token) -> Result<Value> {
        match callee {
            Value::NativeFunction(native) => {
                debug!("Calling native function '{}'", native.name);

                self.check_arity(native.arity, arguments.len(), paren)?;

                (native.func)(&arguments).map_err(|msg| LoxError::runtime(paren.line, msg))
            }

            Value::Function(function) => self.call_function(&function, arguments, paren),

            Value::Class(class) => self.call_class(&class, arguments, paren),

            _ => Err(LoxError::runtime(
                paren.line,
                "Can only call functions and classes",
            )),
        }
    }

    fn check_arity(&self, expected: usize, actual: usize, paren: &Token) -> Result<()> {
        if expected != actual {
            return Err(LoxError::runtime(
                paren.line,
                format!("Expected {} arguments but got {}", expected, actual),
            ));
        }

        Ok(())
    }

    /// Shared call path for functions, methods, getters, and lambdas.
    /// `paren` is only an error location (the closing `)` of the call, or
    /// the property name for getter invocation).
    fn call_function(
        &mut self,
        function: &LoxFunction,
        arguments: Vec<Value>,
        paren: &Token,
    ) -> Result<Value> {
        self.check_arity(function.arity(), arguments.len(), paren)?;

        let mut env: Environment = Environment::with_enclosing(Rc::clone(&function.closure));
        for (param, arg) in function.decl.params.iter().zip(arguments) {
            env.define(&param.lexeme, arg);
        }

        let flow: Flow = self.execute_block(&function.decl.body, Rc::new(RefCell::new(env)))?;

        // Initializers always yield the bound instance, explicit return or
        // not ('return <value>;' was rejected statically).
        if function.is_initializer {
            return Environment::get_at(&function.closure, 0, "this")
                .ok_or_else(|| LoxError::runtime(paren.line, "Undefined variable 'this'"));
        }

        match flow {
            Flow::Return(value) => Ok(value),
            _ => Ok(Value::Nil),
        }
    }

    fn call_class(
        &mut self,
        class: &Rc<LoxClass>,
        arguments: Vec<Value>,
        paren: &Token,
    ) -> Result<Value> {
        self.check_arity(class.arity(), arguments.len(), paren)?;

        let instance: Rc<RefCell<LoxInstance>> =
            Rc::new(RefCell::new(LoxInstance::new(Rc::clone(class))));

        if let Some(init) = class.find_method("init") {
            let bound: LoxFunction = init.bind(Value::Instance(Rc::clone(&instance)));

            self.call_function(&bound, arguments, paren)?;
        }

        Ok(Value::Instance(instance))
    }

    // ───────────────────────── property access ──────────────────────────────

    /// `object.name` on an instance: own fields first, then bound instance
    /// methods, then getters — a getter is invoked on the spot and its
    /// result returned, so it is never observable as a callable.
    fn instance_get(&mut self, instance: &Rc<RefCell<LoxInstance>>, name: &Token) -> Result<Value> {
        if let Some(value) = instance.borrow().field(&name.lexeme) {
            return Ok(value);
        }

        let class: Rc<LoxClass> = Rc::clone(instance.borrow().class());

        if let Some(method) = class.find_method(&name.lexeme) {
            let bound: LoxFunction = method.bind(Value::Instance(Rc::clone(instance)));

            return Ok(Value::Function(Rc::new(bound)));
        }

        if let Some(getter) = class.find_getter(&name.lexeme) {
            let bound: LoxFunction = getter.bind(Value::Instance(Rc::clone(instance)));

            return self.call_function(&bound, Vec::new(), name);
        }

        Err(LoxError::runtime(
            name.line,
            format!("Undefined property '{}'", name.lexeme),
        ))
    }

    /// `super.method`: the superclass binding sits `distance` hops out, the
    /// receiving `this` exactly one environment inside it.
    fn evaluate_super(&mut self, keyword: &Token, method: &Token, id: ExprId) -> Result<Value> {
        let distance: usize = self
            .resolutions
            .depth_of(id)
            .ok_or_else(|| LoxError::runtime(keyword.line, "Undefined variable 'super'"))?;

        let superclass: Rc<LoxClass> =
            match Environment::get_at(&self.environment, distance, "super") {
                Some(Value::Class(class)) => class,
                _ => {
                    return Err(LoxError::runtime(keyword.line, "Undefined variable 'super'"));
                }
            };

        let object: Value = Environment::get_at(&self.environment, distance - 1, "this")
            .ok_or_else(|| LoxError::runtime(keyword.line, "Undefined variable 'this'"))?;

        let method_fn: Rc<LoxFunction> =
            superclass.find_method(&method.lexeme).ok_or_else(|| {
                LoxError::runtime(
                    method.line,
                    format!("Undefined property '{}'", method.lexeme),
                )
            })?;

        Ok(Value::Function(Rc::new(method_fn.bind(object))))
    }
}

// ───────────────────────── value predicates ─────────────────────────────────

/// `nil` and `false` are falsy; every other value (including `0` and `""`)
/// is truthy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Nil => false,
        Value::Bool(b) => *b,
        _ => true,
    }
}

/// Same-kind structural equality for primitives, reference identity for
/// functions, classes, and instances.  Kinds never compare equal across.
fn is_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Nil, Value::Nil) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::NativeFunction(a), Value::NativeFunction(b)) => Rc::ptr_eq(a, b),
        (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
        (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
        (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}
