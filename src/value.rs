//! Runtime value model: every value a Loxide program can produce, plus the
//! callable and object types behind classes and instances.
//!
//! Functions, classes, and instances are shared-ownership values (`Rc`); a
//! bound method, the instance it is bound to, and the environment it
//! captured keep each other alive.  Reference cycles through those links are
//! tolerated for the duration of a run.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::ast::FunctionDecl;
use crate::environment::Environment;

/// A value produced by evaluation.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    Str(String),
    NativeFunction(Rc<NativeFunction>),
    Function(Rc<LoxFunction>),
    Class(Rc<LoxClass>),
    Instance(Rc<RefCell<LoxInstance>>),
}

/// A host-provided function installed in the global environment.
#[derive(Debug)]
pub struct NativeFunction {
    pub name: String,
    pub arity: usize,
    pub func: fn(&[Value]) -> Result<Value, String>,
}

/// A user function, method, getter, or lambda: the shared declaration plus
/// the environment captured at its definition (or binding) site.
#[derive(Debug)]
pub struct LoxFunction {
    pub decl: Rc<FunctionDecl>,
    pub closure: Rc<RefCell<Environment>>,
    pub is_initializer: bool,
}

impl LoxFunction {
    pub fn new(
        decl: Rc<FunctionDecl>,
        closure: Rc<RefCell<Environment>>,
        is_initializer: bool,
    ) -> Self {
        Self {
            decl,
            closure,
            is_initializer,
        }
    }

    /// Declared parameter count.
    pub fn arity(&self) -> usize {
        self.decl.params.len()
    }

    /// Produce a fresh callable whose closure has `this` bound to
    /// `instance`, chained onto this function's own closure.
    pub fn bind(&self, instance: Value) -> LoxFunction {
        let mut env: Environment = Environment::with_enclosing(Rc::clone(&self.closure));
        env.define("this", instance);

        LoxFunction {
            decl: Rc::clone(&self.decl),
            closure: Rc::new(RefCell::new(env)),
            is_initializer: self.is_initializer,
        }
    }
}

/// A class value.  Method tables are immutable after construction; instance
/// methods and getters are looked up through the superclass chain, static
/// methods only on the class itself.
#[derive(Debug)]
pub struct LoxClass {
    pub name: String,
    methods: HashMap<String, Rc<LoxFunction>>,
    static_methods: HashMap<String, Rc<LoxFunction>>,
    getters: HashMap<String, Rc<LoxFunction>>,
    pub superclass: Option<Rc<LoxClass>>,
}

impl LoxClass {
    pub fn new(
        name: String,
        methods: HashMap<String, Rc<LoxFunction>>,
        static_methods: HashMap<String, Rc<LoxFunction>>,
        getters: HashMap<String, Rc<LoxFunction>>,
        superclass: Option<Rc<LoxClass>>,
    ) -> Self {
        Self {
            name,
            methods,
            static_methods,
            getters,
            superclass,
        }
    }

    /// Depth-first search of the instance-method tables along the
    /// inheritance chain.  A subclass entry fully shadows the superclass's.
    pub fn find_method(&self, name: &str) -> Option<Rc<LoxFunction>> {
        if let Some(method) = self.methods.get(name) {
            return Some(Rc::clone(method));
        }

        if let Some(superclass) = &self.superclass {
            return superclass.find_method(name);
        }

        None
    }

    /// Getter lookup, walking the chain like [`find_method`].
    pub fn find_getter(&self, name: &str) -> Option<Rc<LoxFunction>> {
        if let Some(getter) = self.getters.get(name) {
            return Some(Rc::clone(getter));
        }

        if let Some(superclass) = &self.superclass {
            return superclass.find_getter(name);
        }

        None
    }

    /// Static methods live on the class value itself; no chain walk.
    pub fn find_static(&self, name: &str) -> Option<Rc<LoxFunction>> {
        self.static_methods.get(name).map(Rc::clone)
    }

    /// Arity of the class as a callable: the initializer's arity, or 0.
    pub fn arity(&self) -> usize {
        self.find_method("init").map_or(0, |init| init.arity())
    }
}

/// An object: a class back-reference plus fields populated on first set.
#[derive(Debug)]
pub struct LoxInstance {
    class: Rc<LoxClass>,
    fields: HashMap<String, Value>,
}

impl LoxInstance {
    pub fn new(class: Rc<LoxClass>) -> Self {
        Self {
            class,
            fields: HashMap::new(),
        }
    }

    pub fn class(&self) -> &Rc<LoxClass> {
        &self.class
    }

    pub fn field(&self, name: &str) -> Option<Value> {
        self.fields.get(name).cloned()
    }

    pub fn set_field(&mut self, name: &str, value: Value) {
        self.fields.insert(name.to_string(), value);
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),

            Value::Bool(b) => write!(f, "{}", b),

            Value::Number(n) => {
                // whole values drop the trailing fraction: 3, not 3.0
                if n.fract() == 0.0 {
                    write!(f, "{:.0}", n)
                } else {
                    write!(f, "{}", n)
                }
            }

            Value::Str(s) => write!(f, "{}", s),

            Value::NativeFunction(native) => write!(f, "<native fn {}>", native.name),

            Value::Function(function) => match &function.decl.name {
                Some(name) => write!(f, "<fn {}>", name.lexeme),
                None => write!(f, "<fn>"),
            },

            Value::Class(class) => write!(f, "{}", class.name),

            Value::Instance(instance) => {
                write!(f, "{} instance", instance.borrow().class.name)
            }
        }
    }
}
