//! Lexical environments: one level of name→value bindings chained to the
//! enclosing level.  Chains are shared (`Rc<RefCell<_>>`) because closures,
//! bound methods, and instances keep their defining environments alive past
//! the frame that created them.

use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Bind (or rebind) `name` in this environment.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Dynamic lookup: walk the chain from here outward.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.values.get(name) {
            Some(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            None
        }
    }

    /// Dynamic assignment: walk the chain; `false` if the name is bound
    /// nowhere on it.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        if self.values.contains_key(name) {
            self.values.insert(name.to_string(), value);
            true
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            false
        }
    }

    /// Static lookup: read `name` exactly `distance` links up the chain.
    /// The resolver guarantees the ancestor exists; a `None` here means the
    /// name is absent at that depth (e.g. `this` in a never-bound context).
    pub fn get_at(env: &Rc<RefCell<Environment>>, distance: usize, name: &str) -> Option<Value> {
        let target: Rc<RefCell<Environment>> = Self::ancestor(env, distance);
        let value: Option<Value> = target.borrow().values.get(name).cloned();

        value
    }

    /// Static assignment mirror of [`get_at`].
    pub fn assign_at(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
        name: &str,
        value: Value,
    ) -> bool {
        let target: Rc<RefCell<Environment>> = Self::ancestor(env, distance);
        let mut target_ref = target.borrow_mut();

        if target_ref.values.contains_key(name) {
            target_ref.values.insert(name.to_string(), value);
            true
        } else {
            false
        }
    }

    /// Walk `distance` enclosing links.  Saturates at the chain root; the
    /// resolver's hop counts never exceed the chain length it mirrored.
    fn ancestor(env: &Rc<RefCell<Environment>>, distance: usize) -> Rc<RefCell<Environment>> {
        let mut current: Rc<RefCell<Environment>> = Rc::clone(env);

        for _ in 0..distance {
            let next: Option<Rc<RefCell<Environment>>> = current.borrow().enclosing.clone();

            match next {
                Some(parent) => current = parent,
                None => break,
            }
        }

        current
    }
}
