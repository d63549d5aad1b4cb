//! Lexical scopes: name→value and name→function binding tables, chained to
//! an enclosing scope.
//!
//! Lookup walks outward through the chain, nearest binding wins.  Writes
//! always land in the current scope — an inner assignment to an outer name
//! shadows, never mutates, the outer binding.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;

use crate::error::{MinipyError, Result};
use crate::interpreter::Function;
use crate::value::Value;

#[derive(Debug)]
pub struct Environment<'a> {
    values: HashMap<String, Value>,
    functions: HashMap<String, Rc<Function<'a>>>,
    pub enclosing: Option<Rc<RefCell<Environment<'a>>>>,
}

impl<'a> Environment<'a> {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            functions: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: Rc<RefCell<Environment<'a>>>) -> Self {
        Environment {
            values: HashMap::new(),
            functions: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Bind `name` in this scope, shadowing any outer binding.
    pub fn define(&mut self, name: &str, value: Value) {
        debug!("Defining '{}' = {:?}", name, value);

        self.values.insert(name.to_string(), value);
    }

    /// Bind a function template in this scope's function map.
    pub fn define_function(&mut self, name: &str, function: Rc<Function<'a>>) {
        debug!("Defining function '{}'", name);

        self.functions.insert(name.to_string(), function);
    }

    /// Resolve `name` against the scope chain.  A name bound only as a
    /// function evaluates to its own name as text, so a callee expression
    /// can resolve before the call applies it.
    pub fn get(&self, name: &str, line: usize) -> Result<Value> {
        if let Some(value) = self.lookup_value(name) {
            return Ok(value);
        }

        if self.lookup_function(name).is_some() {
            return Ok(Value::from(name));
        }

        Err(MinipyError::runtime(
            line,
            format!("Undefined variable '{}'.", name),
        ))
    }

    fn lookup_value(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.values.get(name) {
            return Some(value.clone());
        }

        self.enclosing
            .as_ref()
            .and_then(|enclosing| enclosing.borrow().lookup_value(name))
    }

    /// Resolve a function template against the scope chain.
    pub fn get_function(&self, name: &str, line: usize) -> Result<Rc<Function<'a>>> {
        self.lookup_function(name).ok_or_else(|| {
            MinipyError::runtime(line, format!("Undefined function '{}'.", name))
        })
    }

    fn lookup_function(&self, name: &str) -> Option<Rc<Function<'a>>> {
        if let Some(function) = self.functions.get(name) {
            return Some(function.clone());
        }

        self.enclosing
            .as_ref()
            .and_then(|enclosing| enclosing.borrow().lookup_function(name))
    }
}

impl<'a> Default for Environment<'a> {
    fn default() -> Self {
        Self::new()
    }
}
