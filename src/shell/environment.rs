//! Shell environment variables.
//!
//! One map per session, shared by handle: every invocation context sees the
//! same storage, so a variable set by one command is visible to the next.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Shared handle to the session's environment map.
///
/// Cloning the handle shares the map; use [`vars`](Self::vars) for a copy.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: Rc<RefCell<BTreeMap<String, String>>>,
}

impl Environment {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.vars.borrow().get(key).cloned()
    }

    /// Set `key`, returning the previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.vars.borrow_mut().insert(key.into(), value.into())
    }

    /// Remove `key`, returning its value.
    pub fn remove(&self, key: &str) -> Option<String> {
        self.vars.borrow_mut().remove(key)
    }

    /// True if `key` is set.
    pub fn contains(&self, key: &str) -> bool {
        self.vars.borrow().contains_key(key)
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.vars.borrow().keys().cloned().collect()
    }

    /// Snapshot of all variables.
    pub fn vars(&self) -> BTreeMap<String, String> {
        self.vars.borrow().clone()
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.vars.borrow().len()
    }

    /// True if no variables are set.
    pub fn is_empty(&self) -> bool {
        self.vars.borrow().is_empty()
    }

    /// True if both handles share the same map.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.vars, &other.vars)
    }
}

impl From<BTreeMap<String, String>> for Environment {
    fn from(vars: BTreeMap<String, String>) -> Self {
        Self {
            vars: Rc::new(RefCell::new(vars)),
        }
    }
}
