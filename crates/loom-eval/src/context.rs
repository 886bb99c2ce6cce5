//! The scope abstraction: a parent-linked mapping from names to values.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use loom_core::Span;

use crate::error::EvalError;
use crate::value::Value;

struct Inner {
    slots: HashMap<String, Value>,
    parent: Option<Context>,
    val: Option<Value>,
}

/// A scope: bindings, a parent to fall through to, and a "current value"
/// slot carrying the result of whatever expression most recently produced
/// this context.
///
/// Cheap to clone: contexts are reference-counted handles, so `child()` and
/// passing a context by value around the evaluator never deep-copies
/// bindings. Only [`Context::snapshot`] does.
#[derive(Clone)]
pub struct Context(Rc<RefCell<Inner>>);

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Context({:p})", Rc::as_ptr(&self.0))
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Context {
    /// An empty context with no parent, no bindings and no value.
    pub fn root() -> Self {
        Context(Rc::new(RefCell::new(Inner {
            slots: HashMap::new(),
            parent: None,
            val: None,
        })))
    }

    /// An empty context whose parent is `self`.
    pub fn child(&self) -> Self {
        Context(Rc::new(RefCell::new(Inner {
            slots: HashMap::new(),
            parent: Some(self.clone()),
            val: None,
        })))
    }

    /// A context identical to `self` but carrying `val`.
    pub fn with_val(&self, val: Value) -> Self {
        let child = self.child();
        child.0.borrow_mut().val = Some(val);
        child
    }

    pub fn val(&self) -> Option<Value> {
        self.0.borrow().val.clone()
    }

    /// Writes `name` into this context's own slots (never an ancestor's).
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().slots.insert(name.into(), value);
    }

    /// Looks up `name` along the parent chain. `this` is handled specially
    /// by the evaluator, not here, since it needs a [`Span`] for errors and
    /// produces a snapshot rather than a stored value.
    pub fn lookup(&self, name: &str, span: Span) -> Result<Value, EvalError> {
        let inner = self.0.borrow();
        if let Some(v) = inner.slots.get(name) {
            return Ok(v.clone());
        }
        match &inner.parent {
            Some(parent) => parent.lookup(name, span),
            None => Err(EvalError::UnknownVariable { name: name.to_string(), span }),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        let inner = self.0.borrow();
        inner.slots.contains_key(name) || inner.parent.as_ref().is_some_and(|p| p.contains(name))
    }

    /// A deep copy of the slot chain, independent of `self`: further writes
    /// to `self` or its ancestors do not affect the copy. `val` is not
    /// carried over.
    pub fn snapshot(&self) -> Self {
        let inner = self.0.borrow();
        let parent = inner.parent.as_ref().map(Context::snapshot);
        Context(Rc::new(RefCell::new(Inner {
            slots: inner.slots.clone(),
            parent,
            val: None,
        })))
    }

    /// Walks to the root of `self`'s parent chain and attaches
    /// `new_parent` there, then returns `self`. Used to bring a captured
    /// snapshot's bindings into scope at the point it is read back.
    pub fn reparent(self, new_parent: Context) -> Self {
        {
            let mut node = self.0.clone();
            loop {
                let next = node.borrow().parent.as_ref().map(|p| p.0.clone());
                match next {
                    Some(next) => node = next,
                    None => break,
                }
            }
            node.borrow_mut().parent = Some(new_parent);
        }
        self
    }

    /// Collapses the parent chain into a single context holding the union
    /// of all visible bindings (nearer bindings shadow farther ones). Not
    /// part of the language's own semantics; used by the REPL driver
    /// between lines to bound memory growth.
    pub fn flatten(&self) -> Self {
        let mut chain = Vec::new();
        let mut cur = Some(self.clone());
        while let Some(c) = cur {
            let inner = c.0.borrow();
            chain.push(inner.slots.clone());
            cur = inner.parent.clone();
        }
        let mut merged = HashMap::new();
        for slots in chain.into_iter().rev() {
            merged.extend(slots);
        }
        Context(Rc::new(RefCell::new(Inner { slots: merged, parent: None, val: None })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        Span { start: 0, end: 0 }
    }

    #[test]
    fn test_lookup_falls_through_to_parent() {
        let root = Context::root();
        root.set("x", Value::Int(1));
        let child = root.child();
        assert_eq!(child.lookup("x", span()).unwrap(), Value::Int(1));
    }

    #[test]
    fn test_set_never_touches_ancestor() {
        let root = Context::root();
        let child = root.child();
        child.set("y", Value::Int(2));
        assert!(!root.contains("y"));
        assert!(child.contains("y"));
    }

    #[test]
    fn test_unknown_variable_errors() {
        let root = Context::root();
        assert!(matches!(
            root.lookup("missing", span()),
            Err(EvalError::UnknownVariable { .. })
        ));
    }

    #[test]
    fn test_snapshot_is_independent_of_later_writes() {
        let root = Context::root();
        root.set("a", Value::Int(1));
        let snap = root.snapshot();
        root.set("a", Value::Int(99));
        assert_eq!(snap.lookup("a", span()).unwrap(), Value::Int(1));
    }

    #[test]
    fn test_reparent_makes_snapshot_root_fall_through_to_caller() {
        let caller = Context::root();
        caller.set("c", Value::Int(3));

        let origin = Context::root();
        origin.set("a", Value::Int(1));
        let snap = origin.snapshot().reparent(caller.clone());

        assert_eq!(snap.lookup("a", span()).unwrap(), Value::Int(1));
        assert_eq!(snap.lookup("c", span()).unwrap(), Value::Int(3));
    }

    #[test]
    fn test_flatten_preserves_nearest_shadowing() {
        let root = Context::root();
        root.set("x", Value::Int(1));
        let child = root.child();
        child.set("x", Value::Int(2));
        let flat = child.flatten();
        assert_eq!(flat.lookup("x", span()).unwrap(), Value::Int(2));
        assert!(!flat.contains("nonexistent"));
    }
}
