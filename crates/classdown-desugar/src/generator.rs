//! Generator objects returned by generator methods.
//!
//! There are no suspension points in this engine: invoking a generator
//! method runs its body to completion and buffers every yielded value. The
//! generator then hands them out one `next()` at a time.

use crate::value::Value;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// The result of one `next()` call.
#[derive(Clone, Debug, PartialEq)]
pub struct IterResult {
    pub value: Value,
    pub done: bool,
}

#[derive(Clone)]
pub struct Generator(Rc<RefCell<GeneratorState>>);

struct GeneratorState {
    pending: VecDeque<Value>,
    /// The body's return value, handed out once with `done: true`.
    completion: Option<Value>,
}

impl Generator {
    pub(crate) fn completed(yields: Vec<Value>, completion: Value) -> Self {
        Self(Rc::new(RefCell::new(GeneratorState {
            pending: yields.into(),
            completion: Some(completion),
        })))
    }

    pub fn next(&self) -> IterResult {
        let mut state = self.0.borrow_mut();
        match state.pending.pop_front() {
            Some(value) => IterResult { value, done: false },
            None => IterResult {
                value: state.completion.take().unwrap_or_default(),
                done: true,
            },
        }
    }

    /// Whether every yielded value has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.0.borrow().pending.is_empty()
    }

    /// Drain the remaining yielded values, leaving the completion value.
    pub fn remaining(&self) -> Vec<Value> {
        self.0.borrow_mut().pending.drain(..).collect()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
