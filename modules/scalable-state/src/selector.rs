//! Selectors over the host root state, with dependency-list memoization.
//!
//! A memoized selector evaluates its input selectors against the root state,
//! compares the results element-wise with the previous call using
//! [`Value::same`], and only runs its combiner when some input changed.
//! Inputs can be any selector, memoized or not, so selectors compose.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::trace;

use crate::key_path::KeyPath;
use crate::value::Value;

trait SelectFn: Send + Sync {
    fn select(&self, root: &Value) -> Value;
}

impl<F> SelectFn for F
where
    F: Fn(&Value) -> Value + Send + Sync,
{
    fn select(&self, root: &Value) -> Value {
        self(root)
    }
}

#[derive(Clone)]
pub struct Selector {
    inner: Arc<dyn SelectFn>,
}

impl Selector {
    /// A plain selector. Runs `f` on every call.
    pub fn new(f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        Self { inner: Arc::new(f) }
    }

    /// A selector that reruns `combiner` only when one of `inputs` returns a
    /// value that is not [`Value::same`] as last time.
    pub fn memoized(
        inputs: Vec<Selector>,
        combiner: impl Fn(&[Value]) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(Memoized {
                inputs,
                combiner: Box::new(combiner),
                cache: Mutex::new(None),
            }),
        }
    }

    pub fn select(&self, root: &Value) -> Value {
        self.inner.select(root)
    }

    /// Whether both handles point at the same selector (and share a cache).
    pub fn ptr_eq(&self, other: &Selector) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector").finish_non_exhaustive()
    }
}

struct Memo {
    inputs: Vec<Value>,
    output: Value,
}

struct Memoized {
    inputs: Vec<Selector>,
    combiner: Box<dyn Fn(&[Value]) -> Value + Send + Sync>,
    cache: Mutex<Option<Memo>>,
}

impl SelectFn for Memoized {
    fn select(&self, root: &Value) -> Value {
        // The cache lock is never held while inputs or the combiner run.
        let current: Vec<Value> = self.inputs.iter().map(|input| input.select(root)).collect();

        {
            let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(memo) = cache.as_ref() {
                if same_inputs(&memo.inputs, &current) {
                    trace!(inputs = current.len(), "selector memo hit");
                    return memo.output.clone();
                }
            }
        }

        trace!(inputs = current.len(), "selector memo miss");
        let output = (self.combiner)(&current);
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = Some(Memo {
            inputs: current,
            output: output.clone(),
        });
        output
    }
}

fn same_inputs(previous: &[Value], current: &[Value]) -> bool {
    previous.len() == current.len() && previous.iter().zip(current).all(|(a, b)| a.same(b))
}

/// One argument to a family's selector factory: a fixed value, or a selector
/// evaluated against the root state on every call.
#[derive(Debug, Clone)]
pub enum SelectArg {
    Literal(Value),
    Selector(Selector),
}

impl SelectArg {
    pub fn as_selector(&self) -> Option<&Selector> {
        match self {
            SelectArg::Selector(selector) => Some(selector),
            SelectArg::Literal(_) => None,
        }
    }
}

impl From<Selector> for SelectArg {
    fn from(selector: Selector) -> Self {
        SelectArg::Selector(selector)
    }
}

impl From<&Selector> for SelectArg {
    fn from(selector: &Selector) -> Self {
        SelectArg::Selector(selector.clone())
    }
}

impl From<KeyPath> for SelectArg {
    fn from(path: KeyPath) -> Self {
        SelectArg::Literal(path.to_value())
    }
}

impl<const N: usize> From<[&str; N]> for SelectArg {
    fn from(keys: [&str; N]) -> Self {
        KeyPath::from(keys).into()
    }
}

macro_rules! impl_literal_arg {
    ($($t:ty),*) => {
        $(
            impl From<$t> for SelectArg {
                fn from(value: $t) -> Self {
                    SelectArg::Literal(Value::from(value))
                }
            }
        )*
    };
}

impl_literal_arg!(Value, bool, i32, i64, u32, u64, usize, f64, &str, String);
