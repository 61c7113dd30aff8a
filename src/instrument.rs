//! Call Instrumentation Module
//!
//! Wrappers that record how often a store operation runs and what went in
//! and out of it. State lives in the store:
//! - `<name>` holds the call counter
//! - `<name>:inputs` holds the rendered argument tuples, in call order
//! - `<name>:outputs` holds the rendered results, index-aligned with inputs

use std::fmt::{self, Display};
use std::future::Future;

use tracing::debug;

use crate::error::{CacheError, Result};
use crate::store::Store;

// == Operation ==
/// Explicit identifier of an instrumented operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operation {
    name: &'static str,
}

impl Operation {
    /// Creates an operation identified by its qualified name.
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    /// The qualified name, also the counter key.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Key of the list holding rendered inputs.
    pub fn inputs_key(&self) -> String {
        format!("{}:inputs", self.name)
    }

    /// Key of the list holding rendered outputs.
    pub fn outputs_key(&self) -> String {
        format!("{}:outputs", self.name)
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// == Call Arguments ==
/// Positional arguments of a call, rendered as a tuple for the history.
pub trait CallArgs {
    /// Renders the arguments as `(a, b)`, or `(a,)` for a single argument.
    fn render(&self) -> String;
}

impl CallArgs for () {
    fn render(&self) -> String {
        "()".to_string()
    }
}

impl<A: Display> CallArgs for (A,) {
    fn render(&self) -> String {
        format!("({},)", self.0)
    }
}

impl<A: Display, B: Display> CallArgs for (A, B) {
    fn render(&self) -> String {
        format!("({}, {})", self.0, self.1)
    }
}

impl<A: Display, B: Display, C: Display> CallArgs for (A, B, C) {
    fn render(&self) -> String {
        format!("({}, {}, {})", self.0, self.1, self.2)
    }
}

// == Count Calls ==
/// Increments the call counter of `op`, then runs `call`.
///
/// The increment happens before the call, so a failing call is still
/// counted. A failed increment aborts without running `call`.
pub async fn count_calls<S, F, Fut, T>(store: &S, op: &Operation, call: F) -> Result<T>
where
    S: Store + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let calls = store.incr(op.name()).await?;
    debug!("{} call #{}", op, calls);
    call().await
}

// == Call History ==
/// Appends the rendered `args` to the inputs of `op`, runs `call`, and
/// appends the rendered result to the outputs of `op`.
///
/// The result is returned as produced by `call`. When `call` fails nothing
/// is appended to the outputs, leaving the lists one entry apart.
pub async fn call_history<S, A, F, Fut, T>(
    store: &S,
    op: &Operation,
    args: &A,
    call: F,
) -> Result<T>
where
    S: Store + ?Sized,
    A: CallArgs + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
    T: Display,
{
    store
        .rpush(&op.inputs_key(), args.render().as_bytes())
        .await?;
    let result = call().await?;
    store
        .rpush(&op.outputs_key(), result.to_string().as_bytes())
        .await?;
    Ok(result)
}

// == Call Count ==
/// Reads how many times `op` has been called.
pub async fn call_count<S: Store + ?Sized>(store: &S, op: &Operation) -> Result<u64> {
    read_counter(store, op.name()).await
}

/// Reads an `INCR`-maintained counter, treating an absent key as zero.
pub(crate) async fn read_counter<S: Store + ?Sized>(store: &S, key: &str) -> Result<u64> {
    match store.get(key).await? {
        Some(bytes) => std::str::from_utf8(&bytes)
            .ok()
            .and_then(|text| text.parse().ok())
            .ok_or_else(|| CacheError::Conversion(format!("counter {} is not an integer", key))),
        None => Ok(0),
    }
}
