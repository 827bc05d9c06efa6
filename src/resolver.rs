use crate::promise::Outcome;
use crate::{Promise, Settlement, Value};

/// The privileged handle that settles a [`Promise`].
///
/// Clones settle the same value. When the last resolver of a still waiting
/// value is dropped, anyone awaiting it receives
/// [`Error::ResolverDropped`](crate::Error::ResolverDropped).
///
/// # Examples
///
/// ```
/// use oath::{Resolver, Status, Value};
///
/// let resolver = Resolver::new();
/// resolver.resolve(Value::new("🍓"));
/// assert_eq!(resolver.promise().status(), Status::Resolved);
/// ```
#[derive(Debug)]
pub struct Resolver {
    promise: Promise,
}

impl Resolver {
    pub fn new() -> Self {
        Self::from_promise(Promise::new())
    }

    pub fn with_settlement(settlement: Settlement) -> Self {
        Self::from_promise(Promise::with_settlement(settlement))
    }

    /// Takes charge of an existing deferred value.
    pub fn from_promise(promise: Promise) -> Self {
        promise.acquire_resolver();
        Resolver { promise }
    }

    pub fn promise(&self) -> &Promise {
        &self.promise
    }

    /// Resolves with `data` and runs the success callbacks in the order they
    /// were registered. Returns the value held once they have all run.
    pub fn resolve(&self, data: Value) -> Value {
        self.promise.settle(Outcome::Resolve, data.clone());
        self.promise.value().unwrap_or(data)
    }

    /// Rejects with `error` and runs the failure callbacks in order.
    pub fn reject(&self, error: Value) {
        self.promise.settle(Outcome::Reject, error);
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Resolver {
    fn clone(&self) -> Self {
        Self::from_promise(self.promise.clone())
    }
}

impl Drop for Resolver {
    /// If this was the last resolver of a waiting value, wake its waiters
    /// and those of every value chained from it.
    fn drop(&mut self) {
        self.promise.release_resolver();
    }
}
