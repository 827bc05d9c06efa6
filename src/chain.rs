//! Continuations: deriving a new deferred value from the outcome of another.
//!
//! Every call to [`Promise::chain`] (and the `then`/`catch` sugar over it)
//! creates an independent child, so one value can fan out to any number of
//! continuations. Failure handlers only observe a rejection: the child of a
//! rejected value is always rejected with the same error, whatever the
//! handler returns.
use std::sync::Arc;

use crate::promise::Callback;
use crate::{Promise, Resolver, Value};

/// Continuation run with the value of a resolved parent. Returning a
/// [`Value`] that wraps a [`Promise`] makes the child adopt that promise's
/// eventual outcome.
pub type OnSuccess = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Continuation run with the error of a rejected parent.
pub type OnFailure = Arc<dyn Fn(Value) + Send + Sync>;

impl Promise {
    /// Registers an optional success and failure continuation and returns
    /// the deferred value they feed.
    ///
    /// Without `on_success`, the child resolves with the parent's value.
    /// Without `on_failure`, the child is still rejected with the parent's
    /// error.
    pub fn chain(
        &self,
        on_success: Option<OnSuccess>,
        on_failure: Option<OnFailure>,
    ) -> Promise {
        let resolver = Resolver::with_settlement(self.settlement());
        let child = resolver.promise().clone();

        let success_resolver = resolver.clone();
        let propagate_resolution: Callback = Arc::new(move |parent: &Promise| {
            let value = current_value(parent);
            match &on_success {
                Some(on_success) => {
                    let returned = on_success(value);
                    match returned.as_promise() {
                        Some(inner) => adopt(&inner, success_resolver.clone()),
                        None => {
                            success_resolver.resolve(returned);
                        }
                    }
                }
                None => {
                    success_resolver.resolve(value);
                }
            }
        });

        let propagate_rejection: Callback = Arc::new(move |parent: &Promise| {
            let error = current_value(parent);
            if let Some(on_failure) = &on_failure {
                on_failure(error.clone());
            }
            resolver.reject(error);
        });

        self.add_dependent(&child);
        self.subscribe(propagate_resolution, propagate_rejection);
        child
    }

    /// Runs `on_success` with the resolved value.
    ///
    /// # Examples
    ///
    /// ```
    /// use oath::{defer, Status, Value};
    ///
    /// let d = defer();
    /// let p = d.promise().then(|x| Value::new(x.downcast::<i32>().unwrap() + 1));
    /// d.resolve(Value::new(5_i32));
    /// assert_eq!(p.status(), Status::Resolved);
    /// assert_eq!(p.value().unwrap().downcast::<i32>().unwrap(), 6);
    /// ```
    pub fn then<F>(&self, on_success: F) -> Promise
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.chain(Some(Arc::new(on_success)), None)
    }

    /// `then` with a failure continuation as well.
    pub fn then_or<F, G, R>(&self, on_success: F, on_failure: G) -> Promise
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
        G: Fn(Value) -> R + Send + Sync + 'static,
    {
        self.chain(Some(Arc::new(on_success)), Some(observer(on_failure)))
    }

    /// Runs `on_failure` with the error of a rejected value. The return value
    /// of `on_failure` is dropped and the result stays rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use oath::{defer, Status, Value};
    ///
    /// let d = defer();
    /// let p = d.promise().catch(|e| println!("failed with {:?}", e));
    /// d.reject(Value::new("boom"));
    /// assert_eq!(p.status(), Status::Rejected);
    /// ```
    pub fn catch<G, R>(&self, on_failure: G) -> Promise
    where
        G: Fn(Value) -> R + Send + Sync + 'static,
    {
        self.chain(None, Some(observer(on_failure)))
    }
}

fn observer<G, R>(on_failure: G) -> OnFailure
where
    G: Fn(Value) -> R + Send + Sync + 'static,
{
    Arc::new(move |error: Value| {
        let _ = on_failure(error);
    })
}

/// Settles through `resolver` once `inner` settles, with its value and
/// outcome.
fn adopt(inner: &Promise, resolver: Resolver) {
    inner.add_dependent(resolver.promise());
    let on_reject = resolver.clone();
    inner.subscribe(
        Arc::new(move |settled: &Promise| {
            resolver.resolve(current_value(settled));
        }),
        Arc::new(move |settled: &Promise| {
            on_reject.reject(current_value(settled));
        }),
    );
}

/// A value built with [`Promise::from_parts`] may settle without a payload;
/// it propagates as `()`.
fn current_value(promise: &Promise) -> Value {
    promise.value().unwrap_or_else(|| Value::new(()))
}
