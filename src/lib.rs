//! Deferred values with synchronous, chained continuations.
//!
//! A [`Resolver`] owns a [`Promise`]: a value that does not exist yet. Calling
//! [`Resolver::resolve`] or [`Resolver::reject`] stores the outcome and runs
//! the continuations registered with [`Promise::then`] and [`Promise::catch`]
//! right there, before the call returns. There is no scheduler.
//!
//! ```
//! use oath::{defer, Status, Value};
//!
//! let d = defer();
//! let p = d.promise().then(|x| {
//!     let d2 = defer();
//!     d2.resolve(Value::new(x.downcast::<i32>().unwrap() * 2));
//!     Value::from(d2.promise().clone())
//! });
//! d.resolve(Value::new(3_i32));
//! assert_eq!(p.status(), Status::Resolved);
//! assert_eq!(p.value().unwrap().downcast::<i32>().unwrap(), 6);
//! ```
pub mod chain;
pub mod lift;
pub mod promise;
pub mod resolver;
pub mod value;
pub mod wait;

pub use chain::{OnFailure, OnSuccess};
pub use lift::{lift, lift_each, Done};
pub use promise::{Promise, Settlement, Status};
pub use resolver::Resolver;
pub use value::Value;
pub use wait::Settled;

use thiserror::Error;

/// Failures reported when awaiting a [`Promise`] or reading a [`Value`].
#[derive(Error, Debug)]
pub enum Error {
    /// The awaited value was rejected; carries the rejection payload.
    #[error("the deferred value was rejected with {0:?}")]
    Rejected(Value),
    /// The awaited value, or one it was chained from, lost every resolver.
    #[error("every resolver was dropped before the value settled")]
    ResolverDropped,
    /// [`Value::downcast`] was asked for the wrong type.
    #[error("expected a `{expected}` payload, found `{actual}`")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
}

/// A resolver for a fresh waiting value.
pub fn defer() -> Resolver {
    Resolver::new()
}

/// A resolver for a fresh waiting value under the given [`Settlement`].
pub fn defer_with(settlement: Settlement) -> Resolver {
    Resolver::with_settlement(settlement)
}
