use std::{any::Any, fmt, sync::Arc};

use crate::{Error, Promise};

/// The payload carried by a [`Promise`], for success and failure alike.
///
/// A `Value` can hold anything that is `Send + Sync + 'static`. Cloning it
/// shares the payload instead of copying it.
///
/// # Examples
///
/// ```
/// use oath::Value;
///
/// let v = Value::new(5_i32);
/// assert!(v.is::<i32>());
/// assert_eq!(v.downcast::<i32>().unwrap(), 5);
/// assert!(v.downcast::<String>().is_err());
/// ```
#[derive(Clone)]
pub struct Value {
    payload: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Value {
    pub fn new<T: Any + Send + Sync>(payload: T) -> Self {
        Self {
            payload: Arc::new(payload),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn is<T: Any>(&self) -> bool {
        self.payload.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// Clones the payload out as a `T`.
    pub fn downcast<T: Any + Clone>(&self) -> Result<T, Error> {
        self.downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| Error::TypeMismatch {
                expected: std::any::type_name::<T>(),
                actual: self.type_name,
            })
    }

    /// The deferred value this payload wraps, if it wraps one.
    pub fn as_promise(&self) -> Option<Promise> {
        self.downcast_ref::<Promise>().cloned()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// True when both values share the same payload.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        Arc::ptr_eq(&self.payload, &other.payload)
    }
}

impl From<Promise> for Value {
    fn from(promise: Promise) -> Self {
        Value::new(promise)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value<{}>", self.type_name)
    }
}
