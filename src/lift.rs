//! Adapting error-first callback functions into functions that return a
//! [`Promise`].
use crate::{Promise, Resolver, Value};

/// Completion handed to a lifted function. `Err` rejects, `Ok` resolves.
pub type Done = Box<dyn FnOnce(Result<Value, Value>) + Send>;

/// Wraps `f(arg, done)` so that calling it returns a deferred value instead.
///
/// A single resolver is created here and shared by every call of the
/// returned function: all calls settle the same [`Promise`], and with the
/// default [`Settlement`](crate::Settlement) each call settles it again. Use
/// [`lift_each`] to get a separate value per call.
///
/// # Examples
///
/// ```
/// use oath::{lift, Done, Value};
///
/// fn parse(input: String, done: Done) {
///     match input.parse::<i32>() {
///         Ok(n) => done(Ok(Value::new(n))),
///         Err(e) => done(Err(Value::new(e.to_string()))),
///     }
/// }
///
/// let parse = lift(parse);
/// let p = parse("12".to_owned());
/// assert_eq!(p.value().unwrap().downcast::<i32>().unwrap(), 12);
/// ```
pub fn lift<A, F>(f: F) -> impl Fn(A) -> Promise
where
    F: Fn(A, Done),
{
    let resolver = Resolver::new();
    move |arg| {
        f(arg, completion(resolver.clone()));
        resolver.promise().clone()
    }
}

/// Like [`lift`], but every call gets its own resolver and deferred value.
pub fn lift_each<A, F>(f: F) -> impl Fn(A) -> Promise
where
    F: Fn(A, Done),
{
    move |arg| {
        let resolver = Resolver::new();
        let promise = resolver.promise().clone();
        f(arg, completion(resolver));
        promise
    }
}

fn completion(resolver: Resolver) -> Done {
    Box::new(move |result| match result {
        Ok(value) => {
            resolver.resolve(value);
        }
        Err(error) => resolver.reject(error),
    })
}
