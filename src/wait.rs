use std::{
    future::{Future, IntoFuture},
    pin::Pin,
    task::{Context, Poll},
};

use crate::{Error, Promise, Status};

/// Waits for a [`Promise`] to leave [`Status::Waiting`].
///
/// Nothing is scheduled: the future is woken by whichever `resolve`/`reject`
/// call settles the value, or by the last resolver being dropped.
///
/// # Examples
///
/// ```
/// use oath::{defer, Value};
/// use futures::executor::block_on;
/// use std::thread;
///
/// let d = defer();
/// let waiter = d.promise().settled();
/// let task = thread::spawn(move || d.resolve(Value::new(String::from("🍓"))));
/// let value = block_on(waiter).unwrap();
/// assert_eq!(value.downcast::<String>().unwrap(), "🍓");
/// task.join().expect("The resolving thread has panicked.");
/// ```
#[derive(Debug)]
#[must_use = "futures do nothing unless polled"]
pub struct Settled {
    promise: Promise,
}

impl Promise {
    pub fn settled(&self) -> Settled {
        Settled {
            promise: self.clone(),
        }
    }
}

impl IntoFuture for Promise {
    type Output = Result<crate::Value, Error>;
    type IntoFuture = Settled;

    fn into_future(self) -> Self::IntoFuture {
        Settled { promise: self }
    }
}

impl Future for Settled {
    type Output = Result<crate::Value, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut promise = self.promise.lock();
        let value = promise.value.clone().unwrap_or_else(|| crate::Value::new(()));
        let status = promise.status;
        match status {
            Status::Resolved => Poll::Ready(Ok(value)),
            Status::Rejected => Poll::Ready(Err(Error::Rejected(value))),
            Status::Waiting if promise.abandoned => Poll::Ready(Err(Error::ResolverDropped)),
            Status::Waiting => {
                if !promise.wakers.iter().any(|w| w.will_wake(cx.waker())) {
                    promise.wakers.push(cx.waker().clone());
                }
                Poll::Pending
            }
        }
    }
}
