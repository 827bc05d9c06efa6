use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    task::Waker,
};

use crate::Value;

/// Where a deferred value is in its life.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    #[default]
    Waiting,
    Resolved,
    Rejected,
}

/// What happens when an already settled value is settled again.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Settlement {
    /// Every `resolve`/`reject` overwrites the value and fires the callbacks
    /// again, so the value behaves like a stream of outcomes.
    #[default]
    Repeat,
    /// The first `resolve`/`reject` wins; later ones are ignored.
    Once,
}

/// Continuation stored on a deferred value. It receives the value itself and
/// reads whatever `value`/`status` are current when it runs.
pub(crate) type Callback = Arc<dyn Fn(&Promise) + Send + Sync>;

/// A value that does not exist yet.
///
/// `Promise` is a handle: clones share the same state. Only a
/// [`Resolver`](crate::Resolver) settles it.
#[derive(Clone)]
pub struct Promise {
    inner: Arc<Mutex<Inner>>,
}

pub(crate) struct Inner {
    pub(crate) value: Option<Value>,
    pub(crate) status: Status,
    pub(crate) settlement: Settlement,
    success_callbacks: Vec<Callback>,
    failure_callbacks: Vec<Callback>,
    pub(crate) wakers: Vec<Waker>,
    pub(crate) resolvers: usize,
    pub(crate) abandoned: bool,
    /// Values whose settlement is driven by this one.
    dependents: Vec<Promise>,
}

impl Inner {
    fn mark_abandoned(&mut self) -> Option<Abandoned> {
        if self.abandoned || self.status != Status::Waiting {
            return None;
        }
        self.abandoned = true;
        Some(Abandoned {
            wakers: std::mem::take(&mut self.wakers),
            dependents: self.dependents.clone(),
        })
    }

    fn unmark_abandoned(&mut self) -> Option<Vec<Promise>> {
        if !self.abandoned {
            return None;
        }
        self.abandoned = false;
        Some(self.dependents.clone())
    }
}

/// Work left over after marking a value abandoned, done once its lock is
/// released.
struct Abandoned {
    wakers: Vec<Waker>,
    dependents: Vec<Promise>,
}

impl Abandoned {
    fn notify(self) {
        log::debug!("abandoning value with {} dependents", self.dependents.len());
        for waker in self.wakers {
            waker.wake()
        }
        for dependent in &self.dependents {
            dependent.abandon();
        }
    }
}

/// The two ways a resolver can settle a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Resolve,
    Reject,
}

impl Outcome {
    fn status(self) -> Status {
        match self {
            Outcome::Resolve => Status::Resolved,
            Outcome::Reject => Status::Rejected,
        }
    }
}

impl Promise {
    /// A fresh waiting value with no callbacks.
    pub fn new() -> Self {
        Self::from_parts(None, Status::Waiting)
    }

    /// Builds a value in any state. Nothing is validated, so a `Resolved`
    /// value without a payload is possible.
    pub fn from_parts(value: Option<Value>, status: Status) -> Self {
        Self::build(value, status, Settlement::default())
    }

    pub fn with_settlement(settlement: Settlement) -> Self {
        Self::build(None, Status::Waiting, settlement)
    }

    fn build(value: Option<Value>, status: Status, settlement: Settlement) -> Self {
        Promise {
            inner: Arc::new(Mutex::new(Inner {
                value,
                status,
                settlement,
                success_callbacks: vec![],
                failure_callbacks: vec![],
                wakers: vec![],
                resolvers: 0,
                abandoned: false,
                dependents: vec![],
            })),
        }
    }

    pub fn value(&self) -> Option<Value> {
        self.lock().value.clone()
    }

    pub fn status(&self) -> Status {
        self.lock().status
    }

    pub fn settlement(&self) -> Settlement {
        self.lock().settlement
    }

    pub fn is_waiting(&self) -> bool {
        self.status() == Status::Waiting
    }

    /// True when both handles refer to the same deferred value.
    pub fn ptr_eq(&self, other: &Promise) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Callbacks never run under this lock, so a poisoned lock still holds
    /// consistent state.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends one callback per outcome. If the value has already settled,
    /// the callback for the current outcome also fires right away.
    pub(crate) fn subscribe(&self, on_success: Callback, on_failure: Callback) {
        let fire = {
            let mut promise = self.lock();
            promise.success_callbacks.push(on_success.clone());
            promise.failure_callbacks.push(on_failure.clone());
            log::trace!(
                "subscribed to {:?} value ({} success, {} failure callbacks)",
                promise.status,
                promise.success_callbacks.len(),
                promise.failure_callbacks.len()
            );
            match promise.status {
                Status::Waiting => None,
                Status::Resolved => Some(on_success),
                Status::Rejected => Some(on_failure),
            }
        };
        if let Some(callback) = fire {
            callback(self);
        }
    }

    /// Records that `child` only settles through this value, so it is
    /// abandoned along with it.
    pub(crate) fn add_dependent(&self, child: &Promise) {
        let abandoned = {
            let mut promise = self.lock();
            promise.dependents.push(child.clone());
            promise.abandoned && promise.status == Status::Waiting
        };
        if abandoned {
            child.abandon();
        }
    }

    /// Marks a waiting value abandoned, wakes its waiters and does the same
    /// for everything depending on it.
    fn abandon(&self) {
        let marked = self.lock().mark_abandoned();
        if let Some(marked) = marked {
            marked.notify();
        }
    }

    /// Counts a new resolver. A value abandoned earlier, and its dependents,
    /// become waitable again.
    pub(crate) fn acquire_resolver(&self) {
        let dependents = {
            let mut promise = self.lock();
            promise.resolvers += 1;
            promise.unmark_abandoned()
        };
        for dependent in dependents.iter().flatten() {
            dependent.revive();
        }
    }

    /// Forgets a resolver. Dropping the last one abandons a waiting value.
    pub(crate) fn release_resolver(&self) {
        let marked = {
            let mut promise = self.lock();
            promise.resolvers -= 1;
            if promise.resolvers > 0 {
                return;
            }
            log::debug!("every resolver dropped");
            promise.mark_abandoned()
        };
        if let Some(marked) = marked {
            marked.notify();
        }
    }

    fn revive(&self) {
        let dependents = self.lock().unmark_abandoned();
        for dependent in dependents.iter().flatten() {
            dependent.revive();
        }
    }

    /// Stores `data`, then runs a snapshot of the matching callback list
    /// taken before any of them runs. Returns `false` when a `Once` value
    /// refused to settle again.
    pub(crate) fn settle(&self, outcome: Outcome, data: Value) -> bool {
        let (callbacks, wakers, _previous) = {
            let mut promise = self.lock();
            if promise.status != Status::Waiting {
                if promise.settlement == Settlement::Once {
                    log::debug!(
                        "ignoring {:?} of a value already {:?}",
                        outcome,
                        promise.status
                    );
                    return false;
                }
                log::trace!("settling {:?} value again", promise.status);
            }
            // The replaced payload is dropped after the lock is released.
            let previous = promise.value.replace(data);
            promise.status = outcome.status();
            let callbacks = match outcome {
                Outcome::Resolve => promise.success_callbacks.clone(),
                Outcome::Reject => promise.failure_callbacks.clone(),
            };
            (callbacks, std::mem::take(&mut promise.wakers), previous)
        };
        log::trace!("{:?}: firing {} callbacks", outcome, callbacks.len());
        for waker in wakers {
            waker.wake();
        }
        for callback in &callbacks {
            callback(self);
        }
        true
    }
}

impl Default for Promise {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let promise = self.lock();
        f.debug_struct("Promise")
            .field("status", &promise.status)
            .field("value", &promise.value)
            .finish()
    }
}
