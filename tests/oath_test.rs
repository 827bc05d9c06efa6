#[cfg(test)]
mod tests {
    use oath::{defer, defer_with, Promise, Settlement, Status, Value};
    use std::sync::{Arc, Mutex};

    fn int(v: &Value) -> i32 {
        v.downcast::<i32>().unwrap()
    }

    fn add_one(x: Value) -> Value {
        Value::new(int(&x) + 1)
    }

    #[test_log::test]
    fn test_resolve_any_value() {
        for payload in [Value::new(0_i32), Value::new("🍓"), Value::new(vec![1u8, 2, 3])] {
            let d = defer();
            d.resolve(payload.clone());
            assert_eq!(d.promise().status(), Status::Resolved);
            assert!(d.promise().value().unwrap().ptr_eq(&payload));
        }
    }

    #[test_log::test]
    fn test_reject_any_value() {
        for payload in [Value::new(-1_i32), Value::new(String::from("💥")), Value::new(())] {
            let d = defer();
            d.reject(payload.clone());
            assert_eq!(d.promise().status(), Status::Rejected);
            assert!(d.promise().value().unwrap().ptr_eq(&payload));
        }
    }

    #[test_log::test]
    fn test_then_resolves_with_handler_result() {
        let d = defer();
        let p = d.promise().then(add_one);
        d.resolve(Value::new(5_i32));
        assert_eq!(p.status(), Status::Resolved);
        assert_eq!(int(&p.value().unwrap()), 6);
    }

    #[test_log::test]
    fn test_rejection_skips_then_and_reaches_catch() {
        let d = defer();
        let first = d.promise().then(add_one);
        let caught = Arc::new(Mutex::new(None));
        let sink = caught.clone();
        let last = first.catch(move |e| {
            *sink.lock().unwrap() = e.downcast::<&str>().ok();
            e
        });
        d.reject(Value::new("boom"));

        assert_eq!(first.status(), Status::Rejected);
        assert_eq!(first.value().unwrap().downcast::<&str>().unwrap(), "boom");
        assert_eq!(*caught.lock().unwrap(), Some("boom"));
        assert_eq!(last.status(), Status::Rejected);
        assert_eq!(last.value().unwrap().downcast::<&str>().unwrap(), "boom");
    }

    #[test_log::test]
    fn test_then_flattens_already_resolved_promise() {
        let d = defer();
        let p = d.promise().then(|x| {
            let d2 = defer();
            d2.resolve(Value::new(int(&x) * 2));
            Value::from(d2.promise().clone())
        });
        d.resolve(Value::new(3_i32));
        assert_eq!(p.status(), Status::Resolved);
        assert_eq!(int(&p.value().unwrap()), 6);
    }

    #[test_log::test]
    fn test_then_waits_for_returned_promise() {
        let d = defer();
        let later = defer();
        let handed_out = later.promise().clone();
        let p = d.promise().then(move |_| Value::from(handed_out.clone()));
        d.resolve(Value::new(1_i32));
        assert_eq!(p.status(), Status::Waiting);
        later.resolve(Value::new(7_i32));
        assert_eq!(int(&p.value().unwrap()), 7);
    }

    #[test_log::test]
    fn test_long_chain() {
        let d = defer();
        let p = d
            .promise()
            .then(add_one)
            .then(add_one)
            .catch(|_| ())
            .then(|x| Value::new(int(&x) * 10));
        d.resolve(Value::new(0_i32));
        assert_eq!(int(&p.value().unwrap()), 20);
    }

    #[test_log::test]
    fn test_reentrant_resolution_completes_first() {
        let outer = defer();
        let inner = defer();
        let events = Arc::new(Mutex::new(vec![]));

        let inner_events = events.clone();
        let inner_done = inner.promise().then(move |x| {
            inner_events.lock().unwrap().push("inner callback");
            x
        });

        let outer_events = events.clone();
        let inner_resolver = inner.clone();
        outer.promise().then(move |x| {
            outer_events.lock().unwrap().push("outer callback");
            inner_resolver.resolve(x.clone());
            outer_events.lock().unwrap().push("outer callback done");
            x
        });

        outer.resolve(Value::new(1_i32));
        events.lock().unwrap().push("outer resolve returned");
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                "outer callback",
                "inner callback",
                "outer callback done",
                "outer resolve returned",
            ]
        );
        assert_eq!(inner_done.status(), Status::Resolved);
    }

    #[test_log::test]
    fn test_callback_registered_during_resolve_is_not_in_snapshot() {
        let d = defer();
        let calls = Arc::new(Mutex::new(0));
        let counter = calls.clone();
        let source: Promise = d.promise().clone();
        d.promise().then(move |x| {
            let counter = counter.clone();
            // Registered while the snapshot is being walked: fires once on
            // registration because the value is already resolved.
            source.then(move |y| {
                *counter.lock().unwrap() += 1;
                y
            });
            x
        });
        d.resolve(Value::new(()));
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test_log::test]
    fn test_settle_once_policy() {
        let d = defer_with(Settlement::Once);
        let p = d.promise().then(add_one);
        d.resolve(Value::new(1_i32));
        d.reject(Value::new(100_i32));
        d.resolve(Value::new(50_i32));
        assert_eq!(d.promise().status(), Status::Resolved);
        assert_eq!(int(&p.value().unwrap()), 2);
    }
}
