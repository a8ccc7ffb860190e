#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use serde::{Deserialize, Serialize};
    use serde_json::{Value, json};

    use crate::*;

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn recorder() -> (Rc<RefCell<Vec<(String, Value)>>>, impl Fn(&str, &Value) + 'static) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        (log, move |k: &str, v: &Value| {
            sink.borrow_mut().push((k.to_string(), v.clone()))
        })
    }

    #[test]
    fn test_guard_drops_duplicate_call() {
        init_logs();
        let guards = GuardRegistry::new();
        let ran = Rc::new(Cell::new(0));
        let mut held = None;

        let r = ran.clone();
        assert!(guards.run_once("save", |h| {
            r.set(r.get() + 1);
            held = Some(h);
        }));
        let r = ran.clone();
        assert!(!guards.run_once("save", |_| r.set(r.get() + 10)));
        assert_eq!(ran.get(), 1);
        assert!(guards.is_busy("save"));

        drop(held);
        assert!(!guards.is_busy("save"));

        let r = ran.clone();
        assert!(guards.run_once("save", |_| r.set(r.get() + 100)));
        assert_eq!(ran.get(), 101);
    }

    #[test]
    fn test_guard_release_by_key_is_idempotent() {
        let guards = GuardRegistry::new();
        let handle = guards.try_acquire("upload").unwrap();
        guards.release("upload");
        guards.release("upload");
        assert!(!guards.is_busy("upload"));
        drop(handle);
        assert!(guards.busy_keys().is_empty());
    }

    #[test]
    fn test_stale_handle_keeps_newer_holder() {
        let guards = GuardRegistry::new();
        let stale = guards.try_acquire("k").unwrap();
        guards.release("k");

        let fresh = guards.try_acquire("k").unwrap();
        stale.release();
        assert!(guards.is_busy("k"));

        fresh.release();
        assert!(!guards.is_busy("k"));
    }

    #[test]
    fn test_guard_keys_are_independent() {
        let guards = GuardRegistry::new();
        let a = guards.try_acquire("a");
        let b = guards.try_acquire("b");
        assert!(a.is_some() && b.is_some());
        assert_eq!(guards.busy_keys(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_guard_async_releases_on_completion() {
        let guards = GuardRegistry::new();
        let fut = guards
            .run_once_async("fetch", |key| async move { format!("{key} done") })
            .unwrap();
        assert!(guards.is_busy("fetch"));
        assert!(guards.run_once_async("fetch", |_| async {}).is_none());

        assert_eq!(pollster::block_on(fut), "fetch done");
        assert!(!guards.is_busy("fetch"));
    }

    #[test]
    fn test_guard_async_released_when_dropped() {
        let guards = GuardRegistry::new();
        let fut = guards.run_once_async("fetch", |_| async { 1 });
        assert!(guards.is_busy("fetch"));
        drop(fut);
        assert!(!guards.is_busy("fetch"));
    }

    #[test]
    fn test_watch_fires_once() {
        init_logs();
        let store = Store::new();
        let (log, cb) = recorder();
        store.watch("score", cb);

        store.write("score", 10);
        assert_eq!(*log.borrow(), vec![("score".to_string(), json!(10))]);

        store.write("score", 20);
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(store.read("score"), Some(json!(20)));
        assert_eq!(store.pending_fires("score"), 0);
    }

    #[test]
    fn test_two_watches_two_writes_two_calls() {
        let store = Store::new();
        let hits = Rc::new(Cell::new(0));
        for _ in 0..2 {
            let h = hits.clone();
            store.watch("k", move |_, _| h.set(h.get() + 1));
        }
        assert_eq!(store.pending_fires("k"), 2);

        store.write("k", 1);
        store.write("k", 2);
        store.write("k", 3);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_watchers_consumed_in_registration_order() {
        let store = Store::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for name in ["first", "second"] {
            let o = order.clone();
            store.watch("k", move |_, v| o.borrow_mut().push((name, v.clone())));
        }
        store.write("k", "a");
        store.write("k", "b");
        assert_eq!(
            *order.borrow(),
            vec![("first", json!("a")), ("second", json!("b"))]
        );
    }

    #[test]
    fn test_watch_n_and_unwatch() {
        let store = Store::new();
        let (log, cb) = recorder();
        let handle = store.watch_n("k", 3, cb);
        store.write("k", 1);
        assert_eq!(store.pending_fires("k"), 2);

        assert!(store.unwatch(handle));
        assert!(!store.unwatch(handle));
        store.write("k", 2);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_exhausted_and_unwatched_keys_are_forgotten() {
        let store = Store::new();
        for i in 0..100 {
            store.watch(format!("fired{i}"), |_, _| {});
            store.write(format!("fired{i}"), i);
            let h = store.watch(format!("cancelled{i}"), |_, _| {});
            store.unwatch(h);
        }
        assert_eq!(store.watched_keys(), 0);

        store.watch("k", |_, _| {});
        assert_eq!(store.watched_keys(), 1);
        assert_eq!(store.read("fired7"), Some(json!(7)));
    }

    #[test]
    fn test_write_without_watch_is_silent() {
        let store = Store::new();
        store.write("k", json!({ "a": 1 }));
        assert_eq!(store.read("k"), Some(json!({ "a": 1 })));
        assert_eq!(store.read("missing"), None);
        assert!(!store.contains("missing"));
    }

    #[test]
    fn test_watch_callback_can_reenter_store() {
        let store = Store::new();
        let inner = store.clone();
        store.watch("a", move |_, v| inner.write("b", v.clone()));
        store.write("a", 5);
        assert_eq!(store.read("b"), Some(json!(5)));
    }

    #[test]
    fn test_zero_fire_watch_registers_nothing() {
        let store = Store::new();
        let handle = store.watch_n("k", 0, |_, _| panic!("must not fire"));
        store.write("k", 1);
        assert!(!store.unwatch(handle));
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Profile {
        name: String,
        level: u8,
    }

    #[test]
    fn test_typed_read_write() {
        let store = Store::new();
        let p = Profile {
            name: "ada".into(),
            level: 3,
        };
        store.write_as("profile", &p).unwrap();
        assert_eq!(store.read_as::<Profile>("profile").unwrap(), Some(p));
        assert_eq!(store.read_as::<Profile>("none").unwrap(), None);

        store.write("profile", "not a profile");
        assert!(matches!(
            store.read_as::<Profile>("profile"),
            Err(Error::Serde(_))
        ));
    }

    #[test]
    fn test_config_defaults_and_validation() {
        let cfg = Config::from_json("{}").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.data_event, "getData");

        assert!(matches!(
            Config::from_json(r#"{ "default_watch_fires": 0 }"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(Config::from_json("[1]"), Err(Error::Serde(_))));
    }

    #[test]
    fn test_store_default_fires_from_config() {
        let store = Store::with_default_fires(2);
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        store.watch("k", move |_, _| h.set(h.get() + 1));
        store.write("k", 1);
        store.write("k", 2);
        store.write("k", 3);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_notice_text() {
        let n = Notice::unregistered_key("Notice", "share");
        assert_eq!(n.kind, NoticeKind::UnregisteredKey);
        assert_eq!(n.to_string(), "Notice: share does not exist");
        assert!(!n.show_cancel);

        // no host attached: notices only reach the log
        LogSink.show_modal(&Notice::invalid_argument("Notice", "method not a function"));
    }
}
