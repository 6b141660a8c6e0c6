#[cfg(test)]
mod tests {
    use crate::config::*;
    use crate::load_state::*;
    use crate::logging::*;
    use crate::signal::*;
    use crate::view::*;
    use log::Level;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::{Mutex, OnceLock};

    #[test]
    fn test_signal_basic() {
        let sig = signal(42);
        assert_eq!(sig.get(), 42);

        sig.set(100);
        assert_eq!(sig.get(), 100);

        sig.update(|v| *v += 1);
        assert_eq!(sig.get(), 101);
    }

    #[test]
    fn test_signal_subscription() {
        let sig = signal(0);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_clone = seen.clone();
        let id = sig.subscribe(move |v| seen_clone.borrow_mut().push(*v));

        sig.set(42);
        sig.update(|v| *v += 1);
        sig.unsubscribe(id);
        sig.set(7);

        assert_eq!(*seen.borrow(), vec![42, 43]);
    }

    #[test]
    fn test_signal_subscriber_can_read() {
        let sig = signal(String::from("a"));
        let read = Rc::new(RefCell::new(String::new()));

        let (sig2, read2) = (sig.clone(), read.clone());
        sig.subscribe(move |_| *read2.borrow_mut() = sig2.get());

        sig.set("b".into());
        assert_eq!(*read.borrow(), "b");
    }

    #[test]
    fn test_view_texts_and_click() {
        let clicks = Rc::new(RefCell::new(0));
        let c = clicks.clone();
        let row = Row()
            .child(Text("Ada"))
            .child(Column().child(Checkbox(true, "active")))
            .on_click(move || *c.borrow_mut() += 1);

        assert_eq!(row.texts(), vec!["Ada", "active"]);
        assert_eq!(row.node_count(), 4);
        assert!(row.click());
        assert_eq!(*clicks.borrow(), 1);
        assert!(!Text("plain").click());
    }

    #[test]
    fn test_load_state() {
        let loading: LoadState<Vec<u8>> = LoadState::default();
        assert!(loading.is_loading());
        assert_eq!(loading.success(), None);

        let ok = LoadState::from_result(Ok::<_, String>(vec![1u8, 2, 3]));
        assert_eq!(ok.success(), Some(&vec![1, 2, 3]));
        assert_eq!(ok.as_ref().map(|v| v.len()), LoadState::Success(3));
        assert_eq!(ok.into_success(), Some(vec![1, 2, 3]));

        let err: LoadState<Vec<u8>> = LoadState::from_result(Err("timeout"));
        assert_eq!(err.error(), Some("timeout"));
        assert_eq!(err.map(|v| v.len()), LoadState::Error("timeout".into()));
    }

    #[test]
    fn test_config_builder() {
        let cfg = BinderConfig::new()
            .with_detect_moves(false)
            .with_max_recycled_per_type(2)
            .with_worker_name("rows")
            .with_cancel_check_interval(0);
        assert!(!cfg.detect_moves);
        assert_eq!(cfg.max_recycled_per_type, 2);
        assert_eq!(cfg.worker_name, "rows");
        assert_eq!(cfg.cancel_check_interval, 1);

        let d = BinderConfig::default();
        assert!(d.detect_moves);
        assert_eq!(d.max_recycled_per_type, 5);
    }

    struct Capture(Mutex<Vec<(String, log::Level, String)>>);

    impl log::Log for Capture {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }
        fn log(&self, record: &log::Record) {
            if record.target().starts_with(APP_TAG) {
                self.0
                    .lock()
                    .unwrap()
                    .push((
                        record.target().to_string(),
                        record.level(),
                        record.args().to_string(),
                    ));
            }
        }
        fn flush(&self) {}
    }

    fn capture() -> &'static Capture {
        static CAPTURE: OnceLock<&'static Capture> = OnceLock::new();
        CAPTURE.get_or_init(|| {
            let c: &'static Capture = Box::leak(Box::new(Capture(Mutex::new(Vec::new()))));
            log::set_logger(c).expect("no other logger in this test binary");
            log::set_max_level(log::LevelFilter::Trace);
            c
        })
    }

    #[test]
    fn test_logger_prefix_and_switch() {
        let cap = capture();
        let logger = Logger::new("UserList");
        assert_eq!(logger.target(), "rowbind: UserList");

        set_logging_enabled(false);
        logger.e("hidden");

        set_logging_enabled(true);
        logger.i("shown");
        let err = std::io::Error::other("disk");
        logger.e_with("save failed", &err);

        logger.v_with("retry", &err);
        logger.d_with("cache miss", &err);
        logger.i_with("fallback", &err);
        logger.w_with("slow", &err);
        logger.w_err(&err);

        let t = "rowbind: UserList".to_string();
        let got = cap.0.lock().unwrap().clone();
        assert_eq!(
            got,
            vec![
                (t.clone(), Level::Info, "shown".to_string()),
                (t.clone(), Level::Error, "save failed: disk".to_string()),
                (t.clone(), Level::Trace, "retry: disk".to_string()),
                (t.clone(), Level::Debug, "cache miss: disk".to_string()),
                (t.clone(), Level::Info, "fallback: disk".to_string()),
                (t.clone(), Level::Warn, "slow: disk".to_string()),
                (t, Level::Warn, "disk".to_string()),
            ]
        );
    }
}
