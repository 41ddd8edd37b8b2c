//! The [`Log`] trait shared by the engine and its callers.

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) forwards to `tracing`; tests may supply
/// a recording implementation to assert on emitted lines without a
/// subscriber.
pub trait Log {
    /// Log a stage header (run start, run end, major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (suppressed on console unless verbose).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message (a change that was not made).
    fn dry_run(&self, msg: &str);
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder(RefCell<Vec<String>>);

    impl Log for Recorder {
        fn stage(&self, msg: &str) {
            self.0.borrow_mut().push(format!("stage {msg}"));
        }
        fn info(&self, msg: &str) {
            self.0.borrow_mut().push(format!("info {msg}"));
        }
        fn debug(&self, msg: &str) {
            self.0.borrow_mut().push(format!("debug {msg}"));
        }
        fn warn(&self, msg: &str) {
            self.0.borrow_mut().push(format!("warn {msg}"));
        }
        fn error(&self, msg: &str) {
            self.0.borrow_mut().push(format!("error {msg}"));
        }
        fn dry_run(&self, msg: &str) {
            self.0.borrow_mut().push(format!("dry_run {msg}"));
        }
    }

    #[test]
    fn log_is_object_safe() {
        let recorder = Recorder::default();
        let log: &dyn Log = &recorder;
        log.stage("start");
        log.dry_run("would install fish");
        let lines = recorder.0.borrow();
        assert_eq!(lines[0], "stage start");
        assert_eq!(lines[1], "dry_run would install fish");
    }
}
