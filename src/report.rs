//! Progress reporting for install operations.
//!
//! Components take an explicit `&dyn Reporter` instead of logging through
//! ambient global state, so callers decide where messages land and tests can
//! assert on them.

pub trait Reporter {
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
    fn debug(&self, message: &str);
}

/// Production reporter: info lines go to the console, warnings and debug
/// detail go through `tracing`.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn info(&self, message: &str) {
        println!("{message}");
    }

    fn warning(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn debug(&self, message: &str) {
        tracing::debug!("{message}");
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;

    use super::Reporter;

    #[derive(Default)]
    pub(crate) struct RecordingReporter {
        pub events: RefCell<Vec<(&'static str, String)>>,
    }

    impl RecordingReporter {
        pub(crate) fn messages(&self, level: &str) -> Vec<String> {
            self.events
                .borrow()
                .iter()
                .filter(|(event_level, _)| *event_level == level)
                .map(|(_, message)| message.clone())
                .collect()
        }
    }

    impl Reporter for RecordingReporter {
        fn info(&self, message: &str) {
            self.events.borrow_mut().push(("info", message.to_string()));
        }

        fn warning(&self, message: &str) {
            self.events.borrow_mut().push(("warning", message.to_string()));
        }

        fn debug(&self, message: &str) {
            self.events.borrow_mut().push(("debug", message.to_string()));
        }
    }
}
