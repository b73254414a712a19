//! Messages about convolution paths taken by the current thread.
use std::cell::RefCell;

thread_local!(static PATH_LOG: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) });

pub fn log_message(msg: &str) {
    PATH_LOG.with(|log| log.borrow_mut().push(msg.to_owned()));
}

pub fn logs_contain(msg: &str) -> bool {
    PATH_LOG.with(|log| log.borrow().iter().any(|line| line.contains(msg)))
}

/// Returns all messages recorded since the last call of [clear_log].
pub fn messages() -> Vec<String> {
    PATH_LOG.with(|log| log.borrow().clone())
}

pub fn clear_log() {
    PATH_LOG.with(|log| log.borrow_mut().clear());
}
