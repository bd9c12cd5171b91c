use std::sync::atomic::{AtomicBool, Ordering};

/// Transient operator-facing messages — the toast rail of the original
/// admin screens. Fire-and-forget; callers never read anything back.
pub trait Notifier {
    fn success(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn success(&self, message: &str) {
        (**self).success(message);
    }

    fn warning(&self, message: &str) {
        (**self).warning(message);
    }

    fn error(&self, message: &str) {
        (**self).error(message);
    }
}

/// Prints notifications to the terminal. Remembers whether an error was
/// shown so the binary can exit nonzero after the command finishes.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    saw_error: AtomicBool,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saw_error(&self) -> bool {
        self.saw_error.load(Ordering::Relaxed)
    }
}

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        println!("ok: {message}");
    }

    fn warning(&self, message: &str) {
        eprintln!("warning: {message}");
    }

    fn error(&self, message: &str) {
        self.saw_error.store(true, Ordering::Relaxed);
        eprintln!("error: {message}");
    }
}

#[cfg(test)]
pub use self::memory::{MemoryNotifier, Notice};
