//! Scoped teardown callbacks, run deterministically at shutdown.

use std::sync::Mutex;

type Hook = Box<dyn FnOnce() + Send>;

/// Registry of teardown callbacks. The hosting runtime calls [`Lifecycle::shutdown`]
/// once after the server loop exits; hooks run in registration order.
#[derive(Default)]
pub struct Lifecycle {
    hooks: Mutex<Vec<Hook>>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_shutdown(&self, hook: impl FnOnce() + Send + 'static) {
        let mut hooks = self.hooks.lock().unwrap_or_else(|e| e.into_inner());
        hooks.push(Box::new(hook));
    }

    pub fn shutdown(&self) {
        let hooks = {
            let mut guard = self.hooks.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut *guard)
        };
        for hook in hooks {
            hook();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn hooks_run_once_in_order() {
        let lifecycle = Lifecycle::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let c = calls.clone();
        lifecycle.on_shutdown(move || {
            assert_eq!(c.fetch_add(1, Ordering::SeqCst), 0);
        });
        let c = calls.clone();
        lifecycle.on_shutdown(move || {
            assert_eq!(c.fetch_add(1, Ordering::SeqCst), 1);
        });

        lifecycle.shutdown();
        lifecycle.shutdown();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
