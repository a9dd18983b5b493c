//! Current screen of the portal.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::watch;

use shds_auth::Screen;

/// Shared handle to the current screen.
///
/// `replace` to the screen already shown is a no-op: no transition is
/// recorded and subscribers are not woken.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: Arc<watch::Sender<Screen>>,
    transitions: Arc<AtomicUsize>,
}

impl Navigator {
    pub fn new(start: Screen) -> Self {
        let (tx, _rx) = watch::channel(start);
        Self {
            current: Arc::new(tx),
            transitions: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn current(&self) -> Screen {
        *self.current.borrow()
    }

    /// Move to `screen`. Returns whether the screen changed.
    pub fn replace(&self, screen: Screen) -> bool {
        let changed = self.current.send_if_modified(|current| {
            if *current == screen {
                false
            } else {
                *current = screen;
                true
            }
        });
        if changed {
            self.transitions.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(to = %screen, "navigated");
        }
        changed
    }

    /// Number of actual screen changes so far.
    pub fn transitions(&self) -> usize {
        self.transitions.load(Ordering::Relaxed)
    }

    pub fn subscribe(&self) -> watch::Receiver<Screen> {
        self.current.subscribe()
    }
}
