use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared abort flag raised by whatever layer watches for user input.
///
/// The engine never exits the process itself. It checks this flag at the
/// start of every step and moves the episode into the aborted state.
#[derive(Debug, Clone, Default)]
pub struct QuitSignal {
    raised: Arc<AtomicBool>,
}

impl QuitSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that the running episode stop
    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    /// Lower the flag so a new episode can run
    pub fn clear(&self) {
        self.raised.store(false, Ordering::SeqCst);
    }
}
