use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{
    WindowId,
    backend::PlatformSource,
    event::{PlatformEvent, WindowEvent},
};

/// A [`PlatformSource`] fed by the test. Clones share one queue.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource(Arc<Mutex<VecDeque<PlatformEvent>>>);

impl ScriptedSource {
    /// An empty source.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<PlatformEvent>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue an event for `window`.
    pub fn push(&self, window: WindowId, timestamp: u32, event: WindowEvent) {
        self.lock().push_back(PlatformEvent {
            window,
            timestamp,
            event,
        });
    }

    /// Number of events not yet polled.
    pub fn pending(&self) -> usize {
        self.lock().len()
    }
}

impl PlatformSource for ScriptedSource {
    fn poll(&mut self) -> Option<PlatformEvent> {
        self.lock().pop_front()
    }
}
