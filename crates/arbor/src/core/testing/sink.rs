use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    NodeId,
    sink::{EventSink, Notification},
};

/// An [`EventSink`] that records every notification.
#[derive(Debug, Clone)]
pub struct Recorder {
    notes: Notes,
    veto_close: bool,
}

impl Recorder {
    /// A recorder and the handle for reading what it saw.
    pub fn new() -> (Self, Notes) {
        let notes = Notes::default();
        (
            Self {
                notes: notes.clone(),
                veto_close: false,
            },
            notes,
        )
    }

    /// Refuse close requests.
    pub fn vetoing(mut self) -> Self {
        self.veto_close = true;
        self
    }
}

impl EventSink for Recorder {
    fn notify(&mut self, n: &Notification) {
        self.notes.lock().push(n.clone());
    }

    fn close_requested(&mut self) -> bool {
        self.veto_close
    }
}

/// Shared view of the notifications a [`Recorder`] received.
#[derive(Debug, Clone, Default)]
pub struct Notes(Arc<Mutex<Vec<Notification>>>);

impl Notes {
    fn lock(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Everything received, in order.
    pub fn all(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    /// Notifications matching a predicate.
    pub fn matching(&self, f: impl Fn(&Notification) -> bool) -> Vec<Notification> {
        self.lock().iter().filter(|n| f(n)).cloned().collect()
    }

    /// Focus gained and lost notifications only.
    pub fn focus(&self) -> Vec<Notification> {
        self.matching(|n| {
            matches!(
                n,
                Notification::FocusGained(_) | Notification::FocusLost(_)
            )
        })
    }

    /// Pointer enter and exit notifications only.
    pub fn hover(&self) -> Vec<Notification> {
        self.matching(|n| {
            matches!(
                n,
                Notification::MouseEntered(_) | Notification::MouseExited(_)
            )
        })
    }

    /// Nodes that reported a click.
    pub fn clicks(&self) -> Vec<NodeId> {
        self.lock()
            .iter()
            .filter_map(|n| match n {
                Notification::Clicked(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Scrollbar value changes as (scrollbar, value).
    pub fn values(&self) -> Vec<(NodeId, f64)> {
        self.lock()
            .iter()
            .filter_map(|n| match n {
                Notification::ValueChanged { node, value } => Some((*node, *value)),
                _ => None,
            })
            .collect()
    }

    /// Was this exact notification received?
    pub fn contains(&self, n: &Notification) -> bool {
        self.lock().contains(n)
    }

    /// Nothing received?
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Forget everything received so far.
    pub fn clear(&self) {
        self.lock().clear();
    }
}
