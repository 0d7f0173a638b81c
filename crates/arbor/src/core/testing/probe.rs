use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    Context, EventOutcome, NodeId, Painter, ViewContext, Widget,
    error::{Error, Result},
    event::Event,
    geom::{Constraint, Size},
    style::Color,
};

#[derive(Debug, Default)]
struct ProbeState {
    events: Vec<Event>,
    draws: usize,
    layouts: usize,
    mounts: usize,
    unmounts: usize,
}

/// Shared record of what happened to a [`Probe`].
#[derive(Debug, Clone, Default)]
pub struct ProbeLog(Arc<Mutex<ProbeState>>);

impl ProbeLog {
    fn lock(&self) -> MutexGuard<'_, ProbeState> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Events delivered, in order.
    pub fn events(&self) -> Vec<Event> {
        self.lock().events.clone()
    }

    /// Number of delivered events matching a predicate.
    pub fn count(&self, f: impl Fn(&Event) -> bool) -> usize {
        self.lock().events.iter().filter(|e| f(e)).count()
    }

    /// Number of draw calls, failed ones included.
    pub fn draws(&self) -> usize {
        self.lock().draws
    }

    /// Number of layout calls.
    pub fn layouts(&self) -> usize {
        self.lock().layouts
    }

    /// Number of mount hooks run.
    pub fn mounts(&self) -> usize {
        self.lock().mounts
    }

    /// Number of unmount hooks run.
    pub fn unmounts(&self) -> usize {
        self.lock().unmounts
    }

    /// Forget events and counters.
    pub fn clear(&self) {
        *self.lock() = ProbeState::default();
    }
}

/// A configurable widget for tests. By default it draws nothing, ignores
/// every event and leaves its children where they were put.
#[derive(Debug, Clone)]
pub struct Probe {
    focusable: bool,
    outcome: EventOutcome,
    preferred: Size,
    only_first_child: bool,
    fail_draw: bool,
    fill: Option<Color>,
    log: ProbeLog,
}

impl Default for Probe {
    fn default() -> Self {
        Self::new()
    }
}

impl Probe {
    /// A probe with default behaviour.
    pub fn new() -> Self {
        Self {
            focusable: false,
            outcome: EventOutcome::Ignore,
            preferred: Size::zero(),
            only_first_child: false,
            fail_draw: false,
            fill: None,
            log: ProbeLog::default(),
        }
    }

    /// Accept focus.
    pub fn focusable(mut self) -> Self {
        self.focusable = true;
        self
    }

    /// Report every event as handled.
    pub fn handling(mut self) -> Self {
        self.outcome = EventOutcome::Handle;
        self
    }

    /// Report this preferred size.
    pub fn with_preferred(mut self, size: Size) -> Self {
        self.preferred = size;
        self
    }

    /// Expose only the first attached child.
    pub fn only_first_child(mut self) -> Self {
        self.only_first_child = true;
        self
    }

    /// Fail every draw.
    pub fn failing(mut self) -> Self {
        self.fail_draw = true;
        self
    }

    /// Fill the whole node when drawing.
    pub fn filled(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    /// This probe and a handle onto its log.
    pub fn logged(self) -> (Self, ProbeLog) {
        let log = self.log.clone();
        (self, log)
    }
}

impl Widget for Probe {
    fn draw(&mut self, p: &mut Painter, ctx: &dyn ViewContext) -> Result<()> {
        self.log.lock().draws += 1;
        if self.fail_draw {
            return Err(Error::Draw("probe draw failure".into()));
        }
        if let Some(c) = self.fill {
            p.fill_rect(ctx.bounds(), c);
        }
        Ok(())
    }

    fn on_event(&mut self, event: &Event, _ctx: &mut dyn Context) -> Result<EventOutcome> {
        self.log.lock().events.push(event.clone());
        Ok(self.outcome)
    }

    fn preferred_size(&self, _wc: Constraint, _hc: Constraint, _ctx: &dyn ViewContext) -> Size {
        self.preferred
    }

    fn layout(&mut self, _size: Size, _ctx: &mut dyn Context) -> Result<()> {
        self.log.lock().layouts += 1;
        Ok(())
    }

    fn children(&self, attached: &[NodeId]) -> Vec<NodeId> {
        if self.only_first_child {
            attached.iter().take(1).copied().collect()
        } else {
            attached.to_vec()
        }
    }

    fn accept_focus(&self) -> bool {
        self.focusable
    }

    fn on_mount(&mut self, _ctx: &mut dyn Context) -> Result<()> {
        self.log.lock().mounts += 1;
        Ok(())
    }

    fn on_unmount(&mut self, _ctx: &mut dyn Context) {
        self.log.lock().unmounts += 1;
    }

    fn name(&self) -> String {
        "probe".into()
    }
}
