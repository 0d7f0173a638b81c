//! The window registry and the event loop that drives it.

use std::{collections::VecDeque, thread, time::Duration};

use slotmap::SlotMap;
use tracing::{debug, trace, warn};

use super::{
    backend::{PlatformSource, SurfaceFactory},
    config::Config,
    id::WindowId,
    poll::Schedule,
    sink::EventSink,
    window::{Window, WindowConfig},
};
use crate::error::{Error, Result};

/// Deferred work run by the engine between event dispatch and drawing.
type Task = Box<dyn FnOnce(&mut Engine) -> Result<()>>;

/// Owns every window, pumps platform events to them and redraws what they
/// invalidated.
///
/// Each [`tick`](Engine::tick) runs in a fixed order: all pending platform
/// events are dispatched, then queued and due invocations run, then every
/// dirty window is drawn and presented.
pub struct Engine {
    /// Engine settings.
    config: Config,
    /// Live windows.
    windows: SlotMap<WindowId, Window>,
    /// Native window creation.
    factory: Box<dyn SurfaceFactory>,
    /// Platform event pump.
    source: Box<dyn PlatformSource>,
    /// Work queued for the next tick.
    queue: VecDeque<Task>,
    /// Work queued for later ticks.
    timers: Schedule<Task>,
    /// Has exit been requested?
    exit: bool,
}

impl Engine {
    /// Create an engine with no windows.
    pub fn new(
        config: Config,
        factory: Box<dyn SurfaceFactory>,
        source: Box<dyn PlatformSource>,
    ) -> Self {
        Self {
            config,
            windows: SlotMap::with_key(),
            factory,
            source,
            queue: VecDeque::new(),
            timers: Schedule::default(),
            exit: false,
        }
    }

    /// Engine settings.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Create and register a window. A window whose surface cannot be created
    /// is never registered, and the error is returned.
    pub fn create_window(
        &mut self,
        config: &WindowConfig,
        sink: Box<dyn EventSink>,
    ) -> Result<WindowId> {
        let factory = &mut *self.factory;
        let theme = self.config.theme.clone();
        self.windows.try_insert_with_key(|id| {
            let mut w = Window::new(id, config, factory, sink)?;
            w.core_mut().set_theme(theme);
            Ok(w)
        })
    }

    /// Close and drop a window, unmounting its widgets.
    pub fn close_window(&mut self, id: WindowId) -> Result<()> {
        let mut w = self.windows.remove(id).ok_or(Error::WindowNotFound(id))?;
        w.core_mut().teardown();
        debug!(window = ?id, "window closed");
        Ok(())
    }

    /// Borrow a window.
    pub fn window(&self, id: WindowId) -> Result<&Window> {
        self.windows.get(id).ok_or(Error::WindowNotFound(id))
    }

    /// Borrow a window mutably.
    pub fn window_mut(&mut self, id: WindowId) -> Result<&mut Window> {
        self.windows.get_mut(id).ok_or(Error::WindowNotFound(id))
    }

    /// Ids of all live windows.
    pub fn window_ids(&self) -> Vec<WindowId> {
        self.windows.keys().collect()
    }

    /// Number of live windows.
    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Run `f` on the next tick, after event dispatch.
    pub fn invoke(&mut self, f: impl FnOnce(&mut Engine) -> Result<()> + 'static) {
        self.queue.push_back(Box::new(f));
    }

    /// Run `f` on the first tick at least `delay` from now.
    pub fn invoke_after(
        &mut self,
        delay: Duration,
        f: impl FnOnce(&mut Engine) -> Result<()> + 'static,
    ) {
        self.timers.add(delay, Box::new(f));
    }

    /// Ask [`run`](Engine::run) to return after the current tick.
    pub fn exit(&mut self) {
        self.exit = true;
    }

    /// Has exit been requested?
    pub fn is_exiting(&self) -> bool {
        self.exit
    }

    /// Dispatch pending platform events, run due invocations, then draw every
    /// dirty window. Returns whether anything was drawn.
    ///
    /// A window whose surface fails is closed and the tick carries on with
    /// the rest. Any other failure, from a handler or an invocation, does not
    /// stop later work in the tick; the first one is returned once the tick
    /// is done.
    pub fn tick(&mut self) -> Result<bool> {
        let mut first = None;

        while let Some(ev) = self.source.poll() {
            let Some(w) = self.windows.get_mut(ev.window) else {
                trace!(window = ?ev.window, "event for unknown window dropped");
                continue;
            };
            let handled = w.handle(ev.timestamp, &ev.event);
            let closed = w.is_closed();
            self.settle(ev.window, handled, &mut first)?;
            if closed && self.windows.contains_key(ev.window) {
                self.close_window(ev.window)?;
            }
        }

        let queued = std::mem::take(&mut self.queue);
        self.run_tasks(queued, &mut first);
        let due = self.timers.collect();
        self.run_tasks(due, &mut first);

        let mut drawn = false;
        for id in self.window_ids() {
            let Some(w) = self.windows.get_mut(id) else {
                continue;
            };
            match w.draw() {
                Ok(d) => drawn |= d,
                Err(e) => self.settle(id, Err(e), &mut first)?,
            }
        }

        match first {
            Some(e) => Err(e),
            None => Ok(drawn),
        }
    }

    /// Sort out the result of work done on one window. A surface failure
    /// closes the window; any other failure is kept in `first` if it is the
    /// first of the tick.
    fn settle(
        &mut self,
        id: WindowId,
        result: Result<()>,
        first: &mut Option<Error>,
    ) -> Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(Error::Window(e)) => {
                warn!(window = ?id, error = %e, "window surface failed, closing");
                self.close_window(id)
            }
            Err(e) => {
                warn!(window = ?id, error = %e, "window work failed");
                first.get_or_insert(e);
                Ok(())
            }
        }
    }

    /// Run every task, even past failures.
    fn run_tasks(&mut self, tasks: impl IntoIterator<Item = Task>, first: &mut Option<Error>) {
        for task in tasks {
            if let Err(e) = task(self) {
                warn!(error = %e, "invocation failed");
                first.get_or_insert(e);
            }
        }
    }

    /// Tick until exit is requested or the last window closes. Sleeps for the
    /// frame interval, or until the next timer, when a tick does no work.
    pub fn run(&mut self) -> Result<()> {
        debug!("engine loop started");
        while !self.exit && !self.windows.is_empty() {
            let drawn = self.tick()?;
            if !drawn && self.queue.is_empty() {
                let interval = self.config.frame_interval();
                let wait = self
                    .timers
                    .current_wait()
                    .map_or(interval, |w| w.min(interval));
                thread::sleep(wait);
            }
        }
        debug!("engine loop finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::RefCell,
        rc::Rc,
    };

    use super::*;
    use crate::{
        event::WindowEvent,
        geom::Size,
        sink::NullSink,
        testing::{Probe, RecordingFactory, ScriptedSource},
    };

    fn engine() -> (Engine, RecordingFactory, ScriptedSource) {
        let factory = RecordingFactory::new();
        let source = ScriptedSource::new();
        let e = Engine::new(
            Config::default(),
            Box::new(factory.clone()),
            Box::new(source.clone()),
        );
        (e, factory, source)
    }

    #[test]
    fn failed_window_is_not_registered() -> Result<()> {
        let (mut e, factory, _) = engine();
        let a = e.create_window(&WindowConfig::default(), Box::new(NullSink))?;
        factory.set_failing(true);
        assert!(matches!(
            e.create_window(&WindowConfig::default(), Box::new(NullSink)),
            Err(Error::Window(_))
        ));
        assert_eq!(e.window_ids(), vec![a]);
        Ok(())
    }

    #[test]
    fn close_unmounts() -> Result<()> {
        let (mut e, _, source) = engine();
        let id = e.create_window(&WindowConfig::default(), Box::new(NullSink))?;
        let (p, log) = Probe::new().logged();
        let w = e.window_mut(id)?;
        let root = w.core().root_id();
        w.core_mut().add_child(root, p)?;
        source.push(id, 0, WindowEvent::CloseRequested);
        e.tick()?;
        assert_eq!(e.window_count(), 0);
        assert_eq!(log.unmounts(), 1);
        assert!(matches!(e.close_window(id), Err(Error::WindowNotFound(_))));
        Ok(())
    }

    #[test]
    fn tick_order() -> Result<()> {
        let (mut e, factory, source) = engine();
        let id = e.create_window(
            &WindowConfig::new("t", Size::new(50.0, 50.0)),
            Box::new(NullSink),
        )?;
        source.push(id, 0, WindowEvent::Shown);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        e.invoke(move |e| {
            let w = e.window(id)?;
            s.borrow_mut().push((w.is_shown(), w.is_dirty()));
            Ok(())
        });
        assert!(e.tick()?);
        assert_eq!(*seen.borrow(), vec![(true, true)]);
        assert_eq!(factory.log(id).map(|l| l.presents().len()), Some(1));
        assert!(!e.tick()?);
        Ok(())
    }

    #[test]
    fn invoke_runs_once_and_timers_wait() -> Result<()> {
        let (mut e, _, _) = engine();
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        e.invoke(move |e| {
            *c.borrow_mut() += 1;
            let c2 = c.clone();
            e.invoke(move |_| {
                *c2.borrow_mut() += 10;
                Ok(())
            });
            Ok(())
        });
        e.invoke_after(Duration::from_secs(3600), |e| {
            e.exit();
            Ok(())
        });
        e.tick()?;
        assert_eq!(*count.borrow(), 1);
        e.tick()?;
        assert_eq!(*count.borrow(), 11);
        e.tick()?;
        assert_eq!(*count.borrow(), 11);
        assert!(!e.is_exiting());

        e.invoke_after(Duration::ZERO, |e| {
            e.exit();
            Ok(())
        });
        e.tick()?;
        assert!(e.is_exiting());
        Ok(())
    }

    #[test]
    fn failing_surface_closes_only_its_window() -> Result<()> {
        let (mut e, factory, source) = engine();
        let config = WindowConfig::new("t", Size::new(50.0, 50.0));
        let a = e.create_window(&config, Box::new(NullSink))?;
        let b = e.create_window(&config, Box::new(NullSink))?;
        source.push(a, 0, WindowEvent::Shown);
        source.push(b, 0, WindowEvent::Shown);
        let log_a = factory.log(a).ok_or(Error::WindowNotFound(a))?;
        let log_b = factory.log(b).ok_or(Error::WindowNotFound(b))?;
        log_a.set_failing(true);

        assert!(e.tick()?);
        assert_eq!(e.window_ids(), vec![b]);
        assert!(log_a.presents().is_empty());
        assert_eq!(log_b.presents().len(), 1);
        Ok(())
    }

    #[test]
    fn failed_invocation_does_not_stop_the_rest() -> Result<()> {
        let (mut e, factory, source) = engine();
        let id = e.create_window(
            &WindowConfig::new("t", Size::new(50.0, 50.0)),
            Box::new(NullSink),
        )?;
        source.push(id, 0, WindowEvent::Shown);

        let count = Rc::new(RefCell::new(0));
        e.invoke(|_| Err(Error::Invalid("first".into())));
        let c = count.clone();
        e.invoke(move |_| {
            *c.borrow_mut() += 1;
            Ok(())
        });
        e.invoke_after(Duration::ZERO, |_| Err(Error::Invalid("second".into())));
        let c = count.clone();
        e.invoke_after(Duration::ZERO, move |_| {
            *c.borrow_mut() += 10;
            Ok(())
        });

        match e.tick() {
            Err(Error::Invalid(m)) => assert_eq!(m, "first"),
            other => panic!("unexpected tick result: {other:?}"),
        }
        assert_eq!(*count.borrow(), 11);
        assert_eq!(factory.log(id).map(|l| l.presents().len()), Some(1));
        assert!(!e.tick()?);
        Ok(())
    }

    #[test]
    fn run_stops_without_windows() -> Result<()> {
        let (mut e, _, source) = engine();
        let id = e.create_window(&WindowConfig::default(), Box::new(NullSink))?;
        source.push(id, 0, WindowEvent::CloseRequested);
        e.run()?;
        assert_eq!(e.window_count(), 0);
        Ok(())
    }
}
