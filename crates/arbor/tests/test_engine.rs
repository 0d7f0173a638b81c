//! Driving windows through the engine with scripted platform events.

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use arbor::{
        Engine, Error, NodeId, Result, WindowId,
        config::Config,
        event::{Modifiers, MouseButton, WindowEvent},
        geom::{Point, Rect, Size},
        sink::Notification,
        testing::{Recorder, RecordingFactory, ScriptedSource},
        widgets::Button,
        window::WindowConfig,
    };

    /// An engine wired to a recording factory and a scripted source.
    struct Fixture {
        /// The engine under test.
        engine: Engine,
        /// Surfaces the engine created.
        factory: RecordingFactory,
        /// Queue of platform events.
        source: ScriptedSource,
    }

    fn fixture() -> Fixture {
        let factory = RecordingFactory::new();
        let source = ScriptedSource::new();
        let engine = Engine::new(
            Config::default(),
            Box::new(factory.clone()),
            Box::new(source.clone()),
        );
        Fixture {
            engine,
            factory,
            source,
        }
    }

    fn open(f: &mut Fixture, title: &str, recorder: Recorder) -> Result<WindowId> {
        let config = WindowConfig::new(title, Size::new(100.0, 40.0));
        let id = f.engine.create_window(&config, Box::new(recorder))?;
        f.source.push(id, 1, WindowEvent::Shown);
        f.source.push(id, 2, WindowEvent::FocusGained);
        Ok(id)
    }

    fn click(source: &ScriptedSource, id: WindowId, ts: u32, pos: Point) {
        source.push(
            id,
            ts,
            WindowEvent::PointerMoved {
                pos,
                modifiers: Modifiers::NONE,
            },
        );
        source.push(
            id,
            ts + 1,
            WindowEvent::ButtonDown {
                button: MouseButton::Left,
                pos,
                clicks: 1,
                modifiers: Modifiers::NONE,
            },
        );
        source.push(
            id,
            ts + 2,
            WindowEvent::ButtonUp {
                button: MouseButton::Left,
                pos,
                modifiers: Modifiers::NONE,
            },
        );
    }

    fn add_button(e: &mut Engine, id: WindowId) -> Result<NodeId> {
        let w = e.window_mut(id)?;
        let root = w.core().root_id();
        w.core_mut().add_child(root, Button::new("OK"))
    }

    #[test]
    fn click_reaches_the_sink() -> Result<()> {
        let mut f = fixture();
        let (recorder, notes) = Recorder::new();
        let id = open(&mut f, "main", recorder)?;
        let button = add_button(&mut f.engine, id)?;
        click(&f.source, id, 10, Point::new(50.0, 20.0));

        assert!(f.engine.tick()?);
        assert_eq!(f.source.pending(), 0);
        assert_eq!(notes.clicks(), vec![button]);
        assert!(notes.contains(&Notification::WindowShown));
        assert_eq!(f.factory.titles(), vec!["main".to_string()]);
        Ok(())
    }

    #[test]
    fn events_route_by_window() -> Result<()> {
        let mut f = fixture();
        let (ra, notes_a) = Recorder::new();
        let (rb, notes_b) = Recorder::new();
        let a = open(&mut f, "a", ra)?;
        let b = open(&mut f, "b", rb)?;
        add_button(&mut f.engine, a)?;
        let button_b = add_button(&mut f.engine, b)?;
        click(&f.source, b, 10, Point::new(10.0, 10.0));

        f.engine.tick()?;
        assert!(notes_a.clicks().is_empty());
        assert_eq!(notes_b.clicks(), vec![button_b]);
        Ok(())
    }

    #[test]
    fn vetoed_close_keeps_the_window() -> Result<()> {
        let mut f = fixture();
        let (recorder, _) = Recorder::new();
        let id = open(&mut f, "sticky", recorder.vetoing())?;
        f.source.push(id, 3, WindowEvent::CloseRequested);
        f.engine.tick()?;
        assert_eq!(f.engine.window_ids(), vec![id]);
        assert!(!f.engine.window(id)?.is_closed());
        Ok(())
    }

    #[test]
    fn closing_the_last_window_ends_run() -> Result<()> {
        let mut f = fixture();
        let (recorder, _) = Recorder::new();
        let id = open(&mut f, "main", recorder)?;
        f.source.push(id, 3, WindowEvent::CloseRequested);
        f.engine.run()?;
        assert_eq!(f.engine.window_count(), 0);
        Ok(())
    }

    #[test]
    fn exit_from_an_invocation_ends_run() -> Result<()> {
        let mut f = fixture();
        let (recorder, _) = Recorder::new();
        open(&mut f, "main", recorder)?;
        let ran = Rc::new(RefCell::new(false));
        let r = ran.clone();
        f.engine.invoke(move |e| {
            *r.borrow_mut() = true;
            e.exit();
            Ok(())
        });
        f.engine.run()?;
        assert!(*ran.borrow());
        assert!(f.engine.is_exiting());
        assert_eq!(f.engine.window_count(), 1);
        Ok(())
    }

    #[test]
    fn draws_present_only_damage() -> Result<()> {
        let mut f = fixture();
        let (recorder, _) = Recorder::new();
        let id = open(&mut f, "main", recorder)?;
        f.engine.tick()?;
        let log = f
            .factory
            .log(id)
            .ok_or(Error::Internal("no surface".into()))?;
        assert_eq!(log.presents().len(), 1);

        assert!(!f.engine.tick()?);
        f.engine
            .window_mut(id)?
            .core_mut()
            .invalidate_rect(Rect::new(5.0, 5.0, 10.0, 10.0));
        assert!(f.engine.tick()?);
        assert_eq!(
            log.presents().last().copied(),
            Some(Rect::new(5.0, 5.0, 10.0, 10.0))
        );
        Ok(())
    }
}
