//! Containers nested inside each other behave as one tree.

#[cfg(test)]
mod tests {
    use arbor::{
        Result,
        error::Error,
        event::Event,
        geom::{Point, Rect, Size},
        sink::Notification,
        testing::{CELL_HEIGHT, Harness, Probe},
        widgets::{BoxLayout, Button, Label, Notebook, Packing, ScrollView},
    };

    #[test]
    fn button_inside_notebook_page() -> Result<()> {
        let mut h = Harness::new()?;
        let nb = h.add_typed(Notebook::new())?;
        let page = h.with(nb, |nb, ctx| {
            let page = nb.add_tab(ctx, BoxLayout::vertical(), "first")?;
            nb.add_tab(ctx, Label::new("second page"), "second")?;
            Ok(page)
        })?;
        let button = h.core_mut().with_widget::<BoxLayout, _>(page, |b, ctx| {
            b.pack(ctx, Button::new("go"), Packing::default().no_fill())
        })?;
        h.notes.clear();

        let r = h.core().window_bounds(button)?;
        h.click(Point::new(r.tl.x + 2.0, r.tl.y + 2.0))?;
        assert_eq!(h.notes.clicks(), vec![button]);

        // Switching pages hides the button from hit testing.
        h.with(nb, |nb, ctx| nb.set_current(ctx, 1))?;
        assert_ne!(h.core().hit_test(Point::new(r.tl.x + 2.0, r.tl.y + 2.0)), Some(button));
        assert!(h.notes.contains(&Notification::CurrentTabChanged {
            node: nb.id(),
            index: Some(1),
        }));
        assert!(h.core().contains(page));
        Ok(())
    }

    #[test]
    fn scrolled_box_delivers_local_coordinates() -> Result<()> {
        let mut h = Harness::builder().size(100.0, 100.0).build()?;
        let sv = h.add_typed(ScrollView::new())?;
        let column = h.core_mut().add(BoxLayout::vertical());
        let mut logs = Vec::new();
        for _ in 0..10 {
            let (probe, log) = Probe::new()
                .handling()
                .with_preferred(Size::new(40.0, 50.0))
                .logged();
            h.core_mut().with_widget::<BoxLayout, _>(column, |b, ctx| {
                b.pack(ctx, probe, Packing::default())
            })?;
            logs.push(log);
        }
        h.with(sv, |sv, ctx| sv.set_content(ctx, column))?;
        h.with(sv, |sv, ctx| sv.scroll_to(ctx, Point::new(0.0, 120.0)))?;

        // Window y 10 is content y 130: the third row, 30 into it.
        h.click(Point::new(5.0, 10.0))?;
        let pressed: Vec<Point> = logs[2]
            .events()
            .iter()
            .filter_map(|e| match e {
                Event::ButtonPressed(b) => Some(b.pos),
                _ => None,
            })
            .collect();
        assert_eq!(pressed, vec![Point::new(5.0, 30.0)]);
        assert!(logs.iter().enumerate().all(|(i, l)| i == 2 || l.events().is_empty()));
        Ok(())
    }

    #[test]
    fn label_growth_pushes_siblings() -> Result<()> {
        let mut h = Harness::new()?;
        let row = h.add_typed(BoxLayout::vertical())?;
        let (label, below) = h.with(row, |b, ctx| {
            let label = b.pack(ctx, Label::new("one"), Packing::default())?;
            let below = b.pack(ctx, Probe::new(), Packing::expand())?;
            Ok((label, below))
        })?;
        let line = CELL_HEIGHT + 6.0;
        assert_eq!(h.core().bounds(below)?.tl.y, line);

        h.core_mut()
            .with_widget::<Label, _>(label, |l, ctx| l.set_text(ctx, "one\ntwo"))?;
        assert_eq!(h.core().bounds(label)?, Rect::new(0.0, 0.0, 200.0, line + CELL_HEIGHT));
        assert_eq!(h.core().bounds(below)?.tl.y, line + CELL_HEIGHT);
        Ok(())
    }

    #[test]
    fn missing_nodes_are_reported() -> Result<()> {
        let mut h = Harness::new()?;
        let p = h.add(Probe::new())?;
        h.core_mut().remove_subtree(p)?;
        assert!(matches!(h.core().bounds(p), Err(Error::NodeNotFound(_))));
        assert!(matches!(
            h.core_mut().set_visible(p, false),
            Err(Error::NodeNotFound(_))
        ));
        Ok(())
    }
}
