//! Thumb dragging through a scroll view.

#[cfg(test)]
mod tests {
    use arbor::{
        Result,
        error::Error,
        geom::{Point, Size},
        testing::{Harness, Probe},
        widgets::ScrollView,
    };

    #[test]
    fn dragging_thumb_halfway_scrolls_halfway() -> Result<()> {
        let mut h = Harness::builder().size(100.0, 300.0).build()?;
        let content = Probe::new().with_preferred(Size::new(50.0, 1000.0));
        let sv = h.add_typed(ScrollView::new().with_content(content))?;
        let vbar = h
            .with(sv, |sv, _| Ok(sv.vbar()))?
            .ok_or(Error::Internal("no vertical bar".into()))?;

        // The bar's track is 296 long with a page of 30 out of 130.
        let travel = 296.0 - 296.0 * 30.0 / 130.0;
        let from = Point::new(94.0, 5.0);
        h.drag(from, Point::new(94.0, 5.0 + travel / 2.0))?;

        let value = h.with(vbar, |sb, _| Ok(sb.value()))?;
        assert!((value - 50.0).abs() < 1e-6);
        let visible = h.with(sv, |sv, _| Ok(sv.visible_rect()))?;
        assert!((visible.tl.y - 350.0).abs() < 1e-6);
        assert_eq!(h.core().drag_owner(), None);
        Ok(())
    }

    #[test]
    fn drag_keeps_tracking_outside_the_bar() -> Result<()> {
        let mut h = Harness::builder().size(100.0, 300.0).build()?;
        let content = Probe::new().with_preferred(Size::new(50.0, 1000.0));
        let sv = h.add_typed(ScrollView::new().with_content(content))?;
        let vbar = h
            .with(sv, |sv, _| Ok(sv.vbar()))?
            .ok_or(Error::Internal("no vertical bar".into()))?;

        h.move_to(Point::new(94.0, 5.0))?;
        h.press(Point::new(94.0, 5.0))?;
        assert_eq!(h.core().drag_owner(), Some(vbar.id()));
        // Far past the end of the track, over the content.
        h.move_to(Point::new(10.0, 2000.0))?;
        let value = h.with(vbar, |sb, _| Ok(sb.value()))?;
        assert!((value - 100.0).abs() < 1e-6);
        h.release(Point::new(10.0, 2000.0))?;
        assert!(!h.with(vbar, |sb, _| Ok(sb.is_dragging()))?);

        let visible = h.with(sv, |sv, _| Ok(sv.visible_rect()))?;
        assert!((visible.tl.y - 700.0).abs() < 1e-6);
        Ok(())
    }
}
