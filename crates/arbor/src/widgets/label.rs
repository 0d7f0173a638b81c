//! A static text label.

use crate::{
    Context, Painter, ViewContext, Widget,
    backend::text::FontDescription,
    error::Result,
    geom::{Constraint, Point, Size},
    style::Color,
};

/// A single- or multi-line text label, sized by the window's text metrics
/// plus the theme's label padding.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Displayed text.
    text: String,
    /// Font override. The theme font is used when unset.
    font: Option<FontDescription>,
    /// Colour override. The theme foreground is used when unset.
    color: Option<Color>,
}

impl Label {
    /// A label showing `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: None,
            color: None,
        }
    }

    /// Use a specific font.
    pub fn with_font(mut self, font: FontDescription) -> Self {
        self.font = Some(font);
        self
    }

    /// Use a specific colour.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// The displayed text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text. The parent re-runs its layout, since the preferred
    /// size may have changed.
    pub fn set_text(&mut self, ctx: &mut dyn Context, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        if text == self.text {
            return Ok(());
        }
        self.text = text;
        ctx.invalidate();
        if let Some(parent) = ctx.parent_of(ctx.node_id()) {
            ctx.layout_node(parent)?;
        }
        Ok(())
    }

    fn font<'a>(&'a self, ctx: &'a dyn ViewContext) -> &'a FontDescription {
        self.font.as_ref().unwrap_or(&ctx.theme().font)
    }
}

impl Widget for Label {
    fn draw(&mut self, p: &mut Painter, ctx: &dyn ViewContext) -> Result<()> {
        if self.text.is_empty() {
            return Ok(());
        }
        let pad = ctx.theme().label_insets();
        let color = self.color.unwrap_or(ctx.theme().foreground);
        p.text(self.font(ctx), &self.text, Point::new(pad.left, pad.top), color);
        Ok(())
    }

    fn preferred_size(&self, wc: Constraint, hc: Constraint, ctx: &dyn ViewContext) -> Size {
        let pad = ctx.theme().label_insets();
        let m = ctx.text_metrics(self.font(ctx), &self.text);
        Size::new(
            wc.clamp(m.width + pad.horizontal()),
            hc.clamp(m.height + pad.vertical()),
        )
    }
}
