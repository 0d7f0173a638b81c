//! Colours, paint sources and the theme constants shared by the built-in
//! widgets.

use serde::{Deserialize, Serialize};

use crate::{
    backend::text::FontDescription,
    geom::{Insets, Point},
};

/// An RGBA colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component.
    pub r: f64,
    /// Green component.
    pub g: f64,
    /// Blue component.
    pub b: f64,
    /// Alpha component.
    pub a: f64,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    /// An opaque colour.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// A colour with explicit alpha.
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// An opaque grey of the given intensity.
    pub const fn grey(v: f64) -> Self {
        Self::rgb(v, v, v)
    }

    /// This colour with its alpha multiplied by `factor`.
    pub fn with_alpha(self, factor: f64) -> Self {
        Self {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..self
        }
    }

    /// Does this colour completely cover what is beneath it?
    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// A colour stop on a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient in `0.0..=1.0`.
    pub offset: f64,
    /// Colour at this position.
    pub color: Color,
}

/// What a fill or stroke paints with.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// A single colour.
    Solid(Color),
    /// A linear gradient between two points in local coordinates.
    Linear {
        /// Gradient start.
        start: Point,
        /// Gradient end.
        end: Point,
        /// Colour stops, ordered by offset.
        stops: Vec<GradientStop>,
    },
}

impl Source {
    /// A two-stop vertical gradient spanning `height` units from the origin.
    pub fn vertical(top: Color, bottom: Color, height: f64) -> Self {
        Self::Linear {
            start: Point::zero(),
            end: Point::new(0.0, height),
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: top,
                },
                GradientStop {
                    offset: 1.0,
                    color: bottom,
                },
            ],
        }
    }

    /// This source with every colour's alpha multiplied by `factor`.
    pub fn with_alpha(&self, factor: f64) -> Self {
        if factor >= 1.0 {
            return self.clone();
        }
        match self {
            Self::Solid(c) => Self::Solid(c.with_alpha(factor)),
            Self::Linear { start, end, stops } => Self::Linear {
                start: *start,
                end: *end,
                stops: stops
                    .iter()
                    .map(|s| GradientStop {
                        offset: s.offset,
                        color: s.color.with_alpha(factor),
                    })
                    .collect(),
            },
        }
    }

    /// Does every part of this source fully cover what is beneath it?
    pub fn is_opaque(&self) -> bool {
        match self {
            Self::Solid(c) => c.is_opaque(),
            Self::Linear { stops, .. } => stops.iter().all(|s| s.color.is_opaque()),
        }
    }
}

impl From<Color> for Source {
    fn from(c: Color) -> Self {
        Self::Solid(c)
    }
}

/// Style constants consumed by containers and leaf widgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Colour painted behind damaged areas not covered by an opaque root.
    pub window_background: Color,
    /// Default text and line colour.
    pub foreground: Color,
    /// Colour of focus rings.
    pub focus: Color,
    /// Default font for text-bearing widgets.
    pub font: FontDescription,

    /// Padding around each notebook tab label: left, top, right, bottom.
    pub tab_padding: [f64; 4],
    /// Gap between adjacent notebook tab headers.
    pub tab_distance: f64,
    /// Padding between the notebook frame and the current page.
    pub notebook_child_padding: f64,
    /// Notebook frame and header outline colour.
    pub notebook_border: Color,
    /// Fill of the selected tab header.
    pub tab_selected: Color,
    /// Fill of unselected tab headers.
    pub tab_unselected: Color,

    /// Thickness of a scrollbar across its axis.
    pub scrollbar_width: f64,
    /// Gap between the scrollbar trough edge and the thumb.
    pub scrollbar_padding: f64,
    /// Scrollbar trough colour.
    pub scrollbar_background: Color,
    /// Scrollbar thumb colour.
    pub scrollbar_thumb: Color,
    /// Scrollbar thumb colour while hovered or dragged.
    pub scrollbar_thumb_active: Color,
    /// The thumb never shrinks below this length.
    pub min_thumb_length: f64,

    /// Horizontal and vertical padding around label text.
    pub label_padding: [f64; 2],

    /// Button face intensity at rest.
    pub button_normal: f64,
    /// Button face intensity while pressed.
    pub button_pressed: f64,
    /// Button face intensity while hovered.
    pub button_hovered: f64,
    /// Button face intensity while insensitive.
    pub button_insensitive: f64,
}

impl Theme {
    /// Notebook tab label padding as insets.
    pub fn tab_insets(&self) -> Insets {
        let [l, t, r, b] = self.tab_padding;
        Insets::new(l, t, r, b)
    }

    /// Label padding as insets.
    pub fn label_insets(&self) -> Insets {
        let [x, y] = self.label_padding;
        Insets::new(x, y, x, y)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            window_background: Color::WHITE,
            foreground: Color::BLACK,
            focus: Color::rgb(0.2, 0.4, 0.8),
            font: FontDescription::default(),
            tab_padding: [3.0, 2.0, 3.0, 2.0],
            tab_distance: 3.0,
            notebook_child_padding: 3.0,
            notebook_border: Color::grey(0.5),
            tab_selected: Color::WHITE,
            tab_unselected: Color::grey(0.85),
            scrollbar_width: 12.0,
            scrollbar_padding: 2.0,
            scrollbar_background: Color::grey(0.9),
            scrollbar_thumb: Color::grey(0.6),
            scrollbar_thumb_active: Color::grey(0.45),
            min_thumb_length: 8.0,
            label_padding: [4.0, 3.0],
            button_normal: 0.95,
            button_pressed: 0.9,
            button_hovered: 1.0,
            button_insensitive: 0.7,
        }
    }
}
