//! Built-in containers and leaf widgets.

mod boxes;
mod button;
mod canvas;
mod label;
mod notebook;
mod picture;
pub mod scroll;

pub use boxes::{BoxLayout, Packing};
pub use button::Button;
pub use canvas::Canvas;
pub use label::Label;
pub use notebook::{Notebook, TabPosition};
pub use picture::Picture;
pub use scroll::{ScrollPolicy, ScrollState, ScrollView, Scrollbar};
