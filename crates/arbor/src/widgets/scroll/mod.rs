//! Scrolling: the range model, the scrollbar widget and the scrolled
//! container.

mod scrollbar;
mod state;
mod view;

pub use scrollbar::{DragState, Scrollbar};
pub use state::ScrollState;
pub use view::{ScrollPolicy, ScrollView};
