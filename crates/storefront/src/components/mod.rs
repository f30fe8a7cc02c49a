//! Reusable UI pieces rendered server-side.

mod class_list;
mod filter_label;

pub use class_list::ClassList;
pub use filter_label::FilterLabel;
