//! Selection state shared between the conversation list and the action bar

pub mod selection_set;

pub use selection_set::{SelectionEvent, SelectionSet, SharedSelection};
