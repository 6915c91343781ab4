//! Terminal front end: screens per quiz phase, key-event mapping, and
//! application of delayed and asynchronous results.

#![forbid(unsafe_code)]

pub mod app;
pub mod input;
pub mod views;

pub use app::{LoginField, Notice, UiApp};
pub use input::chord_from_key_event;
pub use views::draw;
