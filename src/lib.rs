pub mod config;
pub mod document;
pub mod error;
pub mod events;
pub mod grid;
pub mod locale;
pub mod markup;
pub mod ui;
pub mod widget;

pub use document::{bootstrap, Document};
pub use error::{Error, ErrorKind, Result};
pub use widget::{CalendarWidget, Settings};
