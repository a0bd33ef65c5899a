pub mod app;
pub mod braille;
pub mod data;
pub mod error;
pub mod map;
pub mod ui;

pub use error::{MapError, Result};
