pub mod constants;
pub mod format;

pub use format::{format_general, format_general_width};
