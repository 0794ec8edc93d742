pub mod args;
pub mod handlers;

pub use args::{Action, Args};
