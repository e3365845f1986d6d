//! Commands Layer
//!
//! Application operations invoked by the UI. Each takes the injected
//! `AppState` and reports failures as display strings.

mod trip_cmd;
mod item_cmd;
mod category_cmd;

#[cfg(test)]
mod tests;

pub use trip_cmd::*;
pub use item_cmd::*;
pub use category_cmd::*;
