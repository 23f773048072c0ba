//! Native dialogs, compiled in with the `gui` feature
pub mod dialogs;

pub use dialogs::NativePrompter;
