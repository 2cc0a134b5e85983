//! Built-in writer implementations

#[cfg(feature = "console")]
pub mod console;
#[cfg(feature = "file")]
pub mod file;

#[cfg(feature = "console")]
pub use console::ConsoleWriter;
#[cfg(feature = "file")]
pub use file::FileWriter;

// Re-export the trait for convenience
pub use crate::core::Writer;
