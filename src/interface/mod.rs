//! Interface layer - Presentation adapters

pub mod console;

pub use console::ConsoleRenderer;
