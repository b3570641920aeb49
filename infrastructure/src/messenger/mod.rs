//! Messenger adapters

pub mod console;

pub use console::ConsoleMessenger;
