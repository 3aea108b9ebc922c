//! rqs - Remember commands and secrets by a short name
//!
//! "Type it once, replay it forever."
//!
//! An alias maps to either a shell command or a piece of text. Invoking
//! the alias runs the command or prints the text. Whether an entry is a
//! command is decided once, when it is added, by checking if its first
//! token is a program on `PATH`.
//!
//! Entries live in a key-value store, one record per alias.

pub mod dispatch;
pub mod entry;
pub mod error;
pub mod output;
pub mod store;

pub use dispatch::{Dispatcher, Outcome, Verb};
pub use entry::{Entry, EntryType};
pub use error::{Result, RqsError};
pub use store::{FsStore, MemoryStore, Store};
