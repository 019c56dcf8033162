//! Command parsing and name resolution.

mod command;
mod resolver;

pub use command::{Intent, parse_intent};
pub use resolver::{NameMatch, resolve_name};
