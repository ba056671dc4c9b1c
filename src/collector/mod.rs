//! Asterisk CLI collection: command invocation, output parsing, cycle loop.

pub mod command;
pub mod cycle;
pub mod parsers;

pub use command::{CommandRunner, CommandSet, ShellRunner};
pub use cycle::Collector;
