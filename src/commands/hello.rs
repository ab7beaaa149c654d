use std::io::Write;

use crate::cli::{CommandNode, Flag, Invocation};
use crate::error::CommandResult;

pub const DEFAULT_NAME: &str = "World";

pub fn command() -> CommandResult<CommandNode> {
    let mut command = CommandNode::new("hello", "Print a greeting message", run)
        .with_long_about("Print a greeting message with optional name parameter.");
    command.declare_flag(Flag::string("name", Some('n'), "", "Name to greet"))?;
    Ok(command)
}

fn run(invocation: &Invocation, out: &mut dyn Write) -> CommandResult<()> {
    greet(invocation.string("name").unwrap_or_default(), out)
}

/// Writes `Hello, <name>!` to `out`, greeting the world when `name` is empty.
pub fn greet(name: &str, out: &mut dyn Write) -> CommandResult<()> {
    let name = if name.is_empty() { DEFAULT_NAME } else { name };
    writeln!(out, "Hello, {name}!")?;
    Ok(())
}
