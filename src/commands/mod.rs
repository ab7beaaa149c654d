pub mod hello;
pub mod root;

use crate::cli::CommandNode;
use crate::error::CommandResult;
use crate::version::BuildInfo;

/// Builds the full command tree.
pub fn registry(build: BuildInfo) -> CommandResult<CommandNode> {
    let mut root = root::command(build)?;
    root.register(hello::command()?)?;
    Ok(root)
}
