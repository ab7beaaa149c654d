use std::io::Write;

use crate::cli::{CommandNode, Flag};
use crate::error::CommandResult;
use crate::version::BuildInfo;

pub const NAME: &str = "cli-template";
pub const BANNER: &str = "Hello from CLI Template!";
pub const HINT: &str = "Use --help to see available commands";

pub fn command(build: BuildInfo) -> CommandResult<CommandNode> {
    let mut command = CommandNode::new(NAME, "A CLI application template", move |inv, out| {
        if inv.switch("version") {
            write_version(&build, out)
        } else {
            write_banner(out)
        }
    })
    .with_long_about("A CLI application template built with Rust and clap for rapid development.");
    command.declare_flag(Flag::switch("version", Some('v'), "Print version information"))?;
    Ok(command)
}

fn write_banner(out: &mut dyn Write) -> CommandResult<()> {
    writeln!(out, "{BANNER}")?;
    writeln!(out, "{HINT}")?;
    Ok(())
}

fn write_version(build: &BuildInfo, out: &mut dyn Write) -> CommandResult<()> {
    writeln!(out, "{NAME} version {build}")?;
    Ok(())
}
