//! Command tree definitions.
//!
//! A [`CommandNode`] describes one command: its name, help text, flags, children and the
//! callback run when it is selected. The tree is built once at start-up and rendered into a
//! [`clap::Command`] for parsing.

use std::{collections::BTreeMap, fmt, io::Write};

use clap::{Arg, ArgAction};

use crate::error::{CliError, CommandResult};

const HELP_FLAG: &str = "help";
const HELP_SHORT: char = 'h';
const POSITIONALS: &str = "args";

/// Logic executed when a command is selected.
pub type Callback = Box<dyn Fn(&Invocation, &mut dyn Write) -> CommandResult<()>>;

/// Value bound to a flag, or a flag's default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    Str(String),
    Bool(bool),
}

/// A named, typed input parameter declared on a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    name: &'static str,
    short: Option<char>,
    default: FlagValue,
    help: &'static str,
}

impl Flag {
    /// String flag taking a value, e.g. `--name <name>`.
    pub fn string(
        name: &'static str,
        short: Option<char>,
        default: impl Into<String>,
        help: &'static str,
    ) -> Self {
        Self {
            name,
            short,
            default: FlagValue::Str(default.into()),
            help,
        }
    }

    /// Boolean switch, off unless present.
    pub fn switch(name: &'static str, short: Option<char>, help: &'static str) -> Self {
        Self {
            name,
            short,
            default: FlagValue::Bool(false),
            help,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn short(&self) -> Option<char> {
        self.short
    }

    pub fn default_value(&self) -> &FlagValue {
        &self.default
    }

    fn to_arg(&self) -> Arg {
        let arg = Arg::new(self.name).long(self.name).help(self.help);
        let arg = match self.short {
            Some(short) => arg.short(short),
            None => arg,
        };

        match self.default {
            FlagValue::Str(_) => arg.action(ArgAction::Set).allow_hyphen_values(true),
            FlagValue::Bool(_) => arg.action(ArgAction::SetTrue),
        }
    }
}

/// A command in the tree together with its callback.
pub struct CommandNode {
    name: &'static str,
    about: &'static str,
    long_about: Option<&'static str>,
    flags: Vec<Flag>,
    children: Vec<CommandNode>,
    callback: Callback,
}

impl CommandNode {
    pub fn new<F>(name: &'static str, about: &'static str, callback: F) -> Self
    where
        F: Fn(&Invocation, &mut dyn Write) -> CommandResult<()> + 'static,
    {
        Self {
            name,
            about,
            long_about: None,
            flags: Vec::new(),
            children: Vec::new(),
            callback: Box::new(callback),
        }
    }

    pub fn with_long_about(mut self, long_about: &'static str) -> Self {
        self.long_about = Some(long_about);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    pub fn children(&self) -> &[CommandNode] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&CommandNode> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Attaches `child` below this command. Sibling names must be unique, and `help` is
    /// reserved for the generated help subcommand.
    pub fn register(&mut self, child: CommandNode) -> CommandResult<()> {
        if child.name == HELP_FLAG || self.child(child.name).is_some() {
            return Err(CliError::DuplicateCommand {
                parent: self.name,
                name: child.name,
            });
        }

        tracing::trace!(
            target: "cli_template::cli",
            parent = self.name,
            command = child.name,
            "registered command"
        );
        self.children.push(child);
        Ok(())
    }

    /// Declares a flag on this command. Names and short aliases must be unique, and the help
    /// flag and positional slot are reserved.
    pub fn declare_flag(&mut self, flag: Flag) -> CommandResult<()> {
        if flag.name == HELP_FLAG
            || flag.name == POSITIONALS
            || self.flags.iter().any(|known| known.name == flag.name)
        {
            return Err(CliError::DuplicateFlag {
                command: self.name,
                flag: format!("--{}", flag.name),
            });
        }

        if let Some(short) = flag.short {
            if short == HELP_SHORT || self.flags.iter().any(|known| known.short == Some(short)) {
                return Err(CliError::DuplicateFlag {
                    command: self.name,
                    flag: format!("-{short}"),
                });
            }
        }

        self.flags.push(flag);
        Ok(())
    }

    pub(crate) fn run(&self, invocation: &Invocation, out: &mut dyn Write) -> CommandResult<()> {
        (self.callback)(invocation, out)
    }

    /// Renders this command and its descendants as a clap command. A repeated flag keeps its
    /// last value, and leaf commands collect any trailing positional arguments.
    pub fn to_clap(&self) -> clap::Command {
        let mut command = clap::Command::new(self.name)
            .about(self.about)
            .args_override_self(true);
        if let Some(long_about) = self.long_about {
            command = command.long_about(long_about);
        }
        if self.children.is_empty() {
            command = command.arg(
                Arg::new(POSITIONALS)
                    .action(ArgAction::Append)
                    .num_args(1..)
                    .hide(true),
            );
        }

        let command = self
            .flags
            .iter()
            .fold(command, |command, flag| command.arg(flag.to_arg()));

        self.children
            .iter()
            .fold(command, |command, child| command.subcommand(child.to_clap()))
    }
}

impl fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNode")
            .field("name", &self.name)
            .field("flags", &self.flags)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

/// A resolved command with its bound flag values and positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    command: &'static str,
    values: BTreeMap<&'static str, FlagValue>,
    positionals: Vec<String>,
}

impl Invocation {
    pub fn new(
        command: &'static str,
        values: BTreeMap<&'static str, FlagValue>,
        positionals: Vec<String>,
    ) -> Self {
        Self {
            command,
            values,
            positionals,
        }
    }

    /// Reads the positional arguments captured for a leaf command.
    pub(crate) fn positionals_from(matches: &clap::ArgMatches) -> Vec<String> {
        matches
            .try_get_many::<String>(POSITIONALS)
            .ok()
            .flatten()
            .map(|values| values.cloned().collect())
            .unwrap_or_default()
    }

    pub fn command(&self) -> &'static str {
        self.command
    }

    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    /// Bound value of a string flag.
    pub fn string(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(FlagValue::Str(value)) => Some(value),
            _ => None,
        }
    }

    /// Bound value of a switch; undeclared switches read as off.
    pub fn switch(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(FlagValue::Bool(true)))
    }
}
