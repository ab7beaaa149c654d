use std::{collections::BTreeMap, ffi::OsString, io::Write};

use clap::{error::ErrorKind, ArgMatches};

use crate::{
    cli::{CommandNode, FlagValue, Invocation},
    error::{CliError, CommandResult},
};

/// Parses `args` (without the program name) against `root`, then runs the selected command's
/// callback with `out` as its output sink.
///
/// Help requests are written to `out` and succeed. Unknown commands or flags are returned as
/// [`CliError::Usage`].
pub fn execute<I, T>(root: &CommandNode, args: I, out: &mut dyn Write) -> CommandResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let argv = std::iter::once(OsString::from(root.name()))
        .chain(args.into_iter().map(Into::into));

    let matches = match root.to_clap().try_get_matches_from(argv) {
        Ok(matches) => matches,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            write!(out, "{}", err.render())?;
            return Ok(());
        }
        Err(err) => return Err(CliError::Usage(err)),
    };

    let (command, matches) = resolve(root, &matches);
    let invocation = bind(command, matches);

    tracing::debug!(
        target: "cli_template::dispatch",
        command = invocation.command(),
        "dispatching command"
    );
    command.run(&invocation, out)
}

/// Descends the tree along the matched subcommand chain.
fn resolve<'a>(
    node: &'a CommandNode,
    matches: &'a ArgMatches,
) -> (&'a CommandNode, &'a ArgMatches) {
    match matches.subcommand() {
        Some((name, sub_matches)) => match node.child(name) {
            Some(child) => resolve(child, sub_matches),
            None => (node, matches),
        },
        None => (node, matches),
    }
}

/// Binds every declared flag, substituting the default when a string flag is absent or empty,
/// and collects any trailing positional arguments.
fn bind(command: &CommandNode, matches: &ArgMatches) -> Invocation {
    let values = command
        .flags()
        .iter()
        .map(|flag| {
            let value = match flag.default_value() {
                FlagValue::Str(default) => FlagValue::Str(
                    matches
                        .get_one::<String>(flag.name())
                        .filter(|value| !value.is_empty())
                        .unwrap_or(default)
                        .clone(),
                ),
                FlagValue::Bool(_) => FlagValue::Bool(matches.get_flag(flag.name())),
            };
            (flag.name(), value)
        })
        .collect::<BTreeMap<_, _>>();

    Invocation::new(command.name(), values, Invocation::positionals_from(matches))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Flag;

    fn recording_tree() -> CommandNode {
        let mut hello = CommandNode::new("hello", "Print a greeting message", |inv, out| {
            writeln!(out, "hello name={:?} args={:?}", inv.string("name"), inv.positionals())?;
            Ok(())
        });
        hello
            .declare_flag(Flag::string("name", Some('n'), "fallback", "Name to greet"))
            .unwrap();

        let mut root = CommandNode::new("app", "Test application", |inv, out| {
            writeln!(out, "root verbose={}", inv.switch("verbose"))?;
            Ok(())
        });
        root.declare_flag(Flag::switch("verbose", Some('V'), "Verbose output"))
            .unwrap();
        root.register(hello).unwrap();
        root
    }

    fn run(args: &[&str]) -> CommandResult<String> {
        let mut out = Vec::new();
        execute(&recording_tree(), args.iter().copied(), &mut out)?;
        Ok(String::from_utf8(out).expect("utf-8 output"))
    }

    #[test]
    fn runs_root_without_subcommand() {
        assert_eq!(run(&[]).unwrap(), "root verbose=false\n");
        assert_eq!(run(&["-V"]).unwrap(), "root verbose=true\n");
    }

    #[test]
    fn descends_into_subcommand() {
        assert_eq!(
            run(&["hello", "--name", "Ada"]).unwrap(),
            "hello name=Some(\"Ada\") args=[]\n"
        );
    }

    #[test]
    fn applies_default_for_missing_and_empty_values() {
        let expected = "hello name=Some(\"fallback\") args=[]\n";
        assert_eq!(run(&["hello"]).unwrap(), expected);
        assert_eq!(run(&["hello", "-n", ""]).unwrap(), expected);
        assert_eq!(run(&["hello", "--name="]).unwrap(), expected);
    }

    #[test]
    fn string_flag_takes_hyphenated_value() {
        assert_eq!(
            run(&["hello", "--name", "-Bob"]).unwrap(),
            "hello name=Some(\"-Bob\") args=[]\n"
        );
        assert_eq!(
            run(&["hello", "-n", "--x"]).unwrap(),
            "hello name=Some(\"--x\") args=[]\n"
        );
    }

    #[test]
    fn repeated_flag_keeps_last_value() {
        assert_eq!(
            run(&["hello", "-n", "A", "--name", "B"]).unwrap(),
            "hello name=Some(\"B\") args=[]\n"
        );
        assert_eq!(run(&["-V", "-V"]).unwrap(), "root verbose=true\n");
    }

    #[test]
    fn leaf_collects_positionals() {
        assert_eq!(
            run(&["hello", "extra", "words"]).unwrap(),
            "hello name=Some(\"fallback\") args=[\"extra\", \"words\"]\n"
        );
        assert_eq!(
            run(&["hello", "-n", "Ada", "extra"]).unwrap(),
            "hello name=Some(\"Ada\") args=[\"extra\"]\n"
        );
    }

    #[test]
    fn unknown_flag_is_usage_error() {
        let err = run(&["hello", "--bogus"]).unwrap_err();
        match err {
            CliError::Usage(err) => assert_eq!(err.kind(), ErrorKind::UnknownArgument),
            other => panic!("expected usage error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_subcommand_is_usage_error() {
        let err = run(&["goodbye"]).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
    }

    #[test]
    fn missing_flag_value_is_usage_error() {
        let err = run(&["hello", "--name"]).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
    }

    #[test]
    fn root_flags_do_not_reach_subcommands() {
        let err = run(&["hello", "-V"]).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
    }

    #[test]
    fn help_is_written_to_sink() {
        let output = run(&["--help"]).unwrap();
        assert!(output.contains("Test application"));
        assert!(output.contains("hello"));

        let output = run(&["hello", "-h"]).unwrap();
        assert!(output.contains("--name"));
    }
}
