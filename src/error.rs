use thiserror::Error;

pub type CommandResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("command `{name}` is already registered under `{parent}`")]
    DuplicateCommand {
        parent: &'static str,
        name: &'static str,
    },

    #[error("flag `{flag}` is already declared on `{command}`")]
    DuplicateFlag {
        command: &'static str,
        flag: String,
    },

    #[error(transparent)]
    Usage(#[from] clap::Error),

    #[error("failed to write output")]
    Io(#[from] std::io::Error),
}
