use cli_template::error::CliError;

fn main() {
    if let Err(err) = cli_template::run() {
        match err.downcast_ref::<CliError>() {
            Some(CliError::Usage(usage)) => {
                // Nothing left to report to if stderr itself fails; exit code still signals it.
                let _ = usage.print();
            }
            _ => eprintln!("Error: {err:?}"),
        }
        std::process::exit(1);
    }
}
