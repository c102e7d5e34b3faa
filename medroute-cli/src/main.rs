//! Entry point for the `medroute` command.
#![forbid(unsafe_code)]

use std::process::ExitCode;

use medroute_cli::CliError;

fn main() -> ExitCode {
    medroute_cli::init_logging();
    match medroute_cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

#[expect(
    clippy::print_stderr,
    reason = "the top-level error is the command's user-facing output"
)]
fn report(err: &CliError) {
    eprintln!("medroute: {err}");
}
