//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use eatsafe_cli::CliError;

#[expect(clippy::print_stderr, reason = "the binary reports failures on stderr")]
fn main() {
    match eatsafe_cli::run() {
        Ok(()) => {}
        // `--help` and `--version` are delivered as clap errors.
        Err(CliError::ArgumentParsing(err)) if !err.use_stderr() => err.exit(),
        Err(err) => {
            eprintln!("eatsafe: {err}");
            std::process::exit(1);
        }
    }
}
