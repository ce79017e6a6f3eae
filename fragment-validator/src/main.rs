// These Clippy lints are disabled because this is a CLI binary, not a library:
// - print_stdout/print_stderr: verdicts and reports go to stdout, diagnostics to stderr.
// - exit: the process exit code carries the verdict for shell scripts.
#![allow(clippy::print_stdout, clippy::print_stderr, clippy::exit)]

mod cli;

#[tokio::main]
async fn main() {
    match cli::run().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(cli::EXIT_ERROR);
        }
    }
}
