use clap::Parser;
use chronolabel::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
